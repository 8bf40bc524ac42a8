use std::path::PathBuf;

use chirp_types::{CommentId, Principal, TweetId};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chirp",
    about = "chirp — tweets, comments, likes and retweets in a local store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file, overriding `store_path` from the configuration
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Identity to call as (default: anonymous)
    #[arg(long, global = true)]
    pub caller: Option<Principal>,

    /// Call as the principal derived from this hex-encoded public key
    #[arg(
        long,
        global = true,
        conflicts_with = "caller",
        value_parser = Principal::from_public_key_hex
    )]
    pub caller_key: Option<Principal>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one tweet
    Get(TweetArgs),
    /// Show every tweet
    List,
    /// Post a new tweet
    Post(PostArgs),
    /// Replace the content of a tweet
    Edit(EditArgs),
    /// Delete a tweet
    Delete(TweetArgs),
    /// Comment on a tweet
    Comment(CommentArgs),
    /// Delete a comment
    Uncomment(UncommentArgs),
    /// Like a tweet
    Like(TweetArgs),
    /// Take back a like
    Unlike(TweetArgs),
    /// Post a new tweet quoting another one
    Retweet(RetweetArgs),
    /// Run JSON-lines requests from a file ("-" for stdin)
    Replay(ReplayArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct TweetArgs {
    pub id: TweetId,
}

#[derive(Args)]
pub struct PostArgs {
    pub content: String,
    /// Display name (default: the caller)
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: TweetId,
    pub content: String,
}

#[derive(Args)]
pub struct CommentArgs {
    pub tweet_id: TweetId,
    pub content: String,
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args)]
pub struct UncommentArgs {
    pub tweet_id: TweetId,
    pub comment_id: CommentId,
}

#[derive(Args)]
pub struct RetweetArgs {
    pub tweet_id: TweetId,
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args)]
pub struct ReplayArgs {
    pub file: PathBuf,
}
