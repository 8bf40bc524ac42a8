use chirp_core::Response;
use chirp_types::Tweet;
use colored::Colorize;

use crate::cli::OutputFormat;

/// Print a response; returns `false` if it was an error.
pub fn print_response(format: &OutputFormat, response: &Response) -> anyhow::Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(response)?),
        OutputFormat::Text => match response {
            Response::Ok { tweet } => print!("{}", format_tweet(tweet)),
            Response::OkList { tweets } if tweets.is_empty() => println!("No tweets."),
            Response::OkList { tweets } => {
                for tweet in tweets {
                    print!("{}", format_tweet(tweet));
                }
            }
            Response::Err { kind, message } => {
                eprintln!("{} {} ({})", "✗".red().bold(), message, kind.to_string().dimmed());
            }
        },
    }
    Ok(response.is_ok())
}

/// Multi-line rendering of one tweet, ending in a newline.
pub fn format_tweet(tweet: &Tweet) -> String {
    let mut out = format!(
        "{}  @{}  {}\n  {}\n",
        tweet.id.to_string().yellow().bold(),
        tweet.username.bold(),
        format!("owner {}", tweet.owner).dimmed(),
        tweet.content,
    );

    let mut meta = format!(
        "  ♥ {}  💬 {}  posted {}",
        tweet.likes,
        tweet.comments.len(),
        tweet.created_at
    );
    if let Some(updated) = tweet.updated_at {
        meta.push_str(&format!("  edited {updated}"));
    }
    out.push_str(&meta);
    out.push('\n');

    for comment in &tweet.comments {
        out.push_str(&format!(
            "    {} @{}: {}\n",
            comment.id.to_string().dimmed(),
            comment.username.cyan(),
            comment.content
        ));
    }
    out
}
