use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use anyhow::Context;
use chirp_core::{
    CallContext, ChirpConfig, Clock, Envelope, Request, Response, SystemClock, Timeline,
};
use chirp_store::{FileTweetStore, TweetStore};
use chirp_types::{CommentPayload, Principal, TweetPayload};

use crate::cli::*;
use crate::output::print_response;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;
    if let Command::Config = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    let store = FileTweetStore::open(&config.store_path)
        .with_context(|| format!("opening {}", config.store_path.display()))?;
    tracing::debug!(store = %config.store_path.display(), config = ?config.timeline, "timeline ready");
    let timeline = Timeline::new(store, config.timeline);
    let clock = SystemClock::new();
    let caller = resolve_caller(&cli);

    if let Command::Replay(args) = &cli.command {
        let reader: Box<dyn BufRead> = if args.file.as_os_str() == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(&args.file)
                .with_context(|| format!("opening {}", args.file.display()))?;
            Box::new(BufReader::new(file))
        };
        for response in replay(&timeline, &clock, &caller, reader)? {
            print_response(&cli.format, &response)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(request) = to_request(&cli.command, &caller) else {
        return Ok(ExitCode::SUCCESS);
    };
    let ctx = CallContext::now(caller, &clock);
    let response = timeline.handle(&ctx, request);
    if print_response(&cli.format, &response)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ChirpConfig> {
    let mut config = match &cli.config {
        Some(path) => ChirpConfig::load(path)?,
        None => ChirpConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    Ok(config)
}

/// `--caller`, else the principal of `--caller-key`, else anonymous.
fn resolve_caller(cli: &Cli) -> Principal {
    cli.caller
        .clone()
        .or_else(|| cli.caller_key.clone())
        .unwrap_or_default()
}

/// Map a subcommand to its entry point. `None` for host-only commands.
fn to_request(command: &Command, caller: &Principal) -> Option<Request> {
    let username = |name: &Option<String>| {
        name.clone().unwrap_or_else(|| caller.to_string())
    };

    let request = match command {
        Command::Get(args) => Request::GetTweet { id: args.id.clone() },
        Command::List => Request::GetAllTweets,
        Command::Post(args) => Request::PostTweet {
            payload: TweetPayload::new(args.content.clone(), username(&args.username)),
        },
        Command::Edit(args) => Request::EditTweet {
            id: args.id.clone(),
            content: args.content.clone(),
        },
        Command::Delete(args) => Request::DeleteTweet { id: args.id.clone() },
        Command::Comment(args) => Request::AddComment {
            tweet_id: args.tweet_id.clone(),
            payload: CommentPayload::new(args.content.clone(), username(&args.username)),
        },
        Command::Uncomment(args) => Request::DeleteComment {
            tweet_id: args.tweet_id.clone(),
            comment_id: args.comment_id.clone(),
        },
        Command::Like(args) => Request::AddLike { tweet_id: args.id.clone() },
        Command::Unlike(args) => Request::RemoveLike { tweet_id: args.id.clone() },
        Command::Retweet(args) => Request::RetweetTweet {
            tweet_id: args.tweet_id.clone(),
            username: username(&args.username),
        },
        Command::Replay(_) | Command::Config => return None,
    };
    Some(request)
}

/// Run JSON-lines envelopes in order, one response per request.
///
/// Blank lines and lines starting with `#` are skipped. A line that does not
/// parse stops the replay; earlier requests stay applied.
fn replay<S: TweetStore>(
    timeline: &Timeline<S>,
    clock: &dyn Clock,
    default_caller: &Principal,
    reader: impl BufRead,
) -> anyhow::Result<Vec<Response>> {
    let mut responses = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let envelope: Envelope = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: invalid request", index + 1))?;
        let caller = envelope.caller.unwrap_or_else(|| default_caller.clone());
        let ctx = CallContext::now(caller, clock);
        responses.push(timeline.handle(&ctx, envelope.request));
    }
    Ok(responses)
}
