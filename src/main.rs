use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

use feedcast::command::CommandHandler;
use feedcast::config::Config;
use feedcast::feed::{FeedCache, HttpFeedSource};
use feedcast::notify::SlackDispatcher;

/// Get the default config file path (~/.config/feedcast/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedcast")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "feedcast", about = "Post newsletter entries from an RSS feed to Slack")]
struct Args {
    /// Path to config.toml (defaults to ~/.config/feedcast/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for Slack slash commands
    Serve,
    /// Print the Slack payload a command would produce, without sending it
    Preview {
        /// Query text: empty/"latest", an index, a date, or part of a title
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .with_env();
    tracing::debug!(config = ?config, "Effective configuration");

    let feed_url = config.feed_url().context("No usable feed URL configured")?;
    let client = reqwest::Client::new();
    let cache = FeedCache::with_ttl(
        HttpFeedSource::new(client.clone(), feed_url.as_str()),
        config.cache_ttl(),
    );

    match args.command {
        Command::Serve => {
            let token = config
                .slack_bot_token()
                .context("A Slack bot token is required to serve")?;
            let dispatcher = SlackDispatcher::with_api_base(
                client,
                SecretString::from(token.to_string()),
                config.slack_api_base.as_str(),
            );
            let handler = Arc::new(CommandHandler::new(
                cache,
                dispatcher,
                config.source_name.as_str(),
            ));

            let addr = config.listen_addr()?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            tracing::info!(
                addr = %addr,
                command = %config.command,
                feed = %feed_url,
                "Listening for slash commands"
            );

            axum::serve(listener, feedcast::server::router(handler, &config.command))
                .with_graceful_shutdown(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
                    }
                })
                .await
                .context("Server error")?;
        }
        Command::Preview { query } => {
            let handler = CommandHandler::new(cache, (), config.source_name.as_str());

            let text = query.join(" ");
            let message = handler
                .preview(&text)
                .await
                .with_context(|| format!("No post for query {text:?}"))?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_subcommand() {
        let args = Args::try_parse_from(["feedcast", "serve"]).unwrap();
        assert!(matches!(args.command, Command::Serve));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_preview_collects_query_words() {
        let args = Args::try_parse_from(["feedcast", "preview", "Fall", "Update"]).unwrap();
        match args.command {
            Command::Preview { query } => assert_eq!(query.join(" "), "Fall Update"),
            other => panic!("Expected Preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_without_query_means_latest() {
        let args = Args::try_parse_from(["feedcast", "preview"]).unwrap();
        match args.command {
            Command::Preview { query } => assert!(query.is_empty()),
            other => panic!("Expected Preview, got {:?}", other),
        }
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let args =
            Args::try_parse_from(["feedcast", "preview", "--config", "/tmp/bot.toml", "7"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/bot.toml")));
        match args.command {
            Command::Preview { query } => assert_eq!(query, vec!["7".to_string()]),
            other => panic!("Expected Preview, got {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["feedcast"]).is_err());
    }
}
