//! The slash-command pipeline: parse → resolve → extract → render → dispatch.

use serde::Deserialize;
use thiserror::Error;

use crate::content::{extract, ExtractionError, PostData};
use crate::feed::{FeedCache, FeedSource, FetchError};
use crate::notify::{render_post, DispatchError, Dispatcher, Message};
use crate::query::{self, QueryDescriptor};
use crate::util::escape_mrkdwn;

/// The fields of a Slack slash-command request this bot uses.
///
/// Slack posts these form-encoded; other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Feed unavailable: {0}")]
    Fetch(#[from] FetchError),
    #[error("No post matches {0}")]
    NotFound(QueryDescriptor),
    #[error("Post content unusable: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Delivery failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl CommandError {
    /// The private notice shown to the user who ran the command.
    pub fn user_notice(&self) -> String {
        match self {
            CommandError::NotFound(query) => format!(
                "Sorry, I couldn't find a post matching {}.",
                escape_mrkdwn(&query.to_string())
            ),
            CommandError::Extraction(_) => {
                "I found that post, but couldn't read its image or link.".to_string()
            }
            CommandError::Fetch(_) => {
                "Something went wrong fetching the newsletter feed. Please try again later."
                    .to_string()
            }
            CommandError::Dispatch(_) => {
                "Something went wrong posting the newsletter. Please try again later.".to_string()
            }
        }
    }
}

/// Answers slash commands from the cached feed.
pub struct CommandHandler<S, D> {
    cache: FeedCache<S>,
    dispatcher: D,
    source_name: String,
}

impl<S: FeedSource, D> CommandHandler<S, D> {
    pub fn new(cache: FeedCache<S>, dispatcher: D, source_name: impl Into<String>) -> Self {
        Self {
            cache,
            dispatcher,
            source_name: source_name.into(),
        }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Finds the entry `text` refers to and extracts its post fields.
    ///
    /// # Errors
    ///
    /// [`CommandError::Fetch`], [`CommandError::NotFound`] or [`CommandError::Extraction`].
    pub async fn lookup(&self, text: &str) -> Result<PostData, CommandError> {
        let descriptor = query::parse(text);
        let snapshot = self.cache.snapshot().await?;

        let entry = query::resolve(&snapshot, &descriptor)
            .ok_or(CommandError::NotFound(descriptor))?;
        tracing::debug!(title = %entry.title, "Resolved entry");

        Ok(extract(entry)?)
    }

    /// Looks up `text` and renders the channel message without sending it.
    pub async fn preview(&self, text: &str) -> Result<Message, CommandError> {
        let post = self.lookup(text).await?;
        Ok(render_post(&self.source_name, &post))
    }
}

impl<S: FeedSource, D: Dispatcher> CommandHandler<S, D> {
    /// Runs one slash command to completion.
    ///
    /// On success the post goes to the originating channel. On failure the
    /// invoking user gets a private notice instead; a structured message is
    /// never sent half-built.
    pub async fn handle(&self, command: &SlashCommand) -> Result<(), CommandError> {
        tracing::info!(
            channel = %command.channel_id,
            user = %command.user_id,
            text = %command.text,
            "Handling slash command"
        );

        let result = match self.preview(&command.text).await {
            Ok(message) => self
                .dispatcher
                .post_message(&command.channel_id, &message)
                .await
                .map_err(CommandError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, text = %command.text, "Slash command failed");
            self.notify_failure(command, e).await;
        }

        result
    }

    async fn notify_failure(&self, command: &SlashCommand, error: &CommandError) {
        let notice = error.user_notice();
        if let Err(e) = self
            .dispatcher
            .post_ephemeral(&command.channel_id, &command.user_id, &notice)
            .await
        {
            tracing::error!(error = %e, "Failed to deliver failure notice");
        }
    }
}
