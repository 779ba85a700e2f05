//! HTTP endpoint receiving Slack slash commands.
//!
//! Slack expects an acknowledgement within three seconds, so the handler
//! answers `200 OK` straight away and runs the pipeline in a spawned task.
//! Results reach the user through the Web API, not the HTTP response.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::command::{CommandHandler, SlashCommand};
use crate::feed::FeedSource;
use crate::notify::Dispatcher;

struct AppState<S, D> {
    handler: Arc<CommandHandler<S, D>>,
    command: Arc<str>,
}

impl<S, D> Clone for AppState<S, D> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            command: Arc::clone(&self.command),
        }
    }
}

/// Builds the router: `POST /slack/commands` and `GET /healthz`.
///
/// Requests for any slash command other than `command` are acknowledged and dropped.
pub fn router<S, D>(handler: Arc<CommandHandler<S, D>>, command: &str) -> Router
where
    S: FeedSource + 'static,
    D: Dispatcher + 'static,
{
    let state = AppState {
        handler,
        command: Arc::from(command),
    };

    Router::new()
        .route("/slack/commands", post(slash_command::<S, D>))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

async fn slash_command<S, D>(
    State(state): State<AppState<S, D>>,
    Form(command): Form<SlashCommand>,
) -> StatusCode
where
    S: FeedSource + 'static,
    D: Dispatcher + 'static,
{
    if command.command != *state.command {
        tracing::warn!(command = %command.command, "Ignoring unexpected slash command");
        return StatusCode::OK;
    }

    let handler = Arc::clone(&state.handler);
    tokio::spawn(async move {
        // Failures are already logged and reported to the user by the handler
        let _ = handler.handle(&command).await;
    });

    StatusCode::OK
}
