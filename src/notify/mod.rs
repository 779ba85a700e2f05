//! Delivering post notifications to the chat channel.
//!
//! [`render_post`] is a pure function from [`PostData`](crate::content::PostData)
//! to a Block Kit [`Message`]; a [`Dispatcher`] sends it. [`SlackDispatcher`]
//! is the production implementation.

mod render;
mod slack;

pub use render::{render_post, Block, Message, TextObject};
pub use slack::{DispatchError, Dispatcher, SlackDispatcher, DEFAULT_API_BASE};
