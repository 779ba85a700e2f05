//! Slack slash-command bot that posts newsletter entries from an RSS feed.
//!
//! A command's text is parsed into a [`query::QueryDescriptor`], resolved against
//! a cached [`feed::FeedSnapshot`], scraped for its cover image and "read online"
//! link by [`content::extract`], and posted to the channel via [`notify`].

pub mod command;
pub mod config;
pub mod content;
pub mod feed;
pub mod notify;
pub mod query;
pub mod server;
pub mod util;
