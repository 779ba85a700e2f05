use serde::Serialize;

use crate::content::PostData;
use crate::util::{escape_mrkdwn, normalize_whitespace, truncate_chars};

/// Slack caps header text at 150 characters.
const MAX_HEADER_CHARS: usize = 150;
/// Slack caps image alt text and titles at 2000 characters.
const MAX_IMAGE_TEXT_CHARS: usize = 2000;

/// A Slack Block Kit text object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

/// The subset of Block Kit blocks a post notification uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        text: TextObject,
    },
    Image {
        image_url: String,
        alt_text: String,
        title: TextObject,
    },
}

/// A channel message: fallback `text` for notifications plus the rich `blocks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub text: String,
    pub blocks: Vec<Block>,
}

/// Renders extracted post fields into the three-part announcement:
/// a title header, a "<source> post from <date> | see newsletter post" line,
/// and the cover image.
pub fn render_post(source_name: &str, post: &PostData) -> Message {
    let title = normalize_whitespace(&post.title);
    let date = post.published_at.format("%-m/%-d/%Y");

    // A raw '|' would end the link target early
    let link = post.reference_url.as_str().replace('|', "%7C");

    Message {
        text: format!("Latest {source_name} post"),
        blocks: vec![
            Block::Header {
                text: TextObject::PlainText {
                    text: truncate_chars(&title, MAX_HEADER_CHARS).into_owned(),
                },
            },
            Block::Section {
                text: TextObject::Mrkdwn {
                    text: format!(
                        "{} post from {date} | <{link}|see newsletter post>",
                        escape_mrkdwn(source_name)
                    ),
                },
            },
            Block::Image {
                image_url: post.image_url.to_string(),
                alt_text: truncate_chars(&title, MAX_IMAGE_TEXT_CHARS).into_owned(),
                title: TextObject::PlainText {
                    text: truncate_chars(&title, MAX_IMAGE_TEXT_CHARS).into_owned(),
                },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    fn post(title: &str) -> PostData {
        PostData {
            title: title.to_string(),
            image_url: Url::parse("https://cdn.example.com/09-10.png").unwrap(),
            published_at: Utc.with_ymd_and_hms(2024, 9, 10, 14, 0, 0).unwrap(),
            reference_url: Url::parse("https://news.example.com/p/fall-update").unwrap(),
        }
    }

    #[test]
    fn test_payload_shape() {
        let message = render_post("Soren Iverson", &post("Fall Update"));
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(
            value,
            json!({
                "text": "Latest Soren Iverson post",
                "blocks": [
                    {
                        "type": "header",
                        "text": { "type": "plain_text", "text": "Fall Update" }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "Soren Iverson post from 9/10/2024 | <https://news.example.com/p/fall-update|see newsletter post>"
                        }
                    },
                    {
                        "type": "image",
                        "image_url": "https://cdn.example.com/09-10.png",
                        "alt_text": "Fall Update",
                        "title": { "type": "plain_text", "text": "Fall Update" }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_title_whitespace_is_tidied() {
        let message = render_post("Soren Iverson", &post("\n   Fall\n   Update "));
        match &message.blocks[0] {
            Block::Header {
                text: TextObject::PlainText { text },
            } => assert_eq!(text, "Fall Update"),
            other => panic!("expected header, got {other:?}"),
        }
    }

    #[test]
    fn test_long_title_truncated_for_header() {
        let title = "x".repeat(400);
        let message = render_post("Soren Iverson", &post(&title));
        match &message.blocks[0] {
            Block::Header {
                text: TextObject::PlainText { text },
            } => assert_eq!(text.chars().count(), MAX_HEADER_CHARS),
            other => panic!("expected header, got {other:?}"),
        }
        match &message.blocks[2] {
            Block::Image { alt_text, .. } => assert_eq!(alt_text.len(), 400),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_source_name_is_escaped_in_mrkdwn() {
        let message = render_post("Q&A <weekly>", &post("Fall Update"));
        match &message.blocks[1] {
            Block::Section {
                text: TextObject::Mrkdwn { text },
            } => assert!(text.starts_with("Q&amp;A &lt;weekly&gt; post from 9/10/2024")),
            other => panic!("expected section, got {other:?}"),
        }
    }

    #[test]
    fn test_pipe_in_link_is_encoded() {
        let mut data = post("Fall Update");
        data.reference_url = Url::parse("https://news.example.com/p?tags=a|b").unwrap();
        let message = render_post("Soren Iverson", &data);
        match &message.blocks[1] {
            Block::Section {
                text: TextObject::Mrkdwn { text },
            } => assert!(text.contains("<https://news.example.com/p?tags=a%7Cb|see newsletter post>")),
            other => panic!("expected section, got {other:?}"),
        }
    }
}
