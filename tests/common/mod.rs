//! Shared fixtures for integration tests.

#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Two-entry newsletter feed: "Fall Update" (2024-09-10) then "Summer Recap" (2024-06-01).
pub const NEWSLETTER_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Soren Iverson</title>
    <link>https://news.example.com</link>
    <item>
      <title>Fall Update</title>
      <link>https://news.example.com/p/fall-update</link>
      <pubDate>Tue, 10 Sep 2024 14:00:00 GMT</pubDate>
      <content:encoded><![CDATA[
        <div>
          <img src="https://cdn.example.com/avatar.png" alt="avatar">
          <img src="https://cdn.example.com/posts/09-10-cover.png" alt="cover">
          <p><a href="https://news.example.com/p/fall-update?web=1">Read Online</a></p>
        </div>
      ]]></content:encoded>
    </item>
    <item>
      <title>Summer Recap</title>
      <link>https://news.example.com/p/summer-recap</link>
      <pubDate>Sat, 01 Jun 2024 22:30:00 GMT</pubDate>
      <content:encoded><![CDATA[
        <img src="/posts/06-01-cover.png">
        <a href="/p/summer-recap?web=1">View Online</a>
      ]]></content:encoded>
    </item>
  </channel>
</rss>"#;

/// Serves [`NEWSLETTER_RSS`] at `/feed`, expecting exactly `fetches` requests.
pub async fn mount_feed(server: &MockServer, fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(NEWSLETTER_RSS)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .expect(fetches)
        .mount(server)
        .await;
}

pub fn feed_url(server: &MockServer) -> String {
    format!("{}/feed", server.uri())
}
