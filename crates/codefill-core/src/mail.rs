//! Mail source helpers: message model, markup stripping and ordered lookup.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::code::{ExtractedCode, ExtractionContext};
use crate::models::config::MailConfig;
use crate::text::CodeExtractor;

/// Elements whose text never reaches the reader.
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Elements that start a new line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "tr", "li", "table", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "section", "article", "header", "footer", "td",
];

/// A message handed over by the mail source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailMessage {
    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub body: String,

    /// Whether `body` is HTML.
    #[serde(default)]
    pub html: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl MailMessage {
    /// Plain-text message.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            html: false,
            received_at: None,
        }
    }

    /// Message with an HTML body.
    pub fn html(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            html: true,
            ..Self::new(subject, body)
        }
    }

    /// Set the receive time.
    pub fn received(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    /// Body as plain text, stripping markup when asked to.
    pub fn plain_body(&self, strip_html: bool) -> String {
        if self.html && strip_html {
            html_to_text(&self.body)
        } else {
            self.body.clone()
        }
    }

    /// Build the extraction input for this message.
    pub fn context(&self, strip_html: bool) -> Result<ExtractionContext, ExtractionError> {
        ExtractionContext::new(self.subject.as_str(), self.plain_body(strip_html))
    }
}

/// Reduce an HTML document to readable text.
///
/// Entities are decoded, invisible sections dropped and block elements
/// rendered as line breaks.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if let Some(child_element) = ElementRef::wrap(child) {
                    if block {
                        out.push('\n');
                    }
                    collect_text(child_element, out);
                    if block {
                        out.push('\n');
                    }
                }
            }
            _ => {}
        }
    }
}

/// Sort messages newest first.
///
/// Undated messages go after dated ones and keep their relative order.
pub fn order_newest_first(messages: &mut [MailMessage]) {
    messages.sort_by(|a, b| match (a.received_at, b.received_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// A code found in one of several messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMatch {
    /// Position of the message in the input order.
    pub index: usize,
    pub code: ExtractedCode,
}

/// Run the extractor over messages in the given order and stop at the first code.
///
/// At most `config.max_messages` messages are consulted. Messages with no
/// text at all are skipped.
pub fn first_code<E: CodeExtractor + ?Sized>(
    extractor: &E,
    messages: &[MailMessage],
    config: &MailConfig,
) -> Option<MailMatch> {
    for (index, message) in messages.iter().enumerate().take(config.max_messages) {
        let context = match message.context(config.strip_html) {
            Ok(context) => context,
            Err(e) => {
                debug!(index, "Skipping message: {}", e);
                continue;
            }
        };

        if let Some(code) = extractor.extract(&context) {
            info!(index, tier = code.tier.as_str(), "Found code in message");
            return Some(MailMatch { index, code });
        }
    }

    debug!("No code in {} messages", messages.len().min(config.max_messages));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TieredCodeExtractor;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_html_to_text() {
        let html = r#"
            <html>
              <head><title>Ignored 999999</title><style>.x { color: red }</style></head>
              <body>
                <p>Hello&nbsp;Jane,</p>
                <div>Your code is <b>482913</b></div>
                <script>var t = 111111;</script>
                <p>Thanks &amp; bye</p>
              </body>
            </html>
        "#;

        assert_eq!(
            html_to_text(html),
            "Hello Jane,\nYour code is 482913\nThanks & bye"
        );
    }

    #[test]
    fn test_html_message_context() {
        let message = MailMessage::html("Sign in", "<p>Code:</p><p>552199</p>");
        let context = message.context(true).unwrap();
        assert_eq!(context.body(), "Code:\n552199");

        let raw = message.context(false).unwrap();
        assert!(raw.body().contains("<p>"));
    }

    #[test]
    fn test_order_newest_first() {
        let at = |h| Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap();
        let mut messages = vec![
            MailMessage::new("undated-a", ""),
            MailMessage::new("old", "").received(at(8)),
            MailMessage::new("undated-b", ""),
            MailMessage::new("new", "").received(at(12)),
        ];

        order_newest_first(&mut messages);
        let subjects: Vec<&str> = messages.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["new", "old", "undated-a", "undated-b"]);
    }

    #[test]
    fn test_first_code_stops_at_first_hit() {
        let messages = vec![
            MailMessage::new("Newsletter", "Spring sale ends 2026"),
            MailMessage::new("", ""),
            MailMessage::new("Login", "Your code is 730016"),
            MailMessage::new("Login", "Your code is 111111"),
        ];

        let found = first_code(&TieredCodeExtractor::new(), &messages, &MailConfig::default()).unwrap();
        assert_eq!(found.index, 2);
        assert_eq!(found.code.code, "730016");
    }

    #[test]
    fn test_first_code_respects_message_limit() {
        let messages = vec![
            MailMessage::new("Newsletter", "Nothing here"),
            MailMessage::new("Login", "Your code is 730016"),
        ];
        let config = MailConfig {
            max_messages: 1,
            ..MailConfig::default()
        };

        assert_eq!(first_code(&TieredCodeExtractor::new(), &messages, &config), None);
    }
}
