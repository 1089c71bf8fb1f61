//! Subcommands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod extract;

use std::fs;
use std::path::Path;

use codefill_core::MailMessage;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Message files hold either one message object or an array of them.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum MessageFile {
    Many(Vec<MailMessage>),
    One(MailMessage),
}

/// Read messages from a file.
///
/// `.json` files are decoded as message objects; `.html`/`.htm` and any
/// other extension are taken as a single body with no subject.
pub fn read_messages(path: &Path) -> anyhow::Result<Vec<MailMessage>> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let messages = match extension.as_str() {
        "json" => match serde_json::from_str(&content)? {
            MessageFile::Many(messages) => messages,
            MessageFile::One(message) => vec![message],
        },
        "html" | "htm" => vec![MailMessage::html("", content)],
        _ => vec![MailMessage::new("", content)],
    };

    Ok(messages)
}
