//! Extract command - find the verification code in one message.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use codefill_core::{CodeExtractor, ExtractedCode, MailMessage, TieredCodeExtractor};

use super::OutputFormat;
use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Message file (.json message, .html body or plain text body)
    #[arg(short, long, conflicts_with_all = ["subject", "body"])]
    input: Option<PathBuf>,

    /// Message subject
    #[arg(short, long, default_value = "")]
    subject: String,

    /// Message body
    #[arg(short, long, default_value = "")]
    body: String,

    /// Treat the body as HTML
    #[arg(long)]
    html: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let extractor = TieredCodeExtractor::from_config(&config.extraction);

    let message = match &args.input {
        Some(path) => {
            info!("Reading message from {}", path.display());
            let mut messages = super::read_messages(path)?;
            if messages.len() != 1 {
                anyhow::bail!(
                    "{} holds {} messages; use 'codefill batch' for several",
                    path.display(),
                    messages.len()
                );
            }
            let mut message = messages.remove(0);
            message.html |= args.html;
            message
        }
        None if args.html => MailMessage::html(args.subject, args.body),
        None => MailMessage::new(args.subject, args.body),
    };

    let context = message.context(config.mail.strip_html)?;
    let code = extractor.extract(&context);

    print!("{}", format_output(code.as_ref(), args.format)?);

    Ok(())
}

fn format_output(code: Option<&ExtractedCode>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&code)?)),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["code", "tier"])?;
            if let Some(code) = code {
                wtr.write_record([code.code.as_str(), code.tier.as_str()])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(match code {
            Some(code) => format!("{}\n", code.code),
            None => format!("{}\n", style("No code found").yellow()),
        }),
    }
}
