//! Batch command - look up codes across many message files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use codefill_core::models::config::MailConfig;
use codefill_core::{MailMatch, TieredCodeExtractor, first_code, order_newest_first};

use super::OutputFormat;
use super::config::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of message files
    #[arg(required = true)]
    input: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Consult messages in file order instead of newest first
    #[arg(long)]
    keep_order: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one message file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    messages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<MailMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let extractor = TieredCodeExtractor::from_config(&config.extraction);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    info!("Found {} message files", files.len());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        let file = path.display().to_string();

        match scan_file(path, &extractor, &config.mail, args.keep_order) {
            Ok((messages, found)) => reports.push(FileReport {
                file,
                messages,
                found,
                error: None,
            }),
            Err(e) if args.continue_on_error => {
                warn!("Failed to read {}: {}", file, e);
                reports.push(FileReport {
                    file,
                    messages: 0,
                    found: None,
                    error: Some(e.to_string()),
                });
            }
            Err(e) => {
                error!("Failed to read {}: {}", file, e);
                progress.abandon();
                anyhow::bail!("Processing {} failed: {}", file, e);
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    let report = match args.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Csv => format_csv(&reports)?,
        OutputFormat::Text => format_text(&reports),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, report)?;
            debug!("Wrote report to {}", path.display());
        }
        None => print!("{}", report),
    }

    let with_code = reports.iter().filter(|r| r.found.is_some()).count();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();

    eprintln!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        reports.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} with a code, {} without, {} failed",
        style(with_code).green(),
        style(reports.len() - with_code - failed).yellow(),
        style(failed).red()
    );

    Ok(())
}

fn scan_file(
    path: &Path,
    extractor: &TieredCodeExtractor,
    mail: &MailConfig,
    keep_order: bool,
) -> anyhow::Result<(usize, Option<MailMatch>)> {
    let mut messages = super::read_messages(path)?;
    if !keep_order {
        order_newest_first(&mut messages);
    }

    Ok((messages.len(), first_code(extractor, &messages, mail)))
}

fn format_csv(reports: &[FileReport]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["file", "messages", "index", "code", "tier", "error"])?;

    for report in reports {
        let messages = report.messages.to_string();
        let (index, code, tier) = match &report.found {
            Some(found) => (
                found.index.to_string(),
                found.code.code.clone(),
                found.code.tier.as_str(),
            ),
            None => (String::new(), String::new(), ""),
        };

        wtr.write_record([
            report.file.as_str(),
            messages.as_str(),
            index.as_str(),
            code.as_str(),
            tier,
            report.error.as_deref().unwrap_or(""),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(reports: &[FileReport]) -> String {
    let mut output = String::new();

    for report in reports {
        let line = match (&report.found, &report.error) {
            (_, Some(error)) => format!("{}: {} {}", report.file, style("error").red(), error),
            (Some(found), None) => format!(
                "{}: {} ({}, message {} of {})",
                report.file,
                found.code.code,
                found.code.tier,
                found.index + 1,
                report.messages
            ),
            (None, None) => format!("{}: {}", report.file, style("no code").yellow()),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}
