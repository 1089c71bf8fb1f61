//! Classify command - find the code-entry field in a captured page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use codefill_core::{Detection, FieldClassifier, PageSnapshot};

use super::OutputFormat;
use super::config::load_config;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Page snapshot file (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let classifier = FieldClassifier::from_config(&config.classifier);

    info!("Classifying {}", args.input.display());
    let content = fs::read_to_string(&args.input)?;
    let page = PageSnapshot::from_json(&content)?;

    let detection = classifier.detect(&page)?;

    print!("{}", format_output(detection.as_ref(), args.format)?);

    Ok(())
}

fn handle_list(detection: &Detection) -> String {
    detection
        .field
        .handles()
        .iter()
        .map(|h| h.0.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_output(detection: Option<&Detection>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&detection)?)),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["tier", "kind", "handles"])?;
            if let Some(detection) = detection {
                let kind = if detection.field.is_segmented() {
                    "segmented"
                } else {
                    "single"
                };
                let handles = handle_list(detection);
                wtr.write_record([detection.tier.as_str(), kind, handles.as_str()])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(match detection {
            Some(detection) if detection.field.is_segmented() => format!(
                "{} {} boxes: {}\n",
                style(detection.tier.as_str()).cyan(),
                detection.field.handles().len(),
                handle_list(detection)
            ),
            Some(detection) => format!(
                "{} field: {}\n",
                style(detection.tier.as_str()).cyan(),
                handle_list(detection)
            ),
            None => format!("{}\n", style("No code field found").yellow()),
        }),
    }
}
