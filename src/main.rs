//! `case-export` - renders an assurance case export to PDF, DOCX or Markdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;

use case_export::adapters::export::assets::to_data_url;
use case_export::adapters::export::ExporterRegistry;
use case_export::adapters::templates::get_available_presets;
use case_export::application::{ExportCaseCommand, ExportCaseHandler};
use case_export::config::AppConfig;
use case_export::domain::template::TemplatePreset;

#[derive(Debug, Parser)]
#[command(name = "case-export", version, about)]
struct Cli {
    /// Case export JSON file
    #[arg(required_unless_present = "list_presets")]
    input: Option<PathBuf>,

    /// Template preset (full-report, summary, evidence-list)
    #[arg(short, long)]
    preset: Option<String>,

    /// Output format (pdf, docx, markdown)
    #[arg(short, long)]
    format: Option<String>,

    /// Template configuration file (JSON or YAML)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Diagram image (PNG or JPEG) to embed
    #[arg(short, long)]
    diagram: Option<PathBuf>,

    /// Name recorded as the exporting user
    #[arg(long, env = "CASE_EXPORT_USER")]
    exported_by: Option<String>,

    /// Directory to write the result to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Settings file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the available presets and exit
    #[arg(long)]
    list_presets: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AppConfig::load().context("failed to load settings")?,
    };
    config.validate().context("invalid settings")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.export.log_level)),
        )
        .init();

    if cli.list_presets {
        for preset in get_available_presets() {
            println!(
                "{:<14} {:<14} {}",
                preset.preset.as_str(),
                preset.name,
                preset.description
            );
        }
        return Ok(());
    }

    let Some(input) = &cli.input else {
        bail!("an input file is required");
    };
    let json = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let preset: TemplatePreset = match &cli.preset {
        Some(preset) => preset.parse()?,
        None => config.export.preset()?,
    };

    let mut cmd = ExportCaseCommand::from_json(&json)?.with_preset(preset);
    if let Some(format) = &cli.format {
        cmd = cmd.with_format(format.clone());
    }
    if let Some(path) = &cli.template {
        cmd = cmd.with_template_config(read_template(path).await?);
    }
    if let Some(path) = &cli.diagram {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        cmd = cmd.with_diagram(to_data_url(&bytes)?);
    }
    if let Some(who) = &cli.exported_by {
        cmd = cmd.with_exported_by(who.clone());
    }

    let registry = Arc::new(ExporterRegistry::with_builtin_exporters());
    let handler = ExportCaseHandler::new(registry, config.branding.clone())
        .with_default_format(config.export.format()?)
        .with_max_tree_depth(config.export.max_tree_depth);

    let result = handler.handle(cmd).await?;
    if let Some(error) = result.error() {
        bail!("{}", error);
    }

    let output_dir = cli
        .output_dir
        .as_deref()
        .unwrap_or(config.export.output_dir.as_path());
    let path = result
        .write_to(output_dir)
        .await
        .with_context(|| format!("failed to write to {}", output_dir.display()))?;

    tracing::info!(path = %path.display(), "Wrote export");
    println!("{}", path.display());
    Ok(())
}

/// Reads a template configuration as JSON, or YAML for `.yaml`/`.yml` files.
async fn read_template(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let value: Value = if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("{} is not valid YAML", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?
    };
    Ok(value)
}
