//! Chart Agent CLI entry point.
//!
//! `chart-agent "A=10, B=20" --type bar --style fd` runs one direct-mode
//! turn; `chart-agent` with no prompt starts the conversational REPL.

use clap::Parser;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use chart_agent::adapters::classifier::{GeminiClassifier, GeminiClassifierConfig};
use chart_agent::adapters::extraction::{CsvDataExtractor, InlineDataExtractor};
use chart_agent::adapters::preferences::JsonPreferenceStore;
use chart_agent::adapters::render::FileChartRenderer;
use chart_agent::application;
use chart_agent::config::AppConfig;
use chart_agent::domain::chart::{BrandStyle, ChartRequest, ChartType, OutputFormat};
use chart_agent::domain::orchestrator::{Orchestrator, Timeouts};

/// Create brand-styled bar and line charts from natural language.
#[derive(Debug, Parser)]
#[command(name = "chart-agent", version, about)]
struct Cli {
    /// Chart request; omit to start conversational mode.
    prompt: Option<String>,

    /// Chart type.
    #[arg(long = "type", value_parser = ["bar", "line"])]
    chart_type: Option<String>,

    /// Brand style.
    #[arg(long, value_parser = ["fd", "bnr"])]
    style: Option<String>,

    /// Output format.
    #[arg(long, value_parser = ["raster", "vector", "png", "svg"])]
    format: Option<String>,

    /// Output filename; the extension follows the format.
    #[arg(long = "save-as")]
    save_as: Option<String>,
}

impl Cli {
    /// Explicit flag values as a partial request; these are "explicit in
    /// the current turn" for the resolver cascade.
    fn overrides(&self) -> ChartRequest {
        let mut request = ChartRequest::new();
        // The value parsers above make these parses infallible.
        request.chart_type = self
            .chart_type
            .as_deref()
            .and_then(|v| v.parse::<ChartType>().ok());
        request.style = self
            .style
            .as_deref()
            .and_then(|v| v.parse::<BrandStyle>().ok());
        request.format = self
            .format
            .as_deref()
            .and_then(|v| v.parse::<OutputFormat>().ok());
        request.filename = self.save_as.clone();
        request
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chart_agent=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(2);
        }
    };
    if let Err(error) = config.validate() {
        eprintln!("Error: {error}");
        std::process::exit(2);
    }

    if !config.classifier.has_api_key() {
        warn!("no classifier API key configured; running on the heuristic fallback only");
    }

    let classifier = match GeminiClassifier::new(GeminiClassifierConfig {
        api_key: config.classifier.api_key.clone(),
        model: config.classifier.model.clone(),
        endpoint: config.classifier.endpoint.clone(),
        timeout: config.classifier.timeout(),
    }) {
        Ok(classifier) => classifier,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(2);
        }
    };

    let orchestrator = Orchestrator::new(
        Arc::new(classifier),
        Arc::new(InlineDataExtractor::new()),
        Arc::new(CsvDataExtractor::new()),
        Arc::new(JsonPreferenceStore::new(
            config.preferences.settings_path(),
        )),
        Arc::new(
            FileChartRenderer::new(&config.output.directory)
                .with_canvas(config.output.width, config.output.height),
        ),
    )
    .with_timeouts(Timeouts {
        classifier: config.classifier.timeout(),
        ..Timeouts::default()
    });

    let code = match cli.prompt.clone() {
        Some(prompt) => application::run_direct(&orchestrator, prompt, cli.overrides()).await,
        None => application::run_conversational(&orchestrator).await,
    };

    std::process::exit(code);
}
