//! Wiring & DI. Entry point: bootstrap adapters, inject into the orchestrator, run UI.
//! No business logic here.

use dotenv::dotenv;
use resume_analyzer::adapters::http::{HttpAnalysisAdapter, MockAnalysisAdapter};
use resume_analyzer::adapters::persistence::FsReportSink;
use resume_analyzer::adapters::ui::notifier::TerminalNotifier;
use resume_analyzer::adapters::ui::tui::TuiInputPort;
use resume_analyzer::ports::{AnalysisPort, InputPort, NotifierPort, ReportSinkPort};
use resume_analyzer::shared::config::AppConfig;
use resume_analyzer::usecases::AnalysisOrchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    resume_analyzer::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration; using defaults");
        AppConfig::default()
    });

    // --- Analysis service: one origin for analyze, analyze-pdf and download-report ---
    let analysis: Arc<dyn AnalysisPort> = if cfg.is_mock() {
        warn!("RESUME_ANALYZER_USE_MOCK is set, using mock analysis adapter");
        Arc::new(MockAnalysisAdapter::new())
    } else {
        let api_url = cfg.api_url_or_default();
        let timeout_secs = cfg.request_timeout_secs_or_default();
        info!(url = %api_url, timeout_secs, "analysis service configured");
        Arc::new(
            HttpAnalysisAdapter::new(api_url, Duration::from_secs(timeout_secs))
                .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    };

    // --- Report downloads ---
    let output_dir = PathBuf::from(cfg.output_dir_or_default());
    let output_dir_abs = output_dir
        .canonicalize()
        .unwrap_or_else(|_| output_dir.clone());
    info!(path = %output_dir_abs.display(), "reports will be saved to {}", output_dir_abs.display());
    let reports: Arc<dyn ReportSinkPort> = Arc::new(FsReportSink::new(&output_dir));

    // Shared: the orchestrator queues notices, the TUI prints them between prompts.
    let terminal_notifier = Arc::new(TerminalNotifier::new());
    let notifier: Arc<dyn NotifierPort> = terminal_notifier.clone();

    let orchestrator = Arc::new(AnalysisOrchestrator::new(analysis, reports, notifier));
    let input_port: Arc<dyn InputPort> =
        Arc::new(TuiInputPort::new(orchestrator, terminal_notifier));

    // --- Run (menu -> paste / upload / analyze / download) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
