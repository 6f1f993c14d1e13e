use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mediscribe_assist::{ImageAnalyzer, PromptSet, RemoteGenerativeBackend, ReportSynthesizer};
use mediscribe_foundation::{AppConfig, AppState, HealthCheck, HealthMonitor, StateManager};
use mediscribe_records::{MemoryStore, RecordStore, SheetStore};
use mediscribe_server::router;

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

/// The report directory must stay writable or PDF downloads silently decay.
struct ReportDirCheck {
    dir: PathBuf,
}

impl HealthCheck for ReportDirCheck {
    fn check(&self) -> Result<(), String> {
        std::fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        let probe = self.dir.join(".health");
        std::fs::write(&probe, b"ok").map_err(|e| e.to_string())?;
        std::fs::remove_file(&probe).map_err(|e| e.to_string())
    }

    fn name(&self) -> &str {
        "report-dir"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    tracing::info!("Starting Mediscribe API server");

    let config = AppConfig::load()?;
    let features = config.features();
    features.log_summary();

    let state_manager = StateManager::new();

    let records: Arc<dyn RecordStore> = if features.records.is_enabled() {
        match SheetStore::new(&config.records) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "spreadsheet store unavailable, using offline dataset");
                Arc::new(MemoryStore::with_sample_data())
            }
        }
    } else {
        Arc::new(MemoryStore::with_sample_data())
    };

    let (analyzer, synthesizer) = if features.generative.is_enabled() {
        let backend = Arc::new(RemoteGenerativeBackend::new(&config.generative)?);
        let prompts = PromptSet::load(config.session.prompt_dir.as_deref().map(Path::new));
        (
            Some(Arc::new(ImageAnalyzer::new(
                backend.clone(),
                prompts.clone(),
            ))),
            Some(Arc::new(ReportSynthesizer::new(backend, prompts))),
        )
    } else {
        (None, None)
    };

    let report_dir = PathBuf::from(&config.server.report_dir);
    let monitor = HealthMonitor::new(Duration::from_secs(30));
    monitor.register(Box::new(ReportDirCheck {
        dir: report_dir.clone(),
    }));
    let _monitor = monitor.start();

    let state = mediscribe_server::AppState {
        records,
        analyzer,
        synthesizer,
        report_dir,
    };
    let app = router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");
    state_manager.transition(AppState::Running)?;

    axum::serve(listener, app).await?;

    state_manager.transition(AppState::Stopping)?;
    state_manager.transition(AppState::Stopped)?;
    Ok(())
}
