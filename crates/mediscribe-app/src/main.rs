use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mediscribe_app::{wav_input, ScribeSession};
use mediscribe_assist::{PromptSet, RemoteGenerativeBackend, ScribeAssistant};
use mediscribe_foundation::{AppConfig, AppState, StateManager};
use mediscribe_segmenter::{SegmenterConfig, SpeechSegmenter};
use mediscribe_stt::RemoteWhisperTranscriber;
use mediscribe_telemetry::PipelineMetrics;

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    tracing::info!("Starting Mediscribe session");

    let input_path = std::env::args()
        .nth(1)
        .context("usage: mediscribe <input.wav>")?;

    let config = AppConfig::load()?;
    let features = config.features();
    features.log_summary();

    let state_manager = StateManager::new();
    state_manager.transition(AppState::Running)?;

    let metrics = PipelineMetrics::default();
    let segmenter_cfg = SegmenterConfig::default();
    let target_rate = segmenter_cfg.target_sample_rate_hz;
    let mut segmenter = SpeechSegmenter::new(segmenter_cfg).with_metrics(metrics.clone());

    let (sample_rate, samples) = wav_input::load_wav(Path::new(&input_path))?;
    tracing::info!(
        rate_hz = sample_rate,
        samples = samples.len(),
        "loaded input audio"
    );
    // ~100 ms deliveries simulate a live microphone stream.
    let chunk = (sample_rate as usize / 10).max(1);

    if !features.transcription.is_enabled() {
        tracing::warn!("transcription disabled, running segmentation only");
        let mut utterances = 0usize;
        for piece in samples.chunks(chunk) {
            utterances += segmenter.feed(sample_rate, piece)?.len();
        }
        if segmenter.finish().is_some() {
            utterances += 1;
        }
        println!(
            "Segmented {} utterances from {} frames.",
            utterances,
            metrics.frames()
        );
        state_manager.transition(AppState::Stopping)?;
        state_manager.transition(AppState::Stopped)?;
        return Ok(());
    }

    let transcriber = Arc::new(RemoteWhisperTranscriber::new(
        &config.transcription,
        target_rate,
    )?);

    let assistant = if features.generative.is_enabled() {
        let backend = Arc::new(RemoteGenerativeBackend::new(&config.generative)?);
        let prompts = PromptSet::load(config.session.prompt_dir.as_deref().map(Path::new));
        Some(ScribeAssistant::new(
            backend,
            prompts,
            config.session.wake_word.clone(),
        ))
    } else {
        tracing::warn!("generative backend disabled, notes will stay placeholders");
        None
    };

    let mut session =
        ScribeSession::new(segmenter, transcriber, assistant).with_metrics(metrics.clone());

    for piece in samples.chunks(chunk) {
        session.push(Some((sample_rate, piece.to_vec()))).await?;
    }
    let snapshot = session.finish().await;

    println!("=== Transcript ===\n{}\n", snapshot.transcript);
    println!("=== Medical Note ===\n{}\n", snapshot.note);
    println!("=== Doctor Preview ===\n{}\n", snapshot.preview);
    if snapshot.commands.is_empty() {
        println!("=== Commands ===\n(none)");
    } else {
        println!("=== Commands ===\n{}", snapshot.commands.join("\n"));
    }
    tracing::info!(
        utterances = metrics.utterances(),
        frames = metrics.frames(),
        "session complete"
    );

    state_manager.transition(AppState::Stopping)?;
    state_manager.transition(AppState::Stopped)?;
    Ok(())
}
