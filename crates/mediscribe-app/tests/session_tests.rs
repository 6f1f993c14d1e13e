//! Scripted end-to-end session runs: deterministic stubs stand in for the
//! transcription and generative endpoints, real segmentation in between.

use std::sync::Arc;

use mediscribe_app::ScribeSession;
use mediscribe_assist::scribe::{NOTE_PLACEHOLDER, PREVIEW_PLACEHOLDER};
use mediscribe_assist::{MockBackend, PromptSet, ScribeAssistant};
use mediscribe_segmenter::{SegmenterConfig, SpeechSegmenter};
use mediscribe_stt::MockTranscriber;
use mediscribe_vad::FRAME_SIZE_SAMPLES;

fn tone_frames(count: usize) -> Vec<i16> {
    (0..count * FRAME_SIZE_SAMPLES)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0;
            (phase.sin() * 8_000.0) as i16
        })
        .collect()
}

fn silence_frames(count: usize) -> Vec<i16> {
    vec![0i16; count * FRAME_SIZE_SAMPLES]
}

fn session_with(
    transcripts: Vec<Result<String, String>>,
    generations: Vec<Result<String, String>>,
) -> (ScribeSession, Arc<MockTranscriber>, Arc<MockBackend>) {
    let transcriber = Arc::new(MockTranscriber::new(transcripts));
    let backend = Arc::new(MockBackend::new(generations));
    let assistant = ScribeAssistant::new(backend.clone(), PromptSet::default(), "jarvis".into());
    let session = ScribeSession::new(
        SpeechSegmenter::new(SegmenterConfig::default()),
        transcriber.clone(),
        Some(assistant),
    );
    (session, transcriber, backend)
}

#[tokio::test]
async fn scripted_stream_yields_stub_outputs_in_call_order() {
    let (mut session, transcriber, backend) = session_with(
        vec![
            Ok("patient reports an itchy rash".into()),
            Ok("jarvis pull up the allergy list".into()),
        ],
        vec![
            Ok("note v1".into()),
            Ok("preview v1".into()),
            Ok("note v2".into()),
            Ok("preview v2".into()),
            Ok("pull up the allergy list".into()),
        ],
    );

    let mut stream = tone_frames(10);
    stream.extend(silence_frames(20));
    stream.extend(tone_frames(8));
    stream.extend(silence_frames(20));

    for piece in stream.chunks(FRAME_SIZE_SAMPLES) {
        session.push(Some((16_000, piece.to_vec()))).await.unwrap();
    }
    let snapshot = session.snapshot();

    assert_eq!(
        snapshot.transcript,
        "patient reports an itchy rash jarvis pull up the allergy list"
    );
    assert_eq!(snapshot.note, "note v2");
    assert_eq!(snapshot.preview, "preview v2");
    assert_eq!(snapshot.commands, vec!["> pull up the allergy list"]);

    // One transcription per utterance, each carrying the speech frames plus
    // the 17-frame debounce tail.
    let lengths = transcriber.received_lengths();
    assert_eq!(lengths.len(), 2);
    assert_eq!(lengths[0], (10 + 17) * FRAME_SIZE_SAMPLES * 2);
    assert_eq!(lengths[1], (8 + 17) * FRAME_SIZE_SAMPLES * 2);

    // Two note/preview rounds plus one command extraction.
    assert_eq!(backend.calls(), 5);
}

#[tokio::test]
async fn heartbeat_returns_state_unchanged() {
    let (mut session, transcriber, _) =
        session_with(vec![Ok("unused".into())], vec![]);

    let before = session.snapshot();
    let after = session.push(None).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(after.note, NOTE_PLACEHOLDER);
    assert_eq!(after.preview, PREVIEW_PLACEHOLDER);
    assert_eq!(transcriber.calls(), 0);
}

#[tokio::test]
async fn failed_transcription_never_reaches_the_assistant() {
    let (mut session, transcriber, backend) =
        session_with(vec![Err("gateway timeout".into())], vec![]);

    let mut stream = tone_frames(6);
    stream.extend(silence_frames(20));
    let snapshot = session
        .push(Some((16_000, stream)))
        .await
        .unwrap();

    assert_eq!(transcriber.calls(), 1);
    assert_eq!(backend.calls(), 0);
    assert_eq!(snapshot.transcript, "");
    assert_eq!(snapshot.note, NOTE_PLACEHOLDER);
}

#[tokio::test]
async fn blank_transcript_is_dropped() {
    let (mut session, _, backend) = session_with(vec![Ok("   ".into())], vec![]);

    let mut stream = tone_frames(6);
    stream.extend(silence_frames(20));
    let snapshot = session.push(Some((16_000, stream))).await.unwrap();

    assert_eq!(snapshot.transcript, "");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn finish_transcribes_the_open_utterance() {
    let (mut session, transcriber, _) = session_with(
        vec![Ok("closing remarks".into())],
        vec![Ok("final note".into()), Ok("final preview".into())],
    );

    session
        .push(Some((16_000, tone_frames(5))))
        .await
        .unwrap();
    assert_eq!(transcriber.calls(), 0);

    let snapshot = session.finish().await;
    assert_eq!(transcriber.calls(), 1);
    assert_eq!(snapshot.transcript, "closing remarks");
    assert_eq!(snapshot.note, "final note");
    assert_eq!(snapshot.preview, "final preview");
}

#[tokio::test]
async fn clear_resets_for_the_next_visit() {
    let (mut session, _, _) = session_with(
        vec![Ok("some words".into())],
        vec![Ok("note".into()), Ok("preview".into())],
    );

    let mut stream = tone_frames(5);
    stream.extend(silence_frames(20));
    session.push(Some((16_000, stream))).await.unwrap();
    session.clear();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.transcript, "");
    assert_eq!(snapshot.note, NOTE_PLACEHOLDER);
    assert!(snapshot.commands.is_empty());
}

#[tokio::test]
async fn assistant_free_session_still_transcribes() {
    let transcriber = Arc::new(MockTranscriber::new(vec![Ok("just the words".into())]));
    let mut session = ScribeSession::new(
        SpeechSegmenter::new(SegmenterConfig::default()),
        transcriber.clone(),
        None,
    );

    let mut stream = tone_frames(5);
    stream.extend(silence_frames(20));
    let snapshot = session.push(Some((16_000, stream))).await.unwrap();

    assert_eq!(snapshot.transcript, "just the words");
    assert_eq!(snapshot.note, NOTE_PLACEHOLDER);
}
