/*!
 * End-to-end tests for the narration pipeline, run against mock
 * synthesis engines
 */

use vorleser::app_config::Config;
use vorleser::app_controller::Controller;
use vorleser::errors::{AppError, CollaboratorError, InputError};
use vorleser::markdown::StripPolicy;
use vorleser::segmenter::SegmentPolicy;

use crate::common;
use crate::common::mock_synth::{
    CancelingSynthesizer, FailingSynthesizer, FlakySynthesizer, MockSynthesizer,
};

fn test_config(output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.output_dir = output_dir.to_path_buf();
    config
}

/// A full run produces audio, subtitles and both sidecar files
#[tokio::test]
async fn test_run_document_withSampleDocument_shouldProduceAllArtifacts() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();
    let synth = MockSynthesizer::new(8.0);

    let artifacts = controller
        .run_document(common::sample_document(), "studie", &synth)
        .await
        .unwrap();

    assert!(artifacts.audio_path.is_file());
    assert!(artifacts.subtitle_path.is_file());
    assert!(artifacts.captions_path.is_file());
    assert!(artifacts.speech_path.is_file());
    assert!(artifacts.video_path.is_none());
    assert!((artifacts.duration_secs - 8.0).abs() < 1e-6);
    assert_eq!(artifacts.unit_count, 3);
    assert!(artifacts.flagged.is_empty());
}

/// Caption windows tile the measured duration without gaps
#[tokio::test]
async fn test_run_document_withMeasuredDuration_shouldTileSubtitleWindows() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();
    let synth = MockSynthesizer::new(8.0);

    let artifacts = controller
        .run_document(common::sample_document(), "studie", &synth)
        .await
        .unwrap();

    let srt = std::fs::read_to_string(&artifacts.subtitle_path).unwrap();
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,666\n"));
    assert!(srt.contains("2\n00:00:02,666 --> 00:00:05,333\n"));
    assert!(srt.contains("3\n00:00:05,333 --> 00:00:08,000\n"));
    // Captions carry the verbatim text, digits included
    assert!(srt.contains("dass 25–29-Jährigen einen Anteil von 40% ausmachen."));
}

/// The speech sidecar holds the expanded text the engine actually reads
#[tokio::test]
async fn test_run_document_withNumerals_shouldWriteDigitFreeSpeechSidecar() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();
    let synth = MockSynthesizer::new(4.0);

    let artifacts = controller
        .run_document(common::sample_document(), "studie", &synth)
        .await
        .unwrap();

    let speech = std::fs::read_to_string(&artifacts.speech_path).unwrap();
    assert!(!speech.contains(|c: char| c.is_ascii_digit()));
    assert!(speech.contains("fünfundzwanzig bis neunundzwanzig Jährigen"));
    assert!(speech.contains("vierzig Prozent"));

    let captions = std::fs::read_to_string(&artifacts.captions_path).unwrap();
    assert!(captions.contains("40%"));
}

/// A document that strips down to nothing fails before synthesis
#[tokio::test]
async fn test_run_document_withOnlyMarkup_shouldFailWithEmptyDocument() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();
    let synth = MockSynthesizer::new(1.0);

    let err = controller
        .run_document("# Nur Titel\n\n---\n", "leer", &synth)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Input(InputError::EmptyDocument))
    ));
    // No artifacts were written
    assert!(!temp.path().join("leer.wav").exists());
}

/// An engine failure surfaces as a collaborator error, run aborted
#[tokio::test]
async fn test_run_document_withFailingEngine_shouldSurfaceCollaboratorError() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();

    let err = controller
        .run_document(common::sample_document(), "kaputt", &FailingSynthesizer)
        .await
        .unwrap_err();

    match err.downcast_ref::<CollaboratorError>() {
        Some(CollaboratorError::SynthesisFailed(msg)) => {
            assert!(msg.contains("engine exploded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!temp.path().join("kaputt.srt").exists());
}

/// A canceled request is reported distinctly from a failed one
#[test]
fn test_run_document_withCanceledRequest_shouldReportCancellation() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();

    let err = tokio_test::block_on(async {
        controller
            .run_document(common::sample_document(), "abbruch", &CancelingSynthesizer)
            .await
    })
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CollaboratorError>(),
        Some(CollaboratorError::SynthesisCanceled(_))
    ));
}

/// Line-based policies keep blank lines as empty caption placeholders
/// that are excluded from synthesis but kept in the timeline
#[tokio::test]
async fn test_run_document_withLinePolicies_shouldKeepPlaceholderCaptions() {
    let temp = common::create_temp_dir().unwrap();
    let mut config = test_config(temp.path());
    config.strip_policy = StripPolicy::PreserveLines;
    config.segment_policy = SegmentPolicy::Lines;
    let controller = Controller::with_config(config).unwrap();
    let synth = MockSynthesizer::new(5.0);

    let document = "# Titel\n\nErste Zeile ohne Punkt\n\nZweite Zeile.\n";
    let artifacts = controller
        .run_document(document, "zeilen", &synth)
        .await
        .unwrap();

    // Heading, blank, line, blank, line
    assert_eq!(artifacts.unit_count, 5);

    let srt = std::fs::read_to_string(&artifacts.subtitle_path).unwrap();
    assert!(srt.contains("Titel."));
    assert!(srt.contains("Erste Zeile ohne Punkt"));
    assert_eq!(srt.matches(" --> ").count(), 5);
}

/// With a stable custom base name, an existing audio artifact from an
/// earlier run is detected and the run is skipped
#[tokio::test]
async fn test_run_withExistingOutputAndCustomBaseName_shouldSkip() {
    let temp = common::create_temp_dir().unwrap();
    let out_dir = temp.path().join("out");
    let input =
        common::create_test_file(temp.path(), "doc.md", common::sample_document()).unwrap();
    std::fs::create_dir_all(&out_dir).unwrap();
    std::fs::write(out_dir.join("fest.wav"), b"nicht anfassen").unwrap();

    let controller = Controller::with_config(test_config(&out_dir)).unwrap();
    controller.run(input, Some("fest"), false).await.unwrap();

    // The run stopped at the existence check: the stale artifact is
    // untouched and no subtitles were produced
    assert_eq!(
        std::fs::read(out_dir.join("fest.wav")).unwrap(),
        b"nicht anfassen"
    );
    assert!(!out_dir.join("fest.srt").exists());
}

/// A mid-run engine failure leaves no part files in the output directory
#[tokio::test]
async fn test_run_document_withMidRunFailure_shouldRemovePartFiles() {
    let temp = common::create_temp_dir().unwrap();
    let mut config = test_config(temp.path());
    config.synthesis.units_per_segment = 1;
    let controller = Controller::with_config(config).unwrap();
    // First segment succeeds and writes its part file, the second fails
    let synth = FlakySynthesizer::new(1, 1.0);

    let result = controller
        .run_document(common::sample_document(), "flatter", &synth)
        .await;
    assert!(result.is_err());

    let leftovers: Vec<String> = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.contains(".part_"))
        .collect();
    assert!(leftovers.is_empty(), "leftover part files: {:?}", leftovers);
}

/// Unconvertible numerals are flagged on the artifacts, not fatal
#[tokio::test]
async fn test_run_document_withOverflowingNumeral_shouldFlagAndFinish() {
    let temp = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(temp.path())).unwrap();
    let synth = MockSynthesizer::new(2.0);

    let document = "Seriennummer 99999999999999999999999 liegt vor.\n";
    let artifacts = controller
        .run_document(document, "seriennummer", &synth)
        .await
        .unwrap();

    assert_eq!(artifacts.flagged.len(), 1);
    assert_eq!(artifacts.flagged[0].fragment, "99999999999999999999999");
    let speech = std::fs::read_to_string(&artifacts.speech_path).unwrap();
    assert!(speech.contains("99999999999999999999999"));
}
