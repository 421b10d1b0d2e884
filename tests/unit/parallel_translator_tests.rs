/*!
 * Tests for the bounded parallel translator
 */

use parking_lot::Mutex;
use std::sync::Arc;

use dmtranslate::errors::ConfigError;
use dmtranslate::line_classifier::{ClassifiedLine, FormatErrorPolicy, LineClassifier, LineEnding};
use dmtranslate::providers::mock::MockBackend;
use dmtranslate::translation::parallel::MAX_CONCURRENCY;
use dmtranslate::translation::{BoundedParallelTranslator, TranslationRun};

use crate::common::init_logging;

fn dialogue_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("-- section {}\n", i),
            1 => format!("OTHER_{} = \"ignore\",\n", i),
            _ => format!("UI_DM_{:03} = \"line {}\",\n", i, i),
        })
        .collect()
}

fn classify(lines: &[String]) -> Vec<ClassifiedLine> {
    LineClassifier::default()
        .classify_all(lines, FormatErrorPolicy::Skip)
        .unwrap()
        .lines
}

async fn run_with(backend: Arc<MockBackend>, lines: &[ClassifiedLine], concurrency: usize) -> TranslationRun {
    let translator = BoundedParallelTranslator::new(backend, concurrency).unwrap();
    translator
        .run(lines, "English", "Korean", Arc::new(Mutex::new(Vec::new())), |_, _| {})
        .await
}

#[tokio::test]
async fn test_run_withRandomDelays_shouldKeepInputOrder() {
    init_logging();
    let raw = dialogue_lines(60);
    let lines = classify(&raw);

    for _ in 0..5 {
        let backend = Arc::new(MockBackend::uppercase().with_random_delay(15));
        let run = run_with(backend, &lines, 8).await;

        assert_eq!(run.lines.len(), raw.len());
        for (index, (output, input)) in run.lines.iter().zip(&raw).enumerate() {
            assert_eq!(output.line_index, index);
            if input.starts_with("UI_DM_") {
                assert_eq!(output.text, input.to_uppercase());
            } else {
                assert_eq!(&output.text, input);
            }
        }
    }
}

#[tokio::test]
async fn test_run_withFailingBackend_shouldReproduceInput() {
    let raw = dialogue_lines(20);
    let lines = classify(&raw);
    let backend = Arc::new(MockBackend::failing());

    let run = run_with(Arc::clone(&backend), &lines, 4).await;

    assert_eq!(run.to_text(), raw.concat());
    assert_eq!(run.summary.translated, 0);
    assert_eq!(run.summary.failed, run.summary.translatable);
    assert_eq!(backend.request_count(), run.summary.translatable);
}

#[tokio::test]
async fn test_run_withIntermittentBackend_shouldOnlyFallBackFailedUnits() {
    let raw = dialogue_lines(40);
    let lines = classify(&raw);
    let backend = Arc::new(MockBackend::intermittent(3));

    let run = run_with(backend, &lines, 1).await;

    assert_eq!(run.summary.translatable, 20);
    assert_eq!(run.summary.failed, 6);
    assert_eq!(run.summary.translated, 14);
    assert_eq!(run.lines.len(), raw.len());
}

#[tokio::test]
async fn test_run_withSlowBackend_shouldNeverExceedConcurrency() {
    let raw = dialogue_lines(80);
    let lines = classify(&raw);

    for concurrency in [1, 3, 10] {
        let backend = Arc::new(MockBackend::uppercase().with_random_delay(5));
        run_with(Arc::clone(&backend), &lines, concurrency).await;

        assert!(backend.high_water_mark() >= 1);
        assert!(
            backend.high_water_mark() <= concurrency,
            "high water mark {} exceeds {}",
            backend.high_water_mark(),
            concurrency
        );
    }
}

#[tokio::test]
async fn test_run_withDuplicateLines_shouldTranslateEachOccurrence() {
    let raw: Vec<String> = vec![
        "UI_DM_1 = \"same\",\n".to_string(),
        "UI_DM_1 = \"same\",\n".to_string(),
        "UI_DM_1 = \"same\",\n".to_string(),
    ];
    let lines = classify(&raw);
    let backend = Arc::new(MockBackend::echo().with_random_delay(5));

    let run = run_with(Arc::clone(&backend), &lines, 3).await;

    assert_eq!(backend.request_count(), 3);
    assert!(run.lines.iter().all(|line| line.text == "UI_DM_1 = \"[Korean] same\",\n"));
}

#[tokio::test]
async fn test_run_withShuffledInput_shouldSortByLineIndex() {
    let lines = vec![
        ClassifiedLine::Passthrough { raw: "c\n".to_string(), line_index: 2 },
        ClassifiedLine::Translatable {
            key: "UI_DM_A".to_string(),
            payload: "a".to_string(),
            line_index: 0,
            ending: LineEnding::Lf,
        },
        ClassifiedLine::Passthrough { raw: "b\n".to_string(), line_index: 1 },
    ];

    let run = run_with(Arc::new(MockBackend::uppercase()), &lines, 2).await;

    assert_eq!(run.to_text(), "UI_DM_A = \"A\",\nb\nc\n");
}

#[tokio::test]
async fn test_run_withNoTranslatableLines_shouldNotCallBackend() {
    let raw = vec!["just text\n".to_string(), "-- UI_DM_1 = \"x\",\n".to_string()];
    let lines = classify(&raw);
    let backend = Arc::new(MockBackend::uppercase());

    let run = run_with(Arc::clone(&backend), &lines, 10).await;

    assert_eq!(backend.request_count(), 0);
    assert_eq!(run.to_text(), raw.concat());
}

#[test]
fn test_new_withZeroConcurrency_shouldBeConfigurationError() {
    let result = BoundedParallelTranslator::new(Arc::new(MockBackend::uppercase()), 0);
    assert!(matches!(result, Err(ConfigError::InvalidConcurrency(0))));
}

#[tokio::test]
async fn test_new_withHugeConcurrency_shouldRejectInsteadOfPanicking() {
    let result = BoundedParallelTranslator::new(Arc::new(MockBackend::uppercase()), usize::MAX);
    assert!(matches!(result, Err(ConfigError::InvalidConcurrency(usize::MAX))));

    let lines = classify(&["UI_DM_1 = \"a\",\n".to_string()]);
    let run = run_with(Arc::new(MockBackend::uppercase()), &lines, MAX_CONCURRENCY).await;
    assert_eq!(run.to_text(), "UI_DM_1 = \"A\",\n");
}
