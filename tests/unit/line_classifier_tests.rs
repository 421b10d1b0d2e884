/*!
 * Tests for line selection and payload extraction
 */

use dmtranslate::errors::FormatError;
use dmtranslate::line_classifier::{ClassifiedLine, FormatErrorPolicy, LineClassifier, LineEnding};

use crate::common::SAMPLE_DIALOGUE;

#[test]
fn test_classify_dialogueLine_shouldExtractKeyAndPayload() {
    let classifier = LineClassifier::default();
    let line = classifier.classify("UI_DM_001 = \"Hello there\",\n", 0).unwrap();
    assert_eq!(
        line,
        ClassifiedLine::Translatable {
            key: "UI_DM_001".to_string(),
            payload: "Hello there".to_string(),
            line_index: 0,
            ending: LineEnding::Lf,
        }
    );
}

#[test]
fn test_classify_sameLineTwice_shouldBeIdentical() {
    let classifier = LineClassifier::default();
    for (index, raw) in SAMPLE_DIALOGUE.split_inclusive('\n').enumerate() {
        assert_eq!(classifier.classify(raw, index), classifier.classify(raw, index));
    }
}

#[test]
fn test_classify_commentedDialogue_shouldPassThrough() {
    let classifier = LineClassifier::default();
    for raw in ["UI_DM_001 = \"--commented out--\",\n", "-- UI_DM_002 = \"skip\",\n"] {
        assert_eq!(
            classifier.classify(raw, 0).unwrap(),
            ClassifiedLine::Passthrough { raw: raw.to_string(), line_index: 0 }
        );
    }
}

#[test]
fn test_classify_lineWithoutMarker_shouldPassThroughVerbatim() {
    let classifier = LineClassifier::default();
    for raw in ["OTHER_KEY = \"ignore\",\n", "\n", "   \t\r\n", "no newline at end"] {
        match classifier.classify(raw, 5).unwrap() {
            ClassifiedLine::Passthrough { raw: kept, line_index } => {
                assert_eq!(kept, raw);
                assert_eq!(line_index, 5);
            }
            other => panic!("expected passthrough, got {:?}", other),
        }
    }
}

#[test]
fn test_classify_keyWithIndentation_shouldKeepLeadingWhitespace() {
    let classifier = LineClassifier::default();
    match classifier.classify("    UI_DM_010   =   \"Go\"  ,\n", 0).unwrap() {
        ClassifiedLine::Translatable { key, payload, .. } => {
            assert_eq!(key, "    UI_DM_010");
            assert_eq!(payload, "Go");
        }
        other => panic!("expected translatable, got {:?}", other),
    }
}

#[test]
fn test_classify_customMarkers_shouldFollowConfiguration() {
    let classifier = LineClassifier::new("DLG_", "#", None);
    assert!(classifier.requires_translation("DLG_1 = \"Hi\""));
    assert!(!classifier.requires_translation("# DLG_1 = \"Hi\""));
    assert!(!classifier.requires_translation("UI_DM_1 = \"Hi\","));

    match classifier.classify("DLG_1 = \"Hi,\"", 0).unwrap() {
        ClassifiedLine::Translatable { payload, .. } => assert_eq!(payload, "Hi,"),
        other => panic!("expected translatable, got {:?}", other),
    }
}

#[test]
fn test_classifyAll_sampleDocument_shouldKeepEveryLineIndex() {
    let classifier = LineClassifier::default();
    let lines: Vec<&str> = SAMPLE_DIALOGUE.split_inclusive('\n').collect();
    let document = classifier.classify_all(&lines, FormatErrorPolicy::Abort).unwrap();

    assert_eq!(document.lines.len(), lines.len());
    for (index, line) in document.lines.iter().enumerate() {
        assert_eq!(line.line_index(), index);
    }
    assert_eq!(document.translatable_count(), 3);
    assert!(document.skipped.is_empty());
}

#[test]
fn test_classifyAll_missingSeparatorWithAbort_shouldReturnFormatError() {
    let classifier = LineClassifier::default();
    let lines = ["UI_DM_001 = \"Hi\",\n", "UI_DM_BROKEN \"Hi\",\n"];
    let error = classifier.classify_all(&lines, FormatErrorPolicy::Abort).unwrap_err();
    assert!(matches!(error, FormatError::MissingSeparator { line_index: 1, .. }));
}
