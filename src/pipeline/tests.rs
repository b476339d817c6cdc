use super::*;

use crate::classifier::BiasClassifier;
use crate::constants::{FALLBACK_LABEL, KEYWORD_SPAN_SCORE};
use crate::rationale::SpanSource;

fn pipeline() -> Pipeline {
    Pipeline::new(Arc::new(BiasClassifier::stub().unwrap()))
}

#[test]
fn test_compose_input_trims_and_separates() {
    assert_eq!(
        compose_input(Some("  Title "), " body text "),
        "Title\n\nbody text"
    );
    assert_eq!(compose_input(None, "body"), "body");
    assert_eq!(compose_input(Some(""), "body"), "body");
    assert_eq!(compose_input(Some("Title"), "   "), "Title");
    assert_eq!(compose_input(None, "  "), "");
}

#[test]
fn test_keyword_mode_by_default() {
    let result = pipeline()
        .predict(None, "The radical extremist rhetoric fueled a surge in crime.", false)
        .unwrap();
    assert!(!result.rationale_spans.is_empty());
    for span in &result.rationale_spans {
        assert_eq!(span.source, SpanSource::Keyword);
        assert_eq!(span.score, KEYWORD_SPAN_SCORE);
    }
}

#[test]
fn test_attribution_mode_when_requested() {
    let result = pipeline()
        .predict(None, "The radical extremist rhetoric fueled a surge in crime.", true)
        .unwrap();
    assert!(!result.rationale_spans.is_empty());
    for span in &result.rationale_spans {
        assert_eq!(span.source, SpanSource::Shap);
    }
}

#[test]
fn test_modes_are_never_blended() {
    let p = pipeline();
    let text = "The radical extremist rhetoric fueled a surge in crime.";
    for use_attribution in [false, true] {
        let result = p.predict(None, text, use_attribution).unwrap();
        let sources: std::collections::BTreeSet<_> = result
            .rationale_spans
            .iter()
            .map(|s| format!("{:?}", s.source))
            .collect();
        assert!(sources.len() <= 1);
    }
}

#[test]
fn test_span_offsets_refer_to_concatenation() {
    let title = "Radical agenda";
    let body = "Lawmakers debated immigration policy.";
    let result = pipeline().predict(Some(title), body, false).unwrap();
    let full_text = compose_input(Some(title), body);
    assert!(!result.rationale_spans.is_empty());
    for span in &result.rationale_spans {
        assert_eq!(span.text, &full_text[span.start..span.end]);
    }
    // the title's cue is part of the classified text
    assert!(result.rationale_spans.iter().any(|s| s.text == "Radical"));
}

#[test]
fn test_empty_input_fallback_has_no_spans() {
    let result = pipeline().predict(Some("  "), "  ", false).unwrap();
    assert_eq!(result.label, FALLBACK_LABEL);
    assert!(result.rationale_spans.is_empty());

    let result = pipeline().predict(None, "", true).unwrap();
    assert!(result.rationale_spans.is_empty());
}

#[test]
fn test_title_influences_prediction() {
    let p = pipeline();
    let neutral = p.predict(None, "The committee met on a Tuesday.", false).unwrap();
    let cued = p
        .predict(
            Some("Radical extremist surge"),
            "The committee met on a Tuesday.",
            false,
        )
        .unwrap();
    assert_ne!(neutral.probs, cued.probs);
}
