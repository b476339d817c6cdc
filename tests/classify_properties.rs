//! Integration tests for the classification and explanation core, run
//! against the deterministic stub backend through the public API.

use biaslens::classifier::{BiasClassifier, ClassifierConfig};
use biaslens::constants::{
    DEFAULT_TOP_K_SPANS, FALLBACK_CONFIDENCE, FALLBACK_LABEL, FALLBACK_PROBS, MAX_SEQ_LEN,
};
use biaslens::rationale::{ExplainOptions, SpanSource, explain_spans, scan_keywords};

fn classifier() -> BiasClassifier {
    BiasClassifier::load(ClassifierConfig::stub()).unwrap()
}

const SAMPLE_TEXTS: &[&str] = &[
    "Lawmakers reached a bipartisan deal on immigration reform.",
    "The radical extremist rhetoric fueled a surge in anti-immigrant sentiment, \
     as lawmakers debated immigration and gun control policy.",
    "Progressive groups pushed for stronger climate regulation.",
    "The committee met on a quiet Tuesday afternoon.",
];

#[test]
fn test_distribution_is_valid_for_all_sample_texts() {
    let c = classifier();
    for text in SAMPLE_TEXTS {
        let result = c.classify(text).unwrap();
        let sum: f64 = result.probs.values().sum();
        assert!((sum - 1.0).abs() < 2e-3, "{}: sum {}", text, sum);
        for (label, p) in &result.probs {
            assert!((0.0..=1.0).contains(p), "{}: {} = {}", text, label, p);
        }
    }
}

#[test]
fn test_label_is_argmax_for_all_sample_texts() {
    let c = classifier();
    for text in SAMPLE_TEXTS {
        let result = c.classify(text).unwrap();
        let max = result
            .probs
            .values()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.probs.get(&result.label), Some(&result.confidence));
        assert_eq!(result.confidence, max);
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let c = classifier();
    for text in SAMPLE_TEXTS {
        let first = c.classify(text).unwrap();
        let second = c.classify(text).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_empty_and_whitespace_fallback() {
    let c = classifier();
    for input in ["", " ", "\t\n", "   \n\n  "] {
        let result = c.classify(input).unwrap();
        assert_eq!(result.label, FALLBACK_LABEL);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert!(result.rationale_spans.is_empty());
        for (label, p) in FALLBACK_PROBS {
            assert_eq!(result.probs.get(label), Some(&p));
        }
    }
}

#[test]
fn test_keyword_spans_round_trip_and_order() {
    let text = "Lawmakers reached a bipartisan deal on immigration reform.";
    let spans = scan_keywords(text, DEFAULT_TOP_K_SPANS);
    assert!(!spans.is_empty());
    let mut last_start = 0;
    for span in &spans {
        assert_eq!(span.text, &text[span.start..span.end]);
        assert_eq!(span.score, 0.15);
        assert!(span.start >= last_start);
        last_start = span.start;
    }
}

#[test]
fn test_attribution_spans_round_trip() {
    let c = classifier();
    let text = "The radical extremist rhetoric fueled a surge in crime.";
    let target = c.classify(text).unwrap().class_index;
    let spans = explain_spans(&c, text, target, &ExplainOptions::default()).unwrap();
    assert!(!spans.is_empty());
    assert!(spans.len() <= DEFAULT_TOP_K_SPANS);
    for span in &spans {
        assert_eq!(span.text, &text[span.start..span.end]);
        assert_eq!(span.source, SpanSource::Shap);
    }
}

#[test]
fn test_attribution_merge_invariant_on_long_text() {
    let c = classifier();
    let text = "The radical extremist rhetoric fueled a surge in anti-immigrant \
                sentiment across several states, while progressive groups organized \
                against gun control rollbacks and new climate regulation fights.";
    let target = c.classify(text).unwrap().class_index;
    let opts = ExplainOptions {
        top_k: usize::MAX,
        max_length: MAX_SEQ_LEN,
        merge: true,
    };
    let mut spans = explain_spans(&c, text, target, &opts).unwrap();
    spans.sort_by_key(|s| s.start);
    for pair in spans.windows(2) {
        assert!(!(pair[0].end == pair[1].start && pair[0].sign == pair[1].sign));
    }
}

#[test]
fn test_span_serialization_shape() {
    let text = "A bipartisan deal was reached.";
    let spans = scan_keywords(text, DEFAULT_TOP_K_SPANS);
    let json = serde_json::to_value(&spans).unwrap();
    let first = &json[0];
    assert_eq!(first["source"], "keyword");
    assert!(first.get("value").is_none());
    assert!(first.get("sign").is_none());
    assert_eq!(first["text"], "bipartisan");
}
