use super::*;

use crate::constants::{FALLBACK_CONFIDENCE, FALLBACK_LABEL, FALLBACK_PROBS, MAX_SEQ_LEN};

fn stub_classifier() -> BiasClassifier {
    BiasClassifier::stub().unwrap()
}

fn stub_with_temperature(temperature: f64) -> BiasClassifier {
    let mut classifier = stub_classifier();
    classifier.temperature = temperature;
    classifier
}

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::path::PathBuf;

    #[test]
    fn test_config_default() {
        let config = ClassifierConfig::default();
        assert!(config.model_dir.is_none());
        assert!(config.tokenizer_path.is_none());
        assert_eq!(config.max_seq_len, MAX_SEQ_LEN);
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_config_stub_validates() {
        let config = ClassifierConfig::stub();
        assert!(config.testing_stub);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_missing_model_dir_rejected() {
        let config = ClassifierConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidConfig { .. }));
    }

    #[test]
    fn test_config_nonexistent_model_dir_rejected() {
        let config = ClassifierConfig::new("/nonexistent/checkpoint");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ClassifierError::CheckpointNotFound { .. }));
    }

    #[test]
    fn test_tokenizer_file_defaults_to_checkpoint_local() {
        let config = ClassifierConfig::new("/models/qbias");
        assert_eq!(
            config.tokenizer_file(),
            Some(PathBuf::from("/models/qbias/tokenizer.json"))
        );
    }

    #[test]
    fn test_tokenizer_file_override_wins() {
        let config = ClassifierConfig {
            model_dir: Some(PathBuf::from("/models/qbias")),
            tokenizer_path: Some(PathBuf::from("/tok/tokenizer.json")),
            ..Default::default()
        };
        assert_eq!(
            config.tokenizer_file(),
            Some(PathBuf::from("/tok/tokenizer.json"))
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        unsafe {
            env::set_var(ClassifierConfig::ENV_MODEL_DIR, "/models/qbias");
            env::set_var(ClassifierConfig::ENV_TOKENIZER_PATH, "  ");
        }
        let config = ClassifierConfig::from_env();
        assert_eq!(config.model_dir, Some(PathBuf::from("/models/qbias")));
        assert!(config.tokenizer_path.is_none());
        unsafe {
            env::remove_var(ClassifierConfig::ENV_MODEL_DIR);
            env::remove_var(ClassifierConfig::ENV_TOKENIZER_PATH);
        }
    }
}

mod classify_tests {
    use super::*;

    #[test]
    fn test_empty_input_neutral_fallback() {
        let classifier = stub_classifier();
        for input in ["", "   ", "\n\t  \n"] {
            let result = classifier.classify(input).unwrap();
            assert_eq!(result.label, FALLBACK_LABEL);
            assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
            assert!(result.rationale_spans.is_empty());
            for (label, p) in FALLBACK_PROBS {
                assert_eq!(result.probs.get(label), Some(&p));
            }
        }
    }

    #[test]
    fn test_fallback_is_bit_identical() {
        let classifier = stub_classifier();
        let a = classifier.classify("").unwrap();
        let b = classifier.classify("  \t ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_probs_sum_to_one() {
        let classifier = stub_classifier();
        let result = classifier
            .classify("Lawmakers reached a bipartisan deal on immigration reform.")
            .unwrap();
        let sum: f64 = result.probs.values().sum();
        // each prob is independently rounded to 3 decimals
        assert!((sum - 1.0).abs() < 2e-3, "sum was {}", sum);
        for p in result.probs.values() {
            assert!((0.0..=1.0).contains(p));
        }
    }

    #[test]
    fn test_label_matches_argmax_of_probs() {
        let classifier = stub_classifier();
        for text in [
            "The radical extremist rhetoric fueled a surge in crime.",
            "A bipartisan compromise backed by both parties.",
            "Progressive climate regulation to fight inequality.",
        ] {
            let result = classifier.classify(text).unwrap();
            let top = result
                .probs
                .iter()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(label, _)| label.clone())
                .unwrap();
            assert_eq!(result.label, top);
            assert_eq!(result.probs.get(&result.label), Some(&result.confidence));
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = stub_classifier();
        let text = "Progressive lawmakers pushed climate regulation.";
        let first = classifier.classify(text).unwrap();
        for _ in 0..5 {
            assert_eq!(classifier.classify(text).unwrap(), first);
        }
    }

    #[test]
    fn test_classifier_returns_no_spans() {
        // span population is the orchestrator's job; exactly one extractor
        // runs per call there
        let classifier = stub_classifier();
        let result = classifier
            .classify("The radical extremist rhetoric fueled a surge in crime.")
            .unwrap();
        assert!(result.rationale_spans.is_empty());
    }

    #[test]
    fn test_temperature_preserves_argmax() {
        let text = "The radical extremist rhetoric fueled a surge in crime.";
        let baseline = stub_classifier().classify(text).unwrap();
        for temperature in [0.25, 0.5, 2.0, 10.0] {
            let result = stub_with_temperature(temperature).classify(text).unwrap();
            assert_eq!(result.label, baseline.label, "t={}", temperature);
        }
    }

    #[test]
    fn test_higher_temperature_softens_confidence() {
        let text = "The radical extremist rhetoric fueled a surge in crime.";
        let sharp = stub_with_temperature(0.5).classify(text).unwrap();
        let soft = stub_with_temperature(4.0).classify(text).unwrap();
        assert!(sharp.confidence >= soft.confidence);
    }

    #[test]
    fn test_predict_proba_shape() {
        let classifier = stub_classifier();
        let texts = vec!["one text".to_string(), "another text".to_string()];
        let probs = classifier.predict_proba(&texts).unwrap();
        assert_eq!(probs.len(), 2);
        for row in &probs {
            assert_eq!(row.len(), classifier.num_classes());
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_encode_offsets_round_trip() {
        let classifier = stub_classifier();
        let text = "Lawmakers reached a bipartisan deal.";
        let offsets = classifier.encode_offsets(text, MAX_SEQ_LEN).unwrap();
        assert!(!offsets.is_empty());
        for (start, end) in offsets {
            assert!(text.get(start..end).is_some());
        }
    }

    #[test]
    fn test_encode_offsets_respects_max_length() {
        let classifier = stub_classifier();
        let text = "one two three four five six seven";
        assert!(classifier.encode_offsets(text, 4).unwrap().len() <= 4);
    }
}

mod math_tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax_scaled(&[1.0, 2.0, 3.0], 1.0);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_max_shift_invariance() {
        // softmax on hugely positive logits must not overflow to NaN
        let probs = softmax_scaled(&[1000.0, 1001.0, 1002.0], 1.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        let small = softmax_scaled(&[0.0, 1.0, 2.0], 1.0);
        for (a, b) in probs.iter().zip(&small) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_temperature_preserves_ranking() {
        let logits = [0.1, 2.3, -1.2];
        for temperature in [0.1, 0.5, 1.0, 3.0, 100.0] {
            let probs = softmax_scaled(&logits, temperature);
            assert_eq!(argmax(&probs), 1, "t={}", temperature);
        }
    }

    #[test]
    fn test_argmax_first_occurrence_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), 0);
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), 1);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(2.0 / 3.0), 0.667);
    }
}
