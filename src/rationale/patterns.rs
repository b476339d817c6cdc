//! Compiled patterns for the keyword rationale scanner.
//!
//! Logically immutable configuration: compiled once, read-only afterwards.

use regex::Regex;
use std::sync::LazyLock;

/// Politically salient phrase categories, scanned case-insensitively:
/// alarmist framing verbs, partisan policy buzzwords, "war on X" framing,
/// explicit ideology labels, and contested policy nouns.
pub static KEYWORD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(flood|surge|invasion|weaponize|radical|extremist|witch hunt)\b",
        r"\b(soft on crime|open borders|tax-and-spend)\b",
        r"\b(war on [a-z]+|fearmongering)\b",
        r"\b(bipartisan|both parties|left[- ]wing|right[- ]wing|progressive|conservative|liberal)\b",
        r"\b(regulation|tax(?:ation)?|immigration|abortion|gun control|climate)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){}", pattern)).expect("keyword pattern compiles"))
    .collect()
});
