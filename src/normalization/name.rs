// src/normalization/name.rs
use regex::Regex;

use crate::error::{DedupeError, DedupeResult};

pub const DEFAULT_LEGAL_SUFFIXES: [&str; 5] = ["ltd", "gmbh", "inc", "corp", "llc"];

/// Removes trailing legal-entity tokens ("ltd", "inc.", ...) from identity fields.
#[derive(Debug, Clone)]
pub struct LegalSuffixStripper {
    pattern: Option<Regex>,
}

impl LegalSuffixStripper {
    pub fn new<S: AsRef<str>>(suffixes: &[S]) -> DedupeResult<Self> {
        let mut tokens: Vec<String> = suffixes
            .iter()
            .map(|s| s.as_ref().trim().trim_end_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        tokens.sort();
        tokens.dedup();

        if tokens.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\s+(?:{})\.?$", alternation)).map_err(|e| {
            DedupeError::Config(format!("invalid legal suffix list {:?}: {}", tokens, e))
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn with_defaults() -> DedupeResult<Self> {
        Self::new(&DEFAULT_LEGAL_SUFFIXES)
    }

    /// Lower-cases, trims and strips trailing suffix tokens until none is left.
    pub fn normalize_identity(&self, raw: &str) -> String {
        let mut normalized = raw.trim().to_lowercase();
        if let Some(pattern) = &self.pattern {
            while let Some(found) = pattern.find(&normalized) {
                normalized.truncate(found.start());
                normalized = normalized.trim_end().to_string();
            }
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_suffix_with_and_without_period() {
        let stripper = LegalSuffixStripper::with_defaults().unwrap();
        assert_eq!(stripper.normalize_identity("  Fresh Burger LLC "), "fresh burger");
        assert_eq!(stripper.normalize_identity("Acme Inc."), "acme");
        assert_eq!(stripper.normalize_identity("Müller GmbH"), "müller");
    }

    #[test]
    fn test_suffix_must_be_a_separate_token() {
        let stripper = LegalSuffixStripper::with_defaults().unwrap();
        assert_eq!(stripper.normalize_identity("Zinc"), "zinc");
        assert_eq!(stripper.normalize_identity("inc"), "inc");
        assert_eq!(stripper.normalize_identity("Ltd Partners"), "ltd partners");
    }

    #[test]
    fn test_stacked_suffixes_reach_a_fixpoint() {
        let stripper = LegalSuffixStripper::with_defaults().unwrap();
        let once = stripper.normalize_identity("Acme Inc Ltd.");
        assert_eq!(once, "acme");
        assert_eq!(stripper.normalize_identity(&once), once);
    }

    #[test]
    fn test_custom_suffix_list() {
        let stripper = LegalSuffixStripper::new(&["S.A.", "plc"]).unwrap();
        assert_eq!(stripper.normalize_identity("Iberia S.A."), "iberia");
        assert_eq!(stripper.normalize_identity("Tesco PLC"), "tesco");
        assert_eq!(stripper.normalize_identity("Acme Ltd"), "acme ltd");
    }

    #[test]
    fn test_empty_suffix_list_only_cleans_case_and_whitespace() {
        let stripper = LegalSuffixStripper::new::<&str>(&[]).unwrap();
        assert_eq!(stripper.normalize_identity(" Acme LTD "), "acme ltd");
    }
}
