//! Resolution pipeline configuration
//! Legal suffixes, the ordered tier list and the unifying key for group ids

use log::{debug, info};
use std::env;

use crate::error::{DedupeError, DedupeResult};
use crate::matching::grouping::GroupKey;
use crate::matching::tiers::TierDefinition;
use crate::models::core::Column;
use crate::normalization::name::{LegalSuffixStripper, DEFAULT_LEGAL_SUFFIXES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub legal_suffixes: Vec<String>,
    /// Executed strictly in order; each tier sees the output of the previous one.
    pub tiers: Vec<TierDefinition>,
    pub unifying_key: GroupKey,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            legal_suffixes: DEFAULT_LEGAL_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            tiers: TierDefinition::default_tiers(),
            unifying_key: GroupKey::new(&[Column::WebsiteDomain]),
        }
    }
}

impl PipelineConfig {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> DedupeResult<Self> {
        let mut config = Self::default();

        if let Some(suffixes) = env_list("DEDUPE_LEGAL_SUFFIXES") {
            config.legal_suffixes = suffixes;
        }

        if let Some(key) = env_list("DEDUPE_UNIFYING_KEY") {
            config.unifying_key = GroupKey::parse(&key, "DEDUPE_UNIFYING_KEY")?;
        }

        if let Ok(raw) = env::var("DEDUPE_CODE_TIER_COLUMN") {
            if !raw.trim().is_empty() {
                let column: Column = raw.parse()?;
                config = config.with_tier(classification_tier(column)?);
            }
        }

        debug!(
            "Pipeline config: suffixes={:?}, tiers={}, unifying_key={}",
            config.legal_suffixes,
            config.tiers.len(),
            config.unifying_key
        );
        config.validate()?;
        Ok(config)
    }

    /// Appends a tier after the existing ones.
    pub fn with_tier(mut self, tier: TierDefinition) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn validate(&self) -> DedupeResult<()> {
        if self.unifying_key.is_empty() {
            return Err(DedupeError::EmptyGroupKey("unifying key".to_string()));
        }
        for tier in &self.tiers {
            tier.validate()?;
        }
        Ok(())
    }

    pub fn suffix_stripper(&self) -> DedupeResult<LegalSuffixStripper> {
        LegalSuffixStripper::new(&self.legal_suffixes)
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name.as_str()).collect()
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("⚙️  Legal suffixes: {:?}", self.legal_suffixes);
        for (i, tier) in self.tiers.iter().enumerate() {
            info!(
                "⚙️  Tier {}: {} grouped by {}",
                i + 1,
                tier.name,
                tier.key
            );
        }
        info!("⚙️  Group ids derived from {}", self.unifying_key);
    }
}

fn classification_tier(column: Column) -> DedupeResult<TierDefinition> {
    if !Column::CLASSIFICATION_CODES.contains(&column) {
        return Err(DedupeError::Config(format!(
            "DEDUPE_CODE_TIER_COLUMN must be one of {:?}, got {}",
            Column::CLASSIFICATION_CODES
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>(),
            column
        )));
    }
    Ok(TierDefinition::shared_classification(column))
}

fn env_list(var: &str) -> Option<Vec<String>> {
    env::var(var).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tier_names(), vec!["exact_location", "same_city_business"]);
        assert_eq!(config.unifying_key, GroupKey::new(&[Column::WebsiteDomain]));
        assert_eq!(config.legal_suffixes.len(), 5);
    }

    #[test]
    fn test_config_from_env() {
        env::remove_var("DEDUPE_LEGAL_SUFFIXES");
        env::remove_var("DEDUPE_UNIFYING_KEY");
        env::remove_var("DEDUPE_CODE_TIER_COLUMN");
        assert_eq!(PipelineConfig::from_env().unwrap(), PipelineConfig::default());

        env::set_var("DEDUPE_LEGAL_SUFFIXES", "ltd, plc");
        env::set_var("DEDUPE_UNIFYING_KEY", "website_domain,company_name");
        env::set_var("DEDUPE_CODE_TIER_COLUMN", "naics_2022_primary_code");
        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.legal_suffixes, vec!["ltd", "plc"]);
        assert_eq!(
            config.unifying_key,
            GroupKey::new(&[Column::WebsiteDomain, Column::CompanyName])
        );
        assert_eq!(
            config.tier_names(),
            vec![
                "exact_location",
                "same_city_business",
                "shared_naics_2022_primary_code"
            ]
        );

        env::set_var("DEDUPE_CODE_TIER_COLUMN", "main_city");
        assert!(matches!(
            PipelineConfig::from_env(),
            Err(DedupeError::Config(_))
        ));

        env::set_var("DEDUPE_CODE_TIER_COLUMN", "");
        env::set_var("DEDUPE_UNIFYING_KEY", "domain");
        assert!(matches!(
            PipelineConfig::from_env(),
            Err(DedupeError::EmptyGroupKey(_))
        ));

        env::remove_var("DEDUPE_LEGAL_SUFFIXES");
        env::remove_var("DEDUPE_UNIFYING_KEY");
        env::remove_var("DEDUPE_CODE_TIER_COLUMN");
    }

    #[test]
    fn test_with_tier_appends_without_touching_earlier_tiers() {
        let base = PipelineConfig::default();
        let extended = base
            .clone()
            .with_tier(TierDefinition::shared_classification(Column::SicCodes));
        assert_eq!(&extended.tiers[..2], &base.tiers[..]);
        assert_eq!(extended.tiers.len(), 3);
    }
}
