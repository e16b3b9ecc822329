// src/utils/progress_bars/progress_config.rs - Progress bar toggles for a resolution run

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::env;

/// Which bars a resolution run draws. Library callers usually want
/// [`ProgressConfig::disabled`]; the CLI reads the toggles from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    pub enabled: bool,
    /// One extra bar per tier, counting candidate groups
    pub detailed: bool,
    /// Append process memory to the pipeline bar message
    pub show_memory: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            show_memory: true,
        }
    }
}

impl ProgressConfig {
    /// Reads `PROGRESS_ENABLED`, `PROGRESS_DETAILED` and `PROGRESS_SHOW_MEMORY`.
    /// Unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("PROGRESS_ENABLED", defaults.enabled),
            detailed: env_flag("PROGRESS_DETAILED", defaults.detailed),
            show_memory: env_flag("PROGRESS_SHOW_MEMORY", defaults.show_memory),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            detailed: false,
            show_memory: false,
        }
    }

    pub fn create_multi_progress(&self) -> Option<MultiProgress> {
        self.enabled.then(MultiProgress::new)
    }

    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }
}

fn env_flag(var: &str, default: bool) -> bool {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Pipeline bars sit flush left and wide; tier bars are indented and narrower.
pub fn bar_style(indent: &str) -> ProgressStyle {
    let width = if indent.is_empty() { 40 } else { 25 };
    let template = format!(
        "{}{{spinner:.green}} [{{elapsed_precise}}] {{bar:{}.cyan/blue}} {{pos}}/{{len}} {{msg}}",
        indent, width
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Adds a bar of `len` steps when bars are being drawn at all.
pub fn add_bar(multi_progress: Option<&MultiProgress>, len: u64, indent: &str) -> Option<ProgressBar> {
    multi_progress.map(|mp| {
        let pb = mp.add(ProgressBar::new(len));
        pb.set_style(bar_style(indent));
        pb
    })
}
