//! Configuration module.

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, default_log_path, load_config_file,
    load_config_with_precedence, merge_config, ConfigError, ConfigFile, ResolvedConfig,
};

/// Gesture tunables consumed by the detail pager.
///
/// Derived from [`ResolvedConfig`] or used standalone with the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerTunables {
    /// Fraction of the viewport height a drag must cover for full dismiss
    /// progress.
    pub dismiss_distance_fraction: f64,
    /// Maximum |horizontal / vertical| velocity ratio the dismiss gesture
    /// accepts.
    pub max_axis_ratio: f64,
}

impl Default for PagerTunables {
    fn default() -> Self {
        Self {
            dismiss_distance_fraction: 0.6,
            max_axis_ratio: 1.5,
        }
    }
}

impl ResolvedConfig {
    /// The pager tunables this configuration resolves to.
    pub fn pager_tunables(&self) -> PagerTunables {
        PagerTunables {
            dismiss_distance_fraction: self.dismiss_distance_fraction,
            max_axis_ratio: self.max_axis_ratio,
        }
    }
}
