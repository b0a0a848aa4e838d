//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// Built-in critical type markers, substring-matched (case-sensitive) against
/// a struct's short name. User-configured markers are unioned with these at
/// decision time; neither list overrides the other.
pub const BUILTIN_CRITICAL_TYPES: &[&str] = &[
    "AdminCap",
    "UpgradeCap",
    "TreasuryCap",
    "State",
    "Config",
    "Treasury",
    "Vault",
    "Registry",
];

/// Tunables for a single analysis run. All fields have conservative defaults;
/// the CLI and embedding callers override selectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Recursive dependency traversal depth (1 = root package only).
    pub max_pkg_depth: u32,
    /// Dynamic-field traversal depth per object (0 disables child fetching).
    pub max_obj_depth: u32,
    /// Populations at or below this size are fetched exhaustively.
    pub type_count_threshold: usize,
    /// Sample large non-critical types instead of fetching up to the threshold.
    pub sample_large_types: bool,
    /// Instances fetched per sampled type.
    pub object_sample_size: usize,
    /// Absolute fetch cap for critical types, which are otherwise exhaustive.
    pub hard_cap_critical: usize,
    /// Advisory event window; the event query itself is count-bounded, not
    /// time-bounded, so this is recorded as run metadata only.
    pub events_window_days: u32,
    /// User-supplied critical type markers, unioned with
    /// [`BUILTIN_CRITICAL_TYPES`].
    pub critical_types: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_pkg_depth: 1,
            max_obj_depth: 1,
            type_count_threshold: 100,
            sample_large_types: true,
            object_sample_size: 10,
            hard_cap_critical: 5000,
            events_window_days: 7,
            critical_types: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Case-sensitive substring match against the union of user-configured
    /// and built-in critical markers. This is the list the module parser
    /// flags against.
    pub fn matches_critical_marker(&self, short_name: &str) -> bool {
        self.critical_types
            .iter()
            .any(|m| short_name.contains(m.as_str()))
            || BUILTIN_CRITICAL_TYPES.iter().any(|m| short_name.contains(m))
    }

    /// Object discovery widens the marker match with a "Cap" suffix rule:
    /// capability types are always fetched exhaustively.
    pub fn is_critical_type(&self, short_name: &str) -> bool {
        short_name.ends_with("Cap") || self.matches_critical_marker(short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_critical_types() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.is_critical_type("TreasuryCap"));
        assert!(cfg.is_critical_type("GlobalState"));
        assert!(cfg.is_critical_type("MarketRegistry"));
        assert!(!cfg.is_critical_type("Wallet"));
    }

    #[test]
    fn test_cap_suffix_rule() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.is_critical_type("FarmCap"));
        // "Cap" in the middle is not the suffix rule and not a builtin marker
        assert!(!cfg.is_critical_type("Capsule"));
    }

    #[test]
    fn test_user_markers_are_unioned() {
        let cfg = AnalyzerConfig {
            critical_types: vec!["Wallet".to_string()],
            ..Default::default()
        };
        assert!(cfg.is_critical_type("Wallet"));
        assert!(cfg.is_critical_type("TreasuryCap"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let cfg = AnalyzerConfig::default();
        assert!(!cfg.is_critical_type("treasurycap"));
    }
}
