use core::time::Duration;
use std::env;

/// Default quiet period before a focus request is applied.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Runtime knobs for the preview [`Synchronizer`](crate::Synchronizer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period in milliseconds; only the last request inside it is applied.
    pub debounce_ms: u64,
    /// Attach a floating label naming the field next to the highlighted element.
    pub tooltips_enabled: bool,
    /// Queue a centered scroll to the highlighted element on the next frame.
    pub scroll_into_view: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncConfig {
    pub const fn new() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tooltips_enabled: true,
            scroll_into_view: true,
        }
    }

    /// Build a config from environment variables, falling back to defaults.
    ///
    /// - `FIELD_SYNC_DEBOUNCE_MS`: debounce window in milliseconds
    /// - `FIELD_SYNC_TOOLTIPS`: `0`/`false`/`off` disables tooltips
    /// - `FIELD_SYNC_SCROLL`: `0`/`false`/`off` disables scroll requests
    pub fn from_env() -> Self {
        let defaults = Self::new();
        let debounce_ms = env::var("FIELD_SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(defaults.debounce_ms);
        let tooltips_enabled = env::var("FIELD_SYNC_TOOLTIPS")
            .ok()
            .map_or(defaults.tooltips_enabled, |raw| parse_flag(&raw));
        let scroll_into_view = env::var("FIELD_SYNC_SCROLL")
            .ok()
            .map_or(defaults.scroll_into_view, |raw| parse_flag(&raw));
        Self {
            debounce_ms,
            tooltips_enabled,
            scroll_into_view,
        }
    }

    #[must_use]
    pub const fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub const fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_scroll_into_view(mut self, enabled: bool) -> Self {
        self.scroll_into_view = enabled;
        self
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_negatives() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" Off "));
        assert!(!parse_flag("FALSE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = SyncConfig::new().with_debounce_ms(20).with_tooltips(false);
        assert_eq!(config.debounce(), Duration::from_millis(20));
        assert!(!config.tooltips_enabled);
        assert!(config.scroll_into_view);
    }
}
