use std::time::Duration;

use crate::error::{CarouselError, Result};

/// Seconds between two automatic advances.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
/// Copies of the dataset laid end to end in the virtual space.
pub const DEFAULT_MULTIPLIER: usize = 4_000_000;
/// Height of the page indicator strip along the bottom edge.
pub const PAGE_INDICATOR_HEIGHT: i32 = 30;

const ENV_INTERVAL: &str = "LOOPCAROUSEL_INTERVAL_SECS";
const ENV_AUTO_LOOP: &str = "LOOPCAROUSEL_AUTO_LOOP";
const ENV_MULTIPLIER: &str = "LOOPCAROUSEL_MULTIPLIER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    pub width: i32,
    pub height: i32,
    pub auto_loop: bool,
    pub interval: Duration,
    pub multiplier: usize,
    pub indicator_height: i32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 360,
            auto_loop: true,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            multiplier: DEFAULT_MULTIPLIER,
            indicator_height: PAGE_INDICATOR_HEIGHT,
        }
    }
}

impl CarouselConfig {
    /// Defaults overridden by `LOOPCAROUSEL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_INTERVAL) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| CarouselError::InvalidEnv {
                    var: ENV_INTERVAL,
                    value: value.clone(),
                })?;
            self.interval = Duration::from_secs(secs);
        }

        if let Some(value) = lookup(ENV_AUTO_LOOP) {
            self.auto_loop = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(CarouselError::InvalidEnv {
                        var: ENV_AUTO_LOOP,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_MULTIPLIER) {
            self.multiplier = value
                .trim()
                .parse::<usize>()
                .map_err(|_| CarouselError::InvalidEnv {
                    var: ENV_MULTIPLIER,
                    value: value.clone(),
                })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(CarouselError::ZeroInterval);
        }
        if self.multiplier == 0 {
            return Err(CarouselError::ZeroMultiplier);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CarouselConfig::default();
        assert!(config.auto_loop);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.multiplier, 4_000_000);
        assert_eq!(config.indicator_height, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = CarouselConfig::default()
            .apply_overrides(lookup(&[
                (ENV_INTERVAL, "3"),
                (ENV_AUTO_LOOP, "off"),
                (ENV_MULTIPLIER, "100"),
            ]))
            .unwrap();
        assert_eq!(config.interval, Duration::from_secs(3));
        assert!(!config.auto_loop);
        assert_eq!(config.multiplier, 100);
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = CarouselConfig::default()
            .apply_overrides(lookup(&[]))
            .unwrap();
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn test_invalid_env_values_rejected() {
        let err = CarouselConfig::default()
            .apply_overrides(lookup(&[(ENV_AUTO_LOOP, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, CarouselError::InvalidEnv { var, .. } if var == ENV_AUTO_LOOP));

        let err = CarouselConfig::default()
            .apply_overrides(lookup(&[(ENV_INTERVAL, "soon")]))
            .unwrap_err();
        assert!(matches!(err, CarouselError::InvalidEnv { var, .. } if var == ENV_INTERVAL));
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = CarouselConfig::default()
            .apply_overrides(lookup(&[(ENV_INTERVAL, "0")]))
            .unwrap_err();
        assert!(matches!(err, CarouselError::ZeroInterval));

        let err = CarouselConfig::default()
            .apply_overrides(lookup(&[(ENV_MULTIPLIER, "0")]))
            .unwrap_err();
        assert!(matches!(err, CarouselError::ZeroMultiplier));
    }
}
