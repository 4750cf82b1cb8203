//! Named load profiles.

use crate::config::LoadRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Built-in load profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 4 units, 10-20 rounds, 100-300ms startup jitter.
    Quick,
    /// 4 units, 100-200 rounds, 100-300ms startup jitter.
    Heavy,
    /// 4 units, 10-20 rounds, 1-2s startup delay.
    Delayed,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Preset; 3] = [Preset::Quick, Preset::Heavy, Preset::Delayed];

    /// Build the request this preset stands for.
    pub fn request(self) -> LoadRequest {
        match self {
            Preset::Quick => LoadRequest::new(4)
                .with_iterations(10, 20)
                .with_delay(Duration::from_millis(100), Duration::from_millis(300)),
            Preset::Heavy => LoadRequest::new(4)
                .with_iterations(100, 200)
                .with_delay(Duration::from_millis(100), Duration::from_millis(300)),
            Preset::Delayed => LoadRequest::new(4)
                .with_iterations(10, 20)
                .with_delay(Duration::from_millis(1000), Duration::from_millis(2000)),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Quick => write!(f, "quick"),
            Preset::Heavy => write!(f, "heavy"),
            Preset::Delayed => write!(f, "delayed"),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" | "q" => Ok(Preset::Quick),
            "heavy" | "h" => Ok(Preset::Heavy),
            "delayed" | "d" => Ok(Preset::Delayed),
            _ => Err(format!("Unknown preset: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!("quick".parse::<Preset>().unwrap(), Preset::Quick);
        assert_eq!("H".parse::<Preset>().unwrap(), Preset::Heavy);
        assert_eq!("delayed".parse::<Preset>().unwrap(), Preset::Delayed);
        assert!("huge".parse::<Preset>().is_err());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            let request = preset.request();
            assert!(request.validate().is_ok(), "{preset} should validate");
            assert_eq!(request.unit_count, 4);
        }
    }

    #[test]
    fn test_delayed_preset_bounds() {
        let request = Preset::Delayed.request();
        assert_eq!(request.delay_min, Duration::from_secs(1));
        assert_eq!(request.delay_max, Duration::from_secs(2));
    }
}
