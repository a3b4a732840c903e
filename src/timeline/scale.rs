//! Zoom level of the timeline, in hours per display unit.

use serde::{Deserialize, Serialize};

use super::TimelineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Current hours per display unit.
    pub value: f64,
    /// Amount one zoom step changes `value` by.
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            value: 5.0,
            step: 1.0,
            min: 5.0,
            max: 24.0,
        }
    }
}

impl ScaleConfig {
    /// Check the bounds, pull `min` under `max` and clamp `value` into them.
    ///
    /// Independent of the minimum visible span.
    pub fn normalized(mut self) -> Result<Self, TimelineError> {
        if !(self.min > 0.0 && self.max > 0.0) {
            return Err(TimelineError::InvalidScale {
                min: self.min,
                max: self.max,
            });
        }
        self.min = self.min.min(self.max);
        self.value = self.value.clamp(self.min, self.max);
        Ok(self)
    }

    pub fn increase(&mut self) {
        self.value = (self.value + self.step).min(self.max);
    }

    pub fn decrease(&mut self) {
        self.value = (self.value - self.step).max(self.min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_already_normal() {
        let scale = ScaleConfig::default();
        assert_eq!(scale.normalized().unwrap(), scale);
    }

    #[test]
    fn test_min_is_pulled_under_max() {
        let scale = ScaleConfig {
            value: 30.0,
            step: 1.0,
            min: 12.0,
            max: 8.0,
        }
        .normalized()
        .unwrap();
        assert_eq!(scale.min, 8.0);
        assert_eq!(scale.value, 8.0);
    }

    #[test]
    fn test_non_positive_bounds_are_rejected() {
        let scale = ScaleConfig {
            min: 0.0,
            ..ScaleConfig::default()
        };
        assert!(matches!(
            scale.normalized(),
            Err(TimelineError::InvalidScale { .. })
        ));
        let nan = ScaleConfig {
            max: f64::NAN,
            ..ScaleConfig::default()
        };
        assert!(nan.normalized().is_err());
    }

    #[test]
    fn test_zoom_stays_within_bounds() {
        let mut scale = ScaleConfig {
            value: 23.5,
            ..ScaleConfig::default()
        };
        scale.increase();
        assert_eq!(scale.value, 24.0);
        scale.increase();
        assert_eq!(scale.value, 24.0);

        let mut scale = ScaleConfig::default();
        scale.decrease();
        assert_eq!(scale.value, 5.0);
    }
}
