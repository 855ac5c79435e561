use crate::dataset::Color;
use crate::error::WheelConfigError;
use serde::{Deserialize, Serialize};

/// Fixed canvas geometry supplied at construction time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Bounding radius; also the outer edge of the outer ring.
    pub outer_radius: f64,
    pub middle_radius: f64,
    pub inner_radius: f64,
    /// Label shift (percent) on the innermost ring, keeps labels off the centre seam.
    pub inner_label_offset: f64,
    pub default_color: Color,
    pub inertia: InertiaConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            outer_radius: 520.0,
            middle_radius: 355.0,
            inner_radius: 200.0,
            inner_label_offset: 7.0,
            default_color: Color::from("black"),
            inertia: InertiaConfig::default(),
        }
    }
}

impl WheelConfig {
    pub fn canvas_size(&self) -> f64 {
        self.outer_radius * 2.0
    }

    /// Ring bands must nest without overlapping.
    pub fn validate(&self) -> Result<(), WheelConfigError> {
        let ordered = 0.0 < self.inner_radius
            && self.inner_radius < self.middle_radius
            && self.middle_radius < self.outer_radius;
        if ordered {
            Ok(())
        } else {
            Err(WheelConfigError::RadiiOutOfOrder {
                inner: self.inner_radius,
                middle: self.middle_radius,
                outer: self.outer_radius,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// Velocity multiplier applied after every coasting tick.
    pub decay: f64,
    /// Coasting stops once |velocity| drops below this (degrees per tick).
    pub stop_threshold: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            decay: 0.95,
            stop_threshold: 0.1,
        }
    }
}
