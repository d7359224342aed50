//! Highest-point search configuration.
//!
//! Typically left at its defaults; the demo binary can load an override from
//! a JSON file.

/// Parameters of the radius-escalation search.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Minimum altitude a destination should reach, metres.  Default: 70.
    pub threshold_altitude: f64,

    /// Largest radius reached by automatic escalation, metres.  Going past
    /// it requires confirmation.  Default: 5000.
    pub hard_cap_radius: f64,

    /// Automatic escalation increment, metres.  Default: 500.
    pub step: f64,

    /// Increment applied after each granted confirmation, metres.
    /// Default: 500.
    pub confirm_step: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold_altitude: 70.0,
            hard_cap_radius:    5_000.0,
            step:               500.0,
            confirm_step:       500.0,
        }
    }
}

impl SearchConfig {
    /// Check the configuration against an initial radius.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self, initial_radius: f64) -> Result<(), String> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !self.threshold_altitude.is_finite() {
            return Err(format!("threshold altitude must be finite, got {}", self.threshold_altitude));
        }
        if !positive(self.hard_cap_radius) {
            return Err(format!("hard cap radius must be positive, got {}", self.hard_cap_radius));
        }
        if !positive(self.step) {
            return Err(format!("escalation step must be positive, got {}", self.step));
        }
        if !positive(self.confirm_step) {
            return Err(format!("confirmation step must be positive, got {}", self.confirm_step));
        }
        if !positive(initial_radius) {
            return Err(format!("initial radius must be positive, got {initial_radius}"));
        }
        if initial_radius > self.hard_cap_radius {
            return Err(format!(
                "initial radius {initial_radius} exceeds the hard cap {}",
                self.hard_cap_radius
            ));
        }
        Ok(())
    }
}
