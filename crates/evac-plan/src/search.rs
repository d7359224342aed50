//! Highest-point search with radius escalation.
//!
//! # Loop
//!
//! ```text
//! radius = initial
//! loop:
//!   ① Search     max altitude within `radius` of the centre
//!   ② Found      max ≥ threshold: done
//!   ③ Escalate   below the cap: radius = min(radius + step, cap)
//!   ④ Confirm    at the cap, ask the port
//!                  yes → radius += confirm_step, back to ①
//!                  no  → done with the best sub-threshold point
//! ```
//!
//! The loop is bounded by `(hard_cap − initial) / step` automatic steps plus
//! one step per granted confirmation.

use log::{debug, info, warn};

use evac_core::{Coord, SearchConfig};
use evac_elevation::{ElevationLookup, ElevationProvider, RegionMax};

use crate::{PlanError, PlanResult};

// ── Confirmation port ─────────────────────────────────────────────────────────

/// Asked whether to keep searching once the hard cap is reached without
/// meeting the altitude threshold.
///
/// Implemented for any `FnMut(f64) -> bool`, so a closure works:
///
/// ```
/// use evac_plan::ConfirmationPort;
///
/// let mut asked = Vec::new();
/// let mut port = |radius: f64| { asked.push(radius); false };
/// assert!(!port.ask_proceed(5000.0));
/// ```
pub trait ConfirmationPort {
    /// `true` to widen the search past `current_radius`.
    fn ask_proceed(&mut self, current_radius: f64) -> bool;
}

impl<F: FnMut(f64) -> bool> ConfirmationPort for F {
    fn ask_proceed(&mut self, current_radius: f64) -> bool {
        self(current_radius)
    }
}

/// Never widens past the hard cap.
#[derive(Copy, Clone, Debug, Default)]
pub struct Decline;

impl ConfirmationPort for Decline {
    fn ask_proceed(&mut self, _current_radius: f64) -> bool {
        false
    }
}

// ── State & outcome ───────────────────────────────────────────────────────────

/// Where the search currently stands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchState {
    pub center: Coord,
    pub radius: f64,
    pub threshold_altitude: f64,
    pub hard_cap_radius: f64,
}

impl SearchState {
    pub fn reached_cap(&self) -> bool {
        self.radius >= self.hard_cap_radius
    }

    /// Next automatic radius, clamped to the cap.
    fn escalated(&self, step: f64) -> f64 {
        (self.radius + step).min(self.hard_cap_radius)
    }
}

/// Result of a completed search.  Always carries a destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// Centre of the highest cell found.
    pub destination: Coord,
    pub destination_altitude: f64,
    /// Altitude at the search centre.
    pub center_altitude: f64,
    /// Radius of the last search performed.
    pub final_radius: f64,
    /// `false` if the search stopped below the threshold.
    pub threshold_met: bool,
    /// Every radius searched, in order.  Strictly increasing.
    pub radii: Vec<f64>,
}

// ── HighestPointFinder ────────────────────────────────────────────────────────

/// Finds the highest reachable point around a location.
pub struct HighestPointFinder<'a, P: ElevationProvider + ?Sized> {
    lookup: ElevationLookup<'a, P>,
    config: SearchConfig,
}

impl<'a, P: ElevationProvider + ?Sized> HighestPointFinder<'a, P> {
    pub fn new(provider: &'a P, config: SearchConfig) -> Self {
        Self { lookup: ElevationLookup::new(provider), config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the escalation loop from `center`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Config`] if the configuration or `initial_radius` is
    ///   invalid.
    /// - [`PlanError::Elevation`] if the centre has no altitude or a search
    ///   region holds no valid cell.
    pub fn search<C>(&self, center: Coord, initial_radius: f64, port: &mut C) -> PlanResult<SearchOutcome>
    where
        C: ConfirmationPort + ?Sized,
    {
        self.config.validate(initial_radius).map_err(PlanError::Config)?;

        let center_altitude = self.lookup.altitude_at(center)?;
        let mut state = SearchState {
            center,
            radius: initial_radius,
            threshold_altitude: self.config.threshold_altitude,
            hard_cap_radius: self.config.hard_cap_radius,
        };
        let mut radii = Vec::new();

        loop {
            radii.push(state.radius);
            let best = self.lookup.max_altitude(state.center, state.radius)?;

            if best.altitude >= state.threshold_altitude {
                info!(
                    "found {} m at {} within {} m of {center}",
                    best.altitude, best.location, state.radius
                );
                return Ok(outcome(best, center_altitude, &state, true, radii));
            }

            if !state.reached_cap() {
                let next = state.escalated(self.config.step);
                debug!(
                    "max {} m below threshold {} m; widening {} → {next} m",
                    best.altitude, state.threshold_altitude, state.radius
                );
                state.radius = next;
                continue;
            }

            if port.ask_proceed(state.radius) {
                let next = state.radius + self.config.confirm_step;
                debug!("confirmed search past the cap; widening {} → {next} m", state.radius);
                state.radius = next;
                continue;
            }

            warn!(
                "stopping at {} m without reaching {} m; best point is {} m at {}",
                state.radius, state.threshold_altitude, best.altitude, best.location
            );
            return Ok(outcome(best, center_altitude, &state, false, radii));
        }
    }
}

fn outcome(best: RegionMax, center_altitude: f64, state: &SearchState, threshold_met: bool, radii: Vec<f64>) -> SearchOutcome {
    SearchOutcome {
        destination:          best.location,
        destination_altitude: best.altitude,
        center_altitude,
        final_radius:         state.radius,
        threshold_met,
        radii,
    }
}
