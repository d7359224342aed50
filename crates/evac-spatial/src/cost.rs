//! Slope-dependent walking time per road link.
//!
//! # Model
//!
//! Flat time is `length / speed`.  Climbing follows Naismith's rule (one
//! extra minute per 10 m of ascent) scaled by the walker's
//! [`SpeedClass::ascent_coefficient`].  Descending follows Langmuir's
//! corrections: a gentle descent (5–12 % grade) saves a minute per 30 m of
//! drop, a steep one (> 12 %) costs a minute per 30 m.
//!
//! | Grade `g = |Δh| / length · 100` | Descending time              |
//! |---------------------------------|------------------------------|
//! | `g ≤ 5` or `g = 12`             | `base`                       |
//! | `5 < g < 12`                    | `base − |Δh|/30`, ≥ 0.001    |
//! | `g > 12`                        | `base + |Δh|/30`             |
//!
//! All times are in **minutes**.

use evac_core::{DomainError, DomainResult, SpeedClass};

/// Floor applied to gentle-descent times so every edge weight stays positive.
pub const MIN_DESCENT_TIME: f64 = 0.001;

/// The three candidate traversal times of one link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeWeights {
    /// Time on the flat.
    pub base: f64,
    /// Time walking the link uphill.
    pub ascending: f64,
    /// Time walking the link downhill.
    pub descending: f64,
}

/// Compute the flat, uphill, and downhill walking times of a link.
///
/// # Errors
///
/// [`DomainError::InvalidLength`] if `length` is not a positive finite
/// number; [`DomainError::InvalidAltitude`] if `altitude_difference` is not
/// finite.
pub fn time_weight(length: f64, speed: SpeedClass, altitude_difference: f64) -> DomainResult<TimeWeights> {
    if !(length.is_finite() && length > 0.0) {
        return Err(DomainError::InvalidLength(length));
    }
    if !altitude_difference.is_finite() {
        return Err(DomainError::InvalidAltitude(altitude_difference));
    }

    let base = length / speed.metres_per_minute();
    let climb = altitude_difference.abs();
    let slope = (altitude_difference / length * 100.0).abs();

    let ascending = base + speed.ascent_coefficient() * (climb / 10.0);

    let descending = if slope > 5.0 && slope < 12.0 {
        let t = base - climb / 30.0;
        if t <= 0.0 { MIN_DESCENT_TIME } else { t }
    } else if slope > 12.0 {
        base + climb / 30.0
    } else {
        base
    };

    Ok(TimeWeights { base, ascending, descending })
}

/// Which way a link climbs, from its start node to its end node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SlopeDirection {
    /// End is higher than start.
    Ascending,
    Flat,
    /// End is lower than start.
    Descending,
}

impl SlopeDirection {
    /// Classify by the sign of `altitude(end) − altitude(start)`.
    #[inline]
    pub fn of(altitude_difference: f64) -> Self {
        if altitude_difference > 0.0 {
            SlopeDirection::Ascending
        } else if altitude_difference < 0.0 {
            SlopeDirection::Descending
        } else {
            SlopeDirection::Flat
        }
    }

    /// `(start→end, end→start)` edge times.
    #[inline]
    pub fn edge_times(self, w: &TimeWeights) -> (f64, f64) {
        match self {
            SlopeDirection::Ascending  => (w.ascending, w.descending),
            SlopeDirection::Flat       => (w.base, w.base),
            SlopeDirection::Descending => (w.descending, w.ascending),
        }
    }
}
