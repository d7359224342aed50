//! Walking-speed tiers and the fitness policy that selects them.
//!
//! A [`SpeedClass`] drives two things: the flat walking speed and the climb
//! penalty coefficient used by the cost model, and the initial radius of the
//! highest-point search.

use crate::{DomainError, DomainResult};

/// Discrete walking-speed tier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpeedClass {
    /// 5 km/h.
    Fast,
    /// 4 km/h.
    Medium,
    /// 3.5 km/h.
    Slow,
}

impl SpeedClass {
    /// Flat-ground walking speed in metres per minute.
    #[inline]
    pub fn metres_per_minute(self) -> f64 {
        match self {
            SpeedClass::Fast   => 5000.0 / 60.0,
            SpeedClass::Medium => 4000.0 / 60.0,
            SpeedClass::Slow   => 3500.0 / 60.0,
        }
    }

    /// Multiplier on the Naismith climb penalty (one minute per 10 m of ascent).
    #[inline]
    pub fn ascent_coefficient(self) -> f64 {
        match self {
            SpeedClass::Fast   => 1.0,
            SpeedClass::Medium => 1.25,
            SpeedClass::Slow   => 1.5,
        }
    }

    /// Initial radius of the highest-point search, metres.
    #[inline]
    pub fn search_radius(self) -> f64 {
        match self {
            SpeedClass::Fast   => 5000.0,
            SpeedClass::Medium => 4000.0,
            SpeedClass::Slow   => 3000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedClass::Fast   => "fast",
            SpeedClass::Medium => "medium",
            SpeedClass::Slow   => "slow",
        }
    }
}

impl std::fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported fitness on a 1–10 scale.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness(u8);

impl Fitness {
    pub fn new(score: u8) -> DomainResult<Self> {
        if (1..=10).contains(&score) {
            Ok(Self(score))
        } else {
            Err(DomainError::InvalidFitness(score))
        }
    }

    pub fn score(self) -> u8 {
        self.0
    }

    /// 6 and above walk fast, 5 walks at medium pace, the rest slowly.
    pub fn speed_class(self) -> SpeedClass {
        match self.0 {
            6..=u8::MAX => SpeedClass::Fast,
            5           => SpeedClass::Medium,
            _           => SpeedClass::Slow,
        }
    }
}

impl TryFrom<u8> for Fitness {
    type Error = DomainError;

    fn try_from(score: u8) -> DomainResult<Self> {
        Fitness::new(score)
    }
}
