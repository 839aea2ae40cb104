use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ExtractError;

/// Traversal radius: a non-negative multiple of 0.5.
///
/// The integer part (rounded up) is the number of hops to fetch. A `.5` part
/// switches the final hop to lateral-edge mode instead of adding another hop
/// of nodes. Below one whole hop nothing is expanded, so `0.5` behaves like `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Depth {
    half_steps: u32,
}

impl Depth {
    /// Validate a raw depth value.
    ///
    /// # Errors
    /// `ExtractError::InvalidDepth` for negative, non-finite, or non-0.5-multiple values.
    pub fn new(value: f64) -> Result<Self, ExtractError> {
        let doubled = value * 2.0;
        if !value.is_finite() || value < 0.0 || doubled.fract() != 0.0 || doubled > f64::from(u32::MAX)
        {
            return Err(ExtractError::InvalidDepth { value: value.to_string() });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let half_steps = doubled as u32;
        Ok(Self { half_steps })
    }

    #[must_use]
    pub fn whole(hops: u32) -> Self {
        Self { half_steps: hops.saturating_mul(2) }
    }

    /// Number of hops fetched: `ceil(depth)` once `depth >= 1`, otherwise zero.
    #[must_use]
    pub fn hops(self) -> u32 {
        if self.half_steps < 2 {
            0
        } else {
            self.half_steps.div_ceil(2)
        }
    }

    /// True when the depth carries a `.5` part.
    #[must_use]
    pub fn is_half(self) -> bool {
        self.half_steps % 2 == 1
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.half_steps) / 2.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::whole(1)
    }
}

impl TryFrom<f64> for Depth {
    type Error = ExtractError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Depth> for f64 {
    fn from(d: Depth) -> Self {
        d.as_f64()
    }
}

impl FromStr for Depth {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ExtractError::InvalidDepth { value: s.to_string() })?;
        Self::new(value)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.half_steps / 2;
        if self.is_half() {
            write!(f, "{whole}.5")
        } else {
            write!(f, "{whole}")
        }
    }
}
