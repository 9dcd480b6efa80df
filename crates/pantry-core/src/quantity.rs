//! # Quantity Module
//!
//! Provides the `Quantity` type for handling item amounts safely.
//!
//! ## Why Fixed-Point?
//! ```text
//! In JavaScript/floating point:
//!   0.1 + 0.2 = 0.30000000000000004   WRONG!
//!
//! A pantry tracking 0.3 kg of flour three consumptions of 0.1 kg apart
//! must land on exactly zero, or the item never reads as exhausted.
//!
//! OUR SOLUTION: integer milliunits (thousandths)
//!   300 milli - 100 milli - 100 milli - 100 milli = 0, exactly
//! ```
//!
//! ## Usage
//! ```rust
//! use pantry_core::quantity::Quantity;
//!
//! // Create from milliunits (preferred) or whole units
//! let half_kilo = Quantity::from_milli(500);
//! let five = Quantity::from_whole(5);
//!
//! // Decrement with explicit insufficiency handling
//! assert_eq!(five.checked_sub(Quantity::from_whole(2)), Some(Quantity::from_whole(3)));
//! assert_eq!(half_kilo.checked_sub(five), None); // would go negative
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use thiserror::Error;

/// Milliunits per whole unit.
const SCALE: i64 = 1_000;

// =============================================================================
// Quantity Type
// =============================================================================

/// An item amount in milliunits (thousandths of the item's unit).
///
/// ## Design Decisions
/// - **i64 milliunits**: three decimal places of precision, no float drift
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde/sqlx**: serializes and stores as a plain integer
///
/// Every quantity in the system (item stock, consumption amounts, listing
/// offers, claims) flows through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milliunits.
    ///
    /// ```rust
    /// use pantry_core::quantity::Quantity;
    ///
    /// let q = Quantity::from_milli(2_500); // 2.5 units
    /// assert_eq!(q.milli(), 2_500);
    /// ```
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    ///
    /// ```rust
    /// use pantry_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::from_whole(5).milli(), 5_000);
    /// ```
    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        Quantity(units * SCALE)
    }

    /// Returns the value in milliunits.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn whole_part(&self) -> i64 {
        self.0 / SCALE
    }

    /// Returns the fractional portion in milliunits (always 0-999).
    #[inline]
    pub const fn milli_part(&self) -> i64 {
        (self.0 % SCALE).abs()
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the quantity is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts, returning `None` if the result would be negative.
    ///
    /// The consumption path relies on this: overdrawing an item is a
    /// failure, never a clamp.
    #[inline]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Quantity(self.0 - other.0))
        } else {
            None
        }
    }

    /// Subtracts, flooring at zero.
    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        if self.0 >= other.0 {
            Quantity(self.0 - other.0)
        } else {
            Quantity(0)
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Error parsing a decimal string into a [`Quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseQuantityError {
    /// Input was empty or not a decimal number.
    #[error("not a decimal number: {0:?}")]
    Malformed(String),

    /// More than three decimal places were supplied.
    #[error("at most three decimal places are supported: {0:?}")]
    TooPrecise(String),

    /// Negative quantities are not representable inputs.
    #[error("quantity cannot be negative: {0:?}")]
    Negative(String),
}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    /// Parses a decimal string such as `"5"`, `"2.5"`, or `"0.125"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseQuantityError::Malformed(s.to_string()));
        }
        if s.starts_with('-') {
            return Err(ParseQuantityError::Negative(s.to_string()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if frac.len() > 3 {
            return Err(ParseQuantityError::TooPrecise(s.to_string()));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseQuantityError::Malformed(s.to_string()))?
        };

        let frac_milli: i64 = if frac.is_empty() {
            0
        } else {
            let parsed: i64 = frac
                .parse()
                .map_err(|_| ParseQuantityError::Malformed(s.to_string()))?;
            // "5" after "2." means 500 milli, "05" means 50, "005" means 5
            parsed * 10_i64.pow(3 - frac.len() as u32)
        };

        Ok(Quantity(whole * SCALE + frac_milli))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the quantity as a trimmed decimal: `5`, `2.5`, `0.125`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milli_part() == 0 {
            write!(f, "{}", self.whole_part())
        } else {
            let frac = format!("{:03}", self.milli_part());
            write!(f, "{}.{}", self.whole_part(), frac.trim_end_matches('0'))
        }
    }
}

/// Default quantity is zero.
impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
