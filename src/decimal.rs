use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{Result, ScheduleError};

/// Money type backed by a fixed-point decimal, exact under addition and subtraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal, no rounding applied
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s)?))
    }

    /// create from integer amount (riyals, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (halalas, cents, etc)
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money(Decimal::from(amount) / Decimal::from(10_u64.pow(scale)))
    }

    /// create from a float coming off an untyped boundary (json, forms)
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ScheduleError::invalid_argument(format!(
                "monetary amount must be finite, got {value}"
            )));
        }
        Decimal::from_f64(value)
            .map(Money)
            .ok_or_else(|| ScheduleError::invalid_argument(format!("monetary amount out of range: {value}")))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// check if strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// number of significant fractional digits, trailing zeros ignored
    pub fn fractional_digits(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// multiply by a periodic rate, None on fixed-point overflow
    pub fn checked_mul_rate(&self, rate: Rate) -> Option<Money> {
        self.0.checked_mul(rate.as_decimal()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// rate type for interest rates, stored as a fraction (0.06 for 6%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percent (e.g., 5 for 5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

/// how midpoints are resolved when rounding to the minor unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundingMode {
    /// 0.005 -> 0.01, midpoints move away from zero
    #[default]
    HalfUp,
    /// 0.005 -> 0.00, 0.015 -> 0.02, midpoints go to the even digit
    Bankers,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// largest minor-unit digit count a currency may configure
pub const MAX_MINOR_DIGITS: u32 = 6;

/// minor-unit precision of a currency and the rounding rule applied to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPrecision {
    pub minor_digits: u32,
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl Default for CurrencyPrecision {
    fn default() -> Self {
        Self::new(2, RoundingMode::HalfUp)
    }
}

impl CurrencyPrecision {
    pub const fn new(minor_digits: u32, rounding: RoundingMode) -> Self {
        Self {
            minor_digits,
            rounding,
        }
    }

    /// round to the minor unit; the result always carries exactly `minor_digits` places
    pub fn round(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(self.minor_digits, self.rounding.strategy());
        rounded.rescale(self.minor_digits);
        rounded
    }

    pub fn round_money(&self, value: Money) -> Money {
        Money(self.round(value.as_decimal()))
    }

    /// true when the amount needs no rounding at this precision
    pub fn fits(&self, value: Money) -> bool {
        value.fractional_digits() <= self.minor_digits
    }

    /// smallest representable amount, e.g. 0.01
    pub fn minor_unit(&self) -> Money {
        Money(Decimal::new(1, self.minor_digits))
    }
}

/// round to 2 decimal places, half-up
pub fn round2(value: Decimal) -> Decimal {
    CurrencyPrecision::default().round(value)
}
