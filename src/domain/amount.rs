use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quantity of the chain's native currency, held in its smallest unit.
///
/// Input and display go through decimal strings; arithmetic and comparison
/// happen on the integer so no precision is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NativeAmount(u128);

impl NativeAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    pub fn base_units(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parses a decimal string such as `"0.5"` into base units.
    ///
    /// Returns `None` for anything that is not a non-negative decimal with at
    /// most `decimals` fractional digits, or that does not fit in a `u128`.
    pub fn parse_units(input: &str, decimals: u32) -> Option<Self> {
        let value = Decimal::from_str(input.trim()).ok()?;
        Self::from_decimal(value, decimals)
    }

    pub fn from_decimal(value: Decimal, decimals: u32) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        let value = value.normalize();
        if value.scale() > decimals {
            return None;
        }
        let mantissa = u128::try_from(value.mantissa()).ok()?;
        let factor = 10u128.checked_pow(decimals - value.scale())?;
        mantissa.checked_mul(factor).map(Self)
    }

    /// Renders the amount as a decimal string without trailing zeros.
    pub fn format_units(&self, decimals: u32) -> String {
        let Some(base) = 10u128.checked_pow(decimals) else {
            return self.0.to_string();
        };
        let whole = self.0 / base;
        let fraction = self.0 % base;
        if fraction == 0 {
            return whole.to_string();
        }
        let fraction = format!("{:0width$}", fraction, width = decimals as usize);
        format!("{}.{}", whole, fraction.trim_end_matches('0'))
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

/// The connected wallet's balance as reported by the chain collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub value: NativeAmount,
    pub display_value: String,
    pub symbol: String,
}

impl Balance {
    pub fn new(value: NativeAmount, decimals: u32, symbol: impl Into<String>) -> Self {
        Self {
            value,
            display_value: value.format_units(decimals),
            symbol: symbol.into(),
        }
    }

    pub fn covers(&self, amount: NativeAmount) -> bool {
        self.value >= amount
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_value, self.symbol)
    }
}
