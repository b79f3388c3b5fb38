use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};

use crate::input::InputError;

/// ISS (municipal service tax) rate chosen for an invoice.
///
/// Only the rates offered by the emission wizard are representable, so an
/// arbitrary percentage can never reach the calculator.
///
/// Serializes as the bare percentage number (`2.5`) and deserializes from a
/// number or numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "Decimal")]
pub enum IssRate {
    Two,
    TwoAndHalf,
    Three,
    Four,
    #[default]
    Five,
}

impl IssRate {
    /// Every supported rate, ascending.
    pub const ALL: [IssRate; 5] = [
        IssRate::Two,
        IssRate::TwoAndHalf,
        IssRate::Three,
        IssRate::Four,
        IssRate::Five,
    ];

    /// The rate as a percentage, e.g. `2.5` for 2.5%.
    pub fn percent(self) -> Decimal {
        match self {
            Self::Two => dec!(2),
            Self::TwoAndHalf => dec!(2.5),
            Self::Three => dec!(3),
            Self::Four => dec!(4),
            Self::Five => dec!(5),
        }
    }

    /// The rate as a multiplier, e.g. `0.025` for 2.5%.
    pub fn fraction(self) -> Decimal {
        self.percent() / dec!(100)
    }
}

impl TryFrom<Decimal> for IssRate {
    type Error = InputError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.percent() == percent)
            .ok_or_else(|| InputError::UnsupportedIssRate(percent.normalize().to_string()))
    }
}

impl From<IssRate> for Decimal {
    fn from(rate: IssRate) -> Self {
        rate.percent()
    }
}

impl Serialize for IssRate {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.percent(), serializer)
    }
}

impl FromStr for IssRate {
    type Err = InputError;

    /// Accepts `"2.5"`, `"2,5"` and `"2,5%"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('%').trim().replace(',', ".");
        let percent: Decimal = normalized
            .parse()
            .map_err(|_| InputError::UnsupportedIssRate(s.trim().to_string()))?;
        Self::try_from(percent)
    }
}

impl fmt::Display for IssRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
