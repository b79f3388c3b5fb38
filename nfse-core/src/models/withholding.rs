use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// IR withheld at source: 1.5%.
pub const IR_RATE: Decimal = dec!(0.015);
/// PIS: 0.65%.
pub const PIS_RATE: Decimal = dec!(0.0065);
/// COFINS: 3%.
pub const COFINS_RATE: Decimal = dec!(0.03);
/// CSLL: 1%.
pub const CSLL_RATE: Decimal = dec!(0.01);
/// INSS: 11%.
pub const INSS_RATE: Decimal = dec!(0.11);

/// A tax that may be withheld from a service invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithholdingKind {
    Iss,
    Ir,
    Pis,
    Cofins,
    Csll,
    Inss,
}

impl WithholdingKind {
    /// Display order used by the simulation summary.
    pub const ALL: [WithholdingKind; 6] = [
        WithholdingKind::Iss,
        WithholdingKind::Ir,
        WithholdingKind::Pis,
        WithholdingKind::Cofins,
        WithholdingKind::Csll,
        WithholdingKind::Inss,
    ];

    /// Statutory rate as a multiplier. `None` for ISS, whose rate comes
    /// from the invoice.
    pub fn fixed_rate(self) -> Option<Decimal> {
        match self {
            Self::Iss => None,
            Self::Ir => Some(IR_RATE),
            Self::Pis => Some(PIS_RATE),
            Self::Cofins => Some(COFINS_RATE),
            Self::Csll => Some(CSLL_RATE),
            Self::Inss => Some(INSS_RATE),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Iss => "iss",
            Self::Ir => "ir",
            Self::Pis => "pis",
            Self::Cofins => "cofins",
            Self::Csll => "csll",
            Self::Inss => "inss",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Iss => "ISS",
            Self::Ir => "IR",
            Self::Pis => "PIS",
            Self::Cofins => "COFINS",
            Self::Csll => "CSLL",
            Self::Inss => "INSS",
        }
    }
}

impl FromStr for WithholdingKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| InputError::UnknownWithholding(s.trim().to_string()))
    }
}

impl fmt::Display for WithholdingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which taxes the payer withholds. Every combination is legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WithholdingFlags {
    pub iss: bool,
    pub ir: bool,
    pub pis: bool,
    pub cofins: bool,
    pub csll: bool,
    pub inss: bool,
}

impl WithholdingFlags {
    /// Nothing withheld.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every tax withheld.
    pub fn all() -> Self {
        Self {
            iss: true,
            ir: true,
            pis: true,
            cofins: true,
            csll: true,
            inss: true,
        }
    }

    pub fn is_set(&self, kind: WithholdingKind) -> bool {
        match kind {
            WithholdingKind::Iss => self.iss,
            WithholdingKind::Ir => self.ir,
            WithholdingKind::Pis => self.pis,
            WithholdingKind::Cofins => self.cofins,
            WithholdingKind::Csll => self.csll,
            WithholdingKind::Inss => self.inss,
        }
    }

    pub fn set(
        &mut self,
        kind: WithholdingKind,
        enabled: bool,
    ) {
        let slot = match kind {
            WithholdingKind::Iss => &mut self.iss,
            WithholdingKind::Ir => &mut self.ir,
            WithholdingKind::Pis => &mut self.pis,
            WithholdingKind::Cofins => &mut self.cofins,
            WithholdingKind::Csll => &mut self.csll,
            WithholdingKind::Inss => &mut self.inss,
        };
        *slot = enabled;
    }

    /// Returns a copy with `kind` enabled.
    pub fn with(
        mut self,
        kind: WithholdingKind,
    ) -> Self {
        self.set(kind, true);
        self
    }

    /// Enabled kinds, in display order.
    pub fn active(&self) -> impl Iterator<Item = WithholdingKind> + '_ {
        WithholdingKind::ALL
            .into_iter()
            .filter(|kind| self.is_set(*kind))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

impl FromIterator<WithholdingKind> for WithholdingFlags {
    fn from_iter<I: IntoIterator<Item = WithholdingKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |flags, kind| flags.with(kind))
    }
}
