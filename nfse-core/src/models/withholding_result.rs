use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IssRate, WithholdingFlags, WithholdingKind};
use crate::calculations::common::round_half_up;

/// Per-tax amounts and net value for one invoice.
///
/// Values are exact products of the inputs; nothing is rounded until
/// [`WithholdingResult::rounded`] is called for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    pub gross_value: Decimal,

    /// ISS due on the service. Always computed; only part of
    /// `total_withheld` when ISS is withheld.
    pub iss_amount: Decimal,

    pub ir_amount: Decimal,
    pub pis_amount: Decimal,
    pub cofins_amount: Decimal,
    pub csll_amount: Decimal,
    pub inss_amount: Decimal,

    /// Sum of the withheld amounts.
    pub total_withheld: Decimal,

    /// `gross_value - total_withheld`. Not clamped at zero.
    pub net_value: Decimal,
}

/// One row of the simulation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingLine {
    pub kind: WithholdingKind,
    /// Rate as a percentage.
    pub rate: Decimal,
    pub amount: Decimal,
    pub withheld: bool,
}

impl WithholdingResult {
    pub fn amount(
        &self,
        kind: WithholdingKind,
    ) -> Decimal {
        match kind {
            WithholdingKind::Iss => self.iss_amount,
            WithholdingKind::Ir => self.ir_amount,
            WithholdingKind::Pis => self.pis_amount,
            WithholdingKind::Cofins => self.cofins_amount,
            WithholdingKind::Csll => self.csll_amount,
            WithholdingKind::Inss => self.inss_amount,
        }
    }

    /// Amount actually withheld for `kind`: its amount when `flags` withholds
    /// it, zero otherwise.
    pub fn withheld(
        &self,
        kind: WithholdingKind,
        flags: &WithholdingFlags,
    ) -> Decimal {
        if flags.is_set(kind) {
            self.amount(kind)
        } else {
            Decimal::ZERO
        }
    }

    /// Summary rows for every tax, in display order.
    ///
    /// ISS shows the invoice's rate; the other rates are the statutory
    /// constants.
    pub fn lines(
        &self,
        iss_rate: IssRate,
        flags: &WithholdingFlags,
    ) -> Vec<WithholdingLine> {
        WithholdingKind::ALL
            .into_iter()
            .map(|kind| WithholdingLine {
                kind,
                rate: kind
                    .fixed_rate()
                    .map_or(iss_rate.percent(), |fraction| fraction * dec!(100)),
                amount: self.amount(kind),
                withheld: flags.is_set(kind),
            })
            .collect()
    }

    /// Withheld share of the gross value, as a percentage.
    pub fn effective_rate(&self) -> Decimal {
        if self.gross_value.is_zero() {
            return Decimal::ZERO;
        }
        self.total_withheld / self.gross_value * dec!(100)
    }

    /// Copy with every field rounded to cents for display.
    ///
    /// Totals are rounded from their exact values, so `total_withheld` can
    /// differ by a cent from the sum of the rounded lines.
    pub fn rounded(&self) -> Self {
        Self {
            gross_value: round_half_up(self.gross_value),
            iss_amount: round_half_up(self.iss_amount),
            ir_amount: round_half_up(self.ir_amount),
            pis_amount: round_half_up(self.pis_amount),
            cofins_amount: round_half_up(self.cofins_amount),
            csll_amount: round_half_up(self.csll_amount),
            inss_amount: round_half_up(self.inss_amount),
            total_withheld: round_half_up(self.total_withheld),
            net_value: round_half_up(self.net_value),
        }
    }
}
