//! Totals across many simulated invoices.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{WithholdingFlags, WithholdingKind, WithholdingResult};

/// Running totals for a batch of withholding results.
///
/// Sums are taken over exact amounts, so the batch totals do not inherit
/// per-invoice display rounding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub invoices: usize,
    pub gross_value: Decimal,
    pub total_withheld: Decimal,
    pub net_value: Decimal,
    /// Withheld amount per tax. Taxes never withheld are absent.
    pub withheld_by_kind: BTreeMap<WithholdingKind, Decimal>,
    /// Invoices whose net value came out negative.
    pub negative_net: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        result: &WithholdingResult,
        flags: &WithholdingFlags,
    ) {
        self.invoices += 1;
        self.gross_value += result.gross_value;
        self.total_withheld += result.total_withheld;
        self.net_value += result.net_value;

        for kind in flags.active() {
            *self.withheld_by_kind.entry(kind).or_default() += result.withheld(kind, flags);
        }

        if result.net_value < Decimal::ZERO {
            self.negative_net += 1;
        }
    }

    pub fn withheld(
        &self,
        kind: WithholdingKind,
    ) -> Decimal {
        self.withheld_by_kind
            .get(&kind)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
