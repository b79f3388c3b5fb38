//! Withholding calculation for NFS-e service invoices.
//!
//! Given a gross service value, the invoice's ISS rate and the set of taxes
//! the payer withholds, this module computes each tax and the net value the
//! issuer receives.
//!
//! # Rates
//!
//! | Tax    | Rate                  | Counts towards total when |
//! |--------|-----------------------|---------------------------|
//! | ISS    | invoice (2–5%)        | `withholdings.iss`        |
//! | IR     | 1.5%                  | `withholdings.ir`         |
//! | PIS    | 0.65%                 | `withholdings.pis`        |
//! | COFINS | 3%                    | `withholdings.cofins`     |
//! | CSLL   | 1%                    | `withholdings.csll`       |
//! | INSS   | 11%                   | `withholdings.inss`       |
//!
//! ISS is always computed because it is due either way; the other taxes are
//! zero unless withheld.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nfse_core::calculations::compute_withholding;
//! use nfse_core::{IssRate, ServiceInvoiceInput, WithholdingFlags};
//!
//! let input = ServiceInvoiceInput {
//!     gross_value: dec!(10000.00),
//!     iss_rate: IssRate::Five,
//!     withholdings: WithholdingFlags::all(),
//! };
//!
//! let result = compute_withholding(&input);
//!
//! assert_eq!(result.total_withheld, dec!(2215.00));
//! assert_eq!(result.net_value, dec!(7785.00));
//! ```

use rust_decimal::Decimal;

use crate::models::{ServiceInvoiceInput, WithholdingKind, WithholdingResult};

/// Computes every tax amount and the net value for `input`.
///
/// Pure: no I/O, no logging, and the same input always yields the same
/// result. Amounts are exact; round with
/// [`WithholdingResult::rounded`] when displaying. The net value is not
/// clamped and may be negative.
pub fn compute_withholding(input: &ServiceInvoiceInput) -> WithholdingResult {
    let gross = input.gross_value;
    let flags = &input.withholdings;

    let iss_amount = gross * input.iss_rate.fraction();
    let ir_amount = withheld_amount(gross, WithholdingKind::Ir, flags.ir);
    let pis_amount = withheld_amount(gross, WithholdingKind::Pis, flags.pis);
    let cofins_amount = withheld_amount(gross, WithholdingKind::Cofins, flags.cofins);
    let csll_amount = withheld_amount(gross, WithholdingKind::Csll, flags.csll);
    let inss_amount = withheld_amount(gross, WithholdingKind::Inss, flags.inss);

    let iss_withheld = if flags.iss { iss_amount } else { Decimal::ZERO };
    let total_withheld =
        iss_withheld + ir_amount + pis_amount + cofins_amount + csll_amount + inss_amount;

    WithholdingResult {
        gross_value: gross,
        iss_amount,
        ir_amount,
        pis_amount,
        cofins_amount,
        csll_amount,
        inss_amount,
        total_withheld,
        net_value: gross - total_withheld,
    }
}

/// `gross × rate` for a fixed-rate tax, or zero when it is not withheld.
fn withheld_amount(
    gross: Decimal,
    kind: WithholdingKind,
    enabled: bool,
) -> Decimal {
    match kind.fixed_rate() {
        Some(rate) if enabled => gross * rate,
        _ => Decimal::ZERO,
    }
}
