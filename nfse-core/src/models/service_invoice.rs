use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IssRate, WithholdingFlags};
use crate::input::{InputError, validate_gross_value};

/// Snapshot of the emission wizard's tax fields.
///
/// A fresh value is built on every change and handed to
/// [`compute_withholding`](crate::calculations::compute_withholding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInvoiceInput {
    /// Contracted service value.
    pub gross_value: Decimal,
    pub iss_rate: IssRate,
    #[serde(default)]
    pub withholdings: WithholdingFlags,
}

impl ServiceInvoiceInput {
    /// Builds an input after checking the gross value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NegativeAmount`] or [`InputError::AmountTooLarge`]
    /// when `gross_value` falls outside the accepted domain.
    pub fn try_new(
        gross_value: Decimal,
        iss_rate: IssRate,
        withholdings: WithholdingFlags,
    ) -> Result<Self, InputError> {
        Ok(Self {
            gross_value: validate_gross_value(gross_value)?,
            iss_rate,
            withholdings,
        })
    }
}
