mod iss_rate;
mod service_invoice;
mod withholding;
mod withholding_result;

pub use iss_rate::IssRate;
pub use service_invoice::ServiceInvoiceInput;
pub use withholding::{
    COFINS_RATE, CSLL_RATE, INSS_RATE, IR_RATE, PIS_RATE, WithholdingFlags, WithholdingKind,
};
pub use withholding_result::{WithholdingLine, WithholdingResult};
