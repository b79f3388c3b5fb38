//! Text and CSV rendering of simulation results.

use std::fmt;
use std::io;

use nfse_core::format::{format_brl, format_percent};
use nfse_core::{BatchSummary, ServiceInvoiceInput, WithholdingKind, WithholdingResult};
use rust_decimal::Decimal;
use serde::Serialize;

/// Simulation summary for one invoice.
///
/// Every tax is listed with its rate and amount; amounts that are not
/// withheld are marked `no` and left out of the total.
pub struct SimulationReport<'a> {
    pub input: &'a ServiceInvoiceInput,
    pub result: &'a WithholdingResult,
}

impl fmt::Display for SimulationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        writeln!(f, "{:<18}{:>20}", "Gross value", format_brl(result.gross_value))?;
        writeln!(f)?;
        writeln!(f, "{:<8}{:>8}{:>20}{:>10}", "Tax", "Rate", "Amount", "Withheld")?;

        for line in result.lines(self.input.iss_rate, &self.input.withholdings) {
            writeln!(
                f,
                "{:<8}{:>8}{:>20}{:>10}",
                line.kind.label(),
                format_percent(line.rate),
                format_brl(line.amount),
                if line.withheld { "yes" } else { "no" }
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{:<18}{:>20}", "Total withheld", format_brl(result.total_withheld))?;
        writeln!(f, "{:<18}{:>20}", "Net value", format_brl(result.net_value))?;
        writeln!(
            f,
            "{:<18}{:>20}",
            "Effective rate",
            format_percent(result.effective_rate().round_dp(2))
        )
    }
}

/// Closing summary of a batch run.
pub struct BatchReport<'a>(pub &'a BatchSummary);

impl fmt::Display for BatchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;

        writeln!(f, "{:<18}{:>20}", "Invoices", summary.invoices)?;
        writeln!(f, "{:<18}{:>20}", "Gross value", format_brl(summary.gross_value))?;
        for kind in WithholdingKind::ALL {
            let amount = summary.withheld(kind);
            if !amount.is_zero() {
                writeln!(f, "{:<18}{:>20}", kind.label(), format_brl(amount))?;
            }
        }
        writeln!(f, "{:<18}{:>20}", "Total withheld", format_brl(summary.total_withheld))?;
        writeln!(f, "{:<18}{:>20}", "Net value", format_brl(summary.net_value))?;
        if summary.negative_net > 0 {
            writeln!(f, "{:<18}{:>20}", "Negative net", summary.negative_net)?;
        }
        Ok(())
    }
}

pub fn render_simulation(
    input: &ServiceInvoiceInput,
    result: &WithholdingResult,
) -> String {
    SimulationReport { input, result }.to_string()
}

pub fn render_batch_summary(summary: &BatchSummary) -> String {
    BatchReport(summary).to_string()
}

/// One line of the batch output file. Amounts are rounded to centavos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub id: String,
    pub gross_value: Decimal,
    pub iss_rate: Decimal,
    pub iss_amount: Decimal,
    pub iss_withheld: bool,
    pub ir_amount: Decimal,
    pub pis_amount: Decimal,
    pub cofins_amount: Decimal,
    pub csll_amount: Decimal,
    pub inss_amount: Decimal,
    pub total_withheld: Decimal,
    pub net_value: Decimal,
}

impl ResultRecord {
    pub fn new(
        id: &str,
        input: &ServiceInvoiceInput,
        result: &WithholdingResult,
    ) -> Self {
        let rounded = result.rounded();
        Self {
            id: id.to_string(),
            gross_value: rounded.gross_value,
            iss_rate: input.iss_rate.percent(),
            iss_amount: rounded.iss_amount,
            iss_withheld: input.withholdings.iss,
            ir_amount: rounded.ir_amount,
            pis_amount: rounded.pis_amount,
            cofins_amount: rounded.cofins_amount,
            csll_amount: rounded.csll_amount,
            inss_amount: rounded.inss_amount,
            total_withheld: rounded.total_withheld,
            net_value: rounded.net_value,
        }
    }
}

/// Writes `records` as CSV with a header row.
pub fn write_records<W: io::Write>(
    writer: W,
    records: &[ResultRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use nfse_core::{IssRate, WithholdingFlags, compute_withholding};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn full_input() -> ServiceInvoiceInput {
        ServiceInvoiceInput {
            gross_value: dec!(10000.00),
            iss_rate: IssRate::Five,
            withholdings: WithholdingFlags::all(),
        }
    }

    #[test]
    fn simulation_lists_every_tax_and_totals() {
        let input = full_input();
        let text = render_simulation(&input, &compute_withholding(&input));

        assert!(text.contains("R$ 10.000,00"));
        assert!(text.contains("INSS"));
        assert!(text.contains("R$ 1.100,00"));
        assert!(text.contains("0,65%"));
        assert!(text.contains("R$ 2.215,00"));
        assert!(text.contains("R$ 7.785,00"));
        assert!(text.contains("22,15%"));
        assert!(!text.contains(" no\n"));
    }

    #[test]
    fn simulation_marks_iss_not_withheld() {
        let input = ServiceInvoiceInput {
            withholdings: WithholdingFlags::none(),
            ..full_input()
        };
        let text = render_simulation(&input, &compute_withholding(&input));

        let iss_line = text
            .lines()
            .find(|l| l.starts_with("ISS"))
            .expect("ISS line present");
        assert!(iss_line.contains("R$ 500,00"));
        assert!(iss_line.ends_with("no"));
    }

    #[test]
    fn batch_summary_skips_kinds_never_withheld() {
        let input = ServiceInvoiceInput {
            withholdings: WithholdingFlags::none().with(WithholdingKind::Ir),
            ..full_input()
        };
        let mut summary = BatchSummary::new();
        summary.add(&compute_withholding(&input), &input.withholdings);

        let text = render_batch_summary(&summary);

        assert!(text.contains("IR"));
        assert!(text.contains("R$ 150,00"));
        assert!(!text.contains("COFINS"));
        assert!(!text.contains("Negative net"));
    }

    #[test]
    fn report_displays_inline_in_format_strings() {
        let input = full_input();
        let result = compute_withholding(&input);

        let text = format!("{}", SimulationReport { input: &input, result: &result });

        assert_eq!(text, render_simulation(&input, &result));
        assert!(text.ends_with("22,15%\n"));
    }

    #[test]
    fn record_uses_rounded_amounts() {
        let input = ServiceInvoiceInput {
            gross_value: dec!(0.50),
            iss_rate: IssRate::Two,
            withholdings: WithholdingFlags::none()
                .with(WithholdingKind::Pis)
                .with(WithholdingKind::Cofins)
                .with(WithholdingKind::Csll),
        };
        let record = ResultRecord::new("NF-9", &input, &compute_withholding(&input));

        assert_eq!(record.pis_amount, dec!(0.00));
        assert_eq!(record.cofins_amount, dec!(0.02));
        assert_eq!(record.csll_amount, dec!(0.01));
        assert_eq!(record.total_withheld, dec!(0.02));
        assert_eq!(record.net_value, dec!(0.48));
        assert!(!record.iss_withheld);
    }

    #[test]
    fn records_are_written_with_header() {
        let input = full_input();
        let record = ResultRecord::new("NF-1", &input, &compute_withholding(&input));

        let mut buffer = Vec::new();
        write_records(&mut buffer, &[record]).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "id,gross_value,iss_rate,iss_amount,iss_withheld,ir_amount,pis_amount,\
                 cofins_amount,csll_amount,inss_amount,total_withheld,net_value"
            )
        );
        assert_eq!(
            lines.next(),
            Some("NF-1,10000.00,5,500.00,true,150.00,65.00,300.00,100.00,1100.00,2215.00,7785.00")
        );
    }
}
