//! Subcommand implementations, kept out of `main` so they can be tested.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use nfse_core::{
    BatchSummary, IssRate, ServiceInvoiceInput, WithholdingFlags, WithholdingKind,
    compute_withholding, format::format_percent,
};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::csv_loader;
use crate::report::{self, ResultRecord};

/// What the user asked `simulate` to withhold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WithholdingChoice {
    /// Fall back to the configured defaults.
    #[default]
    Configured,
    All,
    Nothing,
    Only(Vec<WithholdingKind>),
}

impl WithholdingChoice {
    pub fn resolve(
        &self,
        config: &SimConfig,
    ) -> WithholdingFlags {
        match self {
            Self::Configured => config.default_flags(),
            Self::All => WithholdingFlags::all(),
            Self::Nothing => WithholdingFlags::none(),
            Self::Only(kinds) => kinds.iter().copied().collect(),
        }
    }
}

/// Builds the invoice input for `simulate` from raw command-line values.
pub fn simulation_input(
    gross: &str,
    iss_rate: Option<IssRate>,
    withholdings: &WithholdingChoice,
    config: &SimConfig,
) -> Result<ServiceInvoiceInput> {
    let gross_value = nfse_core::input::parse_amount(gross)
        .with_context(|| format!("Invalid gross value: {gross}"))?;

    Ok(ServiceInvoiceInput {
        gross_value,
        iss_rate: iss_rate.unwrap_or(config.default_iss_rate),
        withholdings: withholdings.resolve(config),
    })
}

/// Runs one simulation and returns the text (or JSON) to print.
pub fn simulate(
    input: &ServiceInvoiceInput,
    json: bool,
) -> Result<String> {
    debug!(
        gross_value = %input.gross_value,
        iss_rate = %input.iss_rate,
        withholdings = ?input.withholdings,
        "simulating invoice"
    );

    let result = compute_withholding(input);
    if result.net_value.is_sign_negative() && !result.net_value.is_zero() {
        warn!(net_value = %result.net_value, "withholdings exceed the gross value");
    }

    if json {
        let mut text = serde_json::to_string_pretty(&result.rounded())
            .context("Failed to serialize result")?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(report::render_simulation(input, &result))
    }
}

/// Simulates every invoice in `file`, writing result rows to `output` and
/// returning the batch totals.
pub fn batch<W: io::Write>(
    file: &Path,
    output: W,
) -> Result<BatchSummary> {
    info!("Loading invoices from: {}", file.display());

    let rows = csv_loader::load_from_file(file)
        .with_context(|| format!("Failed to load batch file: {}", file.display()))?;

    info!("Parsed {} invoices", rows.len());

    let mut summary = BatchSummary::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in &rows {
        let result = compute_withholding(&row.input);
        if result.net_value.is_sign_negative() && !result.net_value.is_zero() {
            warn!(id = %row.id, net_value = %result.net_value, "negative net value");
        }
        summary.add(&result, &row.input.withholdings);
        records.push(ResultRecord::new(&row.id, &row.input, &result));
    }

    report::write_records(output, &records).context("Failed to write results")?;

    info!(
        invoices = summary.invoices,
        total_withheld = %summary.total_withheld,
        "batch complete"
    );

    Ok(summary)
}

/// Runs [`batch`] and writes the result rows to `output`.
///
/// Rows are buffered and `output` is only created once every invoice has
/// loaded, so a bad batch leaves an existing file untouched.
pub fn batch_to_file(
    file: &Path,
    output: &Path,
) -> Result<BatchSummary> {
    let mut buffer = Vec::new();
    let summary = batch(file, &mut buffer)?;

    fs::write(output, buffer)
        .with_context(|| format!("Failed to write results: {}", output.display()))?;
    info!("Results written to: {}", output.display());

    Ok(summary)
}

/// The rate table printed by `rates`.
pub fn rates() -> String {
    let mut out = String::from("Withholding rates\n");
    for kind in WithholdingKind::ALL {
        let rate = kind.fixed_rate().map_or_else(
            || "per invoice".to_string(),
            |fraction| format_percent(fraction * rust_decimal::Decimal::ONE_HUNDRED),
        );
        out.push_str(&format!("  {:<8}{:>12}\n", kind.label(), rate));
    }

    let iss_rates: Vec<String> = IssRate::ALL
        .into_iter()
        .map(|rate| format_percent(rate.percent()))
        .collect();
    out.push_str(&format!("\nISS rates: {}\n", iss_rates.join(", ")));
    out
}
