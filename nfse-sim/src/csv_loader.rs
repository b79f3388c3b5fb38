//! CSV loader for batch invoice simulations.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column        | Required | Notes |
//! |---------------|----------|-------|
//! | `id`          | yes      | Free-form invoice reference, echoed in the output |
//! | `gross_value` | yes      | `1234.56`, or quoted `"1.234,56"` |
//! | `iss_rate`    | yes      | One of `2`, `2.5`, `3`, `4`, `5` |
//! | `iss`         | no       | Withholding flag |
//! | `ir`          | no       | Withholding flag |
//! | `pis`         | no       | Withholding flag |
//! | `cofins`      | no       | Withholding flag |
//! | `csll`        | no       | Withholding flag |
//! | `inss`        | no       | Withholding flag |
//!
//! Flags accept `true`/`1`/`sim`/`s`/`yes`/`x` and `false`/`0`/`não`/`nao`/`n`/`no`;
//! an empty cell or missing column means not withheld.
//!
//! ### Example
//!
//! ```csv
//! id,gross_value,iss_rate,iss,ir,pis,cofins,csll,inss
//! NF-001,10000.00,5,x,x,x,x,x,x
//! NF-002,"1.000,00",3,sim,,,,,
//! ```

use std::path::Path;

use nfse_core::{InputError, IssRate, ServiceInvoiceInput, WithholdingFlags, WithholdingKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    gross_value: String,
    iss_rate: String,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    ir: Option<String>,
    #[serde(default)]
    pis: Option<String>,
    #[serde(default)]
    cofins: Option<String>,
    #[serde(default)]
    csll: Option<String>,
    #[serde(default)]
    inss: Option<String>,
}

impl CsvRow {
    fn flag_cell(
        &self,
        kind: WithholdingKind,
    ) -> Option<&str> {
        let cell = match kind {
            WithholdingKind::Iss => &self.iss,
            WithholdingKind::Ir => &self.ir,
            WithholdingKind::Pis => &self.pis,
            WithholdingKind::Cofins => &self.cofins,
            WithholdingKind::Csll => &self.csll,
            WithholdingKind::Inss => &self.inss,
        };
        cell.as_deref()
    }
}

/// One invoice read from the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRow {
    pub id: String,
    pub input: ServiceInvoiceInput,
}

/// Errors that can occur while loading a batch file.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Structurally invalid CSV or a missing required column.
    #[error("malformed CSV")]
    Parse(#[from] csv::Error),

    /// A value failed validation. `row` is 1-based (header = row 0).
    #[error("invalid value in row {row}")]
    Input {
        row: usize,
        #[source]
        source: InputError,
    },

    #[error("row {row}: unrecognised value '{value}' in column '{column}'")]
    InvalidFlag {
        row: usize,
        column: &'static str,
        value: String,
    },
}

fn parse_flag(cell: Option<&str>) -> Option<bool> {
    let value = cell.map(str::trim).unwrap_or_default().to_lowercase();
    match value.as_str() {
        "" | "false" | "0" | "não" | "nao" | "n" | "no" => Some(false),
        "true" | "1" | "sim" | "s" | "yes" | "y" | "x" => Some(true),
        _ => None,
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<InvoiceRow, CsvLoadError> {
    let input_error = |source| CsvLoadError::Input {
        row: row_number,
        source,
    };

    let gross_value = nfse_core::input::parse_amount(&row.gross_value).map_err(input_error)?;
    let iss_rate: IssRate = row.iss_rate.parse().map_err(input_error)?;

    let mut withholdings = WithholdingFlags::none();
    for kind in WithholdingKind::ALL {
        let cell = row.flag_cell(kind);
        let enabled = parse_flag(cell).ok_or_else(|| CsvLoadError::InvalidFlag {
            row: row_number,
            column: kind.code(),
            value: cell.unwrap_or_default().to_string(),
        })?;
        withholdings.set(kind, enabled);
    }

    Ok(InvoiceRow {
        id: row.id,
        input: ServiceInvoiceInput {
            gross_value,
            iss_rate,
            withholdings,
        },
    })
}

/// Parses CSV text and returns the invoices in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] for malformed CSV or a missing required column.
/// * [`CsvLoadError::Input`] for an invalid amount or ISS rate.
/// * [`CsvLoadError::InvalidFlag`] for an unrecognised flag value.
pub fn load_from_str(input: &str) -> Result<Vec<InvoiceRow>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<InvoiceRow>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
id,gross_value,iss_rate
NF-001,1500.00,2
";

    const FULL_CSV: &str = "\
id,gross_value,iss_rate,iss,ir,pis,cofins,csll,inss
NF-001,10000.00,5,x,x,x,x,x,x
NF-002,\"1.000,00\",3,sim,,,,,
NF-003,250.00,2.5,0,1,true,false,não,yes
";

    #[test]
    fn minimal_csv_has_no_withholdings() {
        let rows = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "NF-001");
        assert_eq!(rows[0].input.gross_value, dec!(1500.00));
        assert_eq!(rows[0].input.iss_rate, IssRate::Two);
        assert!(rows[0].input.withholdings.is_empty());
    }

    #[test]
    fn full_csv_reads_every_flag_spelling() {
        let rows = load_from_str(FULL_CSV).expect("should parse full CSV");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].input.withholdings, WithholdingFlags::all());

        assert_eq!(rows[1].input.gross_value, dec!(1000.00));
        assert_eq!(rows[1].input.iss_rate, IssRate::Three);
        assert_eq!(
            rows[1].input.withholdings,
            WithholdingFlags::none().with(WithholdingKind::Iss)
        );

        assert_eq!(rows[2].input.iss_rate, IssRate::TwoAndHalf);
        assert_eq!(
            rows[2].input.withholdings,
            WithholdingFlags {
                ir: true,
                pis: true,
                inss: true,
                ..WithholdingFlags::none()
            }
        );
    }

    #[test]
    fn rows_keep_file_order() {
        let rows = load_from_str(FULL_CSV).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids, vec!["NF-001", "NF-002", "NF-003"]);
    }

    #[test]
    fn header_only_is_empty() {
        let rows = load_from_str("id,gross_value,iss_rate\n").expect("header-only CSV is valid");
        assert!(rows.is_empty());
    }

    #[test]
    fn unsupported_iss_rate_reports_row() {
        let csv = "id,gross_value,iss_rate\nA,1.00,2\nB,1.00,6\n";

        match load_from_str(csv).unwrap_err() {
            CsvLoadError::Input { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source, InputError::UnsupportedIssRate("6".to_string()));
            }
            other => panic!("expected Input error, got {other:?}"),
        }
    }

    #[test]
    fn negative_gross_reports_row() {
        let csv = "id,gross_value,iss_rate\nA,-10.00,2\n";

        match load_from_str(csv).unwrap_err() {
            CsvLoadError::Input { row, source } => {
                assert_eq!(row, 1);
                assert_eq!(source, InputError::NegativeAmount(dec!(-10.00)));
            }
            other => panic!("expected Input error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_flag_value_names_column() {
        let csv = "id,gross_value,iss_rate,cofins\nA,1.00,2,maybe\n";

        match load_from_str(csv).unwrap_err() {
            CsvLoadError::InvalidFlag { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "cofins");
                assert_eq!(value, "maybe");
            }
            other => panic!("expected InvalidFlag, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_is_parse_error() {
        let csv = "id,iss_rate\nA,2\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let csv = "id,gross_value,iss_rate\nA,1.00\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn error_messages_do_not_repeat_their_cause() {
        use std::error::Error as _;

        let err = load_from_str("id,gross_value,iss_rate\nA,1.00,7\n").unwrap_err();

        assert_eq!(err.to_string(), "invalid value in row 1");
        let cause = err.source().expect("input error is the cause");
        assert_eq!(cause.to_string(), InputError::UnsupportedIssRate("7".to_string()).to_string());

        let parse = load_from_str("id,gross_value,iss_rate\nA,1.00\n").unwrap_err();
        assert_eq!(parse.to_string(), "malformed CSV");
        assert!(parse.source().is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_from_file(Path::new("/nonexistent/batch.csv"));
        assert!(matches!(result, Err(CsvLoadError::Io { .. })));
    }
}
