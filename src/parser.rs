use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{DuesError, Result};
use crate::models::{CandidateTransaction, PURPOSE_MEMBERSHIP};

// ---------------------------------------------------------------------------
// ZKB account statement schema
// ---------------------------------------------------------------------------

// Fixed deployment constants: the bank export schema is not auto-detected.
const DELIMITER: u8 = b';';
const DATE_FORMAT: &str = "%d.%m.%Y";

const COL_DATE: &str = "Datum";
const COL_DETAILS: &str = "Details";
const COL_CREDIT: &str = "Gutschrift CHF";
const COL_PURPOSE: &str = "Zahlungszweck";
const COL_REFERENCE: &str = "ZKB-Referenz";

/// Header names as exported sometimes carry stray quotes or padding.
fn clean_header(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

struct Columns {
    date: usize,
    details: usize,
    credit: usize,
    purpose: usize,
    reference: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let cleaned: Vec<String> = headers.iter().map(clean_header).collect();
        let find = |name: &str| -> Result<usize> {
            cleaned
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DuesError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            date: find(COL_DATE)?,
            details: find(COL_DETAILS)?,
            credit: find(COL_CREDIT)?,
            purpose: find(COL_PURPOSE)?,
            reference: find(COL_REFERENCE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Statement parsing
// ---------------------------------------------------------------------------

/// Parse a ZKB statement export into candidate transactions.
///
/// Only credit rows survive: debits and fees have an empty credit column and
/// are dropped silently. Rows with an unparseable or non-positive amount, or
/// an unparseable date, are dropped as well. Output order follows input
/// order.
pub fn parse_statement(path: &Path) -> Result<Vec<CandidateTransaction>> {
    let file = std::fs::File::open(path)?;
    parse_reader(file)
}

pub fn parse_reader<R: Read>(input: R) -> Result<Vec<CandidateTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(input);

    let columns = Columns::locate(reader.headers()?)?;

    let mut credit_rows = 0usize;
    let mut candidates = Vec::new();

    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let credit = field(columns.credit);
        if credit.is_empty() {
            // Debit or fee row; out of scope for membership reconciliation.
            continue;
        }
        credit_rows += 1;

        let amount: f64 = match credit.parse() {
            Ok(v) if v > 0.0 => v,
            _ => continue,
        };

        let date = match NaiveDate::parse_from_str(field(columns.date), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => continue,
        };

        candidates.push(CandidateTransaction {
            date,
            details: field(columns.details).to_string(),
            amount,
            purpose: PURPOSE_MEMBERSHIP.to_string(),
            member: None,
            month: None,
            // The bank's own purpose text is unreliable for routing; keep it
            // visible as a remark only.
            remarks: field(columns.purpose).to_string(),
            reference: field(columns.reference).to_string(),
        });
    }

    if credit_rows == 0 {
        return Err(DuesError::NoCreditTransactions);
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Datum;Buchungstext;Gutschrift CHF;Zahlungszweck;Details;ZKB-Referenz\n";

    fn parse(rows: &str) -> Result<Vec<CandidateTransaction>> {
        parse_reader(format!("{HEADER}{rows}").as_bytes())
    }

    #[test]
    fn test_parses_credit_rows() {
        let txs = parse(
            "29.08.2025;Gutschrift;50.00;Monthly fee;Jane Doe, Zurich;SL250829A\n\
             25.08.2025;Gutschrift;25.00;;John Roe, Basel;SL250825B\n",
        )
        .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, 50.0);
        assert_eq!(txs[0].details, "Jane Doe, Zurich");
        assert_eq!(txs[0].purpose, PURPOSE_MEMBERSHIP);
        assert_eq!(txs[0].remarks, "Monthly fee");
        assert_eq!(txs[0].reference, "SL250829A");
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 8, 29).unwrap());
    }

    #[test]
    fn test_drops_debit_rows_silently() {
        let txs = parse(
            "29.08.2025;Gutschrift;50.00;;Jane Doe;R1\n\
             30.08.2025;Belastung;;;Rent payment;R2\n",
        )
        .unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn test_drops_non_positive_and_unparseable_amounts() {
        let txs = parse(
            "29.08.2025;x;50.00;;Jane Doe;R1\n\
             29.08.2025;x;0.00;;Zero Row;R2\n\
             29.08.2025;x;-5.00;;Negative Row;R3\n\
             29.08.2025;x;abc;;Garbage Row;R4\n",
        )
        .unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].details, "Jane Doe");
    }

    #[test]
    fn test_drops_unparseable_dates() {
        let txs = parse(
            "2025-08-29;x;50.00;;Wrong format;R1\n\
             29.08.2025;x;50.00;;Good row;R2\n",
        )
        .unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].details, "Good row");
    }

    #[test]
    fn test_no_credit_transactions_is_an_error() {
        let err = parse("30.08.2025;Belastung;;;Rent payment;R2\n").unwrap_err();
        assert!(matches!(err, DuesError::NoCreditTransactions));
    }

    #[test]
    fn test_output_order_is_stable() {
        let txs = parse(
            "03.01.2025;x;50.00;;First;R1\n\
             01.01.2025;x;50.00;;Second;R2\n\
             02.01.2025;x;50.00;;Third;R3\n",
        )
        .unwrap();
        let details: Vec<&str> = txs.iter().map(|t| t.details.as_str()).collect();
        assert_eq!(details, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_headers_cleaned_of_quotes_and_padding() {
        let input = "\"Datum\"; Details ;\"Gutschrift CHF\";Zahlungszweck;ZKB-Referenz\n\
                     29.08.2025;Jane Doe;50.00;;R1\n";
        let txs = parse_reader(input.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].details, "Jane Doe");
    }

    #[test]
    fn test_missing_column_reported() {
        let input = "Datum;Details;Zahlungszweck;ZKB-Referenz\n29.08.2025;x;;R1\n";
        let err = parse_reader(input.as_bytes()).unwrap_err();
        match err {
            DuesError::MissingColumn(col) => assert_eq!(col, "Gutschrift CHF"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
