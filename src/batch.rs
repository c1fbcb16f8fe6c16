use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{DuesError, Result};
use crate::models::{CandidateTransaction, PURPOSE_INTRO_COURSE, PURPOSE_MEMBERSHIP};

// ---------------------------------------------------------------------------
// Batch review file
//
// `dues import` writes the assigned candidates to this CSV; the operator
// fills in blank member/month cells in any editor or spreadsheet, then
// `dues commit` reads it back. This file is the human-in-the-loop step.
// ---------------------------------------------------------------------------

const DELIMITER: u8 = b';';
const DATE_FORMAT: &str = "%Y-%m-%d";
const HEADERS: [&str; 8] = [
    "date", "details", "amount", "purpose", "member", "month", "remarks", "reference",
];

pub fn write_batch(path: &Path, batch: &[CandidateTransaction]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_batch_to(file, batch)
}

pub fn write_batch_to<W: Write>(out: W, batch: &[CandidateTransaction]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(DELIMITER).from_writer(out);
    writer.write_record(HEADERS)?;
    for tx in batch {
        writer.write_record([
            tx.date.format(DATE_FORMAT).to_string(),
            tx.details.clone(),
            format!("{:.2}", tx.amount),
            tx.purpose.clone(),
            tx.member.clone().unwrap_or_default(),
            tx.month.map(|m| m.to_string()).unwrap_or_default(),
            tx.remarks.clone(),
            tx.reference.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_batch(path: &Path) -> Result<Vec<CandidateTransaction>> {
    let file = std::fs::File::open(path)?;
    read_batch_from(file)
}

pub fn read_batch_from<R: Read>(input: R) -> Result<Vec<CandidateTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(input);

    let header_row = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        header_row
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DuesError::MissingColumn(name.to_string()))
    };
    let cols: Vec<usize> = HEADERS.iter().map(|&h| column(h)).collect::<Result<_>>()?;
    let [date, details, amount, purpose, member, month, remarks, reference] =
        [cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7]];

    let mut batch = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let bad = |reason: &str| DuesError::BadBatchRow { row, reason: reason.to_string() };

        let date = NaiveDate::parse_from_str(field(date), DATE_FORMAT)
            .map_err(|_| bad("date must be YYYY-MM-DD"))?;
        let amount: f64 = field(amount).parse().map_err(|_| bad("amount must be a number"))?;
        if amount <= 0.0 {
            return Err(bad("amount must be positive"));
        }

        let purpose = field(purpose).to_string();
        if !purpose.is_empty() && purpose != PURPOSE_MEMBERSHIP && purpose != PURPOSE_INTRO_COURSE {
            return Err(bad(&format!(
                "purpose must be {PURPOSE_MEMBERSHIP} or {PURPOSE_INTRO_COURSE}"
            )));
        }

        let month = match field(month) {
            "" => None,
            m => Some(
                m.parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(|| bad("month must be 1-12 or blank"))?,
            ),
        };

        let member = match field(member) {
            "" => None,
            name => Some(name.to_string()),
        };

        batch.push(CandidateTransaction {
            date,
            details: field(details).to_string(),
            amount,
            purpose,
            member,
            month,
            remarks: field(remarks).to_string(),
            reference: field(reference).to_string(),
        });
    }

    Ok(batch)
}
