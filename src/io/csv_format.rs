//! CSV format handling for trip records and settlement output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CSV record structures for participants and expenses
//! - Conversion from CSV records to domain types
//! - Attribution of failed rows to the trip they name
//! - Settlement output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input Columns
//!
//! - participants: `trip,id,name`
//! - expenses: `trip,id,paid_by,amount,split_type,split_details`
//!
//! `split_details` is `id:value;id:value` for CUSTOM and PERCENTAGE, and
//! `id;id` (the excluded participants) for EXCLUDE. It is ignored for EQUAL.
//! An empty `split_type` means EQUAL.

use crate::types::{
    Expense, ExpenseId, ExpenseRecord, Participant, ParticipantId, ParticipantRecord,
    SettlementError, SplitPolicy, SplitType, TripId, TripReport,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

/// A CSV row type that converts into a domain record
pub trait CsvRow: DeserializeOwned {
    /// The domain record produced by this row
    type Record;

    /// The raw trip column, before validation
    fn trip(&self) -> &str;

    /// Validate and convert the raw row
    fn convert(self) -> Result<Self::Record, SettlementError>;
}

/// CSV record structure for participant rows
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParticipantCsvRecord {
    pub trip: TripId,
    pub id: ParticipantId,
    pub name: String,
}

/// CSV record structure for expense rows
///
/// `split_type` and `split_details` are optional: an EQUAL expense needs
/// neither.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExpenseCsvRecord {
    pub trip: TripId,
    pub id: ExpenseId,
    pub paid_by: ParticipantId,
    pub amount: String,
    pub split_type: Option<String>,
    pub split_details: Option<String>,
}

impl CsvRow for ParticipantCsvRecord {
    type Record = ParticipantRecord;

    fn trip(&self) -> &str {
        &self.trip
    }

    fn convert(self) -> Result<ParticipantRecord, SettlementError> {
        convert_participant_record(self)
    }
}

impl CsvRow for ExpenseCsvRecord {
    type Record = ExpenseRecord;

    fn trip(&self) -> &str {
        &self.trip
    }

    fn convert(self) -> Result<ExpenseRecord, SettlementError> {
        convert_expense_record(self)
    }
}

/// A row that could not be read
///
/// `trip` is set whenever the row names a trip, so the failure can be charged
/// to that trip instead of being dropped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Line {line}: {error}")]
pub struct RowError {
    /// Line in the input file, counting the header as line 1
    pub line: u64,
    pub trip: Option<TripId>,
    pub error: SettlementError,
}

/// Convert a deserialized row, attributing a failure to the row's trip
pub fn convert_row<R: CsvRow>(row: R, line: u64) -> Result<R::Record, RowError> {
    let trip = row.trip().trim();
    let trip = (!trip.is_empty()).then(|| trip.to_string());

    row.convert().map_err(|error| {
        let error = match error {
            SettlementError::ParseError {
                line: None,
                message,
            } => SettlementError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        };
        RowError { line, trip, error }
    })
}

fn missing_field(field: &str, row: &str) -> SettlementError {
    SettlementError::ParseError {
        line: None,
        message: format!("{} row is missing '{}'", row, field),
    }
}

/// Convert a ParticipantCsvRecord to a ParticipantRecord
///
/// The trip, ID and name must all be non-empty.
pub fn convert_participant_record(
    csv_record: ParticipantCsvRecord,
) -> Result<ParticipantRecord, SettlementError> {
    if csv_record.trip.trim().is_empty() {
        return Err(missing_field("trip", "participant"));
    }
    if csv_record.id.trim().is_empty() {
        return Err(missing_field("id", "participant"));
    }
    if csv_record.name.trim().is_empty() {
        return Err(missing_field("name", "participant"));
    }

    Ok(ParticipantRecord {
        trip: csv_record.trip.trim().to_string(),
        participant: Participant::new(csv_record.id.trim(), csv_record.name.trim()),
    })
}

/// Convert an ExpenseCsvRecord to an ExpenseRecord
///
/// This function:
/// - Parses the amount into a Decimal and rejects negative values
/// - Parses the split type (empty means EQUAL), rejecting unknown types
/// - Parses the split details according to the split type
pub fn convert_expense_record(
    csv_record: ExpenseCsvRecord,
) -> Result<ExpenseRecord, SettlementError> {
    let id = csv_record.id.trim();
    if csv_record.trip.trim().is_empty() {
        return Err(missing_field("trip", "expense"));
    }
    if id.is_empty() {
        return Err(missing_field("id", "expense"));
    }
    if csv_record.paid_by.trim().is_empty() {
        return Err(missing_field("paid_by", "expense"));
    }

    let amount = Decimal::from_str(csv_record.amount.trim())
        .map_err(|_| SettlementError::invalid_amount(&csv_record.amount, id))?;
    if amount < Decimal::ZERO {
        return Err(SettlementError::invalid_amount(&csv_record.amount, id));
    }

    let split_type = match csv_record.split_type.as_deref().map(str::trim) {
        None | Some("") => SplitType::Equal,
        Some(raw) => raw
            .parse::<SplitType>()
            .map_err(|_| SettlementError::unsupported_split_type(raw, Some(id)))?,
    };

    let policy = parse_split_policy(split_type, csv_record.split_details.as_deref(), id)?;

    Ok(ExpenseRecord {
        trip: csv_record.trip.trim().to_string(),
        expense: Expense::new(id, csv_record.paid_by.trim(), amount, policy),
    })
}

/// Parse the `split_details` column for the given split type
///
/// # Errors
///
/// Returns `InvalidSplitDetail` if a CUSTOM or PERCENTAGE entry is not of the
/// form `id:number` or names the same participant twice.
pub fn parse_split_policy(
    split_type: SplitType,
    details: Option<&str>,
    expense: &str,
) -> Result<SplitPolicy, SettlementError> {
    let entries = details
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    match split_type {
        SplitType::Equal => Ok(SplitPolicy::Equal),
        SplitType::Custom => Ok(SplitPolicy::Custom(parse_values(entries, expense)?)),
        SplitType::Percentage => Ok(SplitPolicy::Percentage(parse_values(entries, expense)?)),
        SplitType::Exclude => Ok(SplitPolicy::Exclude(
            entries.map(str::to_string).collect(),
        )),
    }
}

fn parse_values<'a>(
    entries: impl Iterator<Item = &'a str>,
    expense: &str,
) -> Result<BTreeMap<ParticipantId, Decimal>, SettlementError> {
    let mut values = BTreeMap::new();

    for entry in entries {
        let (id, value) = entry.split_once(':').ok_or_else(|| {
            SettlementError::invalid_split_detail(entry, expense, "expected participant:value")
        })?;
        let id = id.trim();
        if id.is_empty() {
            return Err(SettlementError::invalid_split_detail(
                entry,
                expense,
                "missing participant",
            ));
        }
        let value = Decimal::from_str(value.trim()).map_err(|_| {
            SettlementError::invalid_split_detail(entry, expense, "value is not a number")
        })?;
        if values.insert(id.to_string(), value).is_some() {
            return Err(SettlementError::invalid_split_detail(
                entry,
                expense,
                "participant listed twice",
            ));
        }
    }

    Ok(values)
}

/// Write settlement transactions to CSV format
///
/// Writes one row per payment with columns: trip, from, from_name, to, to_name, amount.
/// Trips are sorted by ID for deterministic output; payments keep emission order.
///
/// # Arguments
///
/// * `reports` - Slice of trip reports to write
/// * `scale` - Number of fractional digits to print for amounts
/// * `output` - Mutable reference to a writer for outputting CSV
pub fn write_settlement_csv(
    reports: &[TripReport],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["trip", "from", "from_name", "to", "to_name", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_reports: Vec<&TripReport> = reports.iter().collect();
    sorted_reports.sort_by(|a, b| a.trip.cmp(&b.trip));

    for report in sorted_reports {
        for transaction in &report.settlement {
            writer
                .write_record(&[
                    report.trip.clone(),
                    transaction.from.clone(),
                    transaction.from_name.clone(),
                    transaction.to.clone(),
                    transaction.to_name.clone(),
                    format!("{:.*}", scale as usize, transaction.amount),
                ])
                .map_err(|e| format!("Failed to write settlement record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
