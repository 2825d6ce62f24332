//! DATEV V700 Buchungsstapel CSV reader.
//!
//! The format carries two header rows ahead of the data: a positional
//! meta-header (Beraternummer, Mandantennummer, WJ-Beginn, Sachkontenlänge,
//! …, decoded by ordinal against a fixed definition table) and a
//! field-header row that names the data columns. Column lookup for a data
//! row goes through the field-header row rather than a hardcoded index, so
//! `getFieldIndex(FieldKey)` resolves to whatever ordinal the field-header
//! row actually places that column at.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};

use crate::codes::Currency;
use crate::documents::datev::{DatevBookingBatch, DatevBookingRow};
use crate::entities::money::Money;
use crate::error::{ParseError, Result};

/// CSV framing options (§4.4.4): delimiter and enclosure are both
/// configurable, defaulting to the DATEV standard `;` and `"`.
#[derive(Debug, Clone, Copy)]
pub struct DatevCsvConfig {
    pub delimiter: u8,
    pub enclosure: u8,
}

impl Default for DatevCsvConfig {
    fn default() -> Self {
        DatevCsvConfig {
            delimiter: b';',
            enclosure: b'"',
        }
    }
}

/// Ordinal positions of the meta-header fields this engine round-trips.
/// The real V700 meta-header carries more columns than this; only the ones
/// needed to populate [`DatevBookingBatch`] are resolved.
mod meta_field {
    pub const GENERATED_AT: usize = 5;
    pub const CONSULTANT_NUMBER: usize = 10;
    pub const CLIENT_NUMBER: usize = 11;
    pub const FISCAL_YEAR_START: usize = 12;
    pub const ACCOUNT_LENGTH: usize = 13;
}

const COL_AMOUNT: &str = "Umsatz (ohne Soll/Haben-Kz)";
const COL_DEBIT_CREDIT: &str = "Soll/Haben-Kennzeichen";
const COL_ACCOUNT: &str = "Konto";
const COL_CONTRA_ACCOUNT: &str = "Gegenkonto (ohne BU-Schlüssel)";
const COL_BOOKING_KEY: &str = "BU-Schlüssel";
const COL_BOOKING_DATE: &str = "Belegdatum";
const COL_BELEGFELD_1: &str = "Belegfeld 1";
const COL_BELEGFELD_2: &str = "Belegfeld 2";
const COL_POSTING_TEXT: &str = "Buchungstext";

fn reader_for(config: &DatevCsvConfig, content: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(config.delimiter)
        .quote(config.enclosure)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn field_at<'a>(record: &'a StringRecord, ordinal: usize) -> Result<&'a str> {
    record
        .get(ordinal)
        .ok_or_else(|| ParseError::MissingField(format!("meta-header field #{ordinal}")))
}

/// The key the field-header row is resolved against; its value is the
/// ordinal position the named column actually occupies in a given file.
fn get_field_index(headers: &StringRecord, key: &str) -> Option<usize> {
    headers.iter().position(|h| h == key)
}

fn optional_field<'a>(record: &'a StringRecord, headers: &StringRecord, key: &str) -> Option<&'a str> {
    let idx = get_field_index(headers, key)?;
    record.get(idx).filter(|s| !s.is_empty())
}

fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, key: &str) -> Result<&'a str> {
    optional_field(record, headers, key).ok_or_else(|| ParseError::MissingField(key.to_string()))
}

/// `Belegdatum` carries only day and month (`TTMM`); the year is derived
/// from the batch's fiscal year start, rolling forward a year once the
/// booking's month precedes the fiscal year's start month.
fn parse_beleg_datum(ddmm: &str, fiscal_year_start: NaiveDate) -> Result<NaiveDate> {
    if ddmm.len() != 4 || !ddmm.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::invalid_value(
            "Belegdatum",
            format!("'{ddmm}' is not a 4-digit TTMM date"),
        ));
    }
    let day: u32 = ddmm[0..2].parse().unwrap();
    let month: u32 = ddmm[2..4].parse().unwrap();
    let fy_month = fiscal_year_start.month_num();
    let year = if month >= fy_month {
        fiscal_year_start.year_num()
    } else {
        fiscal_year_start.year_num() + 1
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::invalid_value("Belegdatum", format!("'{ddmm}' is not a valid date")))
}

/// Small shims so this module doesn't need to pull in `chrono::Datelike`
/// just for two accessors.
trait DateParts {
    fn month_num(&self) -> u32;
    fn year_num(&self) -> i32;
}

impl DateParts for NaiveDate {
    fn month_num(&self) -> u32 {
        use chrono::Datelike;
        self.month()
    }
    fn year_num(&self) -> i32 {
        use chrono::Datelike;
        self.year()
    }
}

fn parse_row(
    record: &StringRecord,
    headers: &StringRecord,
    fiscal_year_start: NaiveDate,
) -> Result<DatevBookingRow> {
    let amount_raw = required_field(record, headers, COL_AMOUNT)?;
    let amount = Money::parse_swift_amount(amount_raw, Currency::Eur)?;

    let debit_credit = required_field(record, headers, COL_DEBIT_CREDIT)?;
    let is_debit = match debit_credit {
        "S" => true,
        "H" => false,
        other => {
            return Err(ParseError::invalid_value(
                COL_DEBIT_CREDIT,
                format!("'{other}' is neither S nor H"),
            ))
        }
    };

    let account = required_field(record, headers, COL_ACCOUNT)?.to_string();
    let contra_account = required_field(record, headers, COL_CONTRA_ACCOUNT)?.to_string();
    let booking_key = optional_field(record, headers, COL_BOOKING_KEY).map(str::to_string);
    let booking_date_raw = required_field(record, headers, COL_BOOKING_DATE)?;
    let booking_date = parse_beleg_datum(booking_date_raw, fiscal_year_start)?;
    let document_field_1 = optional_field(record, headers, COL_BELEGFELD_1).map(str::to_string);
    let document_field_2 = optional_field(record, headers, COL_BELEGFELD_2).map(str::to_string);
    let posting_text = optional_field(record, headers, COL_POSTING_TEXT).map(str::to_string);

    Ok(DatevBookingRow {
        amount,
        is_debit,
        account,
        contra_account,
        booking_key,
        booking_date,
        document_field_1,
        document_field_2,
        posting_text,
    })
}

/// Parses a complete DATEV V700 CSV export (meta-header, field-header, data
/// rows) into a [`DatevBookingBatch`].
pub fn parse_datev(content: &str, config: &DatevCsvConfig) -> Result<DatevBookingBatch> {
    let mut lines = content.lines();
    let meta_line = lines
        .next()
        .ok_or_else(|| ParseError::MissingField("meta-header row".into()))?;
    let field_header_line = lines
        .next()
        .ok_or_else(|| ParseError::MissingField("field-header row".into()))?;

    let mut meta_reader = reader_for(config, meta_line);
    let meta_record = meta_reader
        .records()
        .next()
        .ok_or_else(|| ParseError::MissingField("meta-header row".into()))?
        .map_err(|e| ParseError::Lex(format!("meta-header row: {e}")))?;

    let generated_at_raw = field_at(&meta_record, meta_field::GENERATED_AT)?;
    let generated_at = NaiveDateTime::parse_from_str(generated_at_raw, "%Y%m%d%H%M%S000")
        .map_err(|e| ParseError::invalid_value("meta-header timestamp", e.to_string()))?;
    let consultant_number = field_at(&meta_record, meta_field::CONSULTANT_NUMBER)?.to_string();
    let client_number = field_at(&meta_record, meta_field::CLIENT_NUMBER)?.to_string();
    let fiscal_year_raw = field_at(&meta_record, meta_field::FISCAL_YEAR_START)?;
    let fiscal_year_start = NaiveDate::parse_from_str(fiscal_year_raw, "%Y%m%d")
        .map_err(|e| ParseError::invalid_value("WJ-Beginn", e.to_string()))?;
    let account_length: u8 = field_at(&meta_record, meta_field::ACCOUNT_LENGTH)?
        .parse()
        .map_err(|_| ParseError::invalid_value("Sachkontenlänge", "not a valid integer"))?;

    let mut header_reader = reader_for(config, field_header_line);
    let headers = header_reader
        .records()
        .next()
        .ok_or_else(|| ParseError::MissingField("field-header row".into()))?
        .map_err(|e| ParseError::Lex(format!("field-header row: {e}")))?;

    let data_section: String = lines.collect::<Vec<_>>().join("\n");
    let mut data_reader = reader_for(config, &data_section);

    let mut rows = Vec::new();
    for result in data_reader.records() {
        let record = result.map_err(|e| ParseError::Lex(format!("data row: {e}")))?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows.push(parse_row(&record, &headers, fiscal_year_start)?);
    }

    Ok(DatevBookingBatch {
        consultant_number,
        client_number,
        fiscal_year_start,
        account_length,
        generated_at,
        rows,
    })
}
