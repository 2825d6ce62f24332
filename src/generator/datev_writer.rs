//! DATEV V700 Buchungsstapel CSV writer: emits the meta-header row, the
//! field-header row, and one data row per [`DatevBookingRow`], matching the
//! column layout `datev_reader` resolves by name. Internally the row text is
//! built as UTF-8 and transcoded to Windows-1252 only at the final byte
//! boundary, substituting `?` for any character the target encoding cannot
//! represent, since DATEV's import tooling expects Windows-1252 bytes on
//! disk rather than UTF-8.

use chrono::NaiveDate;

use crate::documents::datev::{DatevBookingBatch, DatevBookingRow};
use crate::entities::money::Money;
use crate::error::Result;
use crate::generator::mt_writer::format_amount;

const FIELD_HEADERS: [&str; 14] = [
    "Umsatz (ohne Soll/Haben-Kz)",
    "Soll/Haben-Kennzeichen",
    "WKZ Umsatz",
    "Kurs",
    "Basisumsatz",
    "WKZ Basisumsatz",
    "Konto",
    "Gegenkonto (ohne BU-Schlüssel)",
    "BU-Schlüssel",
    "Belegdatum",
    "Belegfeld 1",
    "Belegfeld 2",
    "Skonto",
    "Buchungstext",
];

fn quote(field: &str) -> String {
    format!("\"{field}\"")
}

fn render_meta_header(batch: &DatevBookingBatch) -> String {
    let now = batch.generated_at.format("%Y%m%d%H%M%S000");
    let fiscal_year = batch.fiscal_year_start.format("%Y%m%d");
    let account_length = batch.account_length;
    format!(
        "\"EXTF\";700;21;\"Buchungsstapel\";13;{now};;\"\";\"\";\"\";{};{};{fiscal_year};{account_length};{fiscal_year};{fiscal_year};\"\";\"\";1;0;\"EUR\";;\"\";;",
        batch.consultant_number, batch.client_number,
    )
}

fn render_field_header() -> String {
    FIELD_HEADERS.join(";")
}

fn render_data_row(row: &DatevBookingRow) -> String {
    let mark = if row.is_debit { "S" } else { "H" };
    let money = Money::new(row.amount.amount.abs(), row.amount.currency.clone());
    let fields = [
        format_amount(&money),
        quote(mark),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        row.account.clone(),
        row.contra_account.clone(),
        row.booking_key.clone().unwrap_or_default(),
        row.booking_date.format("%d%m").to_string(),
        row.document_field_1.as_deref().map(quote).unwrap_or_default(),
        row.document_field_2.as_deref().map(quote).unwrap_or_default(),
        String::new(),
        row.posting_text.as_deref().map(quote).unwrap_or_default(),
    ];
    fields.join(";")
}

/// Renders `batch` as UTF-8 DATEV CSV text (meta-header, field-header, data
/// rows), CRLF-terminated. Use [`generate_bytes`] for the Windows-1252
/// on-disk form.
pub fn generate(batch: &DatevBookingBatch) -> Result<String> {
    let mut out = String::new();
    out.push_str(&render_meta_header(batch));
    out.push_str("\r\n");
    out.push_str(&render_field_header());
    out.push_str("\r\n");
    for row in &batch.rows {
        out.push_str(&render_data_row(row));
        out.push_str("\r\n");
    }
    Ok(out)
}

/// Transcodes a single character to Windows-1252, substituting `?` when the
/// character is not representable.
fn push_windows_1252_char(out: &mut Vec<u8>, ch: char) {
    let mut buf = [0u8; 4];
    let encoded = ch.encode_utf8(&mut buf);
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(encoded);
    if had_errors {
        out.push(b'?');
    } else {
        out.extend_from_slice(&bytes);
    }
}

/// Renders `batch` and transcodes it to Windows-1252 bytes, the form DATEV
/// import tooling expects on disk.
pub fn generate_bytes(batch: &DatevBookingBatch) -> Result<Vec<u8>> {
    let text = generate(batch)?;
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        push_windows_1252_char(&mut out, ch);
    }
    Ok(out)
}
