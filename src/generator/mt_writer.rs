//! Shared helpers for the MT generators (§4.5.1): date/amount formatting,
//! the 78-character line cap, per-field continuation-line limits, and the
//! party option-letter selection rule. Each concrete generator
//! (`statement_gen`, `credit_transfer_gen`, `fi_transfer_gen`) builds tag
//! lines with these and joins them with the shared CRLF + `-}` trailer.

use chrono::NaiveDate;

use crate::entities::institution::FinancialInstitutionIdentification;
use crate::entities::money::Money;
use crate::entities::party::Party;
use crate::error::{ParseError, Result};

pub const MAX_LINE_LEN: usize = 78;

/// Per-field continuation-line ceilings named in §4.5.1.
pub fn max_continuation_lines(tag: &str) -> Option<usize> {
    match tag {
        "70" => Some(4),
        "72" => Some(6),
        "77B" => Some(3),
        "86" => Some(27),
        _ => None,
    }
}

/// `YYMMDD`, the inverse of `mt_body::parse_yymmdd`.
pub fn format_yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Renders `amount` as SWIFT comma-decimal text, e.g. `1234,56`.
pub fn format_amount(amount: &Money) -> String {
    amount.to_swift_amount()
}

/// Builds a complete `:tag:value` line, or `:tag option:value` when an
/// option letter is present, verifying no single produced line exceeds the
/// 78-character cap and that a multi-line value does not exceed the tag's
/// continuation-line ceiling.
pub fn tag_line(tag: &str, option: Option<char>, value: &str) -> Result<String> {
    let label = match option {
        Some(opt) => format!("{tag}{opt}"),
        None => tag.to_string(),
    };
    let lines: Vec<&str> = value.lines().collect();
    if let Some(max) = max_continuation_lines(tag) {
        if lines.len() > max {
            return Err(ParseError::length_violation(
                format!(":{label}:"),
                max,
                lines.len(),
            ));
        }
    }
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let rendered = if i == 0 {
            format!(":{label}:{line}")
        } else {
            line.to_string()
        };
        if rendered.len() > MAX_LINE_LEN {
            return Err(ParseError::length_violation(
                format!(":{label}: line {}", i + 1),
                MAX_LINE_LEN,
                rendered.len(),
            ));
        }
        out.push_str(&rendered);
        out.push_str("\r\n");
    }
    // drop the trailing CRLF; callers join lines themselves
    out.truncate(out.len().saturating_sub(2));
    Ok(out)
}

/// Party option-letter selection rule (§4.5.1): a party known only by BIC
/// is emitted as option `A`; anything carrying a name/address is emitted as
/// option `K` with the free-text lines the source supplied.
pub fn render_party(party: &Party) -> (char, String) {
    match party {
        Party::Institution(FinancialInstitutionIdentification { bic, .. }) => {
            let bic = bic.as_deref().unwrap_or("");
            ('A', bic.to_string())
        }
        Party::Customer { account, name, address } => {
            let mut lines = Vec::new();
            if let Some(acct) = account {
                lines.push(format!("/{acct}"));
            }
            if let Some(name) = name {
                lines.push(name.clone());
            }
            lines.extend(address.address_lines.iter().cloned());
            ('K', lines.join("\n"))
        }
    }
}

/// Assembles a complete block 4 body from already-rendered `:tag:value`
/// lines, terminating it with the mandatory bare `-` line.
pub fn assemble_block4(lines: &[String]) -> String {
    let mut body = lines.join("\r\n");
    if !body.is_empty() {
        body.push_str("\r\n");
    }
    body.push('-');
    body
}
