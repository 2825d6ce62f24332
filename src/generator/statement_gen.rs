//! MT940/941/942/950 and the DATEV MT940 variant (§4.5.1): renders a
//! [`StatementDocument`] back into block 4 tag lines.

use crate::documents::statement::StatementDocument;
use crate::entities::balance::{Balance, BalanceKind};
use crate::entities::entry::Entry;
use crate::error::{ParseError, Result};
use crate::generator::mt_writer::{assemble_block4, format_amount, format_yymmdd, tag_line};

/// Which MT statement message is being rendered. The grammar is shared;
/// only the tag selection and `:86:` packing strategy differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementVariant {
    Mt940,
    Mt941,
    Mt942,
    Mt950,
    /// Identical to `Mt940` except `:86:` preserves the GVC prefix and
    /// embedded SEPA keyword segments verbatim instead of packing them
    /// into `?20`-`?29` sub-tags.
    Mt940Datev,
}

fn balance_field_value(balance: &Balance) -> String {
    format!(
        "{}{}{}{}",
        balance.direction.as_mt_mark(),
        format_yymmdd(balance.date),
        balance.amount.currency.code(),
        format_amount(&balance.amount)
    )
}

fn balance_tag(kind: BalanceKind) -> &'static str {
    match kind {
        BalanceKind::OpeningBooked => "60F",
        BalanceKind::IntermediateOpeningBooked => "60M",
        BalanceKind::ClosingBooked => "62F",
        BalanceKind::IntermediateClosingBooked => "62M",
        BalanceKind::ClosingAvailable => "64",
        BalanceKind::ForwardAvailable => "65",
    }
}

fn render_field_61(entry: &Entry) -> String {
    let mark = if entry.is_reversal {
        match entry.direction {
            crate::codes::CreditDebit::Credit => "RC",
            crate::codes::CreditDebit::Debit => "RD",
        }
    } else {
        match entry.direction {
            crate::codes::CreditDebit::Credit => "C",
            crate::codes::CreditDebit::Debit => "D",
        }
    };
    let transaction_type = entry
        .bank_transaction_code
        .as_ref()
        .map(|c| format!("N{}", &c.sub_family_code()[..c.sub_family_code().len().min(3)]))
        .unwrap_or_else(|| "NTRF".to_string());
    let mut value = format!(
        "{}{}{}{}",
        format_yymmdd(entry.value_date),
        mark,
        format_amount(&entry.amount),
        transaction_type,
    );
    value.push_str(&entry.customer_reference);
    if let Some(bank_ref) = &entry.bank_reference {
        value.push_str("//");
        value.push_str(bank_ref);
    }
    if let Some(supp) = &entry.supplementary_details {
        value.push('\n');
        value.push_str(supp);
    }
    value
}

/// GVC code to prefix the `:86:` line with when the entry carries no
/// bank transaction classification of its own.
fn default_gvc_code(entry: &Entry) -> u16 {
    match entry.direction {
        crate::codes::CreditDebit::Credit => 166,
        crate::codes::CreditDebit::Debit => 808,
    }
}

fn render_field_86(entry: &Entry, variant: StatementVariant) -> Option<String> {
    let remittance = entry.remittance_information.as_ref()?;
    let gvc = default_gvc_code(entry);

    if remittance.structured.is_empty() {
        let text = remittance.unstructured.clone().unwrap_or_default();
        if text.is_empty() {
            return None;
        }
        return Some(format!("{gvc}?00{text}"));
    }

    match variant {
        StatementVariant::Mt940Datev => {
            let segments: Vec<String> = remittance
                .structured
                .iter()
                .map(|(k, v)| format!("{}+{}", k.tag(), v))
                .collect();
            Some(format!("{gvc}?00{}", segments.join(" ")))
        }
        _ => {
            let mut out = format!("{gvc}?00");
            for (i, (keyword, value)) in remittance.structured.iter().enumerate() {
                let subtag = 20 + i;
                if subtag > 29 {
                    break;
                }
                out.push_str(&format!("?{subtag}{}+{}", keyword.tag(), value));
            }
            Some(out)
        }
    }
}

/// Renders field 13D: `YYMMDDHHMM` local time plus `+HHMM`/`-HHMM` UTC
/// offset, the grammar MT942's date/time indicator uses.
fn format_date_time_indicator(date_time: &chrono::DateTime<chrono::FixedOffset>) -> String {
    let offset_minutes = date_time.offset().local_minus_utc() / 60;
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    format!(
        "{}{}{:02}{:02}",
        date_time.format("%y%m%d%H%M"),
        sign,
        offset_minutes.abs() / 60,
        offset_minutes.abs() % 60,
    )
}

/// Renders a complete block 4 body for `document`, per `variant`.
pub fn generate(
    document: &StatementDocument,
    variant: StatementVariant,
) -> Result<String> {
    let mut lines = Vec::new();
    lines.push(tag_line("20", None, &document.reference)?);
    lines.push(tag_line("25", None, &document.account_identification)?);
    lines.push(tag_line("28C", None, &document.statement_number)?);

    if variant == StatementVariant::Mt942 {
        if let Some(floor_limit) = &document.floor_limit {
            lines.push(tag_line(
                "34F",
                None,
                &format!("{}{}", floor_limit.currency.code(), format_amount(floor_limit)),
            )?);
        }
        if let Some(date_time) = &document.date_time_indicator {
            lines.push(tag_line("13D", None, &format_date_time_indicator(date_time))?);
        }
    }

    lines.push(tag_line(
        balance_tag(document.opening_balance.kind),
        None,
        &balance_field_value(&document.opening_balance),
    )?);

    for entry in &document.entries {
        lines.push(tag_line("61", None, &render_field_61(entry))?);
        if let Some(field_86) = render_field_86(entry, variant) {
            lines.push(tag_line("86", None, &field_86)?);
        }
    }

    lines.push(tag_line(
        balance_tag(document.closing_balance.kind),
        None,
        &balance_field_value(&document.closing_balance),
    )?);

    if let Some(available) = &document.closing_available_balance {
        lines.push(tag_line(
            balance_tag(available.kind),
            None,
            &balance_field_value(available),
        )?);
    }
    if let Some(forward) = &document.forward_available_balance {
        lines.push(tag_line(
            balance_tag(forward.kind),
            None,
            &balance_field_value(forward),
        )?);
    }

    if variant == StatementVariant::Mt942 {
        if let Some(summary) = &document.debit_summary {
            lines.push(tag_line(
                "90D",
                None,
                &summary_value(summary, &document.opening_balance)?,
            )?);
        }
        if let Some(summary) = &document.credit_summary {
            lines.push(tag_line(
                "90C",
                None,
                &summary_value(summary, &document.opening_balance)?,
            )?);
        }
    }

    Ok(assemble_block4(&lines))
}

fn summary_value(
    summary: &crate::documents::statement::EntrySummary,
    reference_balance: &Balance,
) -> Result<String> {
    if summary.total < rust_decimal::Decimal::ZERO {
        return Err(ParseError::invalid_value(
            "90D/90C",
            "summary total must not be negative; direction is carried by the tag",
        ));
    }
    let total = crate::entities::money::Money::new(summary.total, reference_balance.amount.currency.clone());
    Ok(format!(
        "{}{}{}",
        summary.count,
        total.currency.code(),
        format_amount(&total)
    ))
}
