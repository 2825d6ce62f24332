//! Assembles MT940/941/942/950 block 4 text into a [`StatementDocument`] —
//! the reading side of [`crate::generator::statement_gen`].

use chrono::{FixedOffset, TimeZone};

use crate::codes::Currency;
use crate::documents::statement::StatementDocument;
use crate::entities::balance::BalanceKind;
use crate::entities::money::Money;
use crate::entities::remittance::RemittanceInformation;
use crate::error::{DiagnosticSink, ParseError, Result};
use crate::generator::statement_gen::StatementVariant;
use crate::parser::mt_body::{self, TagLine};
use std::str::FromStr;

fn balance_kind_for(tag: &str) -> Result<BalanceKind> {
    Ok(match tag {
        "60F" => BalanceKind::OpeningBooked,
        "60M" => BalanceKind::IntermediateOpeningBooked,
        "62F" => BalanceKind::ClosingBooked,
        "62M" => BalanceKind::IntermediateClosingBooked,
        other => {
            return Err(ParseError::UnknownType(format!(
                "'{other}' is not a recognised balance tag"
            )))
        }
    })
}

fn find_balance<'a>(lines: &'a [TagLine], tags: &[&str]) -> Result<&'a TagLine> {
    lines
        .iter()
        .find(|l| tags.contains(&l.tag.as_str()))
        .ok_or_else(|| ParseError::MissingField(format!("one of {tags:?}")))
}

/// Strips the leading GVC transaction code and `?NN` sub-tag markers off a
/// `:86:` value (`166?20EREF+ORD1?21SVWZ+Rechnung`), producing
/// whitespace-joined `KEY+value` tokens `RemittanceKeyword::decode_line`
/// understands (`EREF+ORD1 SVWZ+Rechnung`).
fn normalize_field_86(value: &str) -> String {
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let rest = &value[digits_end..];
    let mut out = String::new();
    for part in rest.split('?') {
        if part.is_empty() {
            continue;
        }
        let body = if part.len() >= 2 && part.as_bytes()[0].is_ascii_digit() && part.as_bytes()[1].is_ascii_digit()
        {
            &part[2..]
        } else {
            part
        };
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(body);
    }
    out
}

/// Parses field 34F (`EUR500,00`): a currency code followed by a SWIFT
/// decimal amount, no debit/credit mark.
fn parse_field_34f(value: &str) -> Result<Money> {
    if value.len() < 4 {
        return Err(ParseError::invalid_value("34F", "field 34F too short"));
    }
    let currency = Currency::from_str(&value[0..3])?;
    Money::parse_swift_amount(&value[3..], currency)
}

/// Parses field 13D (`2501081200+0100`): `YYMMDDHHMM` local time plus a
/// `+HHMM`/`-HHMM` UTC offset.
fn parse_field_13d(value: &str) -> Result<chrono::DateTime<FixedOffset>> {
    if value.len() != 15 {
        return Err(ParseError::invalid_value(
            "13D",
            format!("'{value}' is not a 15-character date/time indicator"),
        ));
    }
    let date = mt_body::parse_yymmdd(&value[0..6])?;
    let hour: u32 = value[6..8]
        .parse()
        .map_err(|_| ParseError::invalid_value("13D", "invalid hour"))?;
    let minute: u32 = value[8..10]
        .parse()
        .map_err(|_| ParseError::invalid_value("13D", "invalid minute"))?;
    let sign = match &value[10..11] {
        "+" => 1,
        "-" => -1,
        other => return Err(ParseError::invalid_value("13D", format!("invalid offset sign '{other}'"))),
    };
    let offset_hour: i32 = value[11..13]
        .parse()
        .map_err(|_| ParseError::invalid_value("13D", "invalid offset hour"))?;
    let offset_minute: i32 = value[13..15]
        .parse()
        .map_err(|_| ParseError::invalid_value("13D", "invalid offset minute"))?;
    let offset_seconds = sign * (offset_hour * 3600 + offset_minute * 60);
    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| ParseError::invalid_value("13D", "offset out of range"))?;
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| ParseError::invalid_value("13D", "invalid time of day"))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ParseError::invalid_value("13D", "ambiguous local time"))
}

/// Parses `block4` (already split off the five-block envelope by
/// [`crate::parser::mt_lexer`]) into a [`StatementDocument`], dispatching
/// the tag set shared by MT940/941/942/950.
pub fn parse(
    block4: &str,
    variant: StatementVariant,
    diagnostics: &mut DiagnosticSink<'_>,
) -> Result<StatementDocument> {
    let lines = mt_body::tokenize(block4)?;

    let reference = mt_body::require(&lines, "20")?.value.clone();
    let account_identification = mt_body::require(&lines, "25")?.value.clone();
    let statement_number = mt_body::require(&lines, "28C")?.value.clone();

    let opening_line = find_balance(&lines, &["60F", "60M"])?;
    let opening_balance =
        mt_body::parse_balance_line(&opening_line.value, balance_kind_for(&opening_line.tag)?)?;
    let closing_line = find_balance(&lines, &["62F", "62M"])?;
    let closing_balance =
        mt_body::parse_balance_line(&closing_line.value, balance_kind_for(&closing_line.tag)?)?;

    let statement_currency = opening_balance.amount.currency.clone();

    let mut entries = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if lines[idx].tag == "61" {
            let mut entry = mt_body::parse_field_61(&lines[idx].value, &statement_currency, diagnostics)?;
            if idx + 1 < lines.len() && lines[idx + 1].tag == "86" {
                let normalized = normalize_field_86(&lines[idx + 1].value);
                if !normalized.is_empty() {
                    entry.remittance_information = Some(RemittanceInformation::from_text(&normalized));
                }
                idx += 1;
            }
            entries.push(entry);
        }
        idx += 1;
    }

    let closing_available_balance = lines
        .iter()
        .find(|l| l.tag == "64")
        .map(|l| mt_body::parse_balance_line(&l.value, BalanceKind::ClosingAvailable))
        .transpose()?;
    let forward_available_balance = lines
        .iter()
        .find(|l| l.tag == "65")
        .map(|l| mt_body::parse_balance_line(&l.value, BalanceKind::ForwardAvailable))
        .transpose()?;

    let debit_summary = lines
        .iter()
        .find(|l| l.tag == "90D")
        .map(|l| parse_summary(&l.value))
        .transpose()?;
    let credit_summary = lines
        .iter()
        .find(|l| l.tag == "90C")
        .map(|l| parse_summary(&l.value))
        .transpose()?;

    let floor_limit = lines
        .iter()
        .find(|l| l.tag == "34F")
        .map(|l| parse_field_34f(&l.value))
        .transpose()?;
    let date_time_indicator = lines
        .iter()
        .find(|l| l.tag == "13D")
        .map(|l| parse_field_13d(&l.value))
        .transpose()?;

    let _ = variant;
    Ok(StatementDocument {
        reference,
        account_identification,
        statement_number,
        opening_balance,
        closing_balance,
        closing_available_balance,
        forward_available_balance,
        debit_summary,
        credit_summary,
        entries,
        floor_limit,
        date_time_indicator,
    })
}

fn parse_summary(value: &str) -> Result<crate::documents::statement::EntrySummary> {
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| ParseError::invalid_value("90D/90C", "missing currency/amount"))?;
    let count: u32 = value[..digits_end]
        .parse()
        .map_err(|_| ParseError::invalid_value("90D/90C", "invalid entry count"))?;
    let rest = &value[digits_end..];
    if rest.len() < 4 {
        return Err(ParseError::invalid_value("90D/90C", "missing currency"));
    }
    let currency = Currency::from_str(&rest[0..3])?;
    let total = Money::parse_swift_amount(&rest[3..], currency)?;
    Ok(crate::documents::statement::EntrySummary {
        count,
        total: total.amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const S1: &str = ":20:STARTUMS\r\n:25:12345678/9876543210\r\n:28C:1/1\r\n:60F:C250108EUR1000,00\r\n:61:2501080108CR39,42NTRFNONREF//BREF1\r\n:86:166?20EREF+ORD1?21SVWZ+Rechnung\r\n:62F:C250108EUR1039,42\r\n";

    #[test]
    fn parses_mt940_single_transaction_matching_s1() {
        let mut sink: DiagnosticSink = None;
        let document = parse(S1, StatementVariant::Mt940, &mut sink).unwrap();
        assert_eq!(document.entries.len(), 1);
        let entry = &document.entries[0];
        assert_eq!(entry.direction, crate::codes::CreditDebit::Credit);
        assert_eq!(entry.value_date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        assert_eq!(entry.entry_date, Some(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
        assert_eq!(entry.amount.to_decimal_point_string(), "39.42");
        assert_eq!(entry.customer_reference, "NONREF");
        assert_eq!(entry.bank_reference.as_deref(), Some("BREF1"));
        let remittance = entry.remittance_information.as_ref().unwrap();
        assert_eq!(
            remittance.structured.get(&crate::codes::RemittanceKeyword::Eref).unwrap(),
            "ORD1"
        );
        assert_eq!(
            remittance.structured.get(&crate::codes::RemittanceKeyword::Svwz).unwrap(),
            "Rechnung"
        );
        assert!(document.is_balance_reconciled());
    }

    #[test]
    fn parses_mt942_floor_limit_and_date_time_indicator_matching_s2() {
        let block4 = format!(
            "{}{}{}",
            ":20:STMT\r\n:25:123\r\n:28C:1/1\r\n:34F:EUR500,00\r\n:13D:2501081200+0100\r\n",
            ":60F:C250108EUR1000,00\r\n",
            ":62F:C250108EUR1000,00\r\n"
        );
        let mut sink: DiagnosticSink = None;
        let document = parse(&block4, StatementVariant::Mt942, &mut sink).unwrap();
        assert_eq!(document.floor_limit.unwrap().to_decimal_point_string(), "500.00");
        let date_time = document.date_time_indicator.unwrap();
        assert_eq!(date_time.to_rfc3339(), "2025-01-08T12:00:00+01:00");
    }

    #[test]
    fn round_trips_through_the_generator() {
        let mut sink: DiagnosticSink = None;
        let document = parse(S1, StatementVariant::Mt940, &mut sink).unwrap();
        let rendered = crate::generator::statement_gen::generate(&document, StatementVariant::Mt940).unwrap();
        let mut sink2: DiagnosticSink = None;
        let reparsed = parse(&rendered, StatementVariant::Mt940, &mut sink2).unwrap();
        assert_eq!(reparsed.entries.len(), document.entries.len());
        assert_eq!(reparsed.closing_balance, document.closing_balance);
    }
}
