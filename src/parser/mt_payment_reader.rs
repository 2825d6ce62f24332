//! Assembles MT101/103/104/200/202/202COV block 4 text into
//! [`CreditTransferDocument`]/[`FinancialInstitutionTransferDocument`]
//! values — the reading side of [`crate::generator::credit_transfer_gen`]
//! and [`crate::generator::fi_transfer_gen`].

use chrono::NaiveDate;

use crate::codes::{ChargeBearer, Currency};
use crate::documents::credit_transfer::CreditTransferDocument;
use crate::documents::fi_transfer::{CoverPaymentDetails, FinancialInstitutionTransferDocument};
use crate::entities::institution::FinancialInstitutionIdentification;
use crate::entities::money::Money;
use crate::entities::party::Party;
use crate::entities::payment_id::{PaymentIdentification, RandomBytes};
use crate::entities::remittance::RemittanceInformation;
use crate::entities::transaction::Transaction;
use crate::error::{ParseError, Result};
use crate::generator::credit_transfer_gen::CreditTransferVariant;
use crate::generator::fi_transfer_gen::FiTransferVariant;
use crate::parser::mt_body::{self, TagLine};
use std::str::FromStr;

/// Parses `:32A:` (`250512EUR39,42`, value date + currency + amount).
fn parse_field_32a(value: &str) -> Result<(NaiveDate, Money)> {
    if value.len() < 10 {
        return Err(ParseError::invalid_value("32A", "field 32A too short"));
    }
    let date = mt_body::parse_yymmdd(&value[0..6])?;
    let currency = Currency::from_str(&value[6..9])?;
    let amount = Money::parse_swift_amount(&value[9..], currency)?;
    Ok((date, amount))
}

/// Parses `:32B:` (`EUR10,00`, currency + amount, no date).
fn parse_field_32b(value: &str) -> Result<Money> {
    if value.len() < 4 {
        return Err(ParseError::invalid_value("32B", "field 32B too short"));
    }
    let currency = Currency::from_str(&value[0..3])?;
    Money::parse_swift_amount(&value[3..], currency)
}

fn parse_party(lines: &[TagLine], tag: &str) -> Result<Party> {
    let line = mt_body::require(lines, tag)?;
    Ok(mt_body::parse_party_field(line.option, &line.value))
}

fn parse_remittance(lines: &[TagLine]) -> Option<RemittanceInformation> {
    mt_body::find_first(lines, "70").map(|l| RemittanceInformation::from_text(&l.value))
}

fn parse_charge_bearer(lines: &[TagLine]) -> Option<ChargeBearer> {
    mt_body::find_first(lines, "71A").and_then(|l| ChargeBearer::parse(&l.value).ok())
}

/// Parses a single credit-transfer leg (`:21:`/`:32A|32B:`/`:50:`/`:59:`/
/// `:70:`/`:71A:`), one transaction slice of block 4.
fn parse_transaction(
    lines: &[TagLine],
    amount_tag: &str,
    random_source: &mut dyn RandomBytes,
) -> Result<Transaction> {
    let end_to_end_id = mt_body::require(lines, "21")?.value.clone();
    let payment_id = PaymentIdentification::new(end_to_end_id, random_source);

    let (requested_execution_date, amount) = if amount_tag == "32A" {
        let (date, amount) = parse_field_32a(&mt_body::require(lines, "32A")?.value)?;
        (Some(date), amount)
    } else {
        (None, parse_field_32b(&mt_body::require(lines, "32B")?.value)?)
    };

    let debtor = parse_party(lines, "50")?;
    let creditor = parse_party(lines, "59")?;

    Ok(Transaction {
        payment_id,
        amount,
        requested_execution_date,
        debtor,
        creditor,
        remittance_information: parse_remittance(lines),
        purpose: None,
        charge_bearer: parse_charge_bearer(lines),
    })
}

/// Splits block 4 tag-lines into one slice per `:21:`-prefixed transaction,
/// MT101/104 batch style (each leg starts with `:21:` and ends where the
/// next one begins).
fn split_transaction_slices(lines: &[TagLine]) -> Vec<&[TagLine]> {
    let boundaries: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.tag == "21")
        .map(|(i, _)| i)
        .collect();
    boundaries
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let end = boundaries.get(idx + 1).copied().unwrap_or(lines.len());
            &lines[start..end]
        })
        .collect()
}

/// Parses `block4` into a [`CreditTransferDocument`], dispatching on
/// `variant` for MT103's single-transaction shape vs. MT101/MT104's batch.
pub fn parse(
    block4: &str,
    variant: CreditTransferVariant,
    random_source: &mut dyn RandomBytes,
) -> Result<CreditTransferDocument> {
    let lines = mt_body::tokenize(block4)?;
    let sender_reference = mt_body::require(&lines, "20")?.value.clone();

    let transactions = match variant {
        CreditTransferVariant::Mt103 => {
            vec![parse_transaction(&lines, "32A", random_source)?]
        }
        CreditTransferVariant::Mt101 | CreditTransferVariant::Mt104 => {
            split_transaction_slices(&lines)
                .into_iter()
                .map(|slice| parse_transaction(slice, "32B", random_source))
                .collect::<Result<Vec<_>>>()?
        }
    };

    let stp_capable = variant == CreditTransferVariant::Mt103
        && transactions
            .first()
            .map(|tx| has_account(&tx.debtor) && has_account(&tx.creditor))
            .unwrap_or(false);

    Ok(CreditTransferDocument {
        sender_reference,
        transactions,
        stp_capable,
    })
}

fn has_account(party: &Party) -> bool {
    matches!(party, Party::Customer { account: Some(_), .. })
}

fn parse_institution(lines: &[TagLine], tag: &str) -> Result<FinancialInstitutionIdentification> {
    let line = mt_body::require(lines, tag)?;
    match mt_body::parse_party_field(line.option, &line.value) {
        Party::Institution(institution) => Ok(institution),
        Party::Customer { .. } => Err(ParseError::invalid_value(
            format!(":{tag}:"),
            "expected an institution (option A) party",
        )),
    }
}

fn parse_institution_opt(lines: &[TagLine], tag: &str) -> Option<FinancialInstitutionIdentification> {
    mt_body::find_first(lines, tag).and_then(|line| {
        match mt_body::parse_party_field(line.option, &line.value) {
            Party::Institution(institution) => Some(institution),
            Party::Customer { .. } => None,
        }
    })
}

/// Parses `block4` into a [`FinancialInstitutionTransferDocument`].
pub fn parse_fi_transfer(
    block4: &str,
    variant: FiTransferVariant,
    random_source: &mut dyn RandomBytes,
) -> Result<FinancialInstitutionTransferDocument> {
    let lines = mt_body::tokenize(block4)?;
    let reference = mt_body::require(&lines, "20")?.value.clone();
    let end_to_end_id = mt_body::find_first(&lines, "21")
        .map(|l| l.value.clone())
        .unwrap_or_else(|| reference.clone());
    let payment_id = PaymentIdentification::new(end_to_end_id, random_source);

    let (value_date, amount) = parse_field_32a(&mt_body::require(&lines, "32A")?.value)?;

    let ordering_institution = if variant != FiTransferVariant::Mt200 {
        parse_institution_opt(&lines, "52")
    } else {
        None
    };
    let intermediary_institution = parse_institution_opt(&lines, "56");
    let beneficiary_tag = if variant == FiTransferVariant::Mt200 { "53" } else { "57" };
    let beneficiary_institution = parse_institution(&lines, beneficiary_tag)?;

    let cover = if variant == FiTransferVariant::Mt202Cov {
        let ordering_customer = mt_body::require(&lines, "50")?.value.clone();
        let beneficiary_customer = mt_body::require(&lines, "59")?.value.clone();
        Some(CoverPaymentDetails {
            ordering_customer,
            beneficiary_customer,
        })
    } else {
        None
    };

    Ok(FinancialInstitutionTransferDocument {
        payment_id,
        value_date,
        amount,
        ordering_institution,
        beneficiary_institution,
        intermediary_institution,
        cover,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::payment_id::OsRandomBytes;

    #[test]
    fn parses_mt103_minimal_matching_s6() {
        let block4 = ":20:REF1\r\n:23B:CRED\r\n:21:REF1\r\n:32A:250512EUR39,42\r\n:50K:/000000041000045\r\n:59K:/112345679\r\n:70:TR-PGTD0N\r\n:71A:OUR\r\n";
        let mut random = OsRandomBytes;
        let document = parse(block4, CreditTransferVariant::Mt103, &mut random).unwrap();
        assert_eq!(document.transactions.len(), 1);
        let tx = &document.transactions[0];
        assert_eq!(tx.amount.to_decimal_point_string(), "39.42");
        assert_eq!(tx.requested_execution_date, NaiveDate::from_ymd_opt(2025, 5, 12));
        assert!(document.stp_capable);
    }

    #[test]
    fn round_trips_mt103_through_the_generator() {
        use crate::generator::credit_transfer_gen;
        let block4 = ":20:REF1\r\n:23B:CRED\r\n:21:REF1\r\n:32A:250512EUR39,42\r\n:50K:/000000041000045\r\n:59K:/112345679\r\n:70:TR-PGTD0N\r\n:71A:OUR\r\n";
        let mut random = OsRandomBytes;
        let document = parse(block4, CreditTransferVariant::Mt103, &mut random).unwrap();
        let rendered = credit_transfer_gen::generate(&document, CreditTransferVariant::Mt103).unwrap();
        assert!(rendered.contains(":32A:250512EUR39,42"));
        assert!(rendered.contains(":71A:OUR"));
    }

    #[test]
    fn parses_mt101_batch_of_two_legs() {
        let block4 = ":20:BATCH1\r\n:28D:1/2\r\n:21:E2E-1\r\n:32B:EUR10,00\r\n:50K:/DE1\r\nMUELLER\r\n:59K:/DE2\r\nACME\r\n:21:E2E-2\r\n:32B:EUR20,00\r\n:50K:/DE1\r\nMUELLER\r\n:59K:/DE2\r\nACME\r\n";
        let mut random = OsRandomBytes;
        let document = parse(block4, CreditTransferVariant::Mt101, &mut random).unwrap();
        assert_eq!(document.transactions.len(), 2);
        assert_eq!(document.transactions[0].amount.to_decimal_point_string(), "10.00");
        assert_eq!(document.transactions[1].amount.to_decimal_point_string(), "20.00");
    }

    #[test]
    fn parses_mt202_with_ordering_and_beneficiary() {
        let block4 = ":20:E2E-1\r\n:21:E2E-1\r\n:32A:250109USD50000,00\r\n:52A:BANKDEFF\r\n:57A:BANKUS33\r\n";
        let mut random = OsRandomBytes;
        let document = parse_fi_transfer(block4, FiTransferVariant::Mt202, &mut random).unwrap();
        assert_eq!(document.amount.to_decimal_point_string(), "50000.00");
        assert_eq!(
            document.ordering_institution.unwrap().bic.as_deref(),
            Some("BANKDEFF")
        );
        assert_eq!(document.beneficiary_institution.bic.as_deref(), Some("BANKUS33"));
        assert!(!document.is_cover_payment());
    }

    #[test]
    fn parses_mt202cov_with_underlying_customer_sequence() {
        let block4 = ":20:E2E-1\r\n:21:E2E-1\r\n:32A:250109USD50000,00\r\n:57A:BANKUS33\r\n:50:/DE89370400440532013000\r\nMUELLER GMBH\r\n:59:/US123456789\r\nACME CORP\r\n";
        let mut random = OsRandomBytes;
        let document = parse_fi_transfer(block4, FiTransferVariant::Mt202Cov, &mut random).unwrap();
        assert!(document.is_cover_payment());
        let cover = document.cover.unwrap();
        assert!(cover.ordering_customer.contains("DE89370400440532013000"));
    }
}
