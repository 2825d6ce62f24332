//! camt.053 (Bank to Customer Statement) generator: renders a
//! [`StatementDocument`] into a complete `Document` element using
//! [`XmlBuilder`], resolving its root namespace through
//! [`crate::schema::version_resolver`].

use crate::documents::statement::StatementDocument;
use crate::entities::account::AccountIdentification;
use crate::entities::balance::{Balance, BalanceKind};
use crate::entities::entry::Entry;
use crate::error::Result;
use crate::generator::xml_builder::XmlBuilder;
use crate::schema::version_resolver::resolve_namespace;

fn balance_code(kind: BalanceKind) -> &'static str {
    match kind {
        BalanceKind::OpeningBooked => "OPBD",
        BalanceKind::IntermediateOpeningBooked => "PRCD",
        BalanceKind::ClosingBooked => "CLBD",
        BalanceKind::IntermediateClosingBooked => "ITBD",
        BalanceKind::ClosingAvailable => "CLAV",
        BalanceKind::ForwardAvailable => "FWAV",
    }
}

fn write_balance(builder: &mut XmlBuilder, balance: &Balance) -> Result<()> {
    builder.open("Bal")?;
    builder.open("Tp")?;
    builder.open("CdOrPrtry")?;
    builder.leaf("Cd", balance_code(balance.kind))?;
    builder.close()?;
    builder.close()?;
    builder.open_with_attrs("Amt", &[("Ccy", balance.amount.currency.code())])?;
    builder.text(&balance.amount.to_decimal_point_string())?;
    builder.close()?;
    builder.leaf("CdtDbtInd", balance.direction.as_iso_str())?;
    builder.open("Dt")?;
    builder.leaf("Dt", &balance.date.format("%Y-%m-%d").to_string())?;
    builder.close()?;
    builder.close()?;
    Ok(())
}

fn write_account_identification(builder: &mut XmlBuilder, account: &str) -> Result<()> {
    builder.open("Acct")?;
    builder.open("Id")?;
    match AccountIdentification::from_raw(account) {
        AccountIdentification::Iban(iban) => builder.leaf("IBAN", &iban)?,
        AccountIdentification::Other(other) => {
            builder.open("Othr")?;
            builder.leaf("Id", &other)?;
            builder.close()?
        }
    };
    builder.close()?;
    builder.close()?;
    Ok(())
}

fn write_institution(builder: &mut XmlBuilder, tag: &str, institution: &crate::entities::institution::FinancialInstitutionIdentification) -> Result<()> {
    builder.open(tag)?;
    builder.open("FinInstnId")?;
    if let Some(bic) = &institution.bic {
        builder.leaf("BICFI", bic)?;
    }
    builder.close()?;
    builder.close()?;
    Ok(())
}

fn write_entry(builder: &mut XmlBuilder, entry: &Entry) -> Result<()> {
    builder.open("Ntry")?;
    if !entry.customer_reference.is_empty() {
        builder.leaf("NtryRef", &entry.customer_reference)?;
    }
    builder.open_with_attrs("Amt", &[("Ccy", entry.amount.currency.code())])?;
    builder.text(&entry.amount.to_decimal_point_string())?;
    builder.close()?;
    builder.leaf("CdtDbtInd", entry.direction.as_iso_str())?;
    builder.leaf("RvslInd", if entry.is_reversal { "true" } else { "false" })?;
    builder.leaf("Sts", entry.status.as_iso_str())?;
    if let Some(date) = entry.entry_date {
        builder.open("BookgDt")?;
        builder.leaf("Dt", &date.format("%Y-%m-%d").to_string())?;
        builder.close()?;
    }
    builder.open("ValDt")?;
    builder.leaf("Dt", &entry.value_date.format("%Y-%m-%d").to_string())?;
    builder.close()?;
    if let Some(code) = &entry.bank_transaction_code {
        builder.open("BkTxCd")?;
        builder.open("Domn")?;
        builder.leaf("Cd", code.domain_code())?;
        builder.open("Fmly")?;
        builder.leaf("Cd", code.family_code())?;
        builder.leaf("SubFmlyCd", code.sub_family_code())?;
        builder.close()?;
        builder.close()?;
        builder.close()?;
    }
    let has_tx_details = entry.remittance_information.is_some()
        || entry.end_to_end_id.is_some()
        || entry.instruction_id.is_some()
        || entry.mandate.is_some()
        || entry.return_reason.is_some()
        || entry.technical_input_channel.is_some()
        || entry.purpose_code.is_some()
        || entry.local_instrument.is_some()
        || entry.instructing_agent.is_some()
        || entry.instructed_agent.is_some()
        || entry.debtor_agent.is_some()
        || entry.creditor_agent.is_some();
    if has_tx_details {
        builder.open("NtryDtls")?;
        builder.open("TxDtls")?;
        if entry.end_to_end_id.is_some() || entry.instruction_id.is_some() || entry.mandate.is_some() {
            builder.open("Refs")?;
            if let Some(end_to_end_id) = &entry.end_to_end_id {
                builder.leaf("EndToEndId", end_to_end_id)?;
            }
            if let Some(instruction_id) = &entry.instruction_id {
                builder.leaf("InstrId", instruction_id)?;
            }
            if let Some(mandate) = &entry.mandate {
                builder.leaf("MndtId", &mandate.mandate_id)?;
            }
            builder.close()?;
        }
        if let Some(local_instrument) = &entry.local_instrument {
            builder.open("PmtTpInf")?;
            builder.open("LclInstrm")?;
            builder.leaf("Cd", local_instrument)?;
            builder.close()?;
            builder.close()?;
        }
        if let Some(purpose_code) = &entry.purpose_code {
            builder.open("Purp")?;
            builder.leaf("Cd", purpose_code.code())?;
            builder.close()?;
        }
        let has_agents = entry.instructing_agent.is_some()
            || entry.instructed_agent.is_some()
            || entry.debtor_agent.is_some()
            || entry.creditor_agent.is_some();
        if has_agents {
            builder.open("RltdAgts")?;
            if let Some(agent) = &entry.instructing_agent {
                write_institution(builder, "InstgAgt", agent)?;
            }
            if let Some(agent) = &entry.instructed_agent {
                write_institution(builder, "InstdAgt", agent)?;
            }
            if let Some(agent) = &entry.debtor_agent {
                write_institution(builder, "DbtrAgt", agent)?;
            }
            if let Some(agent) = &entry.creditor_agent {
                write_institution(builder, "CdtrAgt", agent)?;
            }
            builder.close()?;
        }
        if let Some(reason) = &entry.return_reason {
            builder.open("RtrInf")?;
            builder.open("Rsn")?;
            builder.leaf("Cd", reason.code())?;
            builder.close()?;
            builder.close()?;
        }
        if let Some(channel) = &entry.technical_input_channel {
            builder.leaf("AddtlTxInf", channel)?;
        }
        if let Some(remittance) = &entry.remittance_information {
            builder.open("RmtInf")?;
            if let Some(text) = &remittance.unstructured {
                builder.leaf("Ustrd", text)?;
            }
            for (keyword, value) in &remittance.structured {
                builder.leaf("Ustrd", &format!("{}+{}", keyword.tag(), value))?;
            }
            builder.close()?;
        }
        builder.close()?;
        builder.close()?;
    }
    builder.close()?;
    Ok(())
}

/// Renders `document` as a complete camt.053 `Document` element. `version`
/// selects the `camt.053.001.<vv>` schema version; `None` resolves to the
/// engine's default.
pub fn generate(document: &StatementDocument, version: Option<&str>) -> Result<String> {
    let namespace = resolve_namespace("camt", "053", version)?;
    let mut builder = XmlBuilder::new();
    builder.write_declaration()?;
    builder.open_with_attrs("Document", &[("xmlns", &namespace)])?;
    builder.open("BkToCstmrStmt")?;
    builder.open("Stmt")?;
    builder.leaf("Id", &document.reference)?;
    write_account_identification(&mut builder, &document.account_identification)?;
    write_balance(&mut builder, &document.opening_balance)?;
    write_balance(&mut builder, &document.closing_balance)?;
    if let Some(available) = &document.closing_available_balance {
        write_balance(&mut builder, available)?;
    }
    if let Some(forward) = &document.forward_available_balance {
        write_balance(&mut builder, forward)?;
    }
    for entry in &document.entries {
        write_entry(&mut builder, entry)?;
    }
    builder.close()?;
    builder.close()?;
    builder.close()?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CreditDebit, Currency};
    use crate::entities::money::Money;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_document() -> StatementDocument {
        StatementDocument {
            reference: "STMT1".into(),
            account_identification: "DE89370400440532013000".into(),
            statement_number: "1".into(),
            opening_balance: Balance {
                kind: BalanceKind::OpeningBooked,
                direction: CreditDebit::Credit,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                amount: Money::new(Decimal::from_str("1000.00").unwrap(), Currency::Eur),
            },
            closing_balance: Balance {
                kind: BalanceKind::ClosingBooked,
                direction: CreditDebit::Credit,
                date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                amount: Money::new(Decimal::from_str("1500.00").unwrap(), Currency::Eur),
            },
            closing_available_balance: None,
            forward_available_balance: None,
            debit_summary: None,
            credit_summary: None,
            entries: vec![],
            floor_limit: None,
            date_time_indicator: None,
        }
    }

    #[test]
    fn generates_document_with_resolved_namespace() {
        let xml = generate(&sample_document(), None).unwrap();
        assert!(xml.contains("urn:iso:std:iso:20022:tech:xsd:camt.053.001.08"));
        assert!(xml.contains("<IBAN>DE89370400440532013000</IBAN>"));
        assert!(xml.contains("<Cd>OPBD</Cd>"));
        assert!(xml.contains("<Cd>CLBD</Cd>"));
    }

    #[test]
    fn generates_with_explicit_version() {
        let xml = generate(&sample_document(), Some("02")).unwrap();
        assert!(xml.contains("camt.053.001.02"));
    }
}
