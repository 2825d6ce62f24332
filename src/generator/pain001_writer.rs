//! pain.001 (Customer Credit Transfer Initiation) generator: renders a
//! [`PaymentInitiationDocument`] into a complete `Document` element, the
//! inverse of `pain001_reader`.

use crate::documents::pain001::PaymentInitiationDocument;
use crate::entities::account::AccountIdentification;
use crate::entities::party::Party;
use crate::entities::transaction::Transaction;
use crate::error::{ParseError, Result};
use crate::generator::xml_builder::XmlBuilder;
use crate::schema::version_resolver::resolve_namespace;

fn write_party_block(builder: &mut XmlBuilder, tag: &str, party: &Party) -> Result<()> {
    builder.open(tag)?;
    if let Some(name) = party.name() {
        builder.leaf("Nm", name)?;
    }
    builder.close()?;
    Ok(())
}

fn write_account_block(builder: &mut XmlBuilder, tag: &str, account: Option<&str>) -> Result<()> {
    let Some(account) = account else { return Ok(()) };
    builder.open(tag)?;
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

fn account_of(party: &Party) -> Option<&str> {
    match party {
        Party::Customer { account, .. } => account.as_deref(),
        Party::Institution(_) => None,
    }
}

fn write_transaction(builder: &mut XmlBuilder, tx: &Transaction) -> Result<()> {
    builder.open("CdtTrfTxInf")?;
    builder.open("PmtId")?;
    if let Some(instruction_id) = &tx.payment_id.instruction_id {
        builder.leaf("InstrId", instruction_id)?;
    }
    builder.leaf("EndToEndId", &tx.payment_id.end_to_end_id)?;
    builder.leaf("UETR", &tx.payment_id.uetr)?;
    builder.close()?;

    builder.open("Amt")?;
    builder.open_with_attrs("InstdAmt", &[("Ccy", tx.amount.currency.code())])?;
    builder.text(&tx.amount.to_decimal_point_string())?;
    builder.close()?;
    builder.close()?;

    if let Some(charge_bearer) = &tx.charge_bearer {
        builder.leaf(
            "ChrgBr",
            match charge_bearer {
                crate::codes::ChargeBearer::Beneficiary => "CRED",
                crate::codes::ChargeBearer::Ours => "DEBT",
                crate::codes::ChargeBearer::Shared => "SHAR",
            },
        )?;
    }

    if let Party::Institution(institution) = &tx.creditor {
        if let Some(bic) = &institution.bic {
            builder.open("CdtrAgt")?;
            builder.open("FinInstnId")?;
            builder.leaf("BICFI", bic)?;
            builder.close()?;
            builder.close()?;
        }
    }

    write_party_block(builder, "Cdtr", &tx.creditor)?;
    write_account_block(builder, "CdtrAcct", account_of(&tx.creditor))?;

    if let Some(purpose) = &tx.purpose {
        builder.open("Purp")?;
        let code = match purpose {
            crate::codes::PurposeCode::Salary => "SALA",
            crate::codes::PurposeCode::SupplierPayment => "SUPP",
            crate::codes::PurposeCode::TaxPayment => "TAXS",
            crate::codes::PurposeCode::Trade => "TRAD",
            crate::codes::PurposeCode::Pension => "PENS",
            crate::codes::PurposeCode::Other(code) => code.as_str(),
        };
        builder.leaf("Cd", code)?;
        builder.close()?;
    }

    if let Some(remittance) = &tx.remittance_information {
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
    Ok(())
}

/// Renders `document` as a complete pain.001 `Document` element. `version`
/// selects the `pain.001.001.<vv>` schema version; `None` resolves to the
/// engine's default.
pub fn generate(document: &PaymentInitiationDocument, version: Option<&str>) -> Result<String> {
    if document.transactions.is_empty() {
        return Err(ParseError::MissingField("CdtTrfTxInf".into()));
    }
    let namespace = resolve_namespace("pain", "001", version)?;
    let mut builder = XmlBuilder::new();
    builder.write_declaration()?;
    builder.open_with_attrs("Document", &[("xmlns", &namespace)])?;
    builder.open("CstmrCdtTrfInitn")?;

    builder.open("GrpHdr")?;
    builder.leaf("MsgId", &document.group_header.message_id)?;
    builder.leaf(
        "CreDtTm",
        &document.group_header.creation_date_time.to_rfc3339(),
    )?;
    builder.leaf(
        "NbOfTxs",
        &document.group_header.number_of_transactions.to_string(),
    )?;
    if let Some(control_sum) = document.group_header.control_sum {
        builder.leaf("CtrlSum", &control_sum.to_string())?;
    }
    builder.close()?;

    builder.open("PmtInf")?;
    builder.leaf("PmtInfId", &document.payment_information_id)?;
    builder.leaf("PmtMtd", "TRF")?;
    builder.open("ReqdExctnDt")?;
    builder.leaf(
        "Dt",
        &document.requested_execution_date.format("%Y-%m-%d").to_string(),
    )?;
    builder.close()?;
    write_party_block(&mut builder, "Dbtr", &document.debtor)?;
    write_account_block(&mut builder, "DbtrAcct", account_of(&document.debtor))?;

    for tx in &document.transactions {
        write_transaction(&mut builder, tx)?;
    }

    builder.close()?;
    builder.close()?;
    builder.close()?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use crate::entities::address::PostalAddress;
    use crate::entities::group_header::GroupHeader;
    use crate::entities::institution::FinancialInstitutionIdentification;
    use crate::entities::money::Money;
    use crate::entities::payment_id::PaymentIdentification;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_document() -> PaymentInitiationDocument {
        let creation = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap().fixed_offset();
        let mut group_header = GroupHeader::new("MSG-1", creation);
        group_header.number_of_transactions = 1;
        group_header.control_sum = Some(Decimal::from_str("500.00").unwrap());

        PaymentInitiationDocument {
            group_header,
            payment_information_id: "PMT-1".into(),
            debtor: Party::Customer {
                account: Some("DE89370400440532013000".into()),
                name: Some("ACME GMBH".into()),
                address: PostalAddress::default(),
            },
            requested_execution_date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            transactions: vec![Transaction {
                payment_id: PaymentIdentification::with_uetr(
                    "E2E-1",
                    "e3b0c442-98fc-4c14-9afb-f4c8996fb924",
                )
                .unwrap(),
                amount: Money::new(Decimal::from_str("500.00").unwrap(), Currency::Eur),
                requested_execution_date: None,
                debtor: Party::Customer {
                    account: Some("DE89370400440532013000".into()),
                    name: Some("ACME GMBH".into()),
                    address: PostalAddress::default(),
                },
                creditor: Party::Institution(FinancialInstitutionIdentification::from_bic(
                    "BANKUS33",
                )),
                remittance_information: Some(crate::entities::remittance::RemittanceInformation::from_text(
                    "Invoice 101",
                )),
                purpose: None,
                charge_bearer: Some(crate::codes::ChargeBearer::Shared),
            }],
        }
    }

    #[test]
    fn generates_document_roundtrippable_by_the_reader() {
        let xml = generate(&sample_document(), None).unwrap();
        let parsed = crate::parser::pain001_reader::parse_pain001(&xml).unwrap();
        assert_eq!(parsed.group_header.message_id, "MSG-1");
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.transactions[0].amount.amount, Decimal::from_str("500.00").unwrap());
    }

    #[test]
    fn rejects_empty_transaction_list() {
        let mut document = sample_document();
        document.transactions.clear();
        assert!(generate(&document, None).is_err());
    }
}
