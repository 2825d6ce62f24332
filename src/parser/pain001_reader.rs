//! pain.001 (Customer Credit Transfer Initiation) reader.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::codes::pain_type::extract_root_namespace;
use crate::codes::{ChargeBearer, Currency, PainType, PurposeCode};
use crate::documents::pain001::PaymentInitiationDocument;
use crate::entities::address::PostalAddress;
use crate::entities::group_header::GroupHeader;
use crate::entities::money::Money;
use crate::entities::party::Party;
use crate::entities::payment_id::PaymentIdentification;
use crate::entities::remittance::RemittanceInformation;
use crate::entities::transaction::Transaction;
use crate::error::{ParseError, Result};

use super::xml_reader::{self, StartElement, XmlElementHandler};

#[derive(Default)]
struct TxScratch {
    instruction_id: Option<String>,
    end_to_end_id: Option<String>,
    uetr: Option<String>,
    amount: Option<String>,
    currency: Option<String>,
    creditor_bic: Option<String>,
    creditor_name: Option<String>,
    creditor_iban: Option<String>,
    remittance: Option<String>,
    purpose: Option<String>,
    charge_bearer: Option<String>,
}

impl TxScratch {
    fn into_transaction(self, debtor: Party) -> Result<Transaction> {
        let end_to_end_id = self
            .end_to_end_id
            .ok_or_else(|| ParseError::MissingField("PmtId/EndToEndId".into()))?;
        let payment_id = match self.uetr {
            Some(uetr) => {
                let mut pid = PaymentIdentification::with_uetr(end_to_end_id, uetr)?;
                pid.instruction_id = self.instruction_id;
                pid
            }
            None => PaymentIdentification::new(end_to_end_id, &mut crate::entities::payment_id::OsRandomBytes),
        };
        let amount_text = self
            .amount
            .ok_or_else(|| ParseError::MissingField("Amt/InstdAmt".into()))?;
        let currency_code = self
            .currency
            .ok_or_else(|| ParseError::MissingField("Amt/InstdAmt/@Ccy".into()))?;
        let currency = Currency::from_str(&currency_code)?;
        let amount = Money::parse_decimal_point_amount(&amount_text, currency)?;

        let creditor = Party::Customer {
            account: self.creditor_iban,
            name: self.creditor_name,
            address: PostalAddress::from_lines(Vec::new()),
        };
        let _ = self.creditor_bic;

        let remittance_information = self.remittance.map(|text| RemittanceInformation::from_text(&text));
        let purpose = self.purpose.map(|code| match code.as_str() {
            "SALA" => PurposeCode::Salary,
            "SUPP" => PurposeCode::SupplierPayment,
            "TAXS" => PurposeCode::TaxPayment,
            "TRAD" => PurposeCode::Trade,
            "PENS" => PurposeCode::Pension,
            other => PurposeCode::Other(other.to_string()),
        });
        let charge_bearer = self.charge_bearer.map(|code| match code.as_str() {
            "DEBT" | "OUR" => ChargeBearer::Ours,
            "CRED" | "BEN" => ChargeBearer::Beneficiary,
            _ => ChargeBearer::Shared,
        });

        Ok(Transaction {
            payment_id,
            amount,
            requested_execution_date: None,
            debtor,
            creditor,
            remittance_information,
            purpose,
            charge_bearer,
        })
    }
}

#[derive(Default)]
struct PaymentInitiationHandler {
    message_id: Option<String>,
    creation_date_time: Option<String>,
    number_of_transactions: Option<u32>,
    control_sum: Option<String>,
    payment_information_id: Option<String>,
    requested_execution_date: Option<String>,
    debtor_name: Option<String>,
    debtor_iban: Option<String>,
    transactions: Vec<Transaction>,
    tx_scratch: Option<TxScratch>,
}

impl PaymentInitiationHandler {
    fn debtor(&self) -> Party {
        Party::Customer {
            account: self.debtor_iban.clone(),
            name: self.debtor_name.clone(),
            address: PostalAddress::from_lines(Vec::new()),
        }
    }

    fn finish_tx(&mut self) {
        if let Some(scratch) = self.tx_scratch.take() {
            if let Ok(tx) = scratch.into_transaction(self.debtor()) {
                self.transactions.push(tx);
            }
        }
    }

    fn into_document(self) -> Result<PaymentInitiationDocument> {
        let message_id = self
            .message_id
            .ok_or_else(|| ParseError::MissingField("GrpHdr/MsgId".into()))?;
        let creation_raw = self
            .creation_date_time
            .ok_or_else(|| ParseError::MissingField("GrpHdr/CreDtTm".into()))?;
        let creation_date_time = parse_iso_datetime(&creation_raw)?;
        let mut group_header = GroupHeader::new(message_id, creation_date_time);
        group_header.number_of_transactions = self.number_of_transactions.unwrap_or(0);
        if let Some(sum) = self.control_sum {
            group_header.control_sum = Decimal::from_str(&sum).ok();
        }

        let requested_execution_date = self
            .requested_execution_date
            .as_deref()
            .map(parse_iso_date)
            .transpose()?
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());

        Ok(PaymentInitiationDocument {
            group_header,
            payment_information_id: self.payment_information_id.unwrap_or_default(),
            debtor: self.debtor(),
            requested_execution_date,
            transactions: self.transactions,
        })
    }
}

impl XmlElementHandler for PaymentInitiationHandler {
    fn handle_start(&mut self, _path: &[String], element: &StartElement<'_>) -> Result<()> {
        match element.name {
            "CdtTrfTxInf" => self.tx_scratch = Some(TxScratch::default()),
            "InstdAmt" => {
                if let Some(ccy) = element.attributes.iter().find(|(k, _)| k == "Ccy") {
                    if let Some(tx) = self.tx_scratch.as_mut() {
                        tx.currency = Some(ccy.1.clone());
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, path: &[String]) -> Result<()> {
        if path.last().map(String::as_str) == Some("CdtTrfTxInf") {
            self.finish_tx();
        }
        Ok(())
    }

    fn handle_text(&mut self, path: &[String], text: &str) -> Result<()> {
        let in_tx = path.iter().any(|p| p == "CdtTrfTxInf");
        if xml_reader::path_ends_with(path, &["GrpHdr", "MsgId"]) {
            self.message_id = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["GrpHdr", "CreDtTm"]) {
            self.creation_date_time = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["GrpHdr", "NbOfTxs"]) {
            self.number_of_transactions = text.parse().ok();
        } else if xml_reader::path_ends_with(path, &["GrpHdr", "CtrlSum"]) {
            self.control_sum = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["PmtInf", "PmtInfId"]) {
            self.payment_information_id = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["ReqdExctnDt", "Dt"]) && !in_tx {
            self.requested_execution_date = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["PmtInf", "Dbtr", "Nm"]) {
            self.debtor_name = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["PmtInf", "DbtrAcct", "Id", "IBAN"]) {
            self.debtor_iban = Some(text.to_string());
        } else if in_tx {
            if let Some(tx) = self.tx_scratch.as_mut() {
                if xml_reader::path_ends_with(path, &["PmtId", "InstrId"]) {
                    tx.instruction_id = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["PmtId", "EndToEndId"]) {
                    tx.end_to_end_id = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["PmtId", "UETR"]) {
                    tx.uetr = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["Amt", "InstdAmt"]) {
                    tx.amount = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["CdtrAgt", "FinInstnId", "BICFI"]) {
                    tx.creditor_bic = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["Cdtr", "Nm"]) {
                    tx.creditor_name = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["CdtrAcct", "Id", "IBAN"]) {
                    tx.creditor_iban = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["RmtInf", "Ustrd"]) {
                    tx.remittance = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["Purp", "Cd"]) {
                    tx.purpose = Some(text.to_string());
                } else if path.last().map(String::as_str) == Some("ChrgBr") {
                    tx.charge_bearer = Some(text.to_string());
                }
            }
        }
        Ok(())
    }
}

fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    let date_part = text.split('T').next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ParseError::invalid_value("date", format!("'{text}' is not an ISO 8601 date")))
}

fn parse_iso_datetime(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).map_err(|_| {
        ParseError::invalid_value("datetime", format!("'{text}' is not an RFC 3339 datetime"))
    })
}

/// Parses a complete pain.001 `Document` into a [`PaymentInitiationDocument`].
/// Only the first `PmtInf` block is read; a document with multiple payment
/// information blocks must be split by the caller beforehand.
pub fn parse_pain001(xml: &str) -> Result<PaymentInitiationDocument> {
    let namespace = extract_root_namespace(xml)?;
    let detected = PainType::from_namespace(&namespace)?;
    if detected != PainType::Pain001 {
        return Err(ParseError::UnsupportedCombination {
            mtype: detected.to_string(),
            version: namespace,
        });
    }
    let mut handler = PaymentInitiationHandler::default();
    xml_reader::walk(xml, &mut handler)?;
    handler.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.09">
        <CstmrCdtTrfInitn>
            <GrpHdr>
                <MsgId>MSG-1</MsgId>
                <CreDtTm>2024-01-15T10:00:00+01:00</CreDtTm>
                <NbOfTxs>1</NbOfTxs>
                <CtrlSum>500.00</CtrlSum>
            </GrpHdr>
            <PmtInf>
                <PmtInfId>PMT-1</PmtInfId>
                <ReqdExctnDt><Dt>2024-01-16</Dt></ReqdExctnDt>
                <Dbtr><Nm>ACME GMBH</Nm></Dbtr>
                <DbtrAcct><Id><IBAN>DE89370400440532013000</IBAN></Id></DbtrAcct>
                <CdtTrfTxInf>
                    <PmtId><EndToEndId>E2E-1</EndToEndId></PmtId>
                    <Amt><InstdAmt Ccy="EUR">500.00</InstdAmt></Amt>
                    <Cdtr><Nm>SUPPLIER LTD</Nm></Cdtr>
                    <CdtrAcct><Id><IBAN>GB29NWBK60161331926819</IBAN></Id></CdtrAcct>
                    <RmtInf><Ustrd>Invoice 101</Ustrd></RmtInf>
                </CdtTrfTxInf>
            </PmtInf>
        </CstmrCdtTrfInitn>
    </Document>"#;

    #[test]
    fn parses_payment_initiation_document() {
        let doc = parse_pain001(SAMPLE).unwrap();
        assert_eq!(doc.group_header.message_id, "MSG-1");
        assert_eq!(doc.transactions.len(), 1);
        assert_eq!(doc.count_transactions(), 1);
        assert!(doc.validate().is_ok());
        assert_eq!(
            doc.transactions[0].creditor.name(),
            Some("SUPPLIER LTD")
        );
    }

    #[test]
    fn rejects_non_pain001_document() {
        let xml = SAMPLE.replace("pain.001.001.09", "pain.002.001.10");
        assert!(parse_pain001(&xml).is_err());
    }
}
