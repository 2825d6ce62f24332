//! camt.053 (Bank to Customer Statement) reader: walks the XML tree with
//! [`crate::parser::xml_reader`] and accumulates a [`StatementDocument`],
//! mirroring the balance/entry scratch-accumulator split of a manual
//! event-driven XML parser.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::codes::bank_tx_code::BankTransactionCode;
use crate::codes::{camt_type::extract_root_namespace, CamtType, CreditDebit, Currency, EntryStatus, PurposeCode, ReasonCode};
use crate::documents::statement::StatementDocument;
use crate::entities::balance::{Balance, BalanceKind};
use crate::entities::entry::Entry;
use crate::entities::institution::FinancialInstitutionIdentification;
use crate::entities::mandate::Mandate;
use crate::entities::money::Money;
use crate::entities::remittance::RemittanceInformation;
use crate::error::{ParseError, Result};

use super::xml_reader::{self, StartElement, XmlElementHandler};

#[derive(Default)]
struct BalanceScratch {
    code: Option<String>,
    amount: Option<String>,
    currency: Option<String>,
    indicator: Option<String>,
    date: Option<String>,
}

impl BalanceScratch {
    fn clear(&mut self) {
        *self = BalanceScratch::default();
    }

    fn into_balance(self, kind: BalanceKind) -> Result<Balance> {
        let amount_text = self
            .amount
            .ok_or_else(|| ParseError::MissingField("Stmt/Bal/Amt".into()))?;
        let currency_code = self
            .currency
            .ok_or_else(|| ParseError::MissingField("Stmt/Bal/Amt/@Ccy".into()))?;
        let currency = Currency::from_str(&currency_code)?;
        let indicator = self
            .indicator
            .ok_or_else(|| ParseError::MissingField("Stmt/Bal/CdtDbtInd".into()))?;
        let direction = CreditDebit::parse_iso_str(&indicator)?;
        let date_text = self
            .date
            .ok_or_else(|| ParseError::MissingField("Stmt/Bal/Dt".into()))?;
        let date = parse_iso_date(&date_text)?;
        let amount = Money::parse_decimal_point_amount(&amount_text, currency)?;
        Ok(Balance {
            kind,
            direction,
            date,
            amount,
        })
    }
}

#[derive(Default)]
struct EntryScratch {
    amount: Option<String>,
    currency: Option<String>,
    indicator: Option<String>,
    booking_date: Option<String>,
    value_date: Option<String>,
    entry_ref: Option<String>,
    remittance_unstructured: Option<String>,
    reversal_indicator: Option<String>,
    status: Option<String>,
    bank_tx_domain: Option<String>,
    bank_tx_family: Option<String>,
    bank_tx_sub_family: Option<String>,
    end_to_end_id: Option<String>,
    instruction_id: Option<String>,
    mandate_id: Option<String>,
    return_reason: Option<String>,
    technical_input_channel: Option<String>,
    purpose_code: Option<String>,
    local_instrument: Option<String>,
    instructing_agent_bic: Option<String>,
    instructed_agent_bic: Option<String>,
    debtor_agent_bic: Option<String>,
    creditor_agent_bic: Option<String>,
}

impl EntryScratch {
    fn into_entry(self) -> Result<Entry> {
        let amount_text = self
            .amount
            .ok_or_else(|| ParseError::MissingField("Ntry/Amt".into()))?;
        let currency_code = self
            .currency
            .ok_or_else(|| ParseError::MissingField("Ntry/Amt/@Ccy".into()))?;
        let currency = Currency::from_str(&currency_code)?;
        let indicator = self
            .indicator
            .ok_or_else(|| ParseError::MissingField("Ntry/CdtDbtInd".into()))?;
        let direction = CreditDebit::parse_iso_str(&indicator)?;
        let value_date_text = self
            .value_date
            .or(self.booking_date.clone())
            .ok_or_else(|| ParseError::MissingField("Ntry/ValDt".into()))?;
        let value_date = parse_iso_date(&value_date_text)?;
        let entry_date = self
            .booking_date
            .as_deref()
            .and_then(|d| parse_iso_date(d).ok());
        let amount = Money::parse_decimal_point_amount(&amount_text, currency)?;
        let customer_reference = self.entry_ref.unwrap_or_default();
        let remittance_information = self
            .remittance_unstructured
            .map(|text| RemittanceInformation::from_text(&text));
        let is_reversal = self.reversal_indicator.as_deref() == Some("true")
            || self.reversal_indicator.as_deref() == Some("1");
        let status = self
            .status
            .as_deref()
            .map(EntryStatus::parse_iso_str)
            .transpose()?
            .unwrap_or(EntryStatus::Booked);
        let bank_transaction_code = if self.bank_tx_domain.is_some()
            || self.bank_tx_family.is_some()
            || self.bank_tx_sub_family.is_some()
        {
            Some(BankTransactionCode::from_codes(
                self.bank_tx_domain.as_deref().unwrap_or_default(),
                self.bank_tx_family.as_deref().unwrap_or_default(),
                self.bank_tx_sub_family.as_deref().unwrap_or_default(),
            ))
        } else {
            None
        };
        let mandate = self.mandate_id.map(|mandate_id| Mandate {
            mandate_id,
            date_of_signature: None,
            creditor_id: None,
        });
        let return_reason = self.return_reason.map(|code| ReasonCode::from_code(&code));
        let purpose_code = self.purpose_code.map(|code| PurposeCode::from_code(&code));

        Ok(Entry {
            value_date,
            entry_date,
            direction,
            is_reversal,
            amount,
            bank_transaction_code,
            customer_reference,
            bank_reference: None,
            supplementary_details: None,
            remittance_information,
            status,
            end_to_end_id: self.end_to_end_id,
            instruction_id: self.instruction_id,
            mandate,
            return_reason,
            technical_input_channel: self.technical_input_channel,
            purpose_code,
            local_instrument: self.local_instrument,
            instructing_agent: self.instructing_agent_bic.map(FinancialInstitutionIdentification::from_bic),
            instructed_agent: self.instructed_agent_bic.map(FinancialInstitutionIdentification::from_bic),
            debtor_agent: self.debtor_agent_bic.map(FinancialInstitutionIdentification::from_bic),
            creditor_agent: self.creditor_agent_bic.map(FinancialInstitutionIdentification::from_bic),
        })
    }
}

#[derive(Default)]
struct StatementHandler {
    account_identification: Option<String>,
    statement_id: Option<String>,
    opening: Option<Balance>,
    closing: Option<Balance>,
    closing_available: Option<Balance>,
    forward_available: Option<Balance>,
    entries: Vec<Entry>,
    balance_scratch: BalanceScratch,
    entry_scratch: Option<EntryScratch>,
}

impl StatementHandler {
    fn finish_balance(&mut self) {
        let scratch = std::mem::take(&mut self.balance_scratch);
        let Some(code) = scratch.code.clone() else {
            return;
        };
        let kind = match code.as_str() {
            "OPBD" => BalanceKind::OpeningBooked,
            "PRCD" => BalanceKind::IntermediateOpeningBooked,
            "CLBD" => BalanceKind::ClosingBooked,
            "ITBD" => BalanceKind::IntermediateClosingBooked,
            "CLAV" => BalanceKind::ClosingAvailable,
            "FWAV" => BalanceKind::ForwardAvailable,
            _ => return,
        };
        if let Ok(balance) = scratch.into_balance(kind) {
            match kind {
                BalanceKind::OpeningBooked | BalanceKind::IntermediateOpeningBooked => {
                    self.opening = Some(balance)
                }
                BalanceKind::ClosingBooked | BalanceKind::IntermediateClosingBooked => {
                    self.closing = Some(balance)
                }
                BalanceKind::ClosingAvailable => self.closing_available = Some(balance),
                BalanceKind::ForwardAvailable => self.forward_available = Some(balance),
            }
        }
    }

    fn finish_entry(&mut self) {
        if let Some(scratch) = self.entry_scratch.take() {
            if let Ok(entry) = scratch.into_entry() {
                self.entries.push(entry);
            }
        }
    }

    fn into_document(self) -> Result<StatementDocument> {
        Ok(StatementDocument {
            reference: self.statement_id.unwrap_or_default(),
            account_identification: self
                .account_identification
                .ok_or_else(|| ParseError::MissingField("Stmt/Acct/Id".into()))?,
            statement_number: String::new(),
            opening_balance: self
                .opening
                .ok_or_else(|| ParseError::MissingField("Stmt/Bal[Tp=OPBD]".into()))?,
            closing_balance: self
                .closing
                .ok_or_else(|| ParseError::MissingField("Stmt/Bal[Tp=CLBD]".into()))?,
            closing_available_balance: self.closing_available,
            forward_available_balance: self.forward_available,
            debit_summary: None,
            credit_summary: None,
            entries: self.entries,
            floor_limit: None,
            date_time_indicator: None,
        })
    }
}

impl XmlElementHandler for StatementHandler {
    fn handle_start(&mut self, _path: &[String], element: &StartElement<'_>) -> Result<()> {
        match element.name {
            "Bal" => self.balance_scratch.clear(),
            "Ntry" => self.entry_scratch = Some(EntryScratch::default()),
            "Amt" => {
                if let Some(ccy) = element.attributes.iter().find(|(k, _)| k == "Ccy") {
                    if self.entry_scratch.is_some() {
                        self.entry_scratch.as_mut().unwrap().currency = Some(ccy.1.clone());
                    } else {
                        self.balance_scratch.currency = Some(ccy.1.clone());
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, path: &[String]) -> Result<()> {
        match path.last().map(String::as_str) {
            Some("Bal") => self.finish_balance(),
            Some("Ntry") => self.finish_entry(),
            _ => {}
        }
        Ok(())
    }

    fn handle_text(&mut self, path: &[String], text: &str) -> Result<()> {
        if xml_reader::path_ends_with(path, &["Acct", "Id", "IBAN"])
            || xml_reader::path_ends_with(path, &["Acct", "Id", "Othr", "Id"])
        {
            if self.account_identification.is_none() {
                self.account_identification = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Stmt", "Id"]) {
            self.statement_id = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["Bal", "Tp", "CdOrPrtry", "Cd"]) {
            self.balance_scratch.code = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["Bal", "Amt"]) {
            self.balance_scratch.amount = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["Bal", "CdtDbtInd"]) {
            self.balance_scratch.indicator = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["Bal", "Dt", "Dt"]) {
            self.balance_scratch.date = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["Ntry", "Amt"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.amount = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "CdtDbtInd"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.indicator = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "BookgDt", "Dt"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.booking_date = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "ValDt", "Dt"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.value_date = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "NtryRef"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.entry_ref = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "RvslInd"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.reversal_indicator = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "Sts", "Cd"])
            || xml_reader::path_ends_with(path, &["Ntry", "Sts"])
        {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.status = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "BkTxCd", "Domn", "Cd"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.bank_tx_domain = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(path, &["Ntry", "BkTxCd", "Domn", "Fmly", "Cd"]) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.bank_tx_family = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "BkTxCd", "Domn", "Fmly", "SubFmlyCd"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.bank_tx_sub_family = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "RmtInf", "Ustrd"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                let existing = entry.remittance_unstructured.take().unwrap_or_default();
                entry.remittance_unstructured =
                    Some(if existing.is_empty() { text.to_string() } else { format!("{existing} {text}") });
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "Refs", "EndToEndId"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.end_to_end_id = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "Refs", "InstrId"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.instruction_id = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "Refs", "MndtId"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.mandate_id = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "RtrInf", "Rsn", "Cd"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.return_reason = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "AddtlTxInf"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.technical_input_channel = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "Purp", "Cd"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.purpose_code = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &["Ntry", "NtryDtls", "TxDtls", "PmtTpInf", "LclInstrm", "Cd"],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.local_instrument = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &[
                "Ntry", "NtryDtls", "TxDtls", "RltdAgts", "InstgAgt", "FinInstnId", "BICFI",
            ],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.instructing_agent_bic = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &[
                "Ntry", "NtryDtls", "TxDtls", "RltdAgts", "InstdAgt", "FinInstnId", "BICFI",
            ],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.instructed_agent_bic = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &[
                "Ntry", "NtryDtls", "TxDtls", "RltdAgts", "DbtrAgt", "FinInstnId", "BICFI",
            ],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.debtor_agent_bic = Some(text.to_string());
            }
        } else if xml_reader::path_ends_with(
            path,
            &[
                "Ntry", "NtryDtls", "TxDtls", "RltdAgts", "CdtrAgt", "FinInstnId", "BICFI",
            ],
        ) {
            if let Some(entry) = self.entry_scratch.as_mut() {
                entry.creditor_agent_bic = Some(text.to_string());
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

/// Parses a complete camt.053 `Document` into a [`StatementDocument`].
/// Expects exactly one `Stmt` element; multi-statement documents must be
/// split by the caller before invoking this reader.
pub fn parse_camt053(xml: &str) -> Result<StatementDocument> {
    let namespace = extract_root_namespace(xml)?;
    let detected = CamtType::from_namespace(&namespace)?;
    if detected != CamtType::Camt053 {
        return Err(ParseError::UnsupportedCombination {
            mtype: detected.to_string(),
            version: namespace,
        });
    }
    let mut handler = StatementHandler::default();
    xml_reader::walk(xml, &mut handler)?;
    handler.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.08">
        <BkToCstmrStmt><Stmt>
            <Id>STMT1</Id>
            <Acct><Id><IBAN>DE89370400440532013000</IBAN></Id></Acct>
            <Bal>
                <Tp><CdOrPrtry><Cd>OPBD</Cd></CdOrPrtry></Tp>
                <Amt Ccy="EUR">1000.00</Amt>
                <CdtDbtInd>CRDT</CdtDbtInd>
                <Dt><Dt>2024-01-01</Dt></Dt>
            </Bal>
            <Bal>
                <Tp><CdOrPrtry><Cd>CLBD</Cd></CdOrPrtry></Tp>
                <Amt Ccy="EUR">1500.00</Amt>
                <CdtDbtInd>CRDT</CdtDbtInd>
                <Dt><Dt>2024-01-31</Dt></Dt>
            </Bal>
            <Ntry>
                <NtryRef>E1</NtryRef>
                <Amt Ccy="EUR">500.00</Amt>
                <CdtDbtInd>CRDT</CdtDbtInd>
                <BookgDt><Dt>2024-01-15</Dt></BookgDt>
                <ValDt><Dt>2024-01-15</Dt></ValDt>
                <NtryDtls><TxDtls><RmtInf><Ustrd>Invoice 42</Ustrd></RmtInf></TxDtls></NtryDtls>
            </Ntry>
        </Stmt></BkToCstmrStmt>
    </Document>"#;

    #[test]
    fn parses_statement_with_balances_and_entry() {
        let doc = parse_camt053(SAMPLE).unwrap();
        assert_eq!(doc.account_identification, "DE89370400440532013000");
        assert_eq!(doc.entries.len(), 1);
        assert!(doc.is_balance_reconciled());
        assert_eq!(
            doc.entries[0].remittance_information.as_ref().unwrap().unstructured.as_deref(),
            Some("Invoice 42")
        );
    }

    #[test]
    fn rejects_non_camt053_document() {
        let xml = SAMPLE.replace("camt.053.001.08", "camt.054.001.08");
        assert!(parse_camt053(&xml).is_err());
    }
}
