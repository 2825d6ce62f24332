//! pain.002 (Customer Payment Status Report) reader.

use crate::codes::pain_type::extract_root_namespace;
use crate::codes::reason_code::ReasonCode;
use crate::codes::PainType;
use crate::documents::pain002::PaymentStatusReportDocument;
use crate::error::{ParseError, Result};

use super::xml_reader::{self, StartElement, XmlElementHandler};

#[derive(Default)]
struct TxStatusScratch {
    original_end_to_end_id: Option<String>,
    original_instruction_id: Option<String>,
    status: Option<String>,
    reason_code: Option<String>,
    additional_information: Option<String>,
}

#[derive(Default)]
struct StatusReportHandler {
    original_message_id: Option<String>,
    original_message_name_id: Option<String>,
    group_status: Option<String>,
    statuses: Vec<TxStatusScratch>,
    current: Option<TxStatusScratch>,
}

impl XmlElementHandler for StatusReportHandler {
    fn handle_start(&mut self, _path: &[String], element: &StartElement<'_>) -> Result<()> {
        if element.name == "TxInfAndSts" {
            self.current = Some(TxStatusScratch::default());
        }
        Ok(())
    }

    fn handle_end(&mut self, path: &[String]) -> Result<()> {
        if path.last().map(String::as_str) == Some("TxInfAndSts") {
            if let Some(current) = self.current.take() {
                self.statuses.push(current);
            }
        }
        Ok(())
    }

    fn handle_text(&mut self, path: &[String], text: &str) -> Result<()> {
        let in_tx = path.iter().any(|p| p == "TxInfAndSts");
        if xml_reader::path_ends_with(path, &["OrgnlGrpInfAndSts", "OrgnlMsgId"]) {
            self.original_message_id = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["OrgnlGrpInfAndSts", "OrgnlMsgNmId"]) {
            self.original_message_name_id = Some(text.to_string());
        } else if xml_reader::path_ends_with(path, &["OrgnlGrpInfAndSts", "GrpSts"]) {
            self.group_status = Some(text.to_string());
        } else if in_tx {
            if let Some(current) = self.current.as_mut() {
                if xml_reader::path_ends_with(path, &["OrgnlEndToEndId"]) {
                    current.original_end_to_end_id = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["OrgnlInstrId"]) {
                    current.original_instruction_id = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["TxInfAndSts", "TxSts"]) {
                    current.status = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["StsRsnInf", "Rsn", "Cd"]) {
                    current.reason_code = Some(text.to_string());
                } else if xml_reader::path_ends_with(path, &["StsRsnInf", "AddtlInf"]) {
                    current.additional_information = Some(text.to_string());
                }
            }
        }
        Ok(())
    }
}

fn parse_status(code: &str) -> crate::documents::pain002::PaymentStatus {
    use crate::documents::pain002::PaymentStatus;
    match code {
        "ACCP" => PaymentStatus::Accepted,
        "ACSC" => PaymentStatus::AcceptedSettlementCompleted,
        "ACTC" => PaymentStatus::AcceptedTechnicalValidation,
        "PDNG" => PaymentStatus::Pending,
        "RJCT" => PaymentStatus::Rejected,
        "PART" => PaymentStatus::PartiallyAccepted,
        _ => PaymentStatus::Pending,
    }
}

/// Parses a complete pain.002 `Document` into a [`PaymentStatusReportDocument`].
pub fn parse_pain002(xml: &str) -> Result<PaymentStatusReportDocument> {
    let namespace = extract_root_namespace(xml)?;
    let detected = PainType::from_namespace(&namespace)?;
    if detected != PainType::Pain002 {
        return Err(ParseError::UnsupportedCombination {
            mtype: detected.to_string(),
            version: namespace,
        });
    }

    let mut handler = StatusReportHandler::default();
    xml_reader::walk(xml, &mut handler)?;

    let original_message_id = handler
        .original_message_id
        .ok_or_else(|| ParseError::MissingField("OrgnlGrpInfAndSts/OrgnlMsgId".into()))?;
    let original_message_name_id = handler.original_message_name_id.unwrap_or_default();
    let group_status = handler.group_status.as_deref().map(parse_status);

    let transaction_statuses = handler
        .statuses
        .into_iter()
        .map(|s| crate::documents::pain002::TransactionStatus {
            original_end_to_end_id: s.original_end_to_end_id.unwrap_or_default(),
            original_instruction_id: s.original_instruction_id,
            status: s.status.as_deref().map(parse_status).unwrap_or(crate::documents::pain002::PaymentStatus::Pending),
            reason: s.reason_code.as_deref().map(ReasonCode::from_code),
            additional_information: s.additional_information,
        })
        .collect();

    Ok(PaymentStatusReportDocument {
        original_message_id,
        original_message_name_id,
        group_status,
        transaction_statuses,
    })
}
