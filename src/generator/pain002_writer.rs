//! pain.002 (Customer Payment Status Report) generator: renders a
//! [`PaymentStatusReportDocument`] into a complete `Document` element, the
//! inverse of `pain002_reader`.

use crate::documents::pain002::{PaymentStatus, PaymentStatusReportDocument, TransactionStatus};
use crate::error::Result;
use crate::generator::xml_builder::XmlBuilder;
use crate::schema::version_resolver::resolve_namespace;

fn status_code(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Accepted => "ACCP",
        PaymentStatus::AcceptedSettlementCompleted => "ACSC",
        PaymentStatus::AcceptedTechnicalValidation => "ACTC",
        PaymentStatus::Pending => "PDNG",
        PaymentStatus::Rejected => "RJCT",
        PaymentStatus::PartiallyAccepted => "PART",
    }
}

fn write_transaction_status(builder: &mut XmlBuilder, status: &TransactionStatus) -> Result<()> {
    builder.open("TxInfAndSts")?;
    if let Some(instruction_id) = &status.original_instruction_id {
        builder.leaf("OrgnlInstrId", instruction_id)?;
    }
    builder.leaf("OrgnlEndToEndId", &status.original_end_to_end_id)?;
    builder.leaf("TxSts", status_code(status.status))?;
    if let Some(reason) = &status.reason {
        builder.open("StsRsnInf")?;
        builder.open("Rsn")?;
        builder.leaf("Cd", reason.code())?;
        builder.close()?;
        if let Some(info) = &status.additional_information {
            builder.leaf("AddtlInf", info)?;
        }
        builder.close()?;
    }
    builder.close()?;
    Ok(())
}

/// Renders `document` as a complete pain.002 `Document` element. `version`
/// selects the `pain.002.001.<vv>` schema version; `None` resolves to the
/// engine's default.
pub fn generate(document: &PaymentStatusReportDocument, version: Option<&str>) -> Result<String> {
    let namespace = resolve_namespace("pain", "002", version)?;
    let mut builder = XmlBuilder::new();
    builder.write_declaration()?;
    builder.open_with_attrs("Document", &[("xmlns", &namespace)])?;
    builder.open("CstmrPmtStsRpt")?;

    builder.open("OrgnlGrpInfAndSts")?;
    builder.leaf("OrgnlMsgId", &document.original_message_id)?;
    builder.leaf("OrgnlMsgNmId", &document.original_message_name_id)?;
    if let Some(group_status) = document.group_status {
        builder.leaf("GrpSts", status_code(group_status))?;
    }
    builder.close()?;

    for status in &document.transaction_statuses {
        write_transaction_status(&mut builder, status)?;
    }

    builder.close()?;
    builder.close()?;
    builder.finish()
}
