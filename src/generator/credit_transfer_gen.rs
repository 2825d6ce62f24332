//! MT101/103/104 generator (§4.5.1): renders a [`CreditTransferDocument`]
//! back into block 4 tag lines. MT103 carries exactly one transaction with
//! a value-dated `:32A:`; MT101/MT104 carry a batch of legs, each with its
//! own undated `:32B:` amount field under a shared `:28D:` batch index.

use crate::documents::credit_transfer::CreditTransferDocument;
use crate::entities::remittance::RemittanceInformation;
use crate::entities::transaction::Transaction;
use crate::error::{ParseError, Result};
use crate::generator::mt_writer::{assemble_block4, format_amount, format_yymmdd, render_party, tag_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditTransferVariant {
    Mt101,
    Mt103,
    Mt104,
}

fn render_remittance_70(remittance: &RemittanceInformation) -> Option<String> {
    if !remittance.structured.is_empty() {
        let joined = remittance
            .structured
            .iter()
            .map(|(k, v)| format!("{}+{}", k.tag(), v))
            .collect::<Vec<_>>()
            .join(" ");
        return Some(joined);
    }
    remittance.unstructured.clone()
}

fn render_transaction_legs(
    lines: &mut Vec<String>,
    tx: &Transaction,
    amount_tag: &str,
) -> Result<()> {
    let instruction_ref = tx
        .payment_id
        .instruction_id
        .clone()
        .unwrap_or_else(|| tx.payment_id.end_to_end_id.clone());
    lines.push(tag_line("21", None, &instruction_ref)?);

    let amount_value = if amount_tag == "32A" {
        let date = tx.requested_execution_date.ok_or_else(|| {
            ParseError::MissingField("requested_execution_date (required for :32A:)".into())
        })?;
        format!(
            "{}{}{}",
            format_yymmdd(date),
            tx.amount.currency.code(),
            format_amount(&tx.amount)
        )
    } else {
        format!("{}{}", tx.amount.currency.code(), format_amount(&tx.amount))
    };
    lines.push(tag_line(amount_tag, None, &amount_value)?);

    let (debtor_opt, debtor_value) = render_party(&tx.debtor);
    lines.push(tag_line("50", Some(debtor_opt), &debtor_value)?);

    let (creditor_opt, creditor_value) = render_party(&tx.creditor);
    lines.push(tag_line("59", Some(creditor_opt), &creditor_value)?);

    if let Some(remittance) = &tx.remittance_information {
        if let Some(text) = render_remittance_70(remittance) {
            let wrapped = RemittanceInformation::split_into_lines(&text, 35).join("\n");
            lines.push(tag_line("70", None, &wrapped)?);
        }
    }

    if let Some(charge_bearer) = &tx.charge_bearer {
        lines.push(tag_line("71A", None, charge_bearer.code())?);
    }

    Ok(())
}

/// Renders a complete block 4 body for `document`, per `variant`.
pub fn generate(document: &CreditTransferDocument, variant: CreditTransferVariant) -> Result<String> {
    if document.transactions.is_empty() {
        return Err(ParseError::MissingField("transactions".into()));
    }
    if variant == CreditTransferVariant::Mt103 && document.transactions.len() != 1 {
        return Err(ParseError::Inconsistency(
            "MT103 carries exactly one transaction".into(),
        ));
    }

    let mut lines = Vec::new();
    lines.push(tag_line("20", None, &document.sender_reference)?);

    match variant {
        CreditTransferVariant::Mt103 => {
            lines.push(tag_line("23B", None, "CRED")?);
            let tx = &document.transactions[0];
            render_transaction_legs(&mut lines, tx, "32A")?;
        }
        CreditTransferVariant::Mt101 | CreditTransferVariant::Mt104 => {
            lines.push(tag_line(
                "28D",
                None,
                &format!("1/{}", document.transactions.len()),
            )?);
            for tx in &document.transactions {
                render_transaction_legs(&mut lines, tx, "32B")?;
            }
        }
    }

    Ok(assemble_block4(&lines))
}
