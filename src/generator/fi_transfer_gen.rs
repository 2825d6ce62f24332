//! MT200/202/202COV generator (§4.5.1): renders a
//! [`FinancialInstitutionTransferDocument`] back into block 4 tag lines.
//! MT202COV carries an extra sequence B for the underlying customer credit
//! transfer ([`CoverPaymentDetails`]), surfaced as `:50:`/`:59:` lines after
//! the institution-to-institution sequence A.

use crate::documents::fi_transfer::FinancialInstitutionTransferDocument;
use crate::entities::institution::FinancialInstitutionIdentification;
use crate::error::{ParseError, Result};
use crate::generator::mt_writer::{assemble_block4, format_amount, format_yymmdd, tag_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiTransferVariant {
    Mt200,
    Mt202,
    Mt202Cov,
}

fn render_institution(tag: &str, institution: &FinancialInstitutionIdentification) -> Result<String> {
    let value = institution
        .bic
        .clone()
        .or_else(|| institution.clearing_system_member_id.clone())
        .or_else(|| institution.name.clone())
        .ok_or_else(|| ParseError::MissingField(format!("{tag} (institution has no bic/name)")))?;
    tag_line(tag, Some('A'), &value)
}

/// Renders a complete block 4 body for `document`, per `variant`.
pub fn generate(
    document: &FinancialInstitutionTransferDocument,
    variant: FiTransferVariant,
) -> Result<String> {
    if variant == FiTransferVariant::Mt202Cov && document.cover.is_none() {
        return Err(ParseError::MissingField(
            "cover (required for MT202COV)".into(),
        ));
    }
    if variant != FiTransferVariant::Mt202Cov && document.cover.is_some() {
        return Err(ParseError::Inconsistency(
            "cover payment details are only valid on MT202COV".into(),
        ));
    }

    let mut lines = Vec::new();
    let reference = document
        .payment_id
        .instruction_id
        .clone()
        .unwrap_or_else(|| document.payment_id.end_to_end_id.clone());
    lines.push(tag_line("20", None, &reference)?);

    if variant != FiTransferVariant::Mt200 {
        lines.push(tag_line("21", None, &document.payment_id.end_to_end_id)?);
    }

    let amount_value = format!(
        "{}{}{}",
        format_yymmdd(document.value_date),
        document.amount.currency.code(),
        format_amount(&document.amount)
    );
    lines.push(tag_line("32A", None, &amount_value)?);

    if variant != FiTransferVariant::Mt200 {
        if let Some(ordering) = &document.ordering_institution {
            lines.push(render_institution("52", ordering)?);
        }
    }

    if let Some(intermediary) = &document.intermediary_institution {
        lines.push(render_institution("56", intermediary)?);
    }

    let beneficiary_tag = if variant == FiTransferVariant::Mt200 { "53" } else { "57" };
    lines.push(render_institution(beneficiary_tag, &document.beneficiary_institution)?);

    if let Some(cover) = &document.cover {
        lines.push(tag_line("50", None, &cover.ordering_customer)?);
        lines.push(tag_line("59", None, &cover.beneficiary_customer)?);
    }

    Ok(assemble_block4(&lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use crate::documents::fi_transfer::CoverPaymentDetails;
    use crate::entities::money::Money;
    use crate::entities::payment_id::PaymentIdentification;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn base_document() -> FinancialInstitutionTransferDocument {
        FinancialInstitutionTransferDocument {
            payment_id: PaymentIdentification::with_uetr(
                "E2E-1",
                "e3b0c442-98fc-4c14-9afb-f4c8996fb924",
            )
            .unwrap(),
            value_date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            amount: Money::new(Decimal::from_str("50000.00").unwrap(), Currency::Usd),
            ordering_institution: Some(FinancialInstitutionIdentification::from_bic("BANKDEFF")),
            beneficiary_institution: FinancialInstitutionIdentification::from_bic("BANKUS33"),
            intermediary_institution: None,
            cover: None,
        }
    }

    #[test]
    fn renders_mt200_to_own_account() {
        let body = generate(&base_document(), FiTransferVariant::Mt200).unwrap();
        assert!(body.contains(":20:E2E-1"));
        assert!(!body.contains(":21:"));
        assert!(body.contains(":53A:BANKUS33"));
    }

    #[test]
    fn renders_mt202_with_ordering_and_beneficiary() {
        let body = generate(&base_document(), FiTransferVariant::Mt202).unwrap();
        assert!(body.contains(":21:E2E-1"));
        assert!(body.contains(":52A:BANKDEFF"));
        assert!(body.contains(":57A:BANKUS33"));
    }

    #[test]
    fn renders_mt202cov_with_underlying_customer_sequence() {
        let mut document = base_document();
        document.cover = Some(CoverPaymentDetails {
            ordering_customer: "/DE89370400440532013000\nMUELLER GMBH".into(),
            beneficiary_customer: "/US123456789\nACME CORP".into(),
        });
        let body = generate(&document, FiTransferVariant::Mt202Cov).unwrap();
        assert!(body.contains(":50:/DE89370400440532013000"));
        assert!(body.contains(":59:/US123456789"));
    }

    #[test]
    fn mt202cov_without_cover_is_an_error() {
        assert!(generate(&base_document(), FiTransferVariant::Mt202Cov).is_err());
    }

    #[test]
    fn non_cov_with_cover_present_is_an_error() {
        let mut document = base_document();
        document.cover = Some(CoverPaymentDetails {
            ordering_customer: "X".into(),
            beneficiary_customer: "Y".into(),
        });
        assert!(generate(&document, FiTransferVariant::Mt202).is_err());
    }
}
