//! End-to-end scenarios and crate-level testable properties: each test
//! below is named after the scenario or property it exercises so a reader
//! can check coverage without cross-referencing module-level tests.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use fin_interchange::builder::camt053_builder::Camt053Builder;
use fin_interchange::builder::credit_transfer_builder::CreditTransferBuilder;
use fin_interchange::builder::datev_builder::DatevBuilder;
use fin_interchange::builder::pain001_builder::{Pain001Builder, PaymentMethod};
use fin_interchange::builder::statement_builder::StatementBuilder;
use fin_interchange::codes::{ChargeBearer, CreditDebit, Currency, PainType};
use fin_interchange::entities::money::Money;
use fin_interchange::entities::party::Party;
use fin_interchange::entities::payment_id::{generate_uetr, validate_uetr, OsRandomBytes};
use fin_interchange::entities::transaction::Transaction;
use fin_interchange::generator::credit_transfer_gen::{self, CreditTransferVariant};
use fin_interchange::generator::statement_gen::StatementVariant;
use fin_interchange::parser::mt_statement_reader;
use rust_decimal::Decimal;
use std::str::FromStr;

const S1: &str = ":20:STARTUMS\r\n:25:12345678/9876543210\r\n:28C:1/1\r\n:60F:C250108EUR1000,00\r\n:61:2501080108CR39,42NTRFNONREF//BREF1\r\n:86:166?20EREF+ORD1?21SVWZ+Rechnung\r\n:62F:C250108EUR1039,42\r\n";

#[test]
fn s1_mt940_single_transaction_parse() {
    let mut sink: fin_interchange::error::DiagnosticSink = None;
    let document = mt_statement_reader::parse(S1, StatementVariant::Mt940, &mut sink).unwrap();
    assert_eq!(document.entries.len(), 1);
    let entry = &document.entries[0];
    assert_eq!(entry.direction, CreditDebit::Credit);
    assert_eq!(entry.value_date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    assert_eq!(entry.entry_date, Some(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
    assert_eq!(entry.amount.to_decimal_point_string(), "39.42");
    assert_eq!(entry.amount.currency, Currency::Eur);
    assert_eq!(entry.customer_reference, "NONREF");
    assert_eq!(entry.bank_reference.as_deref(), Some("BREF1"));
    let remittance = entry.remittance_information.as_ref().unwrap();
    assert_eq!(
        remittance.structured.get(&fin_interchange::codes::RemittanceKeyword::Eref).unwrap(),
        "ORD1"
    );
    assert_eq!(
        remittance.structured.get(&fin_interchange::codes::RemittanceKeyword::Svwz).unwrap(),
        "Rechnung"
    );
    assert_eq!(document.opening_balance.amount.to_decimal_point_string(), "1000.00");
    assert_eq!(document.closing_balance.amount.to_decimal_point_string(), "1039.42");
    assert!(document.is_balance_reconciled());
}

#[test]
fn s2_mt942_with_floor_limit() {
    let block4 = ":20:STMT\r\n:25:123\r\n:28C:1/1\r\n:34F:EUR500,00\r\n:13D:2501081200+0100\r\n:60F:C250108EUR1000,00\r\n:62F:C250108EUR1000,00\r\n";
    let mut sink: fin_interchange::error::DiagnosticSink = None;
    let document = mt_statement_reader::parse(block4, StatementVariant::Mt942, &mut sink).unwrap();
    assert_eq!(document.floor_limit.unwrap().to_decimal_point_string(), "500.00");
    assert_eq!(document.date_time_indicator.unwrap().to_rfc3339(), "2025-01-08T12:00:00+01:00");
}

#[test]
fn s3_pain001_build_to_xml() {
    let debtor = Party::Customer {
        account: Some("DE89370400440532013000".into()),
        name: Some("MUELLER GMBH".into()),
        address: Default::default(),
    };
    let document = Pain001Builder::new()
        .message_id("MSG001")
        .creation_date_time(chrono::DateTime::parse_from_rfc3339("2025-01-09T10:00:00+01:00").unwrap())
        .debtor(debtor)
        .begin_payment_instruction()
        .with_instruction(|i| {
            i.set_payment_information_id("PMT1")
                .set_payment_method(PaymentMethod::Transfer)
                .set_requested_execution_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
                .add_transaction(tx("E2E-1", "100.00"))
                .add_transaction(tx("E2E-2", "50.00"))
        })
        .end_payment_instruction()
        .build(None)
        .unwrap();

    assert_eq!(document.group_header.number_of_transactions, 2);
    assert_eq!(
        document.group_header.control_sum.unwrap(),
        Decimal::from_str("150.00").unwrap()
    );

    let xml = fin_interchange::generator::pain001_writer::generate(&document, Some("12")).unwrap();
    assert!(xml.contains("<NbOfTxs>2</NbOfTxs>"));
    assert!(xml.contains("<CtrlSum>150.00</CtrlSum>"));
    assert!(xml.contains("urn:iso:std:iso:20022:tech:xsd:pain.001.001.12"));
}

fn tx(end_to_end: &str, amount: &str) -> Transaction {
    Transaction {
        payment_id: fin_interchange::entities::payment_id::PaymentIdentification::new(
            end_to_end,
            &mut OsRandomBytes,
        ),
        amount: Money::new(Decimal::from_str(amount).unwrap(), Currency::Eur),
        requested_execution_date: None,
        debtor: Party::Customer {
            account: Some("DE89370400440532013000".into()),
            name: None,
            address: Default::default(),
        },
        creditor: Party::Customer {
            account: Some("DE02500105170648489890".into()),
            name: None,
            address: Default::default(),
        },
        remittance_information: None,
        purpose: None,
        charge_bearer: None,
    }
}

#[test]
fn s4_camt053_with_iban_account() {
    let xml = Camt053Builder::new()
        .statement_id("STMT1")
        .account_identifier("DE89370400440532013000")
        .opening_balance(balance("1000.00"))
        .closing_balance(balance("1000.00"))
        .build_xml(None, None)
        .unwrap();
    assert!(xml.contains("<Acct><Id><IBAN>DE89370400440532013000</IBAN></Id></Acct>"));

    let other = Camt053Builder::new()
        .statement_id("STMT1")
        .account_identifier("0001234567")
        .opening_balance(balance("1000.00"))
        .closing_balance(balance("1000.00"))
        .build_xml(None, None)
        .unwrap();
    assert!(other.contains("<Acct><Id><Othr><Id>0001234567</Id></Othr></Id></Acct>"));
}

fn balance(amount: &str) -> fin_interchange::entities::balance::Balance {
    fin_interchange::entities::balance::Balance {
        kind: fin_interchange::entities::balance::BalanceKind::OpeningBooked,
        direction: CreditDebit::Credit,
        date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
        amount: Money::new(Decimal::from_str(amount).unwrap(), Currency::Eur),
    }
}

#[test]
fn s5_detection_robustness_to_pain008_looking_content() {
    let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.002.001.10">
        <CstmrPmtStsRpt><OrgnlGrpInfAndSts><OrgnlMsgNmId>pain.008.001.08</OrgnlMsgNmId></OrgnlGrpInfAndSts></CstmrPmtStsRpt>
    </Document>"#;
    assert_eq!(PainType::from_xml(xml).unwrap(), PainType::Pain002);
}

#[test]
fn s6_mt103_minimal() {
    let document = CreditTransferBuilder::new()
        .sender_reference("REF1")
        .value_date(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap())
        .amount(Money::new(Decimal::from_str("39.42").unwrap(), Currency::Eur))
        .ordering_customer_account("000000041000045")
        .beneficiary_account("112345679")
        .charge_bearer(ChargeBearer::Ours)
        .remittance_text("TR-PGTD0N")
        .build(&mut OsRandomBytes, None)
        .unwrap();

    let body = credit_transfer_gen::generate(&document, CreditTransferVariant::Mt103).unwrap();
    assert!(body.contains(":20:REF1"));
    assert!(body.contains(":23B:CRED"));
    assert!(body.contains(":32A:250512EUR39,42"));
    assert!(body.contains(":70:TR-PGTD0N"));
    assert!(body.contains(":71A:OUR"));
    assert!(document.stp_capable);
}

/// Property 3: opening + sum(signed entries) = closing, within 0.01.
#[test]
fn property_3_balance_reconciliation() {
    let mut sink: fin_interchange::error::DiagnosticSink = None;
    let document = mt_statement_reader::parse(S1, StatementVariant::Mt940, &mut sink).unwrap();
    assert!(document.is_balance_reconciled());
}

/// Property 4: pain.001 control sum and transaction count.
#[test]
fn property_4_pain001_control_sum() {
    let document = Pain001Builder::new()
        .message_id("MSG002")
        .creation_date_time(chrono::DateTime::parse_from_rfc3339("2025-01-09T10:00:00+01:00").unwrap())
        .debtor(Party::Customer {
            account: Some("DE89370400440532013000".into()),
            name: Some("MUELLER GMBH".into()),
            address: Default::default(),
        })
        .begin_payment_instruction()
        .with_instruction(|i| {
            i.set_payment_information_id("PMT1")
                .set_requested_execution_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
                .add_transaction(tx("E2E-1", "10.00"))
                .add_transaction(tx("E2E-2", "20.00"))
                .add_transaction(tx("E2E-3", "30.00"))
        })
        .end_payment_instruction()
        .build(None)
        .unwrap();
    assert_eq!(document.count_transactions(), 3);
    assert_eq!(document.calculate_control_sum().unwrap(), Decimal::from_str("60.00").unwrap());
}

/// Property 6: type detection is deterministic across repeated invocations.
#[test]
fn property_6_type_detection_determinism() {
    let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.08"></Document>"#;
    let first = fin_interchange::codes::CamtType::from_xml(xml).unwrap();
    let second = fin_interchange::codes::CamtType::from_xml(xml).unwrap();
    assert_eq!(first, second);
}

/// Property 7: every DATEV row has the same field count as the header.
#[test]
fn property_7_datev_column_alignment() {
    let batch = DatevBuilder::new()
        .consultant_number("1001")
        .client_number("1")
        .fiscal_year_start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .account_length(4)
        .add_row(fin_interchange::documents::datev::DatevBookingRow {
            amount: Money::new(Decimal::from_str("119.00").unwrap(), Currency::Eur),
            is_debit: true,
            account: "1200".into(),
            contra_account: "8400".into(),
            booking_key: None,
            booking_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            document_field_1: Some("RE-1001".into()),
            document_field_2: None,
            posting_text: Some("Rechnung".into()),
        })
        .build(None)
        .unwrap();
    let csv = fin_interchange::generator::datev_writer::generate(&batch).unwrap();
    let mut lines = csv.lines();
    lines.next();
    let field_header = lines.next().unwrap();
    let data_row = lines.next().unwrap();
    assert_eq!(
        field_header.split(';').count(),
        data_row.split(';').count()
    );
}

/// Property 8: generated UETRs are well-formed version-4 UUIDs.
#[test]
fn property_8_uetr_well_formedness() {
    let uetr = generate_uetr(&mut OsRandomBytes);
    validate_uetr(&uetr).unwrap();
    assert_eq!(uetr.len(), 36);
}

/// Property 1: MT round trip through the statement reader/generator.
#[test]
fn property_1_mt_round_trip_statement() {
    let mut sink: fin_interchange::error::DiagnosticSink = None;
    let document = mt_statement_reader::parse(S1, StatementVariant::Mt940, &mut sink).unwrap();
    let rendered = fin_interchange::generator::statement_gen::generate(&document, StatementVariant::Mt940).unwrap();
    let mut sink2: fin_interchange::error::DiagnosticSink = None;
    let reparsed = mt_statement_reader::parse(&rendered, StatementVariant::Mt940, &mut sink2).unwrap();
    assert_eq!(reparsed.entries.len(), document.entries.len());
    assert_eq!(reparsed.closing_balance, document.closing_balance);
    assert_eq!(reparsed.opening_balance, document.opening_balance);
}

/// Property 2: CAMT/pain round trip through a builder-produced document.
#[test]
fn property_2_camt_round_trip() {
    let document = StatementBuilder::new()
        .reference("REF1")
        .account_identification("DE89370400440532013000")
        .statement_number("1/1")
        .opening_balance(balance("1000.00"))
        .closing_balance(balance("1000.00"))
        .build(None)
        .unwrap();
    let xml = fin_interchange::generator::camt053_writer::generate(&document, Some("08")).unwrap();
    let reparsed = fin_interchange::parser::camt053_reader::parse_camt053(&xml).unwrap();
    assert_eq!(reparsed.opening_balance, document.opening_balance);
    assert_eq!(reparsed.closing_balance, document.closing_balance);
}

/// Property 5: a no-op mutation (re-setting a field to its current value)
/// leaves a builder's `build()` result unchanged.
#[test]
fn property_5_builder_idempotence() {
    let plain = StatementBuilder::new()
        .reference("REF1")
        .account_identification("DE89370400440532013000")
        .statement_number("1/1")
        .opening_balance(balance("1000.00"))
        .closing_balance(balance("1000.00"))
        .build(None)
        .unwrap();

    let with_noop_mutation = StatementBuilder::new()
        .reference("REF1")
        .account_identification("DE89370400440532013000")
        .statement_number("1/1")
        .opening_balance(balance("1000.00"))
        .closing_balance(balance("1000.00"))
        .statement_number("1/1")
        .build(None)
        .unwrap();

    assert_eq!(with_noop_mutation, plain);
}
