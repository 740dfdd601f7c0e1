use super::record_parser::{parse_line, parse_lines, ParseOutcome, FIELD_COUNT};

use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decoder::{decode, SourceEncoding};
use crate::models::RejectReason;

fn parse_text(text: &str, delimiter: char) -> Result<ParseOutcome> {
    let decoded = decode(text.as_bytes(), &SourceEncoding::DEFAULT_ORDER)?;
    Ok(parse_lines(&decoded.raw_lines(delimiter)))
}

fn fields(line: &str) -> Vec<&str> {
    line.split('|').collect()
}

#[test]
fn test_end_to_end_example_splits_valid_and_rejected() -> Result<()> {
    let text = "T1,P1,Widget,2,10.00,West,C1,2024-01-01\nT2,P1,Widget,-1,5.00,East,C2,2024-01-02";
    let outcome = parse_text(text, ',')?;

    assert_eq!(outcome.lines_read, 2);
    assert_eq!(outcome.transactions.len(), 1);
    assert_eq!(outcome.transactions[0].transaction_id, "T1");
    assert_eq!(outcome.transactions[0].amount(), Decimal::from_str("20.00")?);
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].line, 2);
    assert!(matches!(outcome.rejections[0].reason, RejectReason::InvalidNumeric { .. }));

    Ok(())
}

#[test]
fn test_valid_line_is_mapped_positionally() -> Result<()> {
    let transaction = parse_line(&fields(" T001 | P101 | Laptop | 2 | 45,000.00 | North | C001 | 2024-12-01 "))
        .map_err(|reason| anyhow::anyhow!("{reason}"))?;

    assert_eq!(transaction.transaction_id, "T001");
    assert_eq!(transaction.product_id, "P101");
    assert_eq!(transaction.product_name, "Laptop");
    assert_eq!(transaction.quantity, 2);
    assert_eq!(transaction.unit_price, Decimal::from_str("45000.00")?);
    assert_eq!(transaction.region, "North");
    assert_eq!(transaction.customer_id, "C001");
    assert_eq!(Some(transaction.date), NaiveDate::from_ymd_opt(2024, 12, 1));

    Ok(())
}

#[test]
fn test_commas_are_stripped_from_names_and_numbers() -> Result<()> {
    let transaction = parse_line(&fields("T002|P102|Mouse,Wireless|1,200|1,916.50|South|C002|2024-12-02"))
        .map_err(|reason| anyhow::anyhow!("{reason}"))?;

    assert_eq!(transaction.product_name, "MouseWireless");
    assert_eq!(transaction.quantity, 1200);
    assert_eq!(transaction.unit_price, Decimal::from_str("1916.50")?);

    Ok(())
}

#[test]
fn test_missing_id_is_rejected() {
    let result = parse_line(&fields("  |P101|Laptop|2|10.00|North|C001|2024-12-01"));

    assert_eq!(result, Err(RejectReason::MissingId));
}

#[test]
fn test_non_positive_numerics_are_always_invalid_numeric() {
    let lines = [
        "T1|P1|Widget|0|10.00|North|C1|2024-12-01",
        "T1|P1|Widget|-1|10.00|North|C1|2024-12-01",
        "T1|P1|Widget|-1,200|10.00|North|C1|2024-12-01",
        "T1|P1|Widget|2|0.00|North|C1|2024-12-01",
        "T1|P1|Widget|2|-1,000.00|North|C1|2024-12-01",
        "T1|P1|Widget|two|10.00|North|C1|2024-12-01",
        "T1|P1|Widget|2.5|10.00|North|C1|2024-12-01",
        // numeric checks run before the date and the remaining required fields
        "T1|P1|Widget|0|10.00||C1|not-a-date",
    ];

    for line in lines {
        let result = parse_line(&fields(line));
        assert!(matches!(result, Err(RejectReason::InvalidNumeric { .. })), "line {line} gave {result:?}");
    }
}

#[test]
fn test_malformed_date_is_rejected() {
    for date in ["2024-13-01", "01/12/2024", "", "yesterday"] {
        let line = format!("T1|P1|Widget|2|10.00|North|C1|{date}");
        let result = parse_line(&fields(&line));

        assert!(matches!(result, Err(RejectReason::InvalidDate { .. })), "date {date} gave {result:?}");
    }
}

#[test]
fn test_wrong_field_count_is_rejected() {
    let result = parse_line(&fields("T1|P1|Widget|2|10.00|North|C1"));

    assert_eq!(result, Err(RejectReason::FieldCount { expected: FIELD_COUNT, found: 7 }));
}

#[test]
fn test_empty_region_or_customer_is_rejected() {
    let result = parse_line(&fields("T1|P1|Widget|2|10.00||C1|2024-12-01"));
    assert_eq!(result, Err(RejectReason::MissingField { field: "region" }));

    let result = parse_line(&fields("T1|P1|Widget|2|10.00|North||2024-12-01"));
    assert_eq!(result, Err(RejectReason::MissingField { field: "customer_id" }));
}

#[test]
fn test_header_and_blank_lines_are_not_counted() -> Result<()> {
    let text = "TransactionID|ProductID|ProductName|Quantity|UnitPrice|Region|CustomerID|Date\n\
                T1|P1|Widget|2|10.00|North|C1|2024-12-01\n\
                \n\
                T2|P1|Widget|x|10.00|North|C1|2024-12-01\n\
                T3|P2|Gadget|1|5.00|South|C2|2024-12-02\n";
    let outcome = parse_text(text, '|')?;

    assert_eq!(outcome.lines_read, 3);
    assert_eq!(outcome.transactions.len(), 2);
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].line, 4);

    Ok(())
}

#[test]
fn test_valid_plus_rejected_equals_lines_read() -> Result<()> {
    let text = "T1|P1|Widget|2|10.00|North|C1|2024-12-01\n\
                |P1|Widget|2|10.00|North|C1|2024-12-01\n\
                T3|P1|Widget|2|10.00|North|C1|2024-02-30\n\
                T4|P1|Widget|2\n\
                T5|P1|Widget|3|1.50|East|C9|2024-12-03\n\
                T6|P1|Widget|3|abc|East|C9|2024-12-03\n";
    let outcome = parse_text(text, '|')?;

    assert_eq!(outcome.transactions.len() + outcome.rejections.len(), outcome.lines_read);
    assert_eq!(outcome.lines_read, 6);

    let ids: Vec<_> = outcome.transactions.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["T1", "T5"]);

    let kinds: Vec<_> = outcome.rejections.iter().map(|r| r.reason.kind()).collect();
    assert_eq!(kinds, vec!["MissingId", "InvalidDate", "FieldCount", "InvalidNumeric"]);

    Ok(())
}
