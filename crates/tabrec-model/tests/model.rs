//! Tests for tabrec-model types.

use chrono::{TimeZone, Utc};
use tabrec_model::{
    DomainRecord, FieldDescriptor, MISSING_SUMMARY, Record, Severity, TypeTag, UNKNOWN_COLLECTOR,
    UNKNOWN_SEVERITY, Value,
};

#[test]
fn domain_record_reads_producer_json() {
    let json = r#"[{
        "id": "get-stock-data-1704103200000",
        "collector": "get_stock_data",
        "severity": "warning",
        "summary": "3 tickers sem cotacao",
        "dataset": "cotacao_intraday.cotacao_bovespa",
        "createdAt": "2024-01-01T07:00:00-03:00",
        "metadata": {"tickersSolicitados": ["PETR4", "VALE3"], "linhasProcessadas": 12}
    }]"#;
    let records: Vec<DomainRecord> = serde_json::from_str(json).expect("parse producer json");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(
        record.created_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(record.severity_level(), Severity::Warning);
    assert_eq!(
        record.metadata.get("linhasProcessadas"),
        Some(&Value::Int64(12))
    );
}

#[test]
fn domain_record_defaults_optional_fields() {
    let json = r#"{
        "id": "a",
        "collector": "c",
        "severity": "INFO",
        "summary": "s",
        "createdAt": "2024-01-01T10:00:00Z"
    }"#;
    let record: DomainRecord = serde_json::from_str(json).expect("parse record");
    assert_eq!(record.dataset, "");
    assert!(record.metadata.is_empty());
}

#[test]
fn domain_record_reads_nulls_as_defaults() {
    let json = r#"{
        "id": "a",
        "collector": "",
        "severity": null,
        "summary": null,
        "dataset": null,
        "createdAt": "2024-01-01T10:00:00Z",
        "metadata": null
    }"#;
    let record: DomainRecord = serde_json::from_str(json).expect("parse record");
    assert_eq!(record.collector, UNKNOWN_COLLECTOR);
    assert_eq!(record.severity, UNKNOWN_SEVERITY);
    assert_eq!(record.summary, MISSING_SUMMARY);
    assert_eq!(record.dataset, "");
    assert!(record.metadata.is_empty());
}

#[test]
fn domain_record_requires_created_at() {
    let json = r#"{"id": "a", "createdAt": null}"#;
    assert!(serde_json::from_str::<DomainRecord>(json).is_err());
}

#[test]
fn domain_record_serializes_camel_case() {
    let record = DomainRecord {
        id: "id-1".to_string(),
        collector: "collector".to_string(),
        severity: "ERROR".to_string(),
        summary: "boom".to_string(),
        dataset: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        metadata: Record::single("raw", Value::Text("x".to_string())),
    };
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["createdAt"], "2024-01-01T10:00:00Z");
    assert_eq!(json["metadata"]["raw"], "x");
}

#[test]
fn nested_descriptor_accepts_sub_fields() {
    let sub = FieldDescriptor::scalar("ticker", TypeTag::String);
    let field = FieldDescriptor::new("quotes", TypeTag::array_of(TypeTag::Struct), vec![sub])
        .expect("array of struct may carry sub-fields");
    assert_eq!(field.sub_fields().len(), 1);
    assert_eq!(field.type_tag().to_string(), "ARRAY<STRUCT>");
}
