use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use tabrec_decode::{FieldPlan, RowMapper};
use tabrec_ingest::parse_result_set;
use tabrec_model::{FieldDescriptor, RawCell, ResultSet, Row, Schema, Severity, TypeTag, Value};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap()
}

fn mapper() -> RowMapper {
    RowMapper::default().with_clock(fixed_clock)
}

#[test]
fn empty_row_gets_every_default() {
    let schema = Schema::new(vec![FieldDescriptor::scalar("unrelated", TypeTag::String)]);
    let record = mapper().map(&Row::new(vec![RawCell::text("x")]), &schema);

    assert!(!record.id.is_empty());
    assert_eq!(record.collector, "desconhecido");
    assert_eq!(record.severity, "UNKNOWN");
    assert_eq!(record.summary, "Mensagem não informada");
    assert_eq!(record.dataset, "");
    assert_eq!(record.created_at, fixed_clock());
    assert!(record.metadata.is_empty());
}

#[test]
fn generated_ids_are_distinct() {
    let schema = Schema::new(vec![FieldDescriptor::scalar("id", TypeTag::String)]);
    let result = ResultSet::new(
        schema,
        vec![Row::new(vec![RawCell::Null]), Row::new(vec![RawCell::text("  ")])],
    );
    let records = mapper().map_result_set(&result);
    assert_eq!(records.len(), 2);
    assert!(!records[0].id.is_empty());
    assert!(!records[1].id.is_empty());
    assert_ne!(records[0].id, records[1].id);
}

#[test]
fn candidates_are_ranked_and_trimmed() {
    let schema = Schema::new(vec![
        FieldDescriptor::scalar("message_id", TypeTag::String),
        FieldDescriptor::scalar("id", TypeTag::String),
        FieldDescriptor::scalar("Severity", TypeTag::String),
        FieldDescriptor::scalar("status", TypeTag::String),
        FieldDescriptor::scalar("source", TypeTag::String),
        FieldDescriptor::scalar("collector", TypeTag::String),
    ]);
    let row = Row::new(vec![
        RawCell::text("secondary"),
        RawCell::text(" primary "),
        RawCell::text(" warning "),
        RawCell::text("error"),
        RawCell::text("from-source"),
        RawCell::text(""),
    ]);
    let record = mapper().map(&row, &schema);

    assert_eq!(record.id, "primary");
    assert_eq!(record.severity, "WARNING");
    assert_eq!(record.severity_level(), Severity::Warning);
    assert_eq!(record.collector, "from-source");
}

#[test]
fn timestamp_from_non_timestamp_column() {
    let schema = Schema::new(vec![
        FieldDescriptor::scalar("created_at", TypeTag::String),
        FieldDescriptor::scalar("inserted_at", TypeTag::Int64),
    ]);
    let text = mapper().map(
        &Row::new(vec![RawCell::text("2024-01-01T07:00:00-03:00"), RawCell::Null]),
        &schema,
    );
    assert_eq!(text.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());

    let epoch = mapper().map(
        &Row::new(vec![RawCell::text("garbage"), RawCell::text("1704103200")]),
        &schema,
    );
    assert_eq!(epoch.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
}

#[test]
fn unparseable_timestamps_fall_back_to_clock() {
    let schema = Schema::new(vec![FieldDescriptor::scalar("timestamp", TypeTag::Timestamp)]);
    let record = mapper().map(&Row::new(vec![RawCell::text("soon")]), &schema);
    assert_eq!(record.created_at, fixed_clock());
}

#[test]
fn configured_timestamp_columns_replace_defaults() {
    let plan = FieldPlan::default().with_timestamp_columns(&["logged"]);
    let schema = Schema::new(vec![
        FieldDescriptor::scalar("created_at", TypeTag::Timestamp),
        FieldDescriptor::scalar("logged", TypeTag::Timestamp),
    ]);
    let row = Row::new(vec![RawCell::text("1704103200"), RawCell::text("1704106800")]);
    let record = RowMapper::new(plan).with_clock(fixed_clock).map(&row, &schema);
    assert_eq!(record.created_at.timestamp(), 1_704_106_800);
}

#[test]
fn maps_rest_response_end_to_end() {
    let json = r#"{
      "schema": {"fields": [
        {"name": "id", "type": "STRING"},
        {"name": "collector", "type": "STRING"},
        {"name": "severity", "type": "STRING"},
        {"name": "summary", "type": "STRING"},
        {"name": "dataset", "type": "STRING"},
        {"name": "created_at", "type": "TIMESTAMP"},
        {"name": "metadata", "type": "JSON"}
      ]},
      "rows": [
        {"f": [{"v": "m-1"}, {"v": "b3"}, {"v": "success"}, {"v": "loaded"},
               {"v": "quotes"}, {"v": "1.7041032E9"}, {"v": "{\"rows\": 10}"}]}
      ]
    }"#;
    let result = parse_result_set(json).expect("parse");
    let records = mapper().map_result_set(&result);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "m-1");
    assert_eq!(record.collector, "b3");
    assert_eq!(record.severity, "SUCCESS");
    assert_eq!(record.summary, "loaded");
    assert_eq!(record.dataset, "quotes");
    assert_eq!(record.created_at.timestamp(), 1_704_103_200);
    assert_eq!(record.metadata.get("rows"), Some(&Value::Int64(10)));
}

#[test]
fn rows_decode_concurrently() {
    let schema = Schema::new(vec![
        FieldDescriptor::scalar("id", TypeTag::String),
        FieldDescriptor::scalar("timestamp", TypeTag::Timestamp),
    ]);
    let rows: Vec<Row> = (0..64)
        .map(|n| {
            Row::new(vec![
                RawCell::text(format!("row-{n}")),
                RawCell::text((1_704_103_200 + n).to_string()),
            ])
        })
        .collect();
    let mapper = mapper();

    let ids: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = rows
            .chunks(16)
            .map(|chunk| {
                let mapper = &mapper;
                let schema = &schema;
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|row| mapper.map(row, schema).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker"))
            .collect()
    });

    let expected: Vec<String> = (0..64).map(|n| format!("row-{n}")).collect();
    assert_eq!(ids, expected);
}
