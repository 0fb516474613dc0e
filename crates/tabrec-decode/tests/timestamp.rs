use chrono::{DateTime, TimeZone, Utc};
use tabrec_decode::{normalize, parse_timestamp};
use tabrec_model::{NativeScalar, RawCell};

fn ten_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

#[test]
fn iso_seconds_and_micros_agree() {
    assert_eq!(parse_timestamp("2024-01-01T10:00:00Z"), Some(ten_am()));
    assert_eq!(parse_timestamp("1704103200"), Some(ten_am()));
    assert_eq!(parse_timestamp("1704103200000000"), Some(ten_am()));
}

#[test]
fn micros_keep_sub_second_remainder() {
    let parsed = parse_timestamp("1704103200123456").expect("micros");
    assert_eq!(parsed.timestamp(), 1_704_103_200);
    assert_eq!(parsed.timestamp_subsec_micros(), 123_456);
}

#[test]
fn text_without_offset_reads_as_utc() {
    assert_eq!(parse_timestamp("2024-01-01T10:00:00"), Some(ten_am()));
    assert_eq!(parse_timestamp("2024-01-01 10:00:00 UTC"), Some(ten_am()));
    assert_eq!(parse_timestamp("2024-01-01T07:00:00-03:00"), Some(ten_am()));
}

#[test]
fn rest_float_seconds_are_accepted() {
    assert_eq!(parse_timestamp("1.7041032E9"), Some(ten_am()));
}

#[test]
fn native_instant_wins_over_text() {
    let cell = RawCell::Primitive {
        native: Some(NativeScalar::Instant(ten_am())),
        text: Some("garbage".to_string()),
    };
    assert_eq!(normalize(&cell), Some(ten_am()));
}

#[test]
fn native_integer_is_read_through_its_text_form() {
    let cell = RawCell::native(NativeScalar::Int64(1_704_103_200));
    assert_eq!(normalize(&cell), Some(ten_am()));
}

#[test]
fn absent_and_unparseable_cells_are_empty() {
    assert_eq!(normalize(&RawCell::Null), None);
    assert_eq!(normalize(&RawCell::text("01/01/2024")), None);
    assert_eq!(normalize(&RawCell::Record(Vec::new())), None);
}
