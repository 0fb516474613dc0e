use chrono::{TimeZone, Utc};
use tabrec_fetch::{ExecutorError, FetchError, MessageFilter, MessageService, MessageSource, Result};
use tabrec_model::{DomainRecord, Record};

struct Fixed(Vec<DomainRecord>);

impl MessageSource for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch_messages(&self) -> Result<Vec<DomainRecord>> {
        Ok(self.0.clone())
    }
}

struct Broken(&'static str);

impl MessageSource for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn fetch_messages(&self) -> Result<Vec<DomainRecord>> {
        Err(FetchError::Executor {
            source: ExecutorError::transient(self.0),
        })
    }
}

fn record(id: &str, collector: &str, severity: &str, hour: u32) -> DomainRecord {
    DomainRecord {
        id: id.to_string(),
        collector: collector.to_string(),
        severity: severity.to_string(),
        summary: "ok".to_string(),
        dataset: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        metadata: Record::new(),
    }
}

fn sample() -> Vec<DomainRecord> {
    vec![
        record("a", "b3", "INFO", 8),
        record("b", "B3", "ERROR", 12),
        record("c", "cvm", "ERROR", 10),
        record("d", "b3", "WARNING", 9),
    ]
}

fn ids(records: &[DomainRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn sorts_newest_first() {
    let service = MessageService::new().with_primary(Fixed(sample()));
    let records = service.find_messages(&MessageFilter::default()).expect("find");
    assert_eq!(ids(&records), ["b", "c", "d", "a"]);
}

#[test]
fn filters_by_severity_collector_and_limit() {
    let service = MessageService::new().with_primary(Fixed(sample()));

    let errors = MessageFilter {
        severity: Some("error".to_string()),
        ..MessageFilter::default()
    };
    assert_eq!(ids(&service.find_messages(&errors).expect("find")), ["b", "c"]);

    let collector = MessageFilter {
        collector: Some("  b3 ".to_string()),
        limit: Some(2),
        ..MessageFilter::default()
    };
    assert_eq!(ids(&service.find_messages(&collector).expect("find")), ["b", "d"]);
}

#[test]
fn unknown_severity_zero_limit_and_blank_collector_are_ignored() {
    let service = MessageService::new().with_primary(Fixed(sample()));
    let filter = MessageFilter {
        severity: Some("bogus".to_string()),
        collector: Some("   ".to_string()),
        limit: Some(0),
    };
    assert_eq!(service.find_messages(&filter).expect("find").len(), 4);
}

#[test]
fn falls_back_when_primary_fails_or_is_empty() {
    let failing = MessageService::new()
        .with_primary(Broken("connection reset"))
        .with_fallback(Fixed(vec![record("f", "py", "INFO", 1)]));
    assert_eq!(ids(&failing.find_messages(&MessageFilter::default()).expect("find")), ["f"]);

    let empty = MessageService::new()
        .with_primary(Fixed(Vec::new()))
        .with_fallback(Fixed(vec![record("f", "py", "INFO", 1)]));
    assert_eq!(ids(&empty.find_messages(&MessageFilter::default()).expect("find")), ["f"]);
}

#[test]
fn error_surfacing() {
    let primary_only = MessageService::new().with_primary(Broken("connection reset"));
    let error = primary_only
        .find_messages(&MessageFilter::default())
        .expect_err("primary error");
    assert!(matches!(error, FetchError::Executor { source } if source.message == "connection reset"));

    let both = MessageService::new()
        .with_primary(Broken("connection reset"))
        .with_fallback(Broken("script missing"));
    let error = both
        .find_messages(&MessageFilter::default())
        .expect_err("fallback error");
    assert!(matches!(error, FetchError::Executor { source } if source.message == "script missing"));

    assert!(matches!(
        MessageService::new().find_messages(&MessageFilter::default()),
        Err(FetchError::NoSource)
    ));
}

#[test]
fn empty_primary_without_fallback_is_empty() {
    let service = MessageService::new().with_primary(Fixed(Vec::new()));
    assert!(service.find_messages(&MessageFilter::default()).expect("find").is_empty());
}
