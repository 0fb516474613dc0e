#![cfg(unix)]

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tabrec_fetch::{CommandSource, FallbackConfig, FetchError, MessageSource};
use tabrec_model::Severity;

fn shell(script: &str) -> CommandSource {
    CommandSource::new("/bin/sh").with_args(vec!["-c".to_string(), script.to_string()])
}

#[test]
fn parses_json_array_from_stdout() {
    let source = shell(
        r#"cat <<'JSON'
[{"id": "p-1", "collector": "b3", "severity": "success", "summary": "done",
  "dataset": "quotes", "createdAt": "2024-01-01T10:00:00Z", "metadata": {"rows": 3}},
 {"id": "p-2", "collector": "cvm", "severity": "INFO", "summary": "s",
  "createdAt": "2024-01-01T07:00:00-03:00"}]
JSON"#,
    );
    let records = source.fetch_messages().expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "p-1");
    assert_eq!(records[0].metadata.len(), 1);
    assert_eq!(records[1].dataset, "");
    assert_eq!(records[0].created_at, records[1].created_at);
}

#[test]
fn null_fields_take_record_defaults() {
    let source = shell(
        r#"cat <<'JSON'
[{"id": null, "collector": null, "severity": null, "summary": "  ", "dataset": null,
  "createdAt": "2024-01-01T10:00:00Z", "metadata": null},
 {"id": "p-2", "collector": "cvm", "severity": "ERROR", "summary": "s",
  "createdAt": "2024-01-01T11:00:00Z", "metadata": {"rows": 1}}]
JSON"#,
    );
    let records = source.fetch_messages().expect("records");
    assert_eq!(records.len(), 2);

    let defaulted = &records[0];
    assert!(!defaulted.id.is_empty());
    assert_eq!(defaulted.collector, tabrec_model::UNKNOWN_COLLECTOR);
    assert_eq!(defaulted.severity_level(), Severity::Unknown);
    assert_eq!(defaulted.summary, tabrec_model::MISSING_SUMMARY);
    assert_eq!(defaulted.dataset, "");
    assert!(defaulted.metadata.is_empty());

    assert_eq!(records[1].id, "p-2");
    assert_eq!(records[1].metadata.len(), 1);
}

#[test]
fn blank_stdout_means_no_messages() {
    let records = shell("echo '   '").fetch_messages().expect("empty");
    assert!(records.is_empty());
}

#[test]
fn passes_configured_environment() {
    let mut env = BTreeMap::new();
    env.insert("TABREC_ID".to_string(), "from-env".to_string());
    let source = shell(
        r#"printf '[{"id":"%s","collector":"c","severity":"INFO","summary":"s","createdAt":"2024-01-01T00:00:00Z"}]' "$TABREC_ID""#,
    )
    .with_env(env);
    let records = source.fetch_messages().expect("records");
    assert_eq!(records[0].id, "from-env");
}

#[test]
fn non_zero_exit_reports_status_and_streams() {
    let error = shell("echo partial; echo broken >&2; exit 3")
        .fetch_messages()
        .expect_err("exit failure");
    assert!(matches!(error, FetchError::CommandFailed { .. }));
    insta::assert_snapshot!(
        error.to_string(),
        @"fallback command /bin/sh exited with status 3 and stdout: partial; stderr: broken"
    );
}

#[test]
fn slow_command_is_killed() {
    let error = shell("exec sleep 5")
        .with_timeout(Duration::from_millis(200))
        .fetch_messages()
        .expect_err("timeout");
    assert!(matches!(error, FetchError::Timeout { .. }));
}

#[test]
fn timeout_holds_when_shell_children_keep_pipes_open() {
    let started = Instant::now();
    let error = shell("sleep 4; echo '[]'")
        .with_timeout(Duration::from_millis(200))
        .fetch_messages()
        .expect_err("timeout");
    assert!(matches!(error, FetchError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
}

#[test]
fn timeout_holds_with_background_descendants() {
    let started = Instant::now();
    let error = shell("(sleep 4; echo late) & sleep 4; echo '[]'")
        .with_timeout(Duration::from_millis(200))
        .fetch_messages()
        .expect_err("timeout");
    assert!(matches!(error, FetchError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
}

#[test]
fn invalid_json_is_an_error() {
    let error = shell("echo 'not json'").fetch_messages().expect_err("json");
    assert!(matches!(error, FetchError::FallbackJson { .. }));
}

#[test]
fn missing_program_fails_to_spawn() {
    let error = CommandSource::new("/nonexistent/tabrec-producer")
        .fetch_messages()
        .expect_err("spawn");
    assert!(matches!(error, FetchError::Spawn { .. }));
}

#[test]
fn disabled_config_builds_no_source() {
    let config = FallbackConfig {
        program: Some("/bin/true".into()),
        ..FallbackConfig::default()
    };
    assert!(CommandSource::from_config(&config).is_none());

    let enabled = FallbackConfig {
        enabled: true,
        ..config
    };
    let source = CommandSource::from_config(&enabled).expect("source");
    assert_eq!(source.program(), std::path::Path::new("/bin/true"));
}
