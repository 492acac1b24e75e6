use axum::http::StatusCode;
use axum_test::TestServer;
use log_reporter::app::router::main_router;
use log_reporter::domain::{LinePattern, LogData};
use log_reporter::extractor::LogExtractor;
use log_reporter::registration::{RegistrationClient, RegistrationConfig};
use log_reporter::test_support::MockDiagnostics;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAMES: &str = "host;id;localDateTime;duration;status;size;verb;path;query";
const REGEXP: &str = r"\[([^\]]*)\] \[([^\]]*)\] \[([^\]]*)\] \[\s*(\d+) ms\] \[(\d+)\] \[\s*(\d+)\] \[([^\]]*)\] \[([^\]]*)\] \[(.*)\]";

const LOG: &str = "\
[h1] [id1] [2016-06-23T17:50:27.468 +0100] [ 19 ms] [200] [ 12] [GET] [/a.dods] [q1]
this line is not an access log entry

[h2] [id2] [2016-06-23T17:51:00.000 +0100] [ 5 ms] [404] [ 0] [GET] [/b.dods] []
[h3] [id3] [2016-06-23T17:52:00.000 +0100] [ 7 ms] [200] [ 99] [POST] [/c.dods] [x[0:1:2]]
";

fn write_log(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn registration_client(collector: &str, identifier_path: PathBuf) -> Arc<RegistrationClient> {
    Arc::new(
        RegistrationClient::new(RegistrationConfig {
            collector_url: format!("{}/registration?", collector.trim_start_matches("http://")),
            identifier_path,
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap(),
    )
}

fn test_server(log_file: &Path, registration: Arc<RegistrationClient>) -> TestServer {
    let extractor = Arc::new(LogExtractor::new(
        log_file,
        LinePattern::new(NAMES, REGEXP),
        Arc::new(MockDiagnostics::new()),
    ));
    TestServer::new(main_router(extractor, registration)).unwrap()
}

fn statuses(data: &LogData) -> Vec<&str> {
    data.lines
        .iter()
        .map(|line| line.0.get("status").map(String::as_str).unwrap_or(""))
        .collect()
}

#[tokio::test]
async fn test_log_returns_all_matching_lines_in_order() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server.get("/log").await;

    response.assert_status_ok();
    let data: LogData = response.json();
    assert_eq!(data.lines.len(), 3);
    assert_eq!(statuses(&data), vec!["200", "404", "200"]);
    assert_eq!(
        data.lines[2].0.get("query").map(String::as_str),
        Some("x[0:1:2]")
    );
}

#[tokio::test]
async fn test_log_body_has_lines_field() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server.get("/log").await;
    let json: serde_json::Value = response.json();

    let lines = json["lines"].as_array().unwrap();
    assert_eq!(lines[0]["host"], "h1");
    assert_eq!(lines[0]["localDateTime"], "2016-06-23T17:50:27.468 +0100");
}

#[tokio::test]
async fn test_log_since_is_exclusive() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    // h2 is 16:51:00 UTC
    let response = server
        .get("/log")
        .add_query_param("since", "2016-06-23T16:51:00")
        .await;

    response.assert_status_ok();
    let data: LogData = response.json();
    assert_eq!(data.lines.len(), 1);
    assert_eq!(data.lines[0].0.get("host").map(String::as_str), Some("h3"));
}

#[tokio::test]
async fn test_log_empty_since_means_everything() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server.get("/log").add_query_param("since", "").await;

    response.assert_status_ok();
    let data: LogData = response.json();
    assert_eq!(data.lines.len(), 3);
}

#[tokio::test]
async fn test_log_rejects_unparsable_since() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server
        .get("/log")
        .add_query_param("since", "last tuesday")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_log_missing_file_is_server_error() {
    let dir = TempDir::new().unwrap();
    let server = test_server(
        &dir.path().join("missing.log"),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server.get("/log").expect_failure().await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_log_since_without_time_field_is_server_error() {
    let log = write_log("[h1] [200]\n[h2] [404]\n");
    let dir = TempDir::new().unwrap();
    let extractor = Arc::new(LogExtractor::new(
        log.path(),
        LinePattern::new("host;status", r"\[([^\]]*)\] \[(\d+)\]"),
        Arc::new(MockDiagnostics::new()),
    ));
    let server = TestServer::new(main_router(
        extractor,
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    ))
    .unwrap();

    let response = server.get("/log").await;
    response.assert_status_ok();
    assert_eq!(response.json::<LogData>().lines.len(), 2);

    let response = server
        .get("/log")
        .add_query_param("since", "2016-06-23T16:51:00")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_healthcheck_returns_version() {
    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let server = test_server(
        log.path(),
        registration_client("127.0.0.1:9", dir.path().join("reporter.uuid")),
    );

    let response = server.get("/healthcheck").await;

    response.assert_status_ok();
    response.assert_text(format!(
        "Reporter Application, Version = {}",
        log_reporter::VERSION
    ));
}

#[tokio::test]
async fn test_register_replaces_existing_identifier() {
    let collector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/registration"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"serverUUID":"new-id"}"#))
        .expect(1)
        .mount(&collector)
        .await;

    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let identifier_path = dir.path().join("reporter.uuid");
    std::fs::write(&identifier_path, "old-id").unwrap();
    let server = test_server(
        log.path(),
        registration_client(&collector.uri(), identifier_path.clone()),
    );

    let response = server.get("/register").await;

    response.assert_status_ok();
    assert_eq!(std::fs::read_to_string(&identifier_path).unwrap(), "new-id");
}

#[tokio::test]
async fn test_register_failure_leaves_no_identifier() {
    let collector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/registration"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&collector)
        .await;

    let log = write_log(LOG);
    let dir = TempDir::new().unwrap();
    let identifier_path = dir.path().join("reporter.uuid");
    std::fs::write(&identifier_path, "old-id").unwrap();
    let server = test_server(
        log.path(),
        registration_client(&collector.uri(), identifier_path.clone()),
    );

    let response = server.get("/register").expect_failure().await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    // the old marker was deleted on request and nothing replaced it
    assert!(!identifier_path.exists());
}
