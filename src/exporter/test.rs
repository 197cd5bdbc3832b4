use crate::configuration::ArchiveConfig;
use crate::exporter::*;
use crate::gpsdo::Alarms;
use crate::gpsdo::FixQuality;
use crate::gpsdo::GpsdoStatus;

use chrono::TimeZone;
use chrono::Utc;

use hyper::Body;
use hyper::Request;
use hyper::StatusCode;

use std::fs;

use tempfile::tempdir;

fn locked() -> GpsdoStatus {
    GpsdoStatus {
        time: Some(Utc.with_ymd_and_hms(2024, 9, 14, 18, 18, 13).unwrap()),
        fix_quality: FixQuality::Gps,
        satellites: Some(8),
        locked: Some(true),
        sequence: 7,
        ..GpsdoStatus::default()
    }
}

async fn get(path: &str, reader: StatusReader) -> (StatusCode, String) {
    let request = Request::get(path).body(Body::empty()).unwrap();

    let response = handle(request, reader).await.unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[test]
fn test_snapshot_is_idempotent() {
    let exporter = StatusExporter::new(locked());

    assert_eq!(exporter.current_snapshot(), exporter.current_snapshot());
    assert_eq!(7, exporter.current_snapshot().sequence);
}

#[test]
fn test_replace() {
    let exporter = StatusExporter::new(GpsdoStatus::default());
    let reader = exporter.subscribe();

    exporter.replace(locked());

    assert_eq!(locked(), *reader.borrow());
    assert_eq!(locked(), exporter.current_snapshot());
}

#[test]
fn test_replace_without_readers() {
    let exporter = StatusExporter::new(GpsdoStatus::default());

    exporter.replace(locked());

    assert_eq!(locked(), exporter.current_snapshot());
}

#[tokio::test]
async fn test_handle_status() {
    let exporter = StatusExporter::new(locked());

    let (status, body) = get("/", exporter.subscribe()).await;

    assert_eq!(StatusCode::OK, status);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!("2024-09-14T18:18:13Z", json["time"]);
    assert_eq!("gps", json["fix_quality"]);
    assert_eq!(8, json["satellites"]);
    assert_eq!(true, json["locked"]);
    assert_eq!(7, json["sequence"]);
    assert_eq!(serde_json::json!([]), json["alarms"]);
}

#[tokio::test]
async fn test_handle_sees_replacement() {
    let exporter = StatusExporter::new(GpsdoStatus::default());
    let reader = exporter.subscribe();

    let (_, body) = get("/", reader.clone()).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!("no_fix", json["fix_quality"]);

    exporter.replace(GpsdoStatus {
        alarms: Alarms::ANTENNA | Alarms::HOLDOVER,
        ..locked()
    });

    let (_, body) = get("/", reader).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(serde_json::json!(["antenna", "holdover"]), json["alarms"]);
}

#[tokio::test]
async fn test_handle_health() {
    let exporter = StatusExporter::new(GpsdoStatus::default());

    assert_eq!(
        (StatusCode::OK, "OK".to_string()),
        get("/health", exporter.subscribe()).await
    );
}

#[tokio::test]
async fn test_handle_not_found() {
    let exporter = StatusExporter::new(GpsdoStatus::default());

    let (status, _) = get("/satellites", exporter.subscribe()).await;

    assert_eq!(StatusCode::NOT_FOUND, status);
}

#[test]
fn test_archive_record_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("status.jsonl");

    let exporter = StatusExporter::new(locked());
    let mut archive = Archive::new(&ArchiveConfig::new(&path));

    let first = Utc.with_ymd_and_hms(2024, 9, 14, 18, 19, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 9, 14, 18, 20, 0).unwrap();

    exporter.record_snapshot(&mut archive, first).unwrap();

    exporter.replace(GpsdoStatus {
        sequence: 8,
        ..locked()
    });

    exporter.record_snapshot(&mut archive, second).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(2, lines.len());
    assert_eq!("2024-09-14T18:19:00Z", lines[0]["recorded"]);
    assert_eq!(7, lines[0]["status"]["sequence"]);
    assert_eq!("2024-09-14T18:20:00Z", lines[1]["recorded"]);
    assert_eq!(8, lines[1]["status"]["sequence"]);
}

#[test]
fn test_archive_open_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("status.jsonl");

    let mut archive = Archive::new(&ArchiveConfig::new(&path));

    match archive.record_snapshot(&locked(), Utc::now()) {
        Err(ArchiveError::Open(p, _)) => assert_eq!(path, p),
        r => panic!("expected an open error, got {:?}", r),
    }
}
