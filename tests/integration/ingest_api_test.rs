// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::helpers::{create_test_app, sample_observations};

#[tokio::test]
async fn replace_json_s3_ingests_and_records_metadata() {
    let app = create_test_app().await;
    let url = app.put_source("icoads.json", &sample_observations());

    let (status, body) = app.ingest(&url, "job-1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "ingested" }));

    for (year, month) in [(2017, 1), (2017, 2), (2017, 3)] {
        assert!(app
            .store_dir
            .path()
            .join(format!("year={year}/month={month}/job-1.parquet"))
            .exists());
    }
    let tags = std::fs::read_to_string(app.source_dir.path().join("icoads.json.tags.json")).unwrap();
    let tags: serde_json::Value = serde_json::from_str(&tags).unwrap();
    assert_eq!(tags["job_id"], "job-1");
    assert!(tags["parquet_ingested"].is_string());

    let (status, record) = app.send(Method::GET, "/1.0/ingestions/job-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["uuid"], "job-1");
    assert_eq!(record["s3_url"], url);
    assert_eq!(record["records_count"], 3);
    assert_eq!(record["checksum"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn replace_json_s3_replaces_previous_job_data() {
    let app = create_test_app().await;
    let url = app.put_source("icoads.json", &sample_observations());
    assert_eq!(app.ingest(&url, "job-1").await.0, StatusCode::CREATED);

    let smaller = json!({
        "observations": [
            {"time": "2018-06-01T00:00:00Z", "latitude": 1.0, "longitude": 1.0}
        ]
    });
    let url = app.put_source("smaller.json", &smaller);
    assert_eq!(app.ingest(&url, "job-1").await.0, StatusCode::CREATED);

    assert!(!app.store_dir.path().join("year=2017/month=1/job-1.parquet").exists());
    assert!(app.store_dir.path().join("year=2018/month=6/job-1.parquet").exists());

    let (status, records) = app.send(Method::GET, "/1.0/ingestions?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records.as_array().unwrap().len(), 2);
    let (_, latest) = app.send(Method::GET, "/1.0/ingestions/job-1", None).await;
    assert_eq!(latest["records_count"], 1);
}

#[tokio::test]
async fn replace_json_s3_rejects_invalid_body() {
    let app = create_test_app().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/1.0/replace_json_s3",
            Some(json!({ "s3_url": "s3://bucket/key.json" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn replace_json_s3_rejects_unsafe_job_id() {
    let app = create_test_app().await;
    let url = app.put_source("icoads.json", &sample_observations());

    let (status, body) = app.ingest(&url, "a/b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request body");
    assert!(!app.source_dir.path().join("icoads.json.tags.json").exists());
}

#[tokio::test]
async fn replace_json_s3_reports_ingest_failures() {
    let app = create_test_app().await;

    let (status, body) = app.ingest("/no/such/observations.json", "job-1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to ingest to parquet");

    let url = app.put_source("broken.json", &json!({ "observations": [{ "depth": 1.0 }] }));
    let (status, body) = app.ingest(&url, "job-2").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["details"].as_str().unwrap().contains("time"));

    let (status, _) = app.send(Method::GET, "/1.0/ingestions/job-2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ingestions_list_validates_paging() {
    let app = create_test_app().await;

    let (status, body) = app.send(Method::GET, "/1.0/ingestions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.send(Method::GET, "/1.0/ingestions?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(Method::GET, "/1.0/ingestions?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
