// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::helpers::{create_test_app, query_body, sample_observations, TestApp};

async fn seeded_app() -> TestApp {
    let app = create_test_app().await;
    let url = app.put_source("icoads.json", &sample_observations());
    assert_eq!(app.ingest(&url, "job-1").await.0, StatusCode::CREATED);
    app
}

async fn query(app: &TestApp, body: Value) -> (StatusCode, Value) {
    app.send(Method::POST, "/1.0/query_data_doms", Some(body))
        .await
}

#[tokio::test]
async fn query_on_empty_store_returns_zero() {
    let app = create_test_app().await;
    let (status, body) = query(&app, query_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 0, "results": [] }));
}

#[tokio::test]
async fn query_returns_all_rows_without_internal_columns() {
    let app = seeded_app().await;
    let (status, body) = query(&app, query_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for row in results {
        assert!(row.get("time").is_some());
        assert!(row.get("time_obj").is_none());
        assert!(row.get("year").is_none());
        assert!(row.get("month").is_none());
    }
}

#[tokio::test]
async fn query_filters_by_provider_and_time() {
    let app = seeded_app().await;

    let mut body = query_body();
    body["provider"] = json!("NCAR");
    body["max_time"] = json!("2017-02-28T00:00:00Z");
    let (_, result) = query(&app, body).await;
    assert_eq!(result["total"], 2);

    let mut body = query_body();
    body["platform_code"] = json!("30");
    body["min_time"] = json!("2017-03-01T00:00:00Z");
    let (_, result) = query(&app, body).await;
    assert_eq!(result["total"], 1);
    assert_eq!(result["results"][0]["provider"], "Florida State University");
}

#[tokio::test]
async fn query_depth_range_keeps_missing_depth() {
    let app = seeded_app().await;
    let mut body = query_body();
    body["min_depth"] = json!(0.0);
    body["max_depth"] = json!(10.0);
    let (_, result) = query(&app, body).await;

    // depth 1.0 与缺失深度的观测
    assert_eq!(result["total"], 2);
}

#[tokio::test]
async fn query_variable_with_quality_flag_projection() {
    let app = seeded_app().await;
    let mut body = query_body();
    body["variable"] = json!(["air_temperature"]);
    body["quality_flag"] = json!(true);
    body["columns"] = json!(["platform_code"]);
    let (status, result) = query(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total"], 2);
    let row = result["results"][0].as_object().unwrap();
    assert!(row.contains_key("air_temperature"));
    assert!(!row.contains_key("wind_speed"));
}

#[tokio::test]
async fn query_paging() {
    let app = seeded_app().await;

    let mut body = query_body();
    body["start_from"] = json!(2);
    body["size"] = json!(5);
    let (_, result) = query(&app, body).await;
    assert_eq!(result["total"], 3);
    assert_eq!(result["results"].as_array().unwrap().len(), 1);

    let mut body = query_body();
    body["size"] = json!(0);
    let (_, result) = query(&app, body).await;
    assert_eq!(result["total"], 3);
    assert_eq!(result["results"], json!([]));
}

#[tokio::test]
async fn query_rejects_invalid_requests() {
    let app = seeded_app().await;

    let mut body = query_body();
    body.as_object_mut().unwrap().remove("min_lat_lon");
    let (status, result) = query(&app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["message"], "invalid request body");

    let mut body = query_body();
    body["max_lat_lon"] = json!([1.0, 2.0, 3.0]);
    assert_eq!(query(&app, body).await.0, StatusCode::BAD_REQUEST);

    let mut body = query_body();
    body["min_time"] = json!("last tuesday");
    assert_eq!(query(&app, body).await.0, StatusCode::BAD_REQUEST);

    let mut body = query_body();
    body["variable"] = json!(["salinity"]);
    assert_eq!(query(&app, body).await.0, StatusCode::BAD_REQUEST);

    let mut body = query_body();
    body["columns"] = json!(["time; DROP TABLE x"]);
    assert_eq!(query(&app, body).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_rejects_reversed_time_range() {
    let app = seeded_app().await;

    let mut body = query_body();
    body["min_time"] = json!("2018-01-01T00:00:00Z");
    body["max_time"] = json!("2017-01-01T00:00:00Z");
    let (status, result) = query(&app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["message"], "invalid query arguments");

    let mut body = query_body();
    body["min_time"] = json!("2017-05-01T00:00:00Z");
    body["max_time"] = json!("2017-02-01T00:00:00Z");
    assert_eq!(query(&app, body).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_negative_paging_counts_only() {
    let app = seeded_app().await;

    let mut body = query_body();
    body["size"] = json!(-1);
    let (status, result) = query(&app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({ "total": 3, "results": [] }));

    let mut body = query_body();
    body["start_from"] = json!(-3);
    let (status, result) = query(&app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn query_rows_share_the_same_keys() {
    let app = seeded_app().await;
    let (_, result) = query(&app, query_body()).await;

    let rows = result["results"].as_array().unwrap();
    let keys: Vec<Vec<&String>> = rows
        .iter()
        .map(|row| row.as_object().unwrap().keys().collect())
        .collect();
    assert!(keys.windows(2).all(|pair| pair[0] == pair[1]));
    for row in rows {
        assert!(row.get("air_temperature").is_some());
        assert!(row.get("wind_speed").is_some());
    }
}

#[tokio::test]
async fn query_after_jobs_with_conflicting_variable_types() {
    let app = create_test_app().await;
    let numeric = json!({
        "observations": [{"time": "2017-01-05T00:00:00Z", "latitude": 1.0, "longitude": 2.0,
                          "air_temperature": 20.5}]
    });
    let text = json!({
        "observations": [{"time": "2017-01-06T00:00:00Z", "latitude": 1.0, "longitude": 2.0,
                          "air_temperature": "n/a"}]
    });
    let url = app.put_source("numeric.json", &numeric);
    assert_eq!(app.ingest(&url, "job-1").await.0, StatusCode::CREATED);
    let url = app.put_source("text.json", &text);
    assert_eq!(app.ingest(&url, "job-2").await.0, StatusCode::CREATED);

    let (status, result) = query(&app, query_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total"], 2);
    let values: Vec<&Value> = result["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| &row["air_temperature"])
        .collect();
    assert!(values.contains(&&json!(20.5)));
    assert!(values.contains(&&Value::Null));
}
