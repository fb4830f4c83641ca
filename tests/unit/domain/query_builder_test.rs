// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use cdms_parquet::domain::models::query_props::QueryProps;
use cdms_parquet::domain::services::query_builder::{Query, QueryError, QueryOptions};

/// 完整请求的条件顺序：provider、project、platform、时间、经纬度、深度、变量
#[test]
fn test_full_request_condition_order() {
    let props = QueryProps {
        provider: Some("NCAR".into()),
        project: Some("ICOADS Release 3.0".into()),
        platform_code: Some("30".into()),
        min_datetime: Some("2017-01-01T00:00:00Z".into()),
        max_datetime: Some("2017-03-31T00:00:00Z".into()),
        min_lat_lon: Some([-111.0, 11.0]),
        max_lat_lon: Some([111.0, 99.0]),
        min_depth: Some(-20.0),
        max_depth: Some(10.0),
        variable: vec!["air_temperature".into(), "wind_speed".into()],
        ..Default::default()
    };
    let query = Query::new(
        props,
        QueryOptions {
            missing_depth_value: -99999,
        },
    );

    let expected = [
        r#""provider" = 'NCAR'"#,
        r#""project" = 'ICOADS Release 3.0'"#,
        r#""platform_code" = '30'"#,
        r#""year" = 2017"#,
        r#""month" IN (1,2,3)"#,
        r#""time_obj" >= '2017-01-01T00:00:00Z'"#,
        r#""time_obj" <= '2017-03-31T00:00:00Z'"#,
        r#""latitude" >= -111"#,
        r#""longitude" >= 11"#,
        r#""latitude" <= 111"#,
        r#""longitude" <= 99"#,
        r#"(("depth" >= -20 AND "depth" <= 10) OR "depth" = -99999)"#,
        r#"("air_temperature" IS NOT NULL OR "wind_speed" IS NOT NULL)"#,
    ]
    .join(" AND ");
    assert_eq!(query.conditions().unwrap(), expected);
}

#[test]
fn test_multi_year_range_uses_year_list() {
    let query = Query::with_defaults(QueryProps {
        min_datetime: Some("2015-06-01T00:00:00Z".into()),
        max_datetime: Some("2017-02-01T00:00:00Z".into()),
        ..Default::default()
    });
    let conditions = query.time_conditions().unwrap().unwrap();
    assert_eq!(conditions[0], r#""year" IN (2015,2016,2017)"#);
    assert_eq!(conditions.len(), 3);
}

#[test]
fn test_literals_are_escaped() {
    let query = Query::with_defaults(QueryProps {
        project: Some("O'Brien".into()),
        ..Default::default()
    });
    assert_eq!(query.conditions().unwrap(), r#""project" = 'O''Brien'"#);
}

#[test]
fn test_select_statement_paging() {
    let query = Query::with_defaults(QueryProps {
        start_at: 20,
        size: 10,
        ..Default::default()
    });
    assert_eq!(
        query
            .select_statement("parquet_table", &["time".to_string(), "depth".to_string()])
            .unwrap(),
        r#"SELECT "time", "depth" FROM "parquet_table" LIMIT 10 OFFSET 20"#
    );
}

#[test]
fn test_invalid_inputs_are_reported() {
    let query = Query::with_defaults(QueryProps {
        max_datetime: Some("soon".into()),
        ..Default::default()
    });
    assert!(matches!(
        query.conditions(),
        Err(QueryError::InvalidDatetime { field: "max_time", .. })
    ));

    let query = Query::with_defaults(QueryProps {
        variable: vec!["bad name".into()],
        ..Default::default()
    });
    assert_eq!(
        query.variables_condition(),
        Err(QueryError::InvalidIdentifier("bad name".into()))
    );
}
