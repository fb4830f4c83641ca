// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use cdms_parquet::config::settings::Settings;

#[test]
fn test_settings_defaults() {
    let settings = Settings::from_defaults().expect("defaults should deserialize");

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9801);
    assert_eq!(settings.parquet.root, "./parquet_store");
    assert_eq!(settings.parquet.target_partitions, 4);
    assert_eq!(settings.ingest.working_dir, "/tmp");
    assert!(!settings.ingest.allow_local_sources);
    assert!(settings.aws.endpoint.is_none());
    assert!(!settings.metrics.enabled);
}

#[test]
fn test_settings_missing_depth_value() {
    let settings = Settings::from_defaults().unwrap();
    assert_eq!(settings.parquet.missing_depth_value().unwrap(), -99999);
}
