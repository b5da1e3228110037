use std::io::Write;

use pretty_assertions::assert_eq;
use strata_config::{init_tracing, CheckerConfig, ConfigError, LoggingConfig, StrataConfig};

#[test]
fn loads_both_sections_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
[logging]
level = "debug"
json = true

[checker]
max_hierarchy_depth = 32
"#
    )
    .expect("write config");

    let config = StrataConfig::load_from_path(file.path()).expect("config should load");
    assert_eq!(
        config,
        StrataConfig {
            logging: LoggingConfig {
                level: "debug".to_owned(),
                json: true,
                stderr: true,
            },
            checker: CheckerConfig {
                max_hierarchy_depth: 32,
            },
        }
    );
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("strata.toml");

    let err = StrataConfig::load_from_path(&path).expect_err("missing file should fail");
    let ConfigError::Io { path: reported, .. } = &err else {
        panic!("expected io error, got {err:?}");
    };
    assert_eq!(reported, &path.display().to_string());
}

#[test]
fn zero_hierarchy_depth_is_rejected() {
    let err = StrataConfig::load_from_str("[checker]\nmax_hierarchy_depth = 0\n")
        .expect_err("zero depth should be rejected");
    assert!(matches!(
        err,
        ConfigError::Invalid {
            key: "checker.max_hierarchy_depth",
            ..
        }
    ));
}

#[test]
fn excessive_hierarchy_depth_is_rejected() {
    let err = StrataConfig::load_from_str("[checker]\nmax_hierarchy_depth = 1000000\n")
        .expect_err("huge depth should be rejected");
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = StrataConfig::load_from_str("[checker]\nmax_depth = 3\n")
        .expect_err("unknown key should be rejected");
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn init_tracing_is_idempotent() {
    let config = LoggingConfig {
        level: "strata.types=trace,warn".to_owned(),
        json: false,
        stderr: false,
    };
    init_tracing(&config);
    init_tracing(&config);
    tracing::info!(target: "strata.config", "still usable after repeated init");
}
