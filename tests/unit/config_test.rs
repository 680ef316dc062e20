//! Tests for configuration loading and validation

use std::fs;

use rollcall::config::{Config, ConfigError};
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_full_file() {
    let (_dir, path) = write_config(
        r#"
[verification]
similarity_threshold = 0.75
min_matches = 3
reference_count = 5
embedding_dimension = 128

[network]
mask_bits = 16
allow_loopback = true

[identity]
key_pattern = "^S[0-9]{3}$"

[clock]
utc_offset = "-03:00"
"#,
    );

    let config = Config::load(&path).unwrap();
    let policy = config.verification_policy();
    assert!((policy.similarity_threshold - 0.75).abs() < f64::EPSILON);
    assert_eq!(policy.min_matches, 3);
    assert_eq!(policy.embedding_dimension, 128);

    let subnet = config.subnet_policy();
    assert_eq!(subnet.mask_bits, 16);
    assert_eq!(subnet.ipv6_prefix, 64);
    assert!(subnet.allow_loopback);

    assert!(config.key_format().unwrap().check("S042").is_ok());
    assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -3 * 3600);
}

#[test]
fn test_empty_file_is_default() {
    let (_dir, path) = write_config("");
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_unknown_type_is_parse_error() {
    let (_dir, path) = write_config("[verification]\nmin_matches = \"two\"\n");
    assert!(matches!(Config::load(&path).unwrap_err(), ConfigError::Parse { .. }));
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn test_out_of_range_values_rejected_on_load() {
    for content in [
        "[verification]\nsimilarity_threshold = 1.5\n",
        "[verification]\nmin_matches = 0\n",
        "[verification]\nreference_count = 0\n",
        "[verification]\nembedding_dimension = 0\n",
        "[network]\nmask_bits = 40\n",
        "[network]\nipv6_prefix = 129\n",
        "[identity]\nkey_pattern = \"([\"\n",
        "[clock]\nutc_offset = \"IST\"\n",
    ] {
        let (_dir, path) = write_config(content);
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{content}: {err}");
    }
}

#[test]
fn test_env_override_is_validated() {
    let mut config = Config::default();
    let err = config
        .apply_env_overrides_from(|var| {
            (var == "ROLLCALL_SIMILARITY_THRESHOLD").then(|| "2.0".to_string())
        })
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_no_env_leaves_config_untouched() {
    let mut config = Config::default();
    config.apply_env_overrides_from(|_| None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_summary_reports_source() {
    let (_dir, path) = write_config("[network]\nmask_bits = 20\n");
    let config = Config::load(&path).unwrap();
    let summary = config.summary(Some(&path));
    assert_eq!(summary.mask_bits, 20);
    assert_eq!(summary.source.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(Config::default().summary(None).source, None);
}
