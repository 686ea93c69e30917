use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "IVYPICK_ENV"));
}

#[test]
fn build_app_config_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.catalog_path.to_string_lossy(),
        "./config/products.yaml"
    );
    assert!(cfg.overrides_path.is_none());
    assert_eq!(cfg.output_dir.to_string_lossy(), "./output");
    assert_eq!(cfg.combo_default_unit_count, 10);
}

#[test]
fn build_app_config_reads_overrides_path() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_OVERRIDES_PATH", "/srv/ivypick/overrides.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.overrides_path.as_deref().map(|p| p.to_string_lossy().into_owned()),
        Some("/srv/ivypick/overrides.yaml".to_string())
    );
}

#[test]
fn build_app_config_blank_overrides_path_is_none() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_OVERRIDES_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.overrides_path.is_none());
}

#[test]
fn build_app_config_catalog_path_override() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_CATALOG_PATH", "/etc/ivypick/products.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.catalog_path.to_string_lossy(),
        "/etc/ivypick/products.yaml"
    );
}

#[test]
fn build_app_config_unit_count_override() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_COMBO_DEFAULT_UNIT_COUNT", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.combo_default_unit_count, 15);
}

#[test]
fn build_app_config_unit_count_invalid() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_COMBO_DEFAULT_UNIT_COUNT", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "IVYPICK_COMBO_DEFAULT_UNIT_COUNT"),
        "expected InvalidEnvVar(IVYPICK_COMBO_DEFAULT_UNIT_COUNT), got: {result:?}"
    );
}

#[test]
fn build_app_config_unit_count_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_COMBO_DEFAULT_UNIT_COUNT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref reason, .. }) if reason.contains("greater than zero")),
        "expected InvalidEnvVar for zero unit count, got: {result:?}"
    );
}

#[test]
fn build_app_config_invalid_env_propagates() {
    let mut map = HashMap::new();
    map.insert("IVYPICK_ENV", "prod");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "IVYPICK_ENV"),
        "expected InvalidEnvVar(IVYPICK_ENV), got: {result:?}"
    );
}
