use super::*;

#[test]
fn defaults_are_valid() {
    let config = MinerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.weight, WeightMode::Churn);
    assert!((config.half_life_secs() - 180.0 * 86_400.0).abs() < 1e-6);
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = MinerConfig::from_toml("half_life_days = 30\nweight = \"added\"\n").unwrap();
    assert!((config.half_life_days - 30.0).abs() < 1e-9);
    assert_eq!(config.weight, WeightMode::Added);
    assert_eq!(config.max_commit_files, 50);
}

#[test]
fn exclude_patterns_parse() {
    let config = MinerConfig::from_toml("exclude = [\"vendor/**\", \"*.snap\"]").unwrap();
    assert_eq!(config.exclude, vec!["vendor/**", "*.snap"]);
}

#[test]
fn unknown_key_rejected() {
    let err = MinerConfig::from_toml("half_lfe_days = 3").unwrap_err();
    assert!(matches!(err, MineError::Config(_)));
}

#[test]
fn zero_half_life_rejected() {
    let err = MinerConfig::from_toml("half_life_days = 0").unwrap_err();
    assert!(err.to_string().contains("half_life_days"), "got: {err}");
}

#[test]
fn negative_weight_rejected() {
    let err = MinerConfig::from_toml("directory_weight = -1.0").unwrap_err();
    assert!(err.to_string().contains("directory_weight"), "got: {err}");
}

#[test]
fn weight_modes() {
    assert_eq!(WeightMode::Churn.weight(10, 3), 13);
    assert_eq!(WeightMode::Added.weight(10, 3), 10);
}

#[test]
fn load_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = MinerConfig::load(None, dir.path()).unwrap();
    assert!((config.half_life_days - 180.0).abs() < 1e-9);
}

#[test]
fn load_reads_repository_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "include_tests = true\n").unwrap();
    let config = MinerConfig::load(None, dir.path()).unwrap();
    assert!(config.include_tests);
}

#[test]
fn load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = MinerConfig::load(Some(&missing), dir.path()).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
