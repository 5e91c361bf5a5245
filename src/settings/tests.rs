use super::keys;
use super::*;

#[test]
fn test_typed_getters_fall_back_to_defaults() {
    let settings = Settings::new();
    assert_eq!(settings.get_u64_or(keys::STRIPE_SIZE, 42).unwrap(), 42);
    assert!(settings.get_bool_or(keys::BLOCK_PADDING, true).unwrap());
    assert_eq!(settings.get_f64_or(keys::MEMORY_POOL, 0.5).unwrap(), 0.5);
}

#[test]
fn test_typed_getters_parse_and_trim() {
    let settings = Settings::new()
        .with(keys::STRIPE_SIZE, " 1048576 ")
        .with(keys::BLOCK_PADDING, "FALSE")
        .with(keys::MEMORY_POOL, "0.25");

    assert_eq!(settings.get_u64_or(keys::STRIPE_SIZE, 0).unwrap(), 1_048_576);
    assert!(!settings.get_bool_or(keys::BLOCK_PADDING, true).unwrap());
    assert_eq!(settings.get_f64_or(keys::MEMORY_POOL, 0.5).unwrap(), 0.25);
}

#[test]
fn test_invalid_values_report_key_and_text() {
    let settings = Settings::new()
        .with(keys::STRIPE_SIZE, "-5")
        .with(keys::ENABLE_INDEXES, "yes");

    let err = settings.get_u64_or(keys::STRIPE_SIZE, 0).unwrap_err();
    assert_eq!(err.key, keys::STRIPE_SIZE);
    assert_eq!(err.value, "-5");

    let err = settings.get_bool_or(keys::ENABLE_INDEXES, true).unwrap_err();
    assert_eq!(err.value, "yes");
}

#[test]
fn test_toml_tables_flatten_to_dotted_keys() {
    let toml = r#"
        [orc]
        compress = "SNAPPY"
        "compress.size" = 65536
        stripe.size = 67108864
        block.padding = false

        [hive.exec.orc]
        write.format = "0.11"
        memory.pool = 0.25
    "#;

    let settings = Settings::from_toml_str(toml).unwrap();
    assert_eq!(settings.get(keys::COMPRESSION), Some("SNAPPY"));
    assert_eq!(settings.get(keys::COMPRESSION_BLOCK_SIZE), Some("65536"));
    assert_eq!(settings.get(keys::STRIPE_SIZE), Some("67108864"));
    assert_eq!(settings.get(keys::BLOCK_PADDING), Some("false"));
    assert_eq!(settings.get(keys::WRITE_FORMAT), Some("0.11"));
    assert_eq!(settings.get_f64_or(keys::MEMORY_POOL, 0.5).unwrap(), 0.25);
    assert_eq!(settings.len(), 6);
}

#[test]
fn test_toml_rejects_arrays() {
    let err = Settings::from_toml_str("[orc]\ncompress = [\"ZLIB\"]\n").unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedValue(key) if key == "orc.compress"));
}

#[test]
fn test_empty_toml() {
    assert!(Settings::from_toml_str("").unwrap().is_empty());
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orc.toml");
    std::fs::write(&path, "[orc]\nrow.index.stride = 0\n").unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.get_u32_or(keys::ROW_INDEX_STRIDE, 10_000).unwrap(), 0);

    let missing = Settings::from_file(&dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(SettingsError::IoError(_))));
}

#[test]
fn test_apply_pairs() {
    let mut settings = Settings::new().with(keys::COMPRESSION, "ZLIB");
    settings
        .apply_pairs(["orc.compress=NONE", " orc.stripe.size =1024", "orc.compress=SNAPPY"])
        .unwrap();

    assert_eq!(settings.get(keys::COMPRESSION), Some("SNAPPY"));
    assert_eq!(settings.get(keys::STRIPE_SIZE), Some("1024"));

    assert!(matches!(
        settings.apply_pairs(["no-equals-sign"]),
        Err(SettingsError::MalformedPair(_))
    ));
    assert!(parse_pair("=value").is_err());
    assert_eq!(parse_pair("k=a=b").unwrap(), ("k".to_string(), "a=b".to_string()));
}

#[test]
fn test_collect_and_display() {
    let settings: Settings = vec![("b", 2), ("a", 1)].into_iter().collect();
    assert_eq!(settings.to_string(), "a=1\nb=2\n");
}
