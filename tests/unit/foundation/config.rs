use super::*;

#[test]
fn default_config_is_valid() {
    let cfg = OpBufferConfig::default();
    assert_eq!(cfg.page_size, 4096);
    assert_eq!(cfg.initial_capacity, 0);
    cfg.validate().unwrap();
}

#[test]
fn page_size_must_be_power_of_two() {
    let err = OpBufferConfig::default()
        .with_page_size(3000)
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("power of two"));
}

#[test]
fn page_size_must_cover_alignment() {
    assert!(OpBufferConfig::default().with_page_size(2).validate().is_err());
    OpBufferConfig::default()
        .with_page_size(RECORD_ALIGN)
        .validate()
        .unwrap();
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = OpBufferConfig::from_json_str(r#"{ "initial_capacity": 100 }"#).unwrap();
    assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(cfg.initial_capacity, 100);
}

#[test]
fn json_rejects_unknown_fields_and_bad_pages() {
    assert!(OpBufferConfig::from_json_str(r#"{ "pages": 1 }"#).is_err());
    assert!(OpBufferConfig::from_json_str(r#"{ "page_size": 100 }"#).is_err());
}
