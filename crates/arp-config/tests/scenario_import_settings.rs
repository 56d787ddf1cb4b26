use arp_config::{load_layered_yaml_from_strings, ImportSettings, StoreSettings};
use arp_import::MergePolicy;

#[test]
fn absent_section_yields_defaults() {
    let cfg = load_layered_yaml_from_strings(&[]).unwrap();
    let s = ImportSettings::from_config_json(&cfg.config_json).unwrap();
    assert_eq!(s, ImportSettings::default());
    assert_eq!(s.to_options(), arp_import::ImportOptions::default());
    assert_eq!(StoreSettings::from_config_json(&cfg.config_json).unwrap().path, None);
}

#[test]
fn typed_values_are_read() {
    let cfg = load_layered_yaml_from_strings(&[
        "import:\n  chunk_size: 100\n  policy: insert_only\nstore:\n  path: /tmp/arp.json\n",
    ])
    .unwrap();
    let s = ImportSettings::from_config_json(&cfg.config_json).unwrap();
    assert_eq!(s.chunk_size, 100);
    assert_eq!(s.policy, MergePolicy::InsertOnly);
    assert!(!s.strict);
    assert_eq!(
        StoreSettings::from_config_json(&cfg.config_json).unwrap().path.as_deref(),
        Some("/tmp/arp.json")
    );
}

#[test]
fn invalid_values_are_rejected() {
    for yaml in [
        "import:\n  chunk_size: 0\n",
        "import:\n  chunk_size: -3\n",
        "import:\n  strict: \"yes\"\n",
        "import:\n  policy: MERGE\n",
    ] {
        let cfg = load_layered_yaml_from_strings(&[yaml]).unwrap();
        let err = ImportSettings::from_config_json(&cfg.config_json).unwrap_err();
        assert!(
            err.to_string().starts_with("CONFIG_INVALID"),
            "{yaml}: {err}"
        );
    }
}
