use stock_selector::settings::Settings;

#[test]
fn defaults_without_a_file() {
    let settings = Settings::load_from("does_not_exist_stock_selector").expect("settings ok");
    assert!(!settings.server.address.is_empty());
    assert!(!settings.log.filter.is_empty());
}

#[test]
fn file_overrides_defaults() {
    let base = std::env::temp_dir().join(format!("stock_selector_settings_{}", std::process::id()));
    let file = base.with_extension("toml");
    std::fs::write(&file, "[server]\naddress = \"0.0.0.0:9000\"\n[log]\nfilter = \"debug\"\n").expect("write");
    let settings = Settings::load_from(base.to_str().expect("utf-8 path")).expect("settings ok");
    assert_eq!(settings.server.address, "0.0.0.0:9000");
    assert_eq!(settings.log.filter, "debug");
    let catalog = settings.filter_catalog().expect("built-in catalog");
    assert_eq!(catalog.primary_table, "cn_stock_bar1d");
    let _ = std::fs::remove_file(&file);
}
