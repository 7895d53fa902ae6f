use crate::config::{parse_sites, Config};
use crate::error::ConfigError;

#[test]
fn test_parse_sites_keeps_input_order() {
    let sites = parse_sites("A|http://a|c1|s1\nB|http://b|c2|s2").unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].name, "A");
    assert_eq!(sites[0].url, "http://a");
    assert_eq!(sites[0].client_id, "c1");
    assert_eq!(sites[0].client_secret, "s1");
    assert_eq!(sites[1].name, "B");
    assert_eq!(sites[1].client_secret, "s2");
}

#[test]
fn test_parse_sites_skips_blank_lines_and_carriage_returns() {
    let text = "PCF-PHX|https://opsmgr.phx.example.com/|automation|secret\r\n\n  \nPCF-EWD|https://opsmgr.ewd.example.com|automation|secret\n";
    let sites = parse_sites(text).unwrap();

    let names: Vec<&str> = sites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["PCF-PHX", "PCF-EWD"]);
    assert_eq!(sites[0].url, "https://opsmgr.phx.example.com");
    assert_eq!(sites[0].client_secret, "secret");
}

#[test]
fn test_parse_sites_secret_may_contain_pipe() {
    let sites = parse_sites("A|http://a|c1|se|cret").unwrap();
    assert_eq!(sites[0].client_secret, "se|cret");
}

#[test]
fn test_parse_sites_rejects_short_line() {
    let err = parse_sites("A|http://a|c1|s1\nB|http://b").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSite { line: 2 }));
}

#[test]
fn test_parse_sites_rejects_empty_field() {
    let err = parse_sites("A||c1|s1").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSite { line: 1 }));
}

#[test]
fn test_parse_sites_rejects_duplicate_names() {
    let err = parse_sites("A|http://a|c1|s1\nA|http://b|c2|s2").unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateSite(name) if name == "A"));
}

#[test]
fn test_resolve_without_any_source_is_an_error() {
    let err = Config::resolve(&[], None, None).unwrap_err();
    assert!(matches!(err, ConfigError::NoSites));

    let err = Config::resolve(&[], None, Some("\n  \n".to_string())).unwrap_err();
    assert!(matches!(err, ConfigError::NoSites));
}

#[test]
fn test_resolve_prefers_explicit_definitions() {
    let definitions = vec!["CLI|http://cli|c|s".to_string()];
    let config =
        Config::resolve(&definitions, None, Some("ENV|http://env|c|s".to_string())).unwrap();

    assert_eq!(config.sites.len(), 1);
    assert_eq!(config.sites[0].name, "CLI");
}

#[test]
fn test_resolve_falls_back_to_env() {
    let config = Config::resolve(&[], None, Some("ENV|http://env|c|s".to_string())).unwrap();
    assert_eq!(config.sites[0].name, "ENV");
    assert!(config.aliases.is_empty());
}

#[test]
fn test_config_file_loading() {
    let config_content = r#"
sites:
  - name: dev
    url: https://opsman.dev.example.com
    client_id: automation
    client_secret: s3cret
  - name: prod
    url: https://opsman.prod.example.com
    client_id: automation
    client_secret: s3cret
aliases:
  p-healthwatch: p-healthwatch
"#;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("sites.yaml");
    std::fs::write(&config_path, config_content).unwrap();

    let config = Config::resolve(&[], Some(config_path.as_path()), None).unwrap();

    assert_eq!(config.sites.len(), 2);
    assert_eq!(config.sites[1].name, "prod");
    assert_eq!(config.sites[1].client_secret, "s3cret");
    assert_eq!(config.aliases.get("p-healthwatch").map(String::as_str), Some("p-healthwatch"));
}

#[test]
fn test_config_file_rejects_duplicate_sites() {
    let config_content = r#"
sites:
  - { name: dev, url: "https://a", client_id: c, client_secret: s }
  - { name: dev, url: "https://b", client_id: c, client_secret: s }
"#;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("sites.yaml");
    std::fs::write(&config_path, config_content).unwrap();

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateSite(_)));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_file_normalizes_like_env() {
    let config_content = r#"
sites:
  - name: dev
    url: "https://opsman.dev.example.com/"
    client_id: automation
    client_secret: s3cret
"#;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("sites.yaml");
    std::fs::write(&config_path, config_content).unwrap();

    let from_file = Config::from_file(&config_path).unwrap();
    let from_env = parse_sites("dev|https://opsman.dev.example.com/|automation|s3cret").unwrap();

    assert_eq!(from_file.sites[0].url, "https://opsman.dev.example.com");
    assert_eq!(from_file.sites, from_env);
}

#[test]
fn test_config_file_rejects_empty_fields() {
    let config_content = r#"
sites:
  - { name: dev, url: "https://a", client_id: c, client_secret: s }
  - { name: "", url: "", client_id: "", client_secret: "" }
"#;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("sites.yaml");
    std::fs::write(&config_path, config_content).unwrap();

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSite { line: 2 }));
}
