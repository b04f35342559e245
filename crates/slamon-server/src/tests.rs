use crate::builders;
use crate::config::{Period, ServerConfig};
use std::time::Duration;

#[test]
fn config_defaults_apply_with_empty_document() {
    let config: ServerConfig = toml::from_str("").unwrap();
    assert_eq!(config.assessment.check_period.as_std(), Duration::from_secs(60));
    assert_eq!(config.assessment.transient_time.as_std(), Duration::ZERO);
    assert_eq!(config.repository.kind, "memory");
    assert_eq!(config.adapter.kind, "dummy");
    assert_eq!(config.adapter.size, 3);
    assert_eq!(config.notifier.kind, "log");
}

#[test]
fn period_accepts_bare_seconds_and_duration_strings() {
    let doc = r#"
        [assessment]
        check_period = "5m"
        transient_time = 90
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert_eq!(config.assessment.check_period.as_std(), Duration::from_secs(300));
    assert_eq!(config.assessment.transient_time.as_std(), Duration::from_secs(90));

    let doc = r#"
        [assessment]
        check_period = "500ms"
        transient_time = 1.5
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert_eq!(config.assessment.check_period.as_std(), Duration::from_millis(500));
    assert_eq!(config.assessment.transient_time.as_std(), Duration::from_millis(1500));
}

#[test]
fn period_rejects_garbage() {
    let doc = r#"
        [assessment]
        check_period = "soon"
    "#;
    assert!(toml::from_str::<ServerConfig>(doc).is_err());

    let doc = r#"
        [assessment]
        check_period = "10 fortnights"
    "#;
    assert!(toml::from_str::<ServerConfig>(doc).is_err());

    let doc = r#"
        [assessment]
        check_period = -5
    "#;
    assert!(toml::from_str::<ServerConfig>(doc).is_err());
}

#[test]
fn period_converts_to_chrono() {
    let period = Period(Duration::from_secs(10));
    assert_eq!(period.as_chrono(), chrono::Duration::seconds(10));
}

#[test]
fn notifier_section_flattens_backend_settings() {
    let doc = r#"
        [notifier]
        type = "webhook"
        url = "http://localhost:9999/hook"
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert_eq!(config.notifier.kind, "webhook");
    assert_eq!(config.notifier.settings["url"], "http://localhost:9999/hook");

    builders::build_notifier(&config.notifier).unwrap().unwrap();
}

#[test]
fn builders_reject_unknown_component_types() {
    let doc = r#"
        [repository]
        type = "oracle"
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert!(builders::build_repository(&config.repository).is_err());

    let doc = r#"
        [adapter]
        type = "crystal-ball"
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert!(builders::build_adapter(&config.adapter).is_err());

    let doc = r#"
        [notifier]
        type = "pigeon"
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert!(builders::build_notifier(&config.notifier).is_err());
}

#[test]
fn notifier_none_disables_notification() {
    let doc = r#"
        [notifier]
        type = "none"
    "#;
    let config: ServerConfig = toml::from_str(doc).unwrap();
    assert!(builders::build_notifier(&config.notifier).unwrap().is_none());
}
