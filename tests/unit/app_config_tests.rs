/*!
 * Tests for application configuration functionality
 */

use globalsight_connector::app_config::{Config, LogLevel, TokenPolicy};
use globalsight_connector::job_title::TitlePolicy;
use globalsight_connector::wire::NameEncoding;
use globalsight_connector::FileProfileRef;

use crate::common;

#[test]
fn test_save_thenFromFile_shouldKeepSettings() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.connector = common::connector_config("https://gs.example.com/ws");
    config.connector.token_policy = TokenPolicy::PerInstance;
    config.connector.name_encoding = NameEncoding::Escaped;
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.connector.endpoint, "https://gs.example.com/ws");
    assert_eq!(loaded.connector.file_profile, FileProfileRef::Id("12".to_string()));
    assert_eq!(loaded.connector.token_policy, TokenPolicy::PerInstance);
    assert_eq!(loaded.connector.name_encoding, NameEncoding::Escaped);
    assert_eq!(loaded.log_level, LogLevel::Debug);
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let result = Config::from_file(dir.path().join("absent.json"));
    assert!(result.is_err());
}

#[test]
fn test_fromFile_withInvalidJson_shouldMentionPath() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("conf.json"));
}

#[test]
fn test_fromFile_withFullJson_shouldReadEveryOption() {
    let dir = common::create_temp_dir().unwrap();
    let json = r#"{
        "connector": {
            "endpoint": "http://gs.local:8080/globalsight/services/AmbassadorWebService",
            "username": "drupal",
            "password": "secret",
            "file_profile": {"name": "drupal_xml"},
            "base_url": "https://www.example.org",
            "comment": "Nightly batch",
            "token_policy": "per_instance",
            "title_policy": {"mode": "anonymous_for_foreign_source", "primary_language": "en"},
            "name_encoding": "escaped",
            "upload_check": {"recheck_delay_ms": 2000, "max_rechecks": 3},
            "timeout_secs": 15,
            "proxy": {"host": "proxy.local", "port": 3128}
        },
        "database_path": "/tmp/gs/jobs.db",
        "log_level": "warn"
    }"#;
    let path = common::create_test_file(dir.path(), "conf.json", json).unwrap();

    let config = Config::from_file(&path).unwrap();
    let connector = &config.connector;
    assert_eq!(connector.file_profile, FileProfileRef::Name("drupal_xml".to_string()));
    assert_eq!(connector.comment, "Nightly batch");
    assert_eq!(
        connector.title_policy,
        TitlePolicy::AnonymousForForeignSource {
            primary_language: "en".to_string()
        }
    );
    assert_eq!(connector.upload_check.max_rechecks, 3);
    assert_eq!(connector.upload_check.recheck_delay_ms, 2000);
    assert_eq!(connector.timeout().as_secs(), 15);
    assert_eq!(connector.proxy.as_ref().map(|p| p.url()).as_deref(), Some("http://proxy.local:3128"));
    assert_eq!(config.log_level, LogLevel::Warn);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withUnknownPrimaryLanguage_shouldFail() {
    let mut config = Config::default();
    config.connector = common::connector_config("https://gs.example.com/ws");
    config.connector.title_policy = TitlePolicy::AnonymousForForeignSource {
        primary_language: "xx".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_default_config_shouldNotValidate() {
    // the generated default file still needs an endpoint and credentials
    assert!(Config::default().validate().is_err());
}
