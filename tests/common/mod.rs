/*!
 * Common test utilities for the globalsight-connector test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use globalsight_connector::soap::MockTransport;
use globalsight_connector::{ConnectorConfig, FileProfileRef, TranslatableField, TranslationJob};

/// `getFileProfileInfoEx` listing with two profiles
pub const PROFILE_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fileProfileInfo>
  <fileProfile>
    <id>12</id>
    <name>drupal_xml</name>
    <description>Drupal content</description>
    <localeInfo>
      <sourceLocale>en_US</sourceLocale>
      <targetLocale>fr_FR</targetLocale>
      <targetLocale>de_DE</targetLocale>
    </localeInfo>
  </fileProfile>
  <fileProfile>
    <id>13</id>
    <name>japanese</name>
    <localeInfo>
      <sourceLocale>en_US</sourceLocale>
      <targetLocale>ja_JP</targetLocale>
    </localeInfo>
  </fileProfile>
</fileProfileInfo>"#;

/// A `getStatus` document reporting `state`
pub fn status_document(job_name: &str, state: &str) -> String {
    format!(
        "<job><id>7</id><name>{}</name><status>{}</status></job>",
        job_name, state
    )
}

/// A fields document as served by the export download
pub fn export_document(job_id: &str, fields: &[(&str, &str)]) -> String {
    let mut xml = format!("<?xml version='1.0' encoding='UTF-8' ?><fields id='{}'>", job_id);
    for (name, value) in fields {
        xml.push_str(&format!(
            "<field><name>{}</name><value><![CDATA[{}]]></value></field>",
            name, value
        ));
    }
    xml.push_str("</fields>");
    xml
}

/// Connector settings pointing at `endpoint` with profile id 12
pub fn connector_config(endpoint: &str) -> ConnectorConfig {
    ConnectorConfig::new(
        endpoint,
        "drupal",
        "secret",
        FileProfileRef::Id("12".to_string()),
    )
}

/// A transport that logs in and lists [`PROFILE_LISTING`]
pub fn logged_in_transport() -> MockTransport {
    MockTransport::new()
        .respond("login", "token-1")
        .respond("getFileProfileInfoEx", PROFILE_LISTING)
}

/// A transport that accepts one submission
pub fn accepting_transport() -> MockTransport {
    logged_in_transport()
        .respond("uploadFile", "")
        .respond("createJob", "")
        .respond("getStatus", status_document("job", "LEVERAGING"))
}

/// The article job used across tests
pub fn article_job() -> TranslationJob {
    TranslationJob::new("42", "Hello World", "fr_FR")
        .with_source_language("en")
        .with_field("title", TranslatableField::translatable("Hello World"))
        .with_field("body", TranslatableField::untranslatable("ignored"))
}

/// Route library logs to the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}
