/*!
 * Tests for job title generation
 */

use chrono::{TimeZone, Utc};
use globalsight_connector::job_title::{sanitize_label, title_hash, JobTitleGenerator, TitlePolicy};

#[test]
fn test_sanitizeLabel_withAnyInput_shouldOnlyKeepAllowedChars() {
    let labels = [
        "Hello World",
        "Über café: naïve façade",
        "tabs\tand\nnewlines\r\n",
        "<script>alert('x')</script>",
        "日本語のタイトル",
        "",
        &"long label ".repeat(40),
    ];

    for label in labels {
        let sanitized = sanitize_label(label);
        assert!(sanitized.len() <= 100, "too long: {}", sanitized);
        assert!(
            sanitized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "unexpected chars in {}",
            sanitized
        );
    }
}

#[test]
fn test_generate_shouldBeLabelPlusHashOfInstallJobAndSecond() {
    let generator = JobTitleGenerator::new("http://drupal.local", TitlePolicy::Label);
    let now = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();

    let title = generator.generate_at("42", "Hello World", None, now);
    let expected_hash = format!("{:x}", md5::compute("http://drupal.local421700000000"));

    assert_eq!(title, format!("Hello_World_{}", expected_hash));
    assert_eq!(title_hash("http://drupal.local", "42", 1_700_000_000), expected_hash);
}

#[test]
fn test_generate_withDifferentJobs_shouldDiffer() {
    let generator = JobTitleGenerator::new("http://drupal.local", TitlePolicy::Label);
    let now = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();

    assert_ne!(
        generator.generate_at("1", "Same", None, now),
        generator.generate_at("2", "Same", None, now)
    );
}

#[test]
fn test_generate_withPrimaryLanguageSource_shouldKeepLabel() {
    let generator = JobTitleGenerator::new(
        "http://drupal.local",
        TitlePolicy::AnonymousForForeignSource {
            primary_language: "en".to_string(),
        },
    );
    let now = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();

    assert!(generator.generate_at("1", "Page", Some("eng"), now).starts_with("Page_"));
    assert!(generator.generate_at("1", "Page", Some("fr"), now).starts_with("dp_"));
    assert!(generator.generate_at("1", "Page", None, now).starts_with("Page_"));
}
