/*!
 * Job title generation.
 *
 * GlobalSight recognises a job only by its name, which doubles as a human
 * readable label. Titles are the sanitized host label followed by an MD5
 * trail over the installation id, host job id and submission second.
 */

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language_utils;

/// Maximum length of the label part of a title
pub const MAX_LABEL_LENGTH: usize = 100;

/// Prefix used when the label is left out of the title
pub const ANONYMOUS_PREFIX: &str = "dp";

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid title filter pattern"));

/// How the human part of a job title is chosen
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TitlePolicy {
    /// Always use the sanitized job label
    #[default]
    Label,
    /// Use `dp_<hash>` when the content is not in the primary language
    AnonymousForForeignSource {
        /// Primary language code of the installation
        primary_language: String,
    },
}

/// Replace whitespace with `_`, strip everything outside `[A-Za-z0-9_]`
/// and cap the result at [`MAX_LABEL_LENGTH`] characters
pub fn sanitize_label(label: &str) -> String {
    let underscored = label.replace([' ', '\t', '\n', '\r'], "_");
    let mut sanitized = DISALLOWED_CHARS.replace_all(&underscored, "").into_owned();
    // only ASCII survives the filter, so byte truncation is char-safe
    sanitized.truncate(MAX_LABEL_LENGTH);
    sanitized
}

/// Hex MD5 over installation id, host job id and unix seconds
pub fn title_hash(base_id: &str, job_id: &str, unix_seconds: i64) -> String {
    let input = format!("{}{}{}", base_id, job_id, unix_seconds);
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Generates job titles for one installation
#[derive(Debug, Clone)]
pub struct JobTitleGenerator {
    base_id: String,
    policy: TitlePolicy,
}

impl JobTitleGenerator {
    pub fn new(base_id: impl Into<String>, policy: TitlePolicy) -> Self {
        Self {
            base_id: base_id.into(),
            policy,
        }
    }

    /// Generate a title stamped with the current time
    pub fn generate(&self, job_id: &str, label: &str, source_language: Option<&str>) -> String {
        self.generate_at(job_id, label, source_language, Utc::now())
    }

    /// Generate a title stamped with the given time
    pub fn generate_at(
        &self,
        job_id: &str,
        label: &str,
        source_language: Option<&str>,
        now: DateTime<Utc>,
    ) -> String {
        let hash = title_hash(&self.base_id, job_id, now.timestamp());

        if self.is_anonymous(source_language) {
            return format!("{}_{}", ANONYMOUS_PREFIX, hash);
        }

        format!("{}_{}", sanitize_label(label), hash)
    }

    fn is_anonymous(&self, source_language: Option<&str>) -> bool {
        match (&self.policy, source_language) {
            (TitlePolicy::AnonymousForForeignSource { primary_language }, Some(source)) => {
                !(source.eq_ignore_ascii_case(primary_language)
                    || language_utils::language_codes_match(source, primary_language))
            }
            _ => false,
        }
    }
}
