/*!
 * Host-side job types.
 *
 * A [`TranslationJob`] is what the host hands over for submission: its
 * identifier, a label, the language pair and the content fields. The remote
 * service only ever knows the job by the name in [`RemoteJobHandle`].
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConnectorError;
use crate::wire::{FieldMap, TranslatableField};

/// A host job ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationJob {
    /// Host job identifier
    pub job_id: String,

    /// Human readable label, used for the job title
    pub label: String,

    /// Host language code of the content
    #[serde(default)]
    pub source_language: Option<String>,

    /// GlobalSight target locale, e.g. `fr_FR`
    pub target_locale: String,

    /// Content fields in document order
    #[serde(default)]
    pub fields: FieldMap,
}

impl TranslationJob {
    pub fn new(
        job_id: impl Into<String>,
        label: impl Into<String>,
        target_locale: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            label: label.into(),
            source_language: None,
            target_locale: target_locale.into(),
            fields: FieldMap::new(),
        }
    }

    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    /// Append a field
    pub fn with_field(mut self, key: impl Into<String>, field: TranslatableField) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Replace the content fields
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    /// Number of fields that will be sent for translation
    pub fn translatable_count(&self) -> usize {
        self.fields.values().filter(|f| f.translate).count()
    }
}

/// Extracts the translatable content of a host job
///
/// The host decides which parts of its data are translatable; the
/// connector only sees the resulting ordered map.
pub trait FieldSource: Send + Sync {
    fn translatable_fields(&self, job: &TranslationJob) -> Result<FieldMap, ConnectorError>;
}

/// Uses the fields the job already carries, keeping the translatable ones
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedFields;

impl FieldSource for EmbeddedFields {
    fn translatable_fields(&self, job: &TranslationJob) -> Result<FieldMap, ConnectorError> {
        Ok(job
            .fields
            .iter()
            .filter(|(_, field)| field.translate)
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect())
    }
}

/// The remote identity of a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteJobHandle {
    pub job_name: String,
}

impl RemoteJobHandle {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
        }
    }
}

impl fmt::Display for RemoteJobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_name)
    }
}
