/*!
 * Typed decoders for GlobalSight response payloads.
 *
 * The SOAP return values are themselves XML documents. Each shape gets its
 * own decoder so a change in the remote contract fails loudly instead of
 * silently producing an empty structure.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::xml::{tokenize, Node};
use crate::errors::ConnectorError;
use crate::status::JobState;

/// A file profile from `getFileProfileInfoEx`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProfile {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub source_locale: String,
    pub target_locales: Vec<String>,
}

impl FileProfile {
    pub fn locales(&self) -> LocaleSet {
        LocaleSet {
            source: vec![self.source_locale.clone()],
            target: self.target_locales.clone(),
        }
    }
}

/// Source and target locales served by a file profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSet {
    pub source: Vec<String>,
    pub target: Vec<String>,
}

/// All file profiles visible to the logged-in user, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileProfileListing {
    profiles: Vec<FileProfile>,
}

impl FileProfileListing {
    pub fn new(profiles: Vec<FileProfile>) -> Self {
        Self { profiles }
    }

    /// Decode a `<fileProfileInfo><fileProfile>...</fileProfile>...</fileProfileInfo>` document
    pub fn decode(xml: &str) -> Result<Self, ConnectorError> {
        const DOCUMENT: &str = "file profile listing";
        let nodes = tokenize(xml, DOCUMENT)?;
        let mut profiles = Vec::new();
        let mut path: Vec<&str> = Vec::new();
        let mut current: Option<ProfileBuilder> = None;

        for node in &nodes {
            match node {
                Node::Open(tag) => {
                    path.push(tag.as_str());
                    match path.as_slice() {
                        [_, "fileProfile"] => current = Some(ProfileBuilder::default()),
                        [_, "fileProfile", "localeInfo", "targetLocale"] => {
                            if let Some(builder) = current.as_mut() {
                                builder.target_locales.push(String::new());
                            }
                        }
                        _ => {}
                    }
                }
                Node::Text(text) => {
                    let Some(builder) = current.as_mut() else {
                        continue;
                    };
                    match path.as_slice() {
                        [_, "fileProfile", "id"] => builder.id.push_str(text),
                        [_, "fileProfile", "name"] => builder.name.push_str(text),
                        [_, "fileProfile", "description"] => builder
                            .description
                            .get_or_insert_with(String::new)
                            .push_str(text),
                        [_, "fileProfile", "localeInfo", "sourceLocale"] => {
                            builder.source_locale.push_str(text)
                        }
                        [_, "fileProfile", "localeInfo", "targetLocale"] => {
                            if let Some(locale) = builder.target_locales.last_mut() {
                                locale.push_str(text);
                            }
                        }
                        _ => {}
                    }
                }
                Node::Close(_) => {
                    if let [_, "fileProfile"] = path.as_slice() {
                        if let Some(builder) = current.take() {
                            profiles.push(builder.build(DOCUMENT)?);
                        }
                    }
                    path.pop();
                }
            }
        }

        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[FileProfile] {
        &self.profiles
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Look a profile up by identifier
    pub fn by_id(&self, id: &str) -> Option<&FileProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Look a profile up by name (linear scan)
    pub fn by_name(&self, name: &str) -> Option<&FileProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Profiles keyed by identifier
    pub fn into_map(self) -> IndexMap<String, FileProfile> {
        self.profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect()
    }
}

#[derive(Default)]
struct ProfileBuilder {
    id: String,
    name: String,
    description: Option<String>,
    source_locale: String,
    target_locales: Vec<String>,
}

impl ProfileBuilder {
    fn build(self, document: &'static str) -> Result<FileProfile, ConnectorError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ConnectorError::parse(document, "fileProfile without id"));
        }
        Ok(FileProfile {
            id,
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            source_locale: self.source_locale.trim().to_string(),
            target_locales: self
                .target_locales
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
        })
    }
}

/// Collect the text of every direct child of the root element, in order
fn root_children(xml: &str, document: &'static str) -> Result<Vec<(String, String)>, ConnectorError> {
    let nodes = tokenize(xml, document)?;
    let mut children = Vec::new();
    let mut depth = 0usize;

    for node in nodes {
        match node {
            Node::Open(tag) => {
                depth += 1;
                if depth == 2 {
                    children.push((tag, String::new()));
                }
            }
            Node::Text(text) => {
                if depth >= 2 {
                    if let Some((_, value)) = children.last_mut() {
                        value.push_str(&text);
                    }
                }
            }
            Node::Close(_) => depth = depth.saturating_sub(1),
        }
    }

    Ok(children)
}

/// The `getStatus` document: `<job><id/><name/><status/></job>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusReport {
    pub id: Option<String>,
    pub name: Option<String>,
    pub state: JobState,
}

impl JobStatusReport {
    pub fn decode(xml: &str) -> Result<Self, ConnectorError> {
        const DOCUMENT: &str = "job status";
        let mut id = None;
        let mut name = None;
        let mut state = None;

        for (tag, value) in root_children(xml, DOCUMENT)? {
            let value = value.trim().to_string();
            match tag.as_str() {
                "id" => id = Some(value),
                "name" => name = Some(value),
                "status" => state = Some(value),
                _ => {}
            }
        }

        let state = state
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConnectorError::parse(DOCUMENT, "missing status element"))?;

        Ok(Self {
            id: id.filter(|s| !s.is_empty()),
            name: name.filter(|s| !s.is_empty()),
            state: JobState::parse(&state),
        })
    }
}

/// The `getLocalizedDocuments` document, of which only `urlPrefix` is used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDocuments {
    pub url_prefix: String,
}

impl LocalizedDocuments {
    pub fn decode(xml: &str) -> Result<Self, ConnectorError> {
        const DOCUMENT: &str = "localized documents";
        root_children(xml, DOCUMENT)?
            .into_iter()
            .find(|(tag, _)| tag == "urlPrefix")
            .map(|(_, value)| value.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .map(|url_prefix| Self { url_prefix })
            .ok_or_else(|| ConnectorError::parse(DOCUMENT, "missing urlPrefix element"))
    }

    /// Download URL of an export path
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// The `getJobExportFiles` document: one `paths` element per exported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFiles {
    pub paths: Vec<String>,
}

impl ExportFiles {
    /// Empty `paths` entries are skipped
    pub fn decode(xml: &str) -> Result<Self, ConnectorError> {
        let paths = root_children(xml, "job export files")?
            .into_iter()
            .filter(|(tag, _)| tag == "paths")
            .map(|(_, value)| value.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect();
        Ok(Self { paths })
    }
}

/// The `cancelJob` acknowledgement as key/value pairs of the root's children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelAck {
    pub entries: IndexMap<String, String>,
}

impl CancelAck {
    /// An empty response is an acknowledgement without details
    pub fn decode(xml: &str) -> Result<Self, ConnectorError> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries = root_children(xml, "cancel acknowledgement")?
            .into_iter()
            .map(|(tag, value)| (tag, value.trim().to_string()))
            .collect();
        Ok(Self { entries })
    }
}
