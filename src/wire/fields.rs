/*!
 * The fields document.
 *
 * Uploads and export downloads share one shape:
 *
 * ```xml
 * <fields id='{jobId}'><field><name>{key}</name><value><![CDATA[{text}]]></value></field>...</fields>
 * ```
 */

use indexmap::IndexMap;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use super::xml::{tokenize, Node};
use crate::errors::ConnectorError;

/// File name under which the document is uploaded
pub const UPLOAD_FILE_NAME: &str = "GlobalSight.xml";

/// A piece of host content and whether it should be sent for translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableField {
    pub text: String,
    #[serde(default = "default_translate")]
    pub translate: bool,
}

impl TranslatableField {
    pub fn translatable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translate: true,
        }
    }

    pub fn untranslatable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translate: false,
        }
    }
}

fn default_translate() -> bool {
    true
}

/// Host fields in insertion order
pub type FieldMap = IndexMap<String, TranslatableField>;

/// How field names are written into the document
///
/// GlobalSight has always received names verbatim, so a key containing `<`
/// or `&` produces a malformed document. `Escaped` fixes that at the cost of
/// sending different bytes for such keys.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NameEncoding {
    #[default]
    Raw,
    Escaped,
}

/// Encode the translatable fields of a job
pub fn encode_fields(job_id: &str, fields: &FieldMap, names: NameEncoding) -> String {
    let mut xml = String::from("<?xml version='1.0' encoding='UTF-8' ?>");
    xml.push_str(&format!("<fields id='{}'>", escape(job_id)));

    for (key, field) in fields.iter().filter(|(_, field)| field.translate) {
        let name = match names {
            NameEncoding::Raw => key.clone(),
            NameEncoding::Escaped => escape(key.as_str()).into_owned(),
        };
        xml.push_str("<field>");
        xml.push_str(&format!("<name>{}</name>", name));
        xml.push_str(&format!("<value><![CDATA[{}]]></value>", cdata_safe(&field.text)));
        xml.push_str("</field>");
    }

    xml.push_str("</fields>");
    xml
}

/// Split `]]>` across two CDATA sections so the section cannot end early
fn cdata_safe(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

/// Decode every `field/name` + `field/value` pair under the root element
///
/// Names are trimmed, values are kept verbatim. A repeated name keeps the
/// last value.
///
/// Only the direct text of `value` is read. Markup exported without CDATA,
/// such as `Hello <b>bold</b> end`, loses the text of its child elements
/// and decodes to `"Hello  end"`.
pub fn decode_fields(xml: &str) -> Result<IndexMap<String, String>, ConnectorError> {
    let nodes = tokenize(xml, "fields document")?;
    let mut decoded = IndexMap::new();
    let mut path: Vec<&str> = Vec::new();
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;

    for node in &nodes {
        match node {
            Node::Open(tag) => {
                path.push(tag.as_str());
                match path.as_slice() {
                    [_, "field"] => {
                        name = None;
                        value = None;
                    }
                    [_, "field", "name"] => name = Some(String::new()),
                    [_, "field", "value"] => value = Some(String::new()),
                    _ => {}
                }
            }
            Node::Text(text) => match path.as_slice() {
                [_, "field", "name"] => name.get_or_insert_with(String::new).push_str(text),
                [_, "field", "value"] => value.get_or_insert_with(String::new).push_str(text),
                _ => {}
            },
            Node::Close(_) => {
                if let [_, "field"] = path.as_slice() {
                    if let Some(key) = name.take() {
                        decoded.insert(key.trim().to_string(), value.take().unwrap_or_default());
                    }
                }
                path.pop();
            }
        }
    }

    Ok(decoded)
}
