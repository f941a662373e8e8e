//! Flat event stream over an XML document, shared by the typed decoders.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::ConnectorError;

/// One structural step of a document, with namespace prefixes removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Open(String),
    /// Character data; adjacent text and CDATA runs are merged
    Text(String),
    Close(String),
}

/// Read a whole document into nodes
///
/// Declarations, comments and processing instructions are dropped. A document
/// without a root element or with unclosed elements is rejected.
pub(crate) fn tokenize(xml: &str, document: &'static str) -> Result<Vec<Node>, ConnectorError> {
    let mut reader = Reader::from_str(xml);
    let mut nodes = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 && seen_root {
                    return Err(ConnectorError::parse(document, "multiple root elements"));
                }
                depth += 1;
                seen_root = true;
                nodes.push(Node::Open(local_name(e.local_name().as_ref())));
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && seen_root {
                    return Err(ConnectorError::parse(document, "multiple root elements"));
                }
                seen_root = true;
                let name = local_name(e.local_name().as_ref());
                nodes.push(Node::Open(name.clone()));
                nodes.push(Node::Close(name));
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                nodes.push(Node::Close(local_name(e.local_name().as_ref())));
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ConnectorError::parse(document, err))?;
                if depth > 0 {
                    push_text(&mut nodes, &text);
                } else if !text.trim().is_empty() {
                    return Err(ConnectorError::parse(document, "text outside the root element"));
                }
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                push_text(&mut nodes, &String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ConnectorError::parse(
                    document,
                    format!("{} at position {}", err, reader.buffer_position()),
                ));
            }
        }
    }

    if !seen_root {
        return Err(ConnectorError::parse(document, "document has no root element"));
    }
    if depth != 0 {
        return Err(ConnectorError::parse(document, "unexpected end of document"));
    }

    Ok(nodes)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(existing)) = nodes.last_mut() {
        existing.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}
