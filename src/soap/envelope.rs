//! SOAP 1.1 RPC envelopes: request building and response/fault decoding.

use quick_xml::escape::escape;

use super::SoapParams;
use crate::errors::ConnectorError;
use crate::wire::xml::{tokenize, Node};

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Build the request envelope for an operation
///
/// The operation element is qualified with the service namespace and each
/// parameter becomes an unqualified child with escaped text.
pub fn build_request(namespace: &str, operation: &str, params: &SoapParams) -> String {
    let mut body = String::new();
    for (name, value) in params.iter() {
        body.push_str(&format!("<{name}>{}</{name}>", escape(value)));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"{ENVELOPE_NS}\" xmlns:gs=\"{}\">\
         <soapenv:Body><gs:{operation}>{body}</gs:{operation}></soapenv:Body>\
         </soapenv:Envelope>",
        escape(namespace)
    )
}

/// Extract the return value of `operation` from a response envelope
///
/// The first element inside `Body` is either a `Fault` or the operation's
/// response wrapper; the text of the wrapper's first child is the return
/// value. A wrapper without children is a void return.
pub fn parse_response(operation: &str, envelope: &str) -> Result<String, ConnectorError> {
    let nodes = tokenize(envelope, "SOAP envelope")?;
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut body_done = false;
    let mut payload: Option<String> = None;
    let mut child: Option<String> = None;
    let mut child_count = 0usize;
    let mut value = String::new();
    let mut fault_code = String::new();
    let mut fault_string = String::new();

    for node in nodes {
        match node {
            Node::Open(tag) => {
                depth += 1;
                match body_depth {
                    None if tag == "Body" && !body_done => body_depth = Some(depth),
                    Some(body) if depth == body + 1 && payload.is_none() => payload = Some(tag),
                    Some(body) if depth == body + 2 && payload.is_some() => {
                        child_count += 1;
                        child = Some(tag);
                    }
                    _ => {}
                }
            }
            Node::Text(text) => {
                let Some(body) = body_depth else { continue };
                if depth < body + 2 {
                    continue;
                }
                match (payload.as_deref(), child.as_deref()) {
                    (Some("Fault"), Some("faultcode")) => fault_code.push_str(&text),
                    (Some("Fault"), Some("faultstring")) => fault_string.push_str(&text),
                    (Some(p), Some(_)) if p != "Fault" && child_count == 1 => value.push_str(&text),
                    _ => {}
                }
            }
            Node::Close(_) => {
                if let Some(body) = body_depth {
                    if depth == body + 2 {
                        child = None;
                    }
                    if depth == body {
                        body_depth = None;
                        body_done = true;
                    }
                }
                depth -= 1;
            }
        }
    }

    match payload.as_deref() {
        None => Err(ConnectorError::parse(
            "SOAP envelope",
            format!("no body payload in response to '{}'", operation),
        )),
        Some("Fault") => Err(ConnectorError::transport(
            operation,
            format!("SOAP fault {}: {}", fault_code.trim(), fault_string.trim()),
        )),
        Some(_) => Ok(value),
    }
}
