/*!
 * Scripted transport for testing.
 *
 * Replies are queued per operation and consumed in order; the last reply of
 * a queue is sticky so a script only needs to spell out what changes:
 * - `MockTransport::respond(op, body)` - queue a return value
 * - `MockTransport::fault(op, message)` - queue a SOAP fault
 * - `MockTransport::serve(url, body)` - serve a document for download
 *
 * Clones share their script and call log.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use super::{SoapParams, SoapTransport};
use crate::errors::ConnectorError;

/// A scripted reply to one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// The operation returns this value
    Body(String),
    /// The service answers with a fault
    Fault(String),
}

/// A call received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: String,
    pub params: SoapParams,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, VecDeque<MockReply>>,
    documents: HashMap<String, String>,
    calls: Vec<RecordedCall>,
    downloads: Vec<String>,
}

/// Mock transport for exercising the connector without a service
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a return value for an operation
    pub fn respond(self, operation: &str, body: impl Into<String>) -> Self {
        self.push(operation, MockReply::Body(body.into()));
        self
    }

    /// Queue a SOAP fault for an operation
    pub fn fault(self, operation: &str, message: impl Into<String>) -> Self {
        self.push(operation, MockReply::Fault(message.into()));
        self
    }

    /// Serve a document at a download URL
    pub fn serve(self, url: &str, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .documents
            .insert(url.to_string(), body.into());
        self
    }

    /// Queue a reply on a transport that is already shared
    pub fn push(&self, operation: &str, reply: MockReply) {
        self.state
            .lock()
            .replies
            .entry(operation.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Parameters of every call to one operation
    pub fn calls_to(&self, operation: &str) -> Vec<SoapParams> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .map(|call| call.params.clone())
            .collect()
    }

    /// Operation names in call order
    pub fn operations(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .map(|call| call.operation.clone())
            .collect()
    }

    /// Downloaded URLs in order
    pub fn downloads(&self) -> Vec<String> {
        self.state.lock().downloads.clone()
    }
}

#[async_trait]
impl SoapTransport for MockTransport {
    async fn call(&self, operation: &str, params: &SoapParams) -> Result<String, ConnectorError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            operation: operation.to_string(),
            params: params.clone(),
        });

        let reply = match state.replies.get_mut(operation) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(MockReply::Body(body)) => Ok(body),
            Some(MockReply::Fault(message)) => Err(ConnectorError::transport(
                operation,
                format!("SOAP fault soapenv:Server: {}", message),
            )),
            None => Err(ConnectorError::transport(operation, "no scripted reply")),
        }
    }

    async fn download(&self, url: &str) -> Result<String, ConnectorError> {
        let mut state = self.state.lock();
        state.downloads.push(url.to_string());
        state
            .documents
            .get(url)
            .cloned()
            .ok_or_else(|| ConnectorError::transport(url, "HTTP 404 Not Found"))
    }
}
