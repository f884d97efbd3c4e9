use serde_json::Value;

use crate::pipeline::{should_process, Disposition, InputClass};

/// The three untrusted input values of one request.
///
/// `query` and `params` are always present (possibly as empty objects);
/// a request without a body has no `payload`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInputs {
    /// URL query parameters
    pub query: Value,
    /// Route parameters
    pub params: Value,
    /// Request body, if any
    pub payload: Option<Value>,
}

impl RequestInputs {
    /// Creates inputs for a request without a body.
    pub fn new(query: Value, params: Value) -> Self {
        Self {
            query,
            params,
            payload: None,
        }
    }

    /// Attaches a request body.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns `true` if no input would enter the pipeline.
    pub fn is_blank(&self) -> bool {
        !should_process(&self.query)
            && !should_process(&self.params)
            && !self.payload.as_ref().is_some_and(should_process)
    }
}

impl Default for RequestInputs {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()), Value::Object(Default::default()))
    }
}

/// The replacement inputs for a request and what happened to each.
#[derive(Debug, Clone, PartialEq)]
pub struct Disinfected {
    /// The values to substitute into the request
    pub inputs: RequestInputs,
    /// Query outcome
    pub query: Disposition,
    /// Route-parameter outcome
    pub params: Disposition,
    /// Payload outcome (`Skipped` when there is no payload)
    pub payload: Disposition,
}

impl Disinfected {
    /// Hands `inputs` back untouched.
    pub fn skipped(inputs: RequestInputs) -> Self {
        Self {
            inputs,
            query: Disposition::Skipped,
            params: Disposition::Skipped,
            payload: Disposition::Skipped,
        }
    }

    /// Returns the outcome for one class.
    pub fn disposition(&self, class: InputClass) -> Disposition {
        match class {
            InputClass::Query => self.query,
            InputClass::Params => self.params,
            InputClass::Payload => self.payload,
        }
    }
}
