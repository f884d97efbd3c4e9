//! Lifecycle hook that disinfects a request in place.
//!
//! Framework glue calls [`disinfect_request`] once per request, after
//! routing and authentication and before any handler sees the inputs.
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds RequestAdapter (+ route override)
//!   ↓
//! disinfect_request(&filter, &mut adapter)
//!   ↓
//! Framework copies adapter.query()/params()/payload() back
//!   ↓
//! Handler
//! ```

use crate::engine::Disinfect;
use crate::pipeline::{Disposition, InputClass};

use super::RequestAdapter;

/// What the hook did to each input class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Query outcome
    pub query: Disposition,
    /// Route-parameter outcome
    pub params: Disposition,
    /// Payload outcome
    pub payload: Disposition,
}

impl RequestOutcome {
    /// Returns the outcome for one class.
    pub fn disposition(&self, class: InputClass) -> Disposition {
        match class {
            InputClass::Query => self.query,
            InputClass::Params => self.params,
            InputClass::Payload => self.payload,
        }
    }

    /// Returns `true` if no class was processed.
    pub fn is_skipped(&self) -> bool {
        InputClass::ALL
            .iter()
            .all(|class| self.disposition(*class) == Disposition::Skipped)
    }
}

/// Disinfects the inputs held by `adapter` and substitutes the results.
///
/// The route override stored on the adapter decides the effective
/// configuration. All work happens inside a `disinfect` tracing span keyed by
/// the request ID. A panicking caller hook unwinds out of this function and
/// leaves the adapter without inputs; the host maps that to an error response.
///
/// # Examples
///
/// ```
/// use disinfect::web::{disinfect_request, RequestAdapter};
/// use disinfect::{Config, Disinfect, RouteOverride};
/// use serde_json::json;
///
/// let filter = Disinfect::new(Config::builder().delete_empty(true).build());
///
/// let mut adapter = RequestAdapter::new("req-1".to_string());
/// adapter.add_query_param("a", "");
/// adapter.add_query_param("c", "c");
///
/// let outcome = disinfect_request(&filter, &mut adapter);
/// assert_eq!(adapter.query(), &json!({"c": "c"}));
/// assert!(!outcome.is_skipped());
///
/// let mut adapter = RequestAdapter::new("req-2".to_string());
/// adapter.add_query_param("a", "");
/// adapter.set_route_override(RouteOverride::Disabled);
///
/// let outcome = disinfect_request(&filter, &mut adapter);
/// assert_eq!(adapter.query(), &json!({"a": ""}));
/// assert!(outcome.is_skipped());
/// ```
pub fn disinfect_request(filter: &Disinfect, adapter: &mut RequestAdapter) -> RequestOutcome {
    let span = tracing::debug_span!("disinfect", request_id = %adapter.request_id());
    let _guard = span.enter();

    let inputs = adapter.take_inputs();
    let result = filter.apply(inputs, adapter.route_override());

    let outcome = RequestOutcome {
        query: result.query,
        params: result.params,
        payload: result.payload,
    };
    adapter.replace_inputs(result.inputs);

    outcome
}
