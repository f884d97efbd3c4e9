//! Request adapter for carrying framework request inputs through disinfection.

use std::mem;

use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::config::RouteOverride;
use crate::request::RequestInputs;

/// Adapter holding the disinfectable parts of a framework request.
///
/// `RequestAdapter` is the integration point between web frameworks and the
/// pipeline. Framework glue fills it from its own request type, runs
/// [`disinfect_request`](super::disinfect_request), then copies the
/// replacement values back into the live request.
///
/// # Examples
///
/// ```
/// use disinfect::web::RequestAdapter;
/// use serde_json::json;
///
/// let mut adapter = RequestAdapter::new("req-12345".to_string());
/// adapter.add_query_param("tag", "a");
/// adapter.add_query_param("tag", "b");
/// adapter.add_path_param("id", "42");
///
/// assert_eq!(adapter.query(), &json!({"tag": ["a", "b"]}));
/// assert_eq!(adapter.params(), &json!({"id": "42"}));
/// assert!(adapter.payload().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    /// Unique request identifier (required)
    request_id: String,
    /// Query parameters from the URL
    query: Value,
    /// Path parameters from routing
    params: Value,
    /// Parsed request body (optional)
    payload: Option<Value>,
    /// Disinfect settings of the matched route
    route: RouteOverride,
}

impl RequestAdapter {
    /// Creates a new adapter with the given request ID.
    ///
    /// Query and params start as empty objects, there is no payload, and the
    /// route inherits the registration configuration.
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            query: Value::Object(Map::new()),
            params: Value::Object(Map::new()),
            payload: None,
            route: RouteOverride::Inherit,
        }
    }

    /// Adds a query parameter.
    ///
    /// A repeated key collects its values into an array, in arrival order.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = Value::String(value.into());

        if let Some(query) = object_mut(&mut self.query) {
            match query.entry(key.into()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Value::Array(values) => values.push(value),
                    existing => {
                        let first = mem::take(existing);
                        *existing = Value::Array(vec![first, value]);
                    }
                },
            }
        }
    }

    /// Adds a path parameter, replacing any earlier value for `key`.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if let Some(params) = object_mut(&mut self.params) {
            params.insert(key.into(), Value::String(value.into()));
        }
    }

    /// Replaces the whole query value.
    pub fn set_query(&mut self, query: Value) {
        self.query = query;
    }

    /// Replaces the whole route-parameter value.
    pub fn set_params(&mut self, params: Value) {
        self.params = params;
    }

    /// Sets or clears the request body.
    pub fn set_payload(&mut self, payload: Option<Value>) {
        self.payload = payload;
    }

    /// Sets the matched route's disinfect settings.
    pub fn set_route_override(&mut self, route: RouteOverride) {
        self.route = route;
    }

    /// Returns a reference to the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the query value.
    pub fn query(&self) -> &Value {
        &self.query
    }

    /// Returns the route-parameter value.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Returns the request body, if present.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns the matched route's disinfect settings.
    pub fn route_override(&self) -> &RouteOverride {
        &self.route
    }

    /// Moves the inputs out, leaving empty objects and no payload behind.
    pub(crate) fn take_inputs(&mut self) -> RequestInputs {
        RequestInputs {
            query: mem::replace(&mut self.query, Value::Object(Map::new())),
            params: mem::replace(&mut self.params, Value::Object(Map::new())),
            payload: self.payload.take(),
        }
    }

    /// Substitutes replacement inputs.
    pub(crate) fn replace_inputs(&mut self, inputs: RequestInputs) {
        self.query = inputs.query;
        self.params = inputs.params;
        self.payload = inputs.payload;
    }
}

// Resets a non-object value to an empty object first.
fn object_mut(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}
