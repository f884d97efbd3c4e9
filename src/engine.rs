use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{Config, RouteOverride};
use crate::error::Error;
use crate::pipeline::{process, Disposition, InputClass};
use crate::request::{Disinfected, RequestInputs};
use crate::sanitizer::{AmmoniaSanitizer, MarkupSanitizer};

/// The registered request filter.
///
/// `Disinfect` is built once, when the host installs the filter, and is only
/// read afterwards. It is `Send + Sync`: share it by reference or `Arc`
/// across concurrent requests without locking.
///
/// # Examples
///
/// ```
/// use disinfect::{Config, Disinfect, RequestInputs, RouteOverride};
/// use serde_json::json;
///
/// let filter = Disinfect::new(Config::builder().delete_empty(true).build());
///
/// let inputs = RequestInputs::new(json!({"a": "", "b": "c"}), json!({}));
/// let result = filter.apply(inputs, &RouteOverride::Inherit);
/// assert_eq!(result.inputs.query, json!({"b": "c"}));
///
/// let inputs = RequestInputs::new(json!({"a": "", "b": "c"}), json!({}));
/// let result = filter.apply(inputs, &RouteOverride::Disabled);
/// assert_eq!(result.inputs.query, json!({"a": "", "b": "c"}));
/// ```
#[derive(Clone)]
pub struct Disinfect {
    config: Config,
    markup: Arc<dyn MarkupSanitizer>,
}

impl fmt::Debug for Disinfect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disinfect")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Disinfect {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Disinfect {
    /// Installs the filter with `config` and the `ammonia` markup sanitizer.
    pub fn new(config: Config) -> Self {
        tracing::info!(
            delete_empty = config.delete_empty(),
            delete_whitespace = config.delete_whitespace(),
            disinfect_query = config.disinfects(InputClass::Query),
            disinfect_params = config.disinfects(InputClass::Params),
            disinfect_payload = config.disinfects(InputClass::Payload),
            "disinfect registered"
        );

        Self {
            config,
            markup: Arc::new(AmmoniaSanitizer),
        }
    }

    /// Validates JSON options and installs the filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the options are malformed. No filter is
    /// created in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use disinfect::Disinfect;
    /// use serde_json::json;
    ///
    /// assert!(Disinfect::register(&json!({"disinfectQuery": true})).is_ok());
    /// assert!(Disinfect::register(&json!({"disinfectQuery": "yes"})).is_err());
    /// ```
    pub fn register(options: &Value) -> Result<Self, Error> {
        let config = Config::from_json(options).map_err(|e| {
            tracing::warn!(error = %e, "disinfect registration rejected");
            e
        })?;
        Ok(Self::new(config))
    }

    /// Replaces the markup sanitizer used for the `disinfect*` stages.
    pub fn with_markup(mut self, markup: impl MarkupSanitizer + 'static) -> Self {
        self.markup = Arc::new(markup);
        self
    }

    /// Returns the registration configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Disinfects the inputs of one request on a route.
    ///
    /// A disabled route, or a request with nothing to process, gets its
    /// inputs back untouched. Otherwise query, route parameters and payload
    /// each run through the pipeline under the route's effective
    /// configuration.
    ///
    /// Caller hooks that panic are not caught.
    pub fn apply(&self, inputs: RequestInputs, route: &RouteOverride) -> Disinfected {
        let Some(effective) = self.config.resolve(route) else {
            tracing::debug!("disinfect disabled for route");
            return Disinfected::skipped(inputs);
        };

        if inputs.is_blank() {
            tracing::trace!("request has no inputs to disinfect");
            return Disinfected::skipped(inputs);
        }

        let markup = &*self.markup;
        let RequestInputs {
            query,
            params,
            payload,
        } = inputs;

        let (query, query_outcome) = process(query, &effective.stages(InputClass::Query), markup);
        let (params, params_outcome) =
            process(params, &effective.stages(InputClass::Params), markup);
        let (payload, payload_outcome) = match payload {
            Some(body) => {
                let (body, outcome) =
                    process(body, &effective.stages(InputClass::Payload), markup);
                (Some(body), outcome)
            }
            None => (None, Disposition::Skipped),
        };

        tracing::debug!(
            query = ?query_outcome,
            params = ?params_outcome,
            payload = ?payload_outcome,
            "request disinfected"
        );

        Disinfected {
            inputs: RequestInputs {
                query,
                params,
                payload,
            },
            query: query_outcome,
            params: params_outcome,
            payload: payload_outcome,
        }
    }
}
