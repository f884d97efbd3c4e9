use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, ConfigErrorKind, Error};
use crate::pipeline::{ClassStages, InputClass};

/// A caller-supplied rewrite applied to a whole input value.
///
/// Hooks receive the value after markup sanitization and must hand back a
/// value of the same top-level kind (object stays object, array stays array).
/// They may add or remove entries. A panicking hook is not caught.
pub type Hook = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Returns the hook that hands its input back unchanged.
pub fn identity() -> Hook {
    Arc::new(|value| value)
}

const HOOK_KEYS: [&str; 4] = [
    "genericSanitizer",
    "querySanitizer",
    "paramsSanitizer",
    "payloadSanitizer",
];

/// The boolean part of the options schema, as data.
///
/// Every field is optional so the same shape serves registration options and
/// per-route overlays. Unset fields fall back to whatever they overlay.
///
/// # Examples
///
/// ```
/// use disinfect::Flags;
///
/// let flags: Flags = serde_json::from_str(r#"{"deleteEmpty": true}"#).unwrap();
/// assert_eq!(flags.delete_empty, Some(true));
/// assert_eq!(flags.disinfect_query, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Flags {
    /// Drop top-level `""` and `null` entries
    #[serde(default)]
    pub delete_empty: Option<bool>,
    /// Drop top-level whitespace-only strings
    #[serde(default)]
    pub delete_whitespace: Option<bool>,
    /// Strip markup from query strings
    #[serde(default)]
    pub disinfect_query: Option<bool>,
    /// Strip markup from route parameters
    #[serde(default)]
    pub disinfect_params: Option<bool>,
    /// Strip markup from the payload
    #[serde(default)]
    pub disinfect_payload: Option<bool>,
}

impl Flags {
    /// Validates an options object and reads its flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `value` is not an object, names an unknown
    /// option, gives a flag a non-boolean value, or carries a sanitizer hook
    /// (hooks cannot be expressed as data).
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::NotAnObject,
                format!("expected an object, got {}", kind_name(value)),
            )
        })?;

        let mut flags = Flags::default();
        for (key, v) in map {
            if HOOK_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::new(
                    ConfigErrorKind::HookNotData,
                    format!("'{}' must be set programmatically", key),
                ));
            }
            let slot = match key.as_str() {
                "deleteEmpty" => &mut flags.delete_empty,
                "deleteWhitespace" => &mut flags.delete_whitespace,
                "disinfectQuery" => &mut flags.disinfect_query,
                "disinfectParams" => &mut flags.disinfect_params,
                "disinfectPayload" => &mut flags.disinfect_payload,
                _ => {
                    return Err(ConfigError::new(
                        ConfigErrorKind::UnknownKey,
                        format!("unknown option '{}'", key),
                    ))
                }
            };
            let flag = v.as_bool().ok_or_else(|| {
                ConfigError::new(
                    ConfigErrorKind::InvalidType,
                    format!("'{}' must be a boolean, got {}", key, kind_name(v)),
                )
            })?;
            *slot = Some(flag);
        }

        Ok(flags)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Registration-time configuration.
///
/// Built once, then only read. Booleans default to `false` and every hook
/// defaults to the identity transform.
///
/// # Examples
///
/// ```
/// use disinfect::Config;
///
/// let config = Config::builder()
///     .delete_empty(true)
///     .disinfect_payload(true)
///     .build();
///
/// assert!(config.delete_empty());
/// assert!(!config.delete_whitespace());
/// ```
#[derive(Clone)]
pub struct Config {
    delete_empty: bool,
    delete_whitespace: bool,
    disinfect_query: bool,
    disinfect_params: bool,
    disinfect_payload: bool,
    generic_sanitizer: Hook,
    query_sanitizer: Hook,
    params_sanitizer: Hook,
    payload_sanitizer: Hook,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delete_empty: false,
            delete_whitespace: false,
            disinfect_query: false,
            disinfect_params: false,
            disinfect_payload: false,
            generic_sanitizer: identity(),
            query_sanitizer: identity(),
            params_sanitizer: identity(),
            payload_sanitizer: identity(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("delete_empty", &self.delete_empty)
            .field("delete_whitespace", &self.delete_whitespace)
            .field("disinfect_query", &self.disinfect_query)
            .field("disinfect_params", &self.disinfect_params)
            .field("disinfect_payload", &self.disinfect_payload)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Starts a builder from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Builds a configuration from a JSON options object.
    ///
    /// Hooks stay at identity; set them through [`Config::builder`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the options fail validation. Nothing is
    /// built in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use disinfect::Config;
    /// use serde_json::json;
    ///
    /// let config = Config::from_json(&json!({"deleteWhitespace": true})).unwrap();
    /// assert!(config.delete_whitespace());
    ///
    /// assert!(Config::from_json(&json!({"deleteWhitespace": "yes"})).is_err());
    /// ```
    pub fn from_json(options: &Value) -> Result<Self, Error> {
        let flags = Flags::from_json(options)?;
        Ok(Config::builder().flags(flags).build())
    }

    /// Whether top-level `""`/`null` entries are dropped.
    pub fn delete_empty(&self) -> bool {
        self.delete_empty
    }

    /// Whether top-level whitespace-only strings are dropped.
    pub fn delete_whitespace(&self) -> bool {
        self.delete_whitespace
    }

    /// Whether markup is stripped from values of `class`.
    pub fn disinfects(&self, class: InputClass) -> bool {
        match class {
            InputClass::Query => self.disinfect_query,
            InputClass::Params => self.disinfect_params,
            InputClass::Payload => self.disinfect_payload,
        }
    }

    fn class_hook(&self, class: InputClass) -> &Hook {
        match class {
            InputClass::Query => &self.query_sanitizer,
            InputClass::Params => &self.params_sanitizer,
            InputClass::Payload => &self.payload_sanitizer,
        }
    }

    /// Computes the configuration for one request on a route.
    ///
    /// Returns `None` when the route is disabled. Otherwise the result is a
    /// fresh value where every field the route sets wins over `self`;
    /// `self` is never modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use disinfect::{Config, RouteConfig, RouteOverride};
    ///
    /// let global = Config::builder().delete_empty(true).build();
    ///
    /// assert!(global.resolve(&RouteOverride::Disabled).is_none());
    ///
    /// let route = RouteOverride::Overlay(RouteConfig::new().delete_empty(false));
    /// let effective = global.resolve(&route).unwrap();
    /// assert!(!effective.delete_empty());
    /// assert!(global.delete_empty());
    /// ```
    pub fn resolve(&self, route: &RouteOverride) -> Option<Config> {
        match route {
            RouteOverride::Disabled => None,
            RouteOverride::Inherit => Some(self.clone()),
            RouteOverride::Overlay(overlay) => Some(overlay.apply_to(self)),
        }
    }

    /// Selects the stage settings for one input class.
    pub fn stages(&self, class: InputClass) -> ClassStages<'_> {
        ClassStages {
            class,
            disinfect: self.disinfects(class),
            generic: &self.generic_sanitizer,
            specific: self.class_hook(class),
            delete_whitespace: self.delete_whitespace,
            delete_empty: self.delete_empty,
        }
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Applies every flag that is set in `flags`.
    pub fn flags(mut self, flags: Flags) -> Self {
        let c = &mut self.config;
        c.delete_empty = flags.delete_empty.unwrap_or(c.delete_empty);
        c.delete_whitespace = flags.delete_whitespace.unwrap_or(c.delete_whitespace);
        c.disinfect_query = flags.disinfect_query.unwrap_or(c.disinfect_query);
        c.disinfect_params = flags.disinfect_params.unwrap_or(c.disinfect_params);
        c.disinfect_payload = flags.disinfect_payload.unwrap_or(c.disinfect_payload);
        self
    }

    /// Drop top-level `""` and `null` entries.
    pub fn delete_empty(mut self, on: bool) -> Self {
        self.config.delete_empty = on;
        self
    }

    /// Drop top-level whitespace-only strings.
    pub fn delete_whitespace(mut self, on: bool) -> Self {
        self.config.delete_whitespace = on;
        self
    }

    /// Strip markup from query strings.
    pub fn disinfect_query(mut self, on: bool) -> Self {
        self.config.disinfect_query = on;
        self
    }

    /// Strip markup from route parameters.
    pub fn disinfect_params(mut self, on: bool) -> Self {
        self.config.disinfect_params = on;
        self
    }

    /// Strip markup from the payload.
    pub fn disinfect_payload(mut self, on: bool) -> Self {
        self.config.disinfect_payload = on;
        self
    }

    /// Hook run on every input class, before the class hook.
    pub fn generic_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.config.generic_sanitizer = Arc::new(hook);
        self
    }

    /// Hook run on the query only.
    pub fn query_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.config.query_sanitizer = Arc::new(hook);
        self
    }

    /// Hook run on route parameters only.
    pub fn params_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.config.params_sanitizer = Arc::new(hook);
        self
    }

    /// Hook run on the payload only.
    pub fn payload_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.config.payload_sanitizer = Arc::new(hook);
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

/// Per-route settings laid over the registration configuration.
///
/// Unset fields inherit. Hooks set here replace the registered hook for
/// that route only.
#[derive(Clone, Default)]
pub struct RouteConfig {
    flags: Flags,
    generic_sanitizer: Option<Hook>,
    query_sanitizer: Option<Hook>,
    params_sanitizer: Option<Hook>,
    payload_sanitizer: Option<Hook>,
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConfig")
            .field("flags", &self.flags)
            .field("generic_sanitizer", &self.generic_sanitizer.is_some())
            .field("query_sanitizer", &self.query_sanitizer.is_some())
            .field("params_sanitizer", &self.params_sanitizer.is_some())
            .field("payload_sanitizer", &self.payload_sanitizer.is_some())
            .finish()
    }
}

impl RouteConfig {
    /// Creates an overlay that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an overlay from parsed flags.
    pub fn from_flags(flags: Flags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Returns the flags this overlay sets.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Overrides `deleteEmpty`.
    pub fn delete_empty(mut self, on: bool) -> Self {
        self.flags.delete_empty = Some(on);
        self
    }

    /// Overrides `deleteWhitespace`.
    pub fn delete_whitespace(mut self, on: bool) -> Self {
        self.flags.delete_whitespace = Some(on);
        self
    }

    /// Overrides `disinfectQuery`.
    pub fn disinfect_query(mut self, on: bool) -> Self {
        self.flags.disinfect_query = Some(on);
        self
    }

    /// Overrides `disinfectParams`.
    pub fn disinfect_params(mut self, on: bool) -> Self {
        self.flags.disinfect_params = Some(on);
        self
    }

    /// Overrides `disinfectPayload`.
    pub fn disinfect_payload(mut self, on: bool) -> Self {
        self.flags.disinfect_payload = Some(on);
        self
    }

    /// Overrides the generic hook.
    pub fn generic_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.generic_sanitizer = Some(Arc::new(hook));
        self
    }

    /// Overrides the query hook.
    pub fn query_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.query_sanitizer = Some(Arc::new(hook));
        self
    }

    /// Overrides the route-parameter hook.
    pub fn params_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.params_sanitizer = Some(Arc::new(hook));
        self
    }

    /// Overrides the payload hook.
    pub fn payload_sanitizer<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.payload_sanitizer = Some(Arc::new(hook));
        self
    }

    fn apply_to(&self, base: &Config) -> Config {
        let mut merged = ConfigBuilder {
            config: base.clone(),
        }
        .flags(self.flags)
        .build();

        if let Some(hook) = &self.generic_sanitizer {
            merged.generic_sanitizer = Arc::clone(hook);
        }
        if let Some(hook) = &self.query_sanitizer {
            merged.query_sanitizer = Arc::clone(hook);
        }
        if let Some(hook) = &self.params_sanitizer {
            merged.params_sanitizer = Arc::clone(hook);
        }
        if let Some(hook) = &self.payload_sanitizer {
            merged.payload_sanitizer = Arc::clone(hook);
        }
        merged
    }
}

/// What a route says about disinfection.
#[derive(Debug, Clone, Default)]
pub enum RouteOverride {
    /// No route-level settings; use the registration configuration.
    #[default]
    Inherit,
    /// Skip disinfection entirely for this route.
    Disabled,
    /// Lay these settings over the registration configuration.
    Overlay(RouteConfig),
}

impl RouteOverride {
    /// Reads a route override the way route settings carry it.
    ///
    /// `false` disables the route, `null` inherits, and an object is
    /// validated like registration options and becomes an overlay.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for any other value, or for an object that
    /// fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use disinfect::RouteOverride;
    /// use serde_json::json;
    ///
    /// assert!(matches!(RouteOverride::from_json(&json!(false)), Ok(RouteOverride::Disabled)));
    /// assert!(matches!(RouteOverride::from_json(&json!(null)), Ok(RouteOverride::Inherit)));
    /// assert!(RouteOverride::from_json(&json!(true)).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Bool(false) => Ok(RouteOverride::Disabled),
            Value::Null => Ok(RouteOverride::Inherit),
            Value::Object(_) => Ok(RouteOverride::Overlay(RouteConfig::from_flags(
                Flags::from_json(value)?,
            ))),
            other => Err(ConfigError::new(
                ConfigErrorKind::InvalidOverride,
                format!("expected false, null or an object, got {}", kind_name(other)),
            )
            .into()),
        }
    }

    /// Returns `true` for the disabled sentinel.
    pub fn is_disabled(&self) -> bool {
        matches!(self, RouteOverride::Disabled)
    }
}

impl From<RouteConfig> for RouteOverride {
    fn from(config: RouteConfig) -> Self {
        RouteOverride::Overlay(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(hook: &Hook, value: Value) -> Value {
        hook(value)
    }

    #[test]
    fn defaults_are_off_and_identity() {
        let config = Config::default();

        assert!(!config.delete_empty());
        assert!(!config.delete_whitespace());
        for class in InputClass::ALL {
            assert!(!config.disinfects(class));
            let stages = config.stages(class);
            assert_eq!(run(stages.generic, json!({"a": "b"})), json!({"a": "b"}));
            assert_eq!(run(stages.specific, json!(["x"])), json!(["x"]));
        }
    }

    #[test]
    fn builder_sets_each_field() {
        let config = Config::builder()
            .delete_empty(true)
            .delete_whitespace(true)
            .disinfect_query(true)
            .disinfect_params(false)
            .disinfect_payload(true)
            .query_sanitizer(|_| json!("q"))
            .build();

        assert!(config.delete_empty());
        assert!(config.delete_whitespace());
        assert!(config.disinfects(InputClass::Query));
        assert!(!config.disinfects(InputClass::Params));
        assert!(config.disinfects(InputClass::Payload));
        assert_eq!(run(config.stages(InputClass::Query).specific, json!("x")), json!("q"));
        assert_eq!(run(config.stages(InputClass::Params).specific, json!("x")), json!("x"));
    }

    #[test]
    fn from_json_accepts_empty_object() {
        let config = Config::from_json(&json!({})).expect("empty options are valid");

        assert!(!config.delete_empty());
    }

    #[test]
    fn from_json_reads_flags() {
        let config = Config::from_json(&json!({
            "deleteEmpty": true,
            "disinfectParams": true
        }))
        .expect("valid options");

        assert!(config.delete_empty());
        assert!(config.disinfects(InputClass::Params));
        assert!(!config.disinfects(InputClass::Query));
    }

    #[test]
    fn flags_from_json_sets_each_key_on_its_field() {
        let options = json!({
            "deleteEmpty": true,
            "deleteWhitespace": false,
            "disinfectQuery": true,
            "disinfectParams": false,
            "disinfectPayload": true
        });

        let flags = Flags::from_json(&options).expect("valid options");

        assert_eq!(
            flags,
            Flags {
                delete_empty: Some(true),
                delete_whitespace: Some(false),
                disinfect_query: Some(true),
                disinfect_params: Some(false),
                disinfect_payload: Some(true),
            }
        );
        assert_eq!(Flags::deserialize(&options).ok(), Some(flags));
        assert_eq!(Flags::from_json(&json!({})), Ok(Flags::default()));
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = Flags::from_json(&json!("deleteEmpty")).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::NotAnObject);
        assert!(err.message().contains("a string"));
    }

    #[test]
    fn from_json_rejects_unknown_key() {
        let err = Flags::from_json(&json!({"deleteEmpty": true, "deleteAll": true})).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::UnknownKey);
        assert!(err.message().contains("deleteAll"));
    }

    #[test]
    fn from_json_rejects_non_boolean_flag() {
        let err = Flags::from_json(&json!({"deleteEmpty": "yes"})).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::InvalidType);
        assert!(err.message().contains("deleteEmpty"));
    }

    #[test]
    fn from_json_rejects_hooks_as_data() {
        let err = Flags::from_json(&json!({"genericSanitizer": "x => x"})).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::HookNotData);
        assert!(err.message().contains("genericSanitizer"));
    }

    #[test]
    fn config_from_json_wraps_error() {
        let result = Config::from_json(&json!({"disinfectQuery": 1}));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn resolve_disabled_is_none() {
        let config = Config::builder().delete_empty(true).build();

        assert!(config.resolve(&RouteOverride::Disabled).is_none());
    }

    #[test]
    fn resolve_inherit_keeps_registration_settings() {
        let config = Config::builder().delete_whitespace(true).build();

        let effective = config.resolve(&RouteOverride::Inherit).unwrap();

        assert!(effective.delete_whitespace());
        assert!(!effective.delete_empty());
    }

    #[test]
    fn overlay_wins_only_where_set() {
        let config = Config::builder()
            .delete_empty(true)
            .disinfect_query(true)
            .generic_sanitizer(|_| json!("global"))
            .build();
        let route = RouteOverride::from(
            RouteConfig::new()
                .delete_empty(false)
                .disinfect_payload(true)
                .generic_sanitizer(|_| json!("route")),
        );

        let effective = config.resolve(&route).unwrap();

        assert!(!effective.delete_empty());
        assert!(effective.disinfects(InputClass::Query));
        assert!(effective.disinfects(InputClass::Payload));
        let stages = effective.stages(InputClass::Query);
        assert_eq!(run(stages.generic, json!("x")), json!("route"));
    }

    #[test]
    fn overlay_does_not_touch_registration_config() {
        let config = Config::builder().delete_empty(true).build();
        let route = RouteOverride::Overlay(RouteConfig::new().delete_empty(false));

        let _ = config.resolve(&route);

        assert!(config.delete_empty());
    }

    #[test]
    fn route_override_from_json() {
        assert!(RouteOverride::from_json(&json!(false)).unwrap().is_disabled());
        assert!(matches!(
            RouteOverride::from_json(&Value::Null),
            Ok(RouteOverride::Inherit)
        ));

        match RouteOverride::from_json(&json!({"deleteEmpty": true})) {
            Ok(RouteOverride::Overlay(route)) => {
                assert_eq!(route.flags().delete_empty, Some(true));
                assert_eq!(route.flags().delete_whitespace, None);
            }
            other => panic!("expected overlay, got {:?}", other),
        }
    }

    #[test]
    fn route_override_rejects_other_values() {
        for value in [json!(true), json!("off"), json!(0), json!([])] {
            match RouteOverride::from_json(&value) {
                Err(Error::Config(e)) => assert_eq!(e.kind(), ConfigErrorKind::InvalidOverride),
                other => panic!("expected error for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn route_override_object_is_validated() {
        let result = RouteOverride::from_json(&json!({"deleteEmpty": null}));

        assert!(result.is_err());
    }

    #[test]
    fn debug_output_omits_hooks() {
        let config = Config::builder().generic_sanitizer(|v| v).build();

        let output = format!("{:?}", config);
        assert!(output.contains("delete_empty"));
        assert!(!output.contains("generic_sanitizer"));
    }
}
