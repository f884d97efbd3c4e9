use std::fmt;

use serde_json::Value;

use crate::config::Hook;
use crate::filter::{filter_out, is_empty, is_whitespace};
use crate::sanitizer::MarkupSanitizer;
use crate::walk::walk_markup;

/// One of the three independently configured input channels of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputClass {
    /// URL query parameters
    Query,
    /// Route (path) parameters
    Params,
    /// Request body
    Payload,
}

impl InputClass {
    /// All classes, in the order a request processes them.
    pub const ALL: [InputClass; 3] = [InputClass::Query, InputClass::Params, InputClass::Payload];

    /// Returns the lowercase class name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputClass::Query => "query",
            InputClass::Params => "params",
            InputClass::Payload => "payload",
        }
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Markup stripping over every string leaf
    Markup,
    /// The hook shared by all classes
    Generic,
    /// The hook of the value's own class
    Class,
    /// Top-level whitespace-only elision
    Whitespace,
    /// Top-level `""`/`null` elision
    Empty,
}

impl Stage {
    /// Returns the stage name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Markup => "markup",
            Stage::Generic => "generic",
            Stage::Class => "class",
            Stage::Whitespace => "whitespace",
            Stage::Empty => "empty",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The stages ran and the value was replaced by their output.
    Processed,
    /// No stage ran; the value was handed back as it came in.
    Skipped,
}

/// The stage settings for one input class, borrowed from an effective
/// configuration.
#[derive(Clone, Copy)]
pub struct ClassStages<'a> {
    /// The class these settings belong to
    pub class: InputClass,
    /// Run the markup stage
    pub disinfect: bool,
    /// Hook shared by every class
    pub generic: &'a Hook,
    /// Hook for this class only
    pub specific: &'a Hook,
    /// Run whitespace elision
    pub delete_whitespace: bool,
    /// Run empty elision
    pub delete_empty: bool,
}

impl fmt::Debug for ClassStages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassStages")
            .field("class", &self.class)
            .field("disinfect", &self.disinfect)
            .field("delete_whitespace", &self.delete_whitespace)
            .field("delete_empty", &self.delete_empty)
            .finish_non_exhaustive()
    }
}

/// Decides whether a value enters the pipeline at all.
///
/// Strings always do. Arrays and objects do when they have at least one
/// entry. `null`, booleans, numbers and empty containers are skipped and
/// come back as they went in.
pub fn should_process(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Runs the stage pipeline over one input value.
///
/// Stages, in order:
/// 1. markup stripping over every string leaf, if `disinfect` is set
/// 2. the generic hook
/// 3. the class hook
/// 4. top-level whitespace elision, if `delete_whitespace` is set
/// 5. top-level empty elision, if `delete_empty` is set
///
/// The elision stages only touch arrays and objects; a string that made it
/// through the hooks is kept as is. Hook panics propagate.
///
/// # Examples
///
/// ```
/// use disinfect::{process, AmmoniaSanitizer, Config, Disposition, InputClass};
/// use serde_json::json;
///
/// let config = Config::builder().delete_empty(true).disinfect_payload(true).build();
/// let stages = config.stages(InputClass::Payload);
///
/// let (out, disposition) = process(
///     json!({"a": "", "b": "<script>x</script>hi"}),
///     &stages,
///     &AmmoniaSanitizer,
/// );
///
/// assert_eq!(out, json!({"b": "hi"}));
/// assert_eq!(disposition, Disposition::Processed);
/// ```
pub fn process(
    value: Value,
    stages: &ClassStages<'_>,
    markup: &dyn MarkupSanitizer,
) -> (Value, Disposition) {
    if !should_process(&value) {
        tracing::trace!(class = %stages.class, "nothing to disinfect");
        return (value, Disposition::Skipped);
    }

    let mut value = value;

    if stages.disinfect {
        value = walk_markup(value, markup);
        trace_stage(stages.class, Stage::Markup);
    }

    value = (stages.generic)(value);
    trace_stage(stages.class, Stage::Generic);

    value = (stages.specific)(value);
    trace_stage(stages.class, Stage::Class);

    if stages.delete_whitespace {
        value = filter_out(value, is_whitespace);
        trace_stage(stages.class, Stage::Whitespace);
    }

    if stages.delete_empty {
        value = filter_out(value, is_empty);
        trace_stage(stages.class, Stage::Empty);
    }

    (value, Disposition::Processed)
}

fn trace_stage(class: InputClass, stage: Stage) {
    tracing::trace!(class = %class, stage = %stage, "stage applied");
}
