// src/pipeline/custom.rs - named extraction functions for irregular fields
use crate::path::{find_by_key, resolve};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature of a custom extraction: entry in, cell value out (`Null` for an
/// empty cell).
pub type CustomFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A named extraction routine
#[derive(Clone)]
pub struct CustomFunction {
    pub name: String,
    pub func: CustomFn,
}

impl CustomFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        CustomFunction {
            name: name.to_string(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for CustomFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Functions available to `custom` field descriptors, looked up by name
#[derive(Debug, Clone, Default)]
pub struct CustomFunctionRegistry {
    functions: Vec<CustomFunction>,
}

impl CustomFunctionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the functions shipped with the crate
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CustomFunction::new("initiatorStack", initiator_stack));
        registry
    }

    /// Add a function. A later registration with the same name shadows the
    /// earlier one.
    pub fn register(&mut self, function: CustomFunction) {
        self.functions.insert(0, function);
    }

    pub fn with<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.register(CustomFunction::new(name, func));
        self
    }

    pub fn get(&self, name: &str) -> Option<&CustomFunction> {
        find_by_key(&self.functions, |f| f.name.as_str(), name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Call stack that triggered the request, one frame per line.
///
/// Only script- and parser-initiated requests carry a meaningful stack;
/// anything else yields `Null`. Without a recorded stack the initiator's own
/// url and line are used.
pub fn initiator_stack(entry: &Value) -> Value {
    let Some(initiator) = entry.get("_initiator") else {
        return Value::Null;
    };
    match initiator.get("type").and_then(Value::as_str) {
        Some("script") | Some("parser") => {}
        _ => return Value::Null,
    }

    let frames = resolve(initiator, "stack.callFrames")
        .and_then(Value::as_array)
        .filter(|frames| !frames.is_empty());

    let text = match frames {
        Some(frames) => frames
            .iter()
            .map(|frame| {
                format!(
                    "{} line {} column {}",
                    text_of(frame.get("url")),
                    text_of(frame.get("lineNumber")),
                    text_of(frame.get("columnNumber"))
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => format!(
            "{} line {}",
            text_of(initiator.get("url")),
            text_of(initiator.get("lineNumber"))
        ),
    };
    Value::String(text)
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
