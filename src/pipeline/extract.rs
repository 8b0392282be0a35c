use crate::error::ConfigError;
use crate::path::resolve_segments;
use crate::pipeline::config::{FieldDescriptor, FieldKind};
use crate::pipeline::custom::{CustomFn, CustomFunctionRegistry};
use serde_json::{Number, Value};
use std::fmt;

/// Computes a synthetic path from other fields of the entry
pub type DerivedFn = fn(&Value) -> Value;

/// Paths computed rather than looked up. They are usable anywhere a `path`
/// descriptor is, and shadow a real key with the same name.
pub const DERIVED_PATHS: &[(&str, DerivedFn)] =
    &[("timings.totalWaitReceive", total_wait_receive as DerivedFn)];

/// A field descriptor with its dispatch settled up front
#[derive(Clone)]
pub enum CompiledField {
    Path(Vec<String>),
    Derived(DerivedFn),
    Custom(CustomFn),
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledField::Path(segments) => f.debug_tuple("Path").field(segments).finish(),
            CompiledField::Derived(_) => f.write_str("Derived"),
            CompiledField::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl CompiledField {
    pub fn compile(
        descriptor: &FieldDescriptor,
        registry: &CustomFunctionRegistry,
    ) -> Result<Self, ConfigError> {
        match descriptor.kind {
            FieldKind::Path => {
                if let Some((_, derive)) = DERIVED_PATHS
                    .iter()
                    .find(|(path, _)| *path == descriptor.value)
                {
                    return Ok(CompiledField::Derived(*derive));
                }
                Ok(CompiledField::Path(
                    descriptor.value.split('.').map(str::to_string).collect(),
                ))
            }
            FieldKind::Custom => registry
                .get(&descriptor.value)
                .map(|function| CompiledField::Custom(function.func.clone()))
                .ok_or_else(|| ConfigError::UnknownCustomFunction {
                    name: descriptor.value.clone(),
                    title: descriptor.title.clone(),
                }),
        }
    }

    pub fn extract(&self, entry: &Value) -> Value {
        match self {
            CompiledField::Path(segments) => resolve_segments(entry, segments)
                .cloned()
                .unwrap_or(Value::Null),
            CompiledField::Derived(derive) => derive(entry),
            CompiledField::Custom(func) => func(entry),
        }
    }
}

/// `timings.wait + timings.receive`; `Null` unless both are numbers
pub fn total_wait_receive(entry: &Value) -> Value {
    let timings = match entry.get("timings") {
        Some(t) => t,
        None => return Value::Null,
    };
    let (Some(Value::Number(wait)), Some(Value::Number(receive))) =
        (timings.get("wait"), timings.get("receive"))
    else {
        return Value::Null;
    };

    if let (Some(a), Some(b)) = (wait.as_i64(), receive.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Value::Number(sum.into());
        }
    }
    match (wait.as_f64(), receive.as_f64()) {
        (Some(a), Some(b)) => match whole_number(a + b) {
            Some(sum) => Value::Number(sum.into()),
            None => Number::from_f64(a + b).map_or(Value::Null, Value::Number),
        },
        _ => Value::Null,
    }
}

/// The integer a float stands for, if it has no fraction and fits in `i64`
fn whole_number(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Text form of a cell: strings as-is, `Null` as an empty cell, whole floats
/// without a trailing `.0`, nested values as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64().and_then(whole_number) {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "null".to_string()),
    }
}
