//! Dotted-path lookups into nested JSON records
//!
//! Paths use the same dot-notation the flattened output keys use:
//! - `"timings.wait"` → `record["timings"]["wait"]`
//! - `"stack.callFrames.0.url"` → first call frame's url
//!
//! A missing segment is not an error; the lookup simply yields `None`.

use serde_json::Value;

/// Resolve a dotted path against a record.
///
/// Objects are walked by key, arrays by numeric index. Any missing segment,
/// or a `null` met along the way, short-circuits to `None`.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_segments(record, path.split('.'))
}

/// Resolve pre-split path segments. Used by compiled fields so the path is
/// only split once per descriptor.
pub fn resolve_segments<'a, I, S>(record: &'a Value, segments: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .try_fold(record, |current, segment| step(current, segment.as_ref()))
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    let next = match current {
        Value::Object(obj) => obj.get(segment),
        Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    }?;
    if next.is_null() {
        None
    } else {
        Some(next)
    }
}

/// Return the first item whose `key` attribute equals `value`.
pub fn find_by_key<'a, T, K, F>(items: &'a [T], key: F, value: &K) -> Option<&'a T>
where
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    items.iter().find(|item| key(item) == value)
}

/// JSON flavour of [`find_by_key`]: first object in `items` whose `key`
/// field equals `value`.
pub fn find_object_by_key<'a>(items: &'a [Value], key: &str, value: &Value) -> Option<&'a Value> {
    items.iter().find(|item| item.get(key) == Some(value))
}
