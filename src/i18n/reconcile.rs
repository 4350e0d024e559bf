use serde_json::{Map, Value};

/// Strings of one language, nested by key
pub type LocaleDictionary = Map<String, Value>;

/// A source entry that has no usable value in the target
#[derive(Debug, Clone, PartialEq)]
pub struct MissingKey {
    /// Full dotted path, eg: `auth.login.title`
    pub path: String,
    /// Leaf key, eg: `title`
    pub key: String,
    /// Value in the source dictionary
    pub value: Value,
    /// Keys of the enclosing maps, eg: `["auth", "login"]`
    pub parent: Vec<String>,
}

impl MissingKey {
    /// Dotted path of the enclosing map, empty at the top level
    pub fn parent_path(&self) -> String {
        self.parent.join(".")
    }
}

/// Keys of `source` that are missing from `target`, depth first in source order.
///
/// Only scalar leaves (string, number, boolean) are reported. Arrays, nulls and
/// empty strings in the source are skipped, there is nothing to translate. A target node that is not a map where the source has
/// a map is read as an empty map.
pub fn diff(source: &LocaleDictionary, target: &LocaleDictionary) -> Vec<MissingKey> {
    let mut missing = Vec::new();
    collect_missing(source, Some(target), &mut Vec::new(), &mut missing);
    missing
}

fn collect_missing(
    source: &LocaleDictionary,
    target: Option<&LocaleDictionary>,
    parent: &mut Vec<String>,
    missing: &mut Vec<MissingKey>,
) {
    for (key, value) in source {
        let target_value = target.and_then(|t| t.get(key));

        match value {
            Value::String(s) if s.is_empty() => {}
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                if is_missing(target_value) {
                    let path = if parent.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{key}", parent.join("."))
                    };

                    missing.push(MissingKey {
                        path,
                        key: key.clone(),
                        value: value.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            Value::Object(child) => {
                parent.push(key.clone());
                collect_missing(
                    child,
                    target_value.and_then(Value::as_object),
                    parent,
                    missing,
                );
                parent.pop();
            }
            Value::Array(_) | Value::Null => {}
        }
    }
}

/// Absent, `null` and `""` need a translation. `false`, `0` and blank strings do not.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Set the value of one missing key.
///
/// Maps along the parent path are created when absent. Non-map values found on
/// the path are replaced by maps.
pub fn merge_one(target: &mut LocaleDictionary, record: &MissingKey, value: Value) {
    let mut current = target;

    for segment in &record.parent {
        let slot = current.entry(segment.as_str()).or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(child) = slot else {
            return;
        };
        current = child;
    }

    current.insert(record.key.clone(), value);
}

/// [`merge_one`] for every record, in order
pub fn merge<'a, I>(target: &mut LocaleDictionary, values: I)
where
    I: IntoIterator<Item = (&'a MissingKey, Value)>,
{
    for (record, value) in values {
        merge_one(target, record, value);
    }
}
