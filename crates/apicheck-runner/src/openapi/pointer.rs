//! Local JSON-Pointer resolution and recursive `$ref` inlining

use std::collections::HashSet;

use serde_json::Value;

/// A `$ref` that cannot be resolved within the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefError {
    #[error("Only local $ref is supported. Got: \"{0}\"")]
    External(String),
    #[error("Could not resolve $ref: \"{pointer}\" (failed at segment \"{segment}\")")]
    Unresolvable { pointer: String, segment: String },
    #[error("Reference cycle detected at \"{0}\"")]
    Cycle(String),
}

/// Resolve a local JSON-Pointer (`#/components/schemas/Pokemon`) against the
/// document root.
///
/// Pointer segments are unescaped per RFC 6901 (`~1` → `/`, `~0` → `~`).
pub fn resolve_pointer<'a>(
    document: &'a Value,
    pointer: &str,
) -> Result<&'a Value, RefError> {
    let Some(rest) = pointer.strip_prefix("#/") else {
        return Err(RefError::External(pointer.to_string()));
    };

    let mut current = document;
    for segment in rest.split('/') {
        let key = segment.replace("~1", "/").replace("~0", "~");
        let next = match current {
            Value::Object(map) => map.get(&key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| RefError::Unresolvable {
            pointer: pointer.to_string(),
            segment: key,
        })?;
    }

    Ok(current)
}

/// Recursively inline every `$ref` in `schema`, producing a self-contained
/// copy with no remaining reference pointers.
///
/// A reference may point to another reference; chains are followed. The
/// active pointer stack guards against cycles: re-entering a pointer that is
/// currently being expanded is an error, while diamond-shaped reuse of the
/// same pointer in sibling subtrees is legal.
pub fn inline_refs(document: &Value, schema: &Value) -> Result<Value, RefError> {
    let mut active = HashSet::new();
    inline(document, schema, &mut active)
}

fn inline(document: &Value, node: &Value, active: &mut HashSet<String>) -> Result<Value, RefError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                if !active.insert(pointer.clone()) {
                    return Err(RefError::Cycle(pointer.clone()));
                }
                let resolved = resolve_pointer(document, pointer)?;
                let inlined = inline(document, resolved, active);
                active.remove(pointer);
                return inlined;
            }

            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), inline(document, value, active)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(inline(document, item, active)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}
