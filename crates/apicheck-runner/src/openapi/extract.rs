//! Schema extraction — path-template matching and status-code fallback

use serde_json::Value;

use super::pointer::{RefError, inline_refs};

/// Extract the self-contained JSON Schema declared for a
/// (method, path, status) triple, or `None` when the document declares no
/// schema anywhere along the lookup chain.
///
/// Lookup order: exact path key, then path templates in document order;
/// exact status key, then the `default` response; `application/json` media
/// type only. The extracted schema has every local `$ref` inlined.
pub(crate) fn extract_schema(
    document: &Value,
    method: &str,
    request_path: &str,
    status: u16,
) -> Result<Option<Value>, RefError> {
    let Some(paths) = document.get("paths").and_then(|p| p.as_object()) else {
        return Ok(None);
    };

    let Some(template) = match_path(paths, request_path) else {
        return Ok(None);
    };

    let method_key = method.to_ascii_lowercase();
    let Some(operation) = paths.get(template).and_then(|item| item.get(&method_key)) else {
        return Ok(None);
    };

    let responses = operation.get("responses");
    let response = responses
        .and_then(|r| r.get(status.to_string()))
        .or_else(|| responses.and_then(|r| r.get("default")));
    let Some(response) = response else {
        return Ok(None);
    };

    let Some(schema) = response
        .get("content")
        .and_then(|c| c.get("application/json"))
        .and_then(|media| media.get("schema"))
    else {
        return Ok(None);
    };

    inline_refs(document, schema).map(Some)
}

/// Match a concrete request path against the document's path keys.
///
/// An exact key always wins; otherwise the first template (in document
/// order) whose `{param}` placeholders match is returned.
fn match_path<'a>(
    paths: &'a serde_json::Map<String, Value>,
    request_path: &str,
) -> Option<&'a str> {
    if let Some((key, _)) = paths.get_key_value(request_path) {
        return Some(key.as_str());
    }

    paths
        .keys()
        .find(|template| template_matches(template, request_path))
        .map(String::as_str)
}

/// `/pokemon/{name}` matches `/pokemon/ditto`: segment counts must agree and
/// each `{param}` consumes one-or-more non-slash characters.
fn template_matches(template: &str, path: &str) -> bool {
    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return false;
    }
    template_segments
        .iter()
        .zip(&path_segments)
        .all(|(t, p)| segment_matches(t, p))
}

/// One piece of a parsed template segment.
enum Piece<'a> {
    Literal(&'a str),
    Param,
}

fn segment_matches(template: &str, actual: &str) -> bool {
    if !template.contains('{') {
        return template == actual;
    }

    let mut pieces = Vec::new();
    let mut rest = template;
    loop {
        match rest.find('{') {
            Some(open) => {
                let Some(close) = rest[open..].find('}') else {
                    // Unterminated placeholder: treat the remainder as literal
                    pieces.push(Piece::Literal(rest));
                    break;
                };
                if open > 0 {
                    pieces.push(Piece::Literal(&rest[..open]));
                }
                pieces.push(Piece::Param);
                rest = &rest[open + close + 1..];
            }
            None => {
                if !rest.is_empty() {
                    pieces.push(Piece::Literal(rest));
                }
                break;
            }
        }
    }

    match_pieces(&pieces, actual)
}

fn match_pieces(pieces: &[Piece], actual: &str) -> bool {
    match pieces.split_first() {
        None => actual.is_empty(),
        Some((Piece::Literal(literal), rest)) => actual
            .strip_prefix(literal)
            .is_some_and(|remaining| match_pieces(rest, remaining)),
        Some((Piece::Param, rest)) => (1..=actual.len())
            .any(|i| actual.is_char_boundary(i) && match_pieces(rest, &actual[i..])),
    }
}
