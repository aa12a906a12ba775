use crate::{
    env::Env,
    errors::ParseError,
    request::{Request, Resource},
};

/// Collapse every run of `delimiter` into a single occurrence.
pub fn remove_extra_delimiters(path: &str, delimiter: char) -> String {
    let mut rv = String::with_capacity(path.len());
    let mut previous = None;

    for ch in path.chars() {
        if ch == delimiter && previous == Some(delimiter) {
            continue;
        }
        rv.push(ch);
        previous = Some(ch);
    }

    rv
}

/// Map an already decoded path onto a [`Request`].
///
/// ```text
/// /articles                         - article collection
/// /articles/42                      - article 42
/// /articles/42/author               - resource related to article 42
/// /articles/42/relationships/author - relationship of article 42
/// ```
pub fn classify(path: &str, env: &Env) -> Result<Request, ParseError> {
    let delimiter = env.path_delimiter;
    let path = remove_extra_delimiters(path, delimiter);
    let path = path.strip_prefix(delimiter).unwrap_or(&path);

    if path.is_empty() {
        return Err(ParseError::empty_path());
    }

    let segments: Vec<&str> = path.split(delimiter).collect();
    let mut request = Request::default();

    match segments.as_slice() {
        [resource_type] => {
            request.resource = Resource::collection(resource_type);
        }
        [resource_type, id] => {
            request.resource = Resource::new(resource_type, id);
        }
        [resource_type, id, related] => {
            request.resource = Resource::new(resource_type, id);
            request.related_resource_type = related.to_string();
        }
        [resource_type, id, relationships, relationship] => {
            if *relationships != env.relationships_segment {
                return Err(ParseError::path(format!(
                    "path format error, expected the segment 3 of the path is to be '{}' but '{}' is received",
                    env.relationships_segment, relationships
                )));
            }
            request.resource = Resource::new(resource_type, id);
            request.relationship_type = relationship.to_string();
        }
        _ => {
            return Err(ParseError::path(format!(
                "unknown path format {:?}, path must have 1-4 segments",
                path
            )));
        }
    }

    Ok(request)
}
