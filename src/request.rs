use crate::{
    errors::ParseError,
    query::{Query, PARSER},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The addressed resource. An empty `id` means the whole collection of
/// `type` is requested.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Resource {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub resource_type: String,
    pub id: String,
}

impl Resource {
    pub fn new(resource_type: &str, id: &str) -> Self {
        Self {
            resource_type: resource_type.to_owned(),
            id: id.to_owned(),
        }
    }

    pub fn collection(resource_type: &str) -> Self {
        Self::new(resource_type, "")
    }

    pub fn is_collection(&self) -> bool {
        self.id.is_empty()
    }
}

/// A parsed path and query string.
///
/// At most one of `relationship_type` and `related_resource_type` is set.
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Request {
    pub resource: Resource,
    pub relationship_type: String,
    pub related_resource_type: String,
    pub query: Option<Query>,
}

impl Request {
    /// Parse `path?query` with the standard parser.
    pub fn new(request: &str) -> Result<Self, ParseError> {
        PARSER.parse_request(request)
    }

    /// `/articles/1/relationships/author`
    pub fn is_relationship_request(&self) -> bool {
        !self.relationship_type.is_empty()
    }

    /// `/articles/1/author`
    pub fn is_related_resource_request(&self) -> bool {
        !self.related_resource_type.is_empty()
    }
}
