use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::{env::Env, errors::ParseError, parser::Parser, value::Values};

use lazy_static::lazy_static;
use urlencoding::encode;

#[cfg(feature = "serde")]
use serde::Serialize;

lazy_static! {
    pub(crate) static ref PARSER: Parser = Parser::new(Env::standard());
}

/// Query string directives, plus every raw fragment in `values` for keys
/// (or nesting) the directives don't model.
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Query {
    pub includes: Vec<Include>,
    pub fields: Option<ResourceFields>,
    pub sort: Vec<Sort>,
    pub filters: Vec<Filter>,
    pub page: Option<Page>,
    pub values: Values,
}

impl Query {
    pub fn new(query: &str) -> Result<Self, ParseError> {
        PARSER.parse_query(query)
    }

    /// Fields requested for `resource_type`, if a sparse fieldset was given.
    pub fn fields_by_resource(&self, resource_type: &str) -> Option<&[String]> {
        self.fields.as_ref()?.fields_by_resource(resource_type)
    }
}

/// The canonical query string. Keys and values are percent-encoded, so the
/// output parses back to an equal `Query`.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if !self.includes.is_empty() {
            parts.push(format!("include={}", join(&self.includes, ",")));
        }

        if let Some(fields) = &self.fields {
            let mut resource_types: Vec<&String> = fields.0.keys().collect();
            resource_types.sort();
            for resource_type in resource_types {
                let names: Vec<Cow<str>> =
                    fields.0[resource_type].iter().map(|name| encode(name)).collect();
                parts.push(format!(
                    "fields[{}]={}",
                    encode(resource_type),
                    names.join(",")
                ));
            }
        }

        if !self.sort.is_empty() {
            parts.push(format!("sort={}", join(&self.sort, ",")));
        }

        for filter in &self.filters {
            parts.push(filter.to_string());
        }

        if let Some(page) = &self.page {
            let page = page.to_string();
            if !page.is_empty() {
                parts.push(page);
            }
        }

        f.write_str(&parts.join("&"))
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(sep)
}

/// A node of the inclusion forest, `include=comments.author` gives
/// `comments` with a single child `author`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Include {
    pub relation: String,
    pub includes: Vec<Include>,
}

impl Include {
    pub fn new(relation: &str) -> Self {
        Self {
            relation: relation.to_owned(),
            includes: Vec::new(),
        }
    }

    pub fn with_includes(relation: &str, includes: Vec<Include>) -> Self {
        Self {
            relation: relation.to_owned(),
            includes,
        }
    }

    /// Every root-to-leaf relation chain, e.g. `["comments.author"]`.
    pub fn chains(&self) -> Vec<String> {
        self.chains_with(|relation| Cow::Borrowed(relation))
    }

    fn chains_with(&self, relation: fn(&str) -> Cow<'_, str>) -> Vec<String> {
        let name = relation(&self.relation);
        if self.includes.is_empty() {
            return vec![name.into_owned()];
        }

        self.includes
            .iter()
            .flat_map(|include| include.chains_with(relation))
            .map(|chain| format!("{}.{}", name, chain))
            .collect()
    }
}

/// Encoded chains joined with `,`.
impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chains_with(encode).join(","))
    }
}

/// Sparse fieldsets by resource type, `fields[articles]=title,body`.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceFields(pub HashMap<String, Vec<String>>);

impl ResourceFields {
    pub fn fields_by_resource(&self, resource_type: &str) -> Option<&[String]> {
        self.0.get(resource_type).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ASC"),
            SortOrder::Descending => f.write_str("DESC"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Sort {
    pub field_name: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field_name: &str, order: SortOrder) -> Self {
        Self {
            field_name: field_name.to_owned(),
            order,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order == SortOrder::Descending {
            f.write_char('-')?;
        }
        f.write_str(&encode(&self.field_name))
    }
}

/// `filter[createdAt]=lt:2015-01-01`. The predicate is passed through as is.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Filter {
    pub field_name: String,
    pub predicate: String,
}

impl Filter {
    pub fn new(field_name: &str, predicate: &str) -> Self {
        Self {
            field_name: field_name.to_owned(),
            predicate: predicate.to_owned(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "filter[{}]={}",
            encode(&self.field_name),
            encode(&self.predicate)
        )
    }
}

/// Pagination hints. An empty string means the parameter was not given.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Page {
    pub size: String,
    pub number: String,
    pub limit: String,
    pub offset: String,
    pub cursor: String,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = [
            ("size", &self.size),
            ("number", &self.number),
            ("limit", &self.limit),
            ("offset", &self.offset),
            ("cursor", &self.cursor),
        ];

        write!(
            f,
            "{}",
            params
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| format!("page[{}]={}", key, encode(value)))
                .collect::<Vec<String>>()
                .join("&")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_chains() {
        let include = Include::with_includes(
            "comments",
            vec![
                Include::with_includes("author", vec![Include::new("avatar")]),
                Include::new("replies"),
            ],
        );
        assert_eq!(
            include.chains(),
            vec!["comments.author.avatar", "comments.replies"]
        );
        assert_eq!(include.to_string(), "comments.author.avatar,comments.replies");
    }

    #[test]
    fn include_display_encodes_relations() {
        let include = Include::with_includes("a b", vec![Include::new("c+d")]);
        assert_eq!(include.chains(), vec!["a b.c+d"]);
        assert_eq!(include.to_string(), "a%20b.c%2Bd");
    }

    #[test]
    fn sort_display() {
        assert_eq!(Sort::new("title", SortOrder::Descending).to_string(), "-title");
        assert_eq!(Sort::new("title", SortOrder::Ascending).to_string(), "title");
        assert_eq!(SortOrder::default().to_string(), "ASC");
        assert_eq!(SortOrder::Descending.to_string(), "DESC");
    }

    #[test]
    fn page_display() {
        let page = Page {
            size: "10".to_owned(),
            cursor: "abc".to_owned(),
            ..Default::default()
        };
        assert_eq!(page.to_string(), "page[size]=10&page[cursor]=abc");
    }

    #[test]
    fn filter_display_encodes_separators() {
        assert_eq!(
            Filter::new("q", "a&b;c=d").to_string(),
            "filter[q]=a%26b%3Bc%3Dd"
        );
        assert_eq!(
            Filter::new("discount", "100%").to_string(),
            "filter[discount]=100%25"
        );
        assert_eq!(
            Filter::new("createdAt", "lt:2015-01-01").to_string(),
            "filter[createdAt]=lt%3A2015-01-01"
        );
    }

    #[test]
    fn page_display_encodes_values() {
        let page = Page {
            cursor: "a b+c/d".to_owned(),
            ..Default::default()
        };
        assert_eq!(page.to_string(), "page[cursor]=a%20b%2Bc%2Fd");
    }

    #[test]
    fn resource_fields_is_empty() {
        assert!(ResourceFields::default().is_empty());

        let mut fields = HashMap::new();
        fields.insert("people".to_owned(), vec!["name".to_owned()]);
        let fields = ResourceFields(fields);
        assert!(!fields.is_empty());
        assert_eq!(fields.fields_by_resource("people"), Some(&["name".to_owned()][..]));
        assert_eq!(fields.fields_by_resource("articles"), None);
    }

    #[test]
    fn canonical_query() {
        let mut fields = HashMap::new();
        fields.insert("people".to_owned(), vec!["name".to_owned()]);
        fields.insert("articles".to_owned(), vec!["title".to_owned(), "body".to_owned()]);

        let query = Query {
            includes: vec![Include::new("author")],
            fields: Some(ResourceFields(fields)),
            sort: vec![
                Sort::new("createdAt", SortOrder::Descending),
                Sort::new("title", SortOrder::Ascending),
            ],
            filters: vec![Filter::new("title", "eq:foo")],
            page: Some(Page {
                size: "16".to_owned(),
                ..Default::default()
            }),
            values: Values::default(),
        };

        assert_eq!(
            query.to_string(),
            "include=author&fields[articles]=title,body&fields[people]=name\
             &sort=-createdAt,title&filter[title]=eq%3Afoo&page[size]=16"
        );
    }

    #[test]
    fn empty_query_display() {
        assert_eq!(Query::default().to_string(), "");
    }
}
