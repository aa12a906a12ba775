use crate::{
    decode::{Decoder, PercentDecoder},
    env::Env,
    errors::ParseError,
    lexer::lex,
    path::classify,
    projection,
    query::Query,
    request::Request,
    value::Values,
};

/// Parses resource paths and query strings under a given [`Env`].
pub struct Parser {
    env: Env,
    decoder: Box<dyn Decoder + Send + Sync>,
}

impl Parser {
    pub fn new(env: Env) -> Self {
        Parser {
            env,
            decoder: Box::new(PercentDecoder),
        }
    }

    /// Use `decoder` instead of the default [`PercentDecoder`].
    pub fn with_decoder(env: Env, decoder: impl Decoder + Send + Sync + 'static) -> Self {
        Parser {
            env,
            decoder: Box::new(decoder),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Split a query string, with or without its leading `?`, into
    /// `key[nested]...=value` fragments grouped by top level key.
    pub fn parse_values(&self, query: &str) -> Result<Values, ParseError> {
        lex(query, &self.env, self.decoder.as_ref())
    }

    /// Parse a query string into its include, fields, sort, filter and page
    /// directives.
    pub fn parse_query(&self, query: &str) -> Result<Query, ParseError> {
        let values = self.parse_values(query)?;

        Ok(Query {
            includes: projection::includes(&values, &self.env),
            fields: projection::resource_fields(&values, &self.env),
            sort: projection::sort(&values, &self.env),
            filters: projection::filters(&values),
            page: projection::page(&values),
            values,
        })
    }

    /// Classify a resource path. The returned request has no query.
    pub fn parse_path(&self, path: &str) -> Result<Request, ParseError> {
        let decoded = self.decoder.decode_path(path).map_err(|err| {
            tracing::debug!(path, error = %err, "failed to decode path");
            err
        })?;
        classify(&decoded, &self.env).map_err(|err| {
            tracing::debug!(path, error = %err, "failed to classify path");
            err
        })
    }

    /// Parse `path?query`. Everything after the first `?` is the query.
    pub fn parse_request(&self, request: &str) -> Result<Request, ParseError> {
        let (path, query) = request.split_once('?').unwrap_or((request, ""));
        let mut rv = self.parse_path(path)?;
        rv.query = Some(self.parse_query(query)?);
        Ok(rv)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(Env::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::ParseErrorType,
        query::{Filter, Include, Page, ResourceFields, Sort, SortOrder},
        request::Resource,
        value::Value,
    };
    use std::collections::HashMap;

    #[test]
    fn parse_values_strips_question_mark() {
        let values = Parser::default()
            .parse_values("?some&separated;entries")
            .unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.contains_key("some"));
        assert!(!values.contains_key("?some"));
    }

    #[test]
    fn parse_values_decodes() {
        let values = Parser::default()
            .parse_values("page%5Bsize%5D=10&filter%5Btitle%5D=a+b")
            .unwrap();
        assert_eq!(values.get("page", &["size"]), "10");
        assert_eq!(values.get("filter", &["title"]), "a b");
    }

    #[test]
    fn parse_values_decode_error() {
        let err = Parser::default().parse_values("key=%zz").unwrap_err();
        assert_eq!(err.kind, ParseErrorType::DecodeError);
    }

    #[test]
    fn parse_values_is_deterministic() {
        let parser = Parser::default();
        let query = "include=a.b&sort=-c&fields[x]=y,z&x=1&x=2&page[size]=3";
        assert_eq!(
            parser.parse_values(query).unwrap(),
            parser.parse_values(query).unwrap()
        );
    }

    #[test]
    fn parse_query() {
        let query = Parser::default()
            .parse_query(
                "?filter[title]=eq:foo&page[size]=16&sort=-createdAt,title&include=author&fields[articles]=title,body",
            )
            .unwrap();

        let mut fields = HashMap::new();
        fields.insert(
            "articles".to_owned(),
            vec!["title".to_owned(), "body".to_owned()],
        );

        let values: Values = vec![
            Value::new(
                "filter".to_owned(),
                Some(vec!["title".to_owned()]),
                "eq:foo".to_owned(),
            ),
            Value::new(
                "page".to_owned(),
                Some(vec!["size".to_owned()]),
                "16".to_owned(),
            ),
            Value::new("sort".to_owned(), None, "-createdAt,title".to_owned()),
            Value::new("include".to_owned(), None, "author".to_owned()),
            Value::new(
                "fields".to_owned(),
                Some(vec!["articles".to_owned()]),
                "title,body".to_owned(),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            query,
            Query {
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
                values,
            }
        );
    }

    #[test]
    fn parse_empty_query() {
        let query = Parser::default().parse_query("").unwrap();
        assert_eq!(query, Query::default());
    }

    #[test]
    fn parse_request() {
        let request = Parser::default()
            .parse_request("/articles/42/comments?fields[comments]=author")
            .unwrap();

        assert_eq!(request.resource, Resource::new("articles", "42"));
        assert_eq!(request.related_resource_type, "comments");
        assert!(request.relationship_type.is_empty());

        let query = request.query.unwrap();
        assert_eq!(
            query.fields_by_resource("comments"),
            Some(&["author".to_owned()][..])
        );
        assert!(query.includes.is_empty());
        assert!(query.sort.is_empty());
        assert!(query.filters.is_empty());
        assert_eq!(query.page, None);
        assert_eq!(query.values.len(), 1);
    }

    #[test]
    fn parse_request_without_query() {
        let request = Parser::default().parse_request("/articles").unwrap();
        assert_eq!(request.resource, Resource::collection("articles"));
        assert_eq!(request.query, Some(Query::default()));
    }

    #[test]
    fn parse_request_encoded_path() {
        let request = Parser::default()
            .parse_request("/articles/a%20b/relationships/author")
            .unwrap();
        assert_eq!(request.resource, Resource::new("articles", "a b"));
        assert!(request.is_relationship_request());
        assert!(!request.is_related_resource_request());
    }

    #[test]
    fn parse_path_decode_error() {
        let err = Parser::default().parse_path("/articles/%").unwrap_err();
        assert_eq!(err.kind, ParseErrorType::DecodeError);
    }

    struct Verbatim;

    impl Decoder for Verbatim {
        fn decode_path(&self, path: &str) -> Result<String, ParseError> {
            Ok(path.to_owned())
        }

        fn decode_query(&self, query: &str) -> Result<String, ParseError> {
            Ok(query.to_owned())
        }
    }

    #[test]
    fn custom_decoder() {
        let parser = Parser::with_decoder(Env::standard(), Verbatim);
        let values = parser.parse_values("page%5Bsize%5D=10").unwrap();
        assert_eq!(values.get("page%5Bsize%5D", &[]), "10");
    }

    #[test]
    fn custom_env() {
        let env = Env {
            query_separators: vec!['|'],
            relationships_segment: "links".to_owned(),
            ..Env::standard()
        };
        let parser = Parser::new(env);

        let values = parser.parse_values("a=1|b=2&c=3").unwrap();
        assert_eq!(values.get("a", &[]), "1");
        assert_eq!(values.get("b", &[]), "2&c=3");

        let request = parser.parse_path("/articles/1/links/author").unwrap();
        assert_eq!(request.relationship_type, "author");
        assert!(parser.parse_path("/articles/1/relationships/author").is_err());
    }
}
