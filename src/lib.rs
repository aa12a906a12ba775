//! A parser for JSON:API style resource paths and query strings.
//!
//! A request such as `/articles/42/relationships/author?include=comments.author`
//! is decomposed into the addressed [`Resource`], the requested relationship
//! or related resource, and a [`Query`] holding the include tree, sparse
//! fieldsets, sort order, filters and pagination hints.
//!
//! ## Requests
//!
//! ```
//! use rust_jsonapi_query::{errors::ParseError, Request, Resource};
//!
//! fn main() -> Result<(), ParseError> {
//!     let r = Request::new("/articles/42/comments?fields[comments]=author&sort=-createdAt")?;
//!
//!     assert_eq!(r.resource, Resource::new("articles", "42"));
//!     assert_eq!(r.related_resource_type, "comments");
//!
//!     let q = r.query.unwrap();
//!     assert_eq!(q.fields_by_resource("comments"), Some(&["author".to_owned()][..]));
//!     assert_eq!(q.sort[0].to_string(), "-createdAt");
//!     Ok(())
//! }
//! ```
//!
//! ## Query strings
//!
//! Fragments are separated by `&` or `;`. A key may carry nested keys in
//! square brackets, `page[size]=10`. A key that doesn't follow the
//! `key[nested]...` syntax is kept as a plain top level key.
//!
//! ```
//! use rust_jsonapi_query::{errors::ParseError, Query};
//!
//! fn main() -> Result<(), ParseError> {
//!     let q = Query::new("include=author,comments.author&include=comments.replies")?;
//!
//!     println!("{:#?}", q.includes);
//!     println!("{}", q);
//!     Ok(())
//! }
//! ```
//!
//! The include tree is merged across fragments, so the example above has two
//! roots, `author` and `comments`, and prints this canonical query.
//!
//! ```text
//! include=author,comments.author,comments.replies
//! ```
//!
//! Keys the [`Query`] does not model, or nesting it does not accept (such as
//! `filter[field][op]`), stay available in [`Query::values`].
//!
//! ## Configuration
//!
//! [`Request::new`] and [`Query::new`] use the standard JSON:API grammar. Build
//! a [`Parser`] from a modified [`Env`], or give it your own
//! [`decode::Decoder`], to change separators or percent decoding.
//!
//! ```
//! use rust_jsonapi_query::{Env, Parser};
//!
//! let parser = Parser::new(Env {
//!     query_separators: vec!['&'],
//!     ..Env::standard()
//! });
//!
//! let values = parser.parse_values("a=1;b=2").unwrap();
//! assert_eq!(values.get("a", &[]), "1;b=2");
//! ```
pub mod decode;
pub mod env;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod projection;
pub mod query;
pub mod request;
pub mod value;

pub use env::Env;
pub use errors::ParseError;
pub use errors::ParseErrorType;
pub use parser::Parser;
pub use query::{Filter, Include, Page, Query, ResourceFields, Sort, SortOrder};
pub use request::{Request, Resource};
pub use value::{Value, Values};
