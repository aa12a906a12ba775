use rust_jsonapi_query::errors::ParseError;
use rust_jsonapi_query::request::Request;

fn main() -> Result<(), ParseError> {
    let arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("/articles/1/relationships/comments?include=author"));

    let r = Request::new(&arg)?;

    println!("{:#?}", r);
    if let Some(q) = &r.query {
        println!("{}", q);
    }

    Ok(())
}
