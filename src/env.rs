/// Grammar constants shared by the tokenizer, the path classifier and the
/// projection builders.
#[derive(Debug, Clone)]
pub struct Env {
    pub path_delimiter: char,
    pub query_separators: Vec<char>,
    pub list_delimiter: char,
    pub relation_delimiter: char,
    pub descending_prefix: char,
    pub relationships_segment: String,
}

impl Env {
    pub fn standard() -> Self {
        Env {
            path_delimiter: '/',
            query_separators: vec!['&', ';'],
            list_delimiter: ',',
            relation_delimiter: '.',
            descending_prefix: '-',
            relationships_segment: "relationships".to_owned(),
        }
    }

    pub fn is_query_separator(&self, ch: char) -> bool {
        self.query_separators.contains(&ch)
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::standard()
    }
}
