//! Typed views over the raw query [`Values`].
//!
//! Each builder reads a single top level key and never fails. Fragments with
//! the wrong nesting or an empty value are skipped.
use std::collections::{HashMap, HashSet};

use crate::{
    env::Env,
    query::{Filter, Include, Page, ResourceFields, Sort, SortOrder},
    value::{Value, Values},
};

pub const INCLUDE_KEYWORD: &str = "include";
pub const FIELDS_KEYWORD: &str = "fields";
pub const SORT_KEYWORD: &str = "sort";
pub const FILTER_KEYWORD: &str = "filter";
pub const PAGE_KEYWORD: &str = "page";

/// Unnested, non-empty values of `keyword`.
fn plain_values<'v>(values: &'v Values, keyword: &'v str) -> impl Iterator<Item = &'v str> {
    values.all(keyword).iter().filter_map(move |val| {
        if val.has_nested_keys() || val.value.is_empty() {
            tracing::debug!(key = keyword, value = %val.value, "skipping nested or empty value");
            None
        } else {
            Some(val.value.as_str())
        }
    })
}

/// Values of `keyword` with exactly one nested key, as `(nested key, value)`.
fn singly_nested_values<'v>(
    values: &'v Values,
    keyword: &'v str,
) -> impl Iterator<Item = (&'v str, &'v Value)> {
    values.all(keyword).iter().filter_map(move |val| match val.single_nested_key() {
        Some(nested_key) => Some((nested_key, val)),
        None => {
            tracing::debug!(
                key = keyword,
                nested_keys = ?val.nested_keys,
                "expected exactly one nested key"
            );
            None
        }
    })
}

/// An inclusion forest under construction. Nodes live in a flat store and
/// refer to their children by index.
#[derive(Default)]
struct IncludeTree {
    nodes: Vec<IncludeNode>,
    roots: Vec<usize>,
    root_index: HashMap<String, usize>,
}

struct IncludeNode {
    relation: String,
    children: Vec<usize>,
}

impl IncludeTree {
    fn push_node(&mut self, relation: &str) -> usize {
        self.nodes.push(IncludeNode {
            relation: relation.to_owned(),
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn root(&mut self, relation: &str) -> usize {
        if let Some(&index) = self.root_index.get(relation) {
            return index;
        }
        let index = self.push_node(relation);
        self.roots.push(index);
        self.root_index.insert(relation.to_owned(), index);
        index
    }

    fn child(&mut self, parent: usize, relation: &str) -> usize {
        let existing = self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&index| self.nodes[index].relation == relation);

        match existing {
            Some(index) => index,
            None => {
                let index = self.push_node(relation);
                self.nodes[parent].children.push(index);
                index
            }
        }
    }

    /// Add a relation chain such as `comments.author.avatar`. A chain with
    /// no root relation, `.comments`, is dropped.
    fn insert(&mut self, chain: &str, delimiter: char) {
        let mut relations = chain.split(delimiter);

        let first = match relations.next() {
            Some(first) if !first.is_empty() => first,
            _ => {
                if !chain.is_empty() {
                    tracing::debug!(chain, "include chain without a root relation, skipped");
                }
                return;
            }
        };

        let mut node = self.root(first);
        for relation in relations.filter(|rel| !rel.is_empty()) {
            node = self.child(node, relation);
        }
    }

    fn freeze(&self, index: usize) -> Include {
        let node = &self.nodes[index];
        Include::with_includes(
            &node.relation,
            node.children.iter().map(|&child| self.freeze(child)).collect(),
        )
    }

    fn into_includes(self) -> Vec<Include> {
        self.roots.iter().map(|&root| self.freeze(root)).collect()
    }
}

/// `include=author,comments.author` as a forest of relations. Repeated
/// relations, within or across fragments, are merged into the first node
/// created for them.
pub fn includes(values: &Values, env: &Env) -> Vec<Include> {
    let mut tree = IncludeTree::default();

    for value in plain_values(values, INCLUDE_KEYWORD) {
        for chain in value.split(env.list_delimiter) {
            tree.insert(chain, env.relation_delimiter);
        }
    }

    tree.into_includes()
}

/// `sort=-createdAt,title`. A field is kept at its first occurrence only,
/// whatever the direction of later occurrences.
pub fn sort(values: &Values, env: &Env) -> Vec<Sort> {
    let mut rv: Vec<Sort> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for value in plain_values(values, SORT_KEYWORD) {
        for field in value.split(env.list_delimiter) {
            let (field_name, order) = match field.strip_prefix(env.descending_prefix) {
                Some(name) => (name, SortOrder::Descending),
                None => (field, SortOrder::Ascending),
            };

            if field_name.is_empty() {
                continue;
            }

            if !seen.insert(field_name) {
                tracing::trace!(field_name, "dropping duplicate sort field");
                continue;
            }

            rv.push(Sort::new(field_name, order));
        }
    }

    rv
}

/// `filter[title]=eq:foo`, in occurrence order and without deduplication.
pub fn filters(values: &Values) -> Vec<Filter> {
    singly_nested_values(values, FILTER_KEYWORD)
        .filter(|(_, val)| !val.value.is_empty())
        .map(|(field_name, val)| Filter::new(field_name, &val.value))
        .collect()
}

/// `fields[articles]=title,body`. Repeated fragments for the same resource
/// type add the fields not seen so far.
pub fn resource_fields(values: &Values, env: &Env) -> Option<ResourceFields> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    let mut seen: HashMap<&str, HashSet<&str>> = HashMap::new();

    for (resource_type, val) in singly_nested_values(values, FIELDS_KEYWORD) {
        if val.value.trim().is_empty() {
            continue;
        }

        let by_resource = seen.entry(resource_type).or_default();
        let to_append: Vec<String> = val
            .value
            .split(env.list_delimiter)
            .filter(|item| !item.is_empty() && by_resource.insert(*item))
            .map(str::to_owned)
            .collect();

        if to_append.is_empty() {
            continue;
        }

        fields
            .entry(resource_type.to_owned())
            .or_default()
            .extend(to_append);
    }

    if fields.is_empty() {
        None
    } else {
        Some(ResourceFields(fields))
    }
}

/// `page[size]=10&page[number]=2`. Absent unless at least one of `size`,
/// `number`, `limit`, `offset` or `cursor` was given; a later fragment for the
/// same parameter wins.
pub fn page(values: &Values) -> Option<Page> {
    let mut page = Page::default();
    let mut found = false;

    for (key, val) in singly_nested_values(values, PAGE_KEYWORD) {
        let target = match key {
            "size" => &mut page.size,
            "number" => &mut page.number,
            "limit" => &mut page.limit,
            "offset" => &mut page.offset,
            "cursor" => &mut page.cursor,
            _ => {
                tracing::debug!(key, "ignoring unknown page parameter");
                continue;
            }
        };
        target.clone_from(&val.value);
        found = true;
    }

    found.then_some(page)
}
