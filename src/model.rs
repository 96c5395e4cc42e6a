//! Data model for compiled documentation. Format-agnostic.

use std::collections::BTreeMap;

/// Kind of a comment tag as produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Author,
    Param,
    Returns,
    Group,
    Description,
    Table,
    Todo,
    /// Any tag the compiler does not know; ignored.
    Other(String),
}

impl TagKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "author" => TagKind::Author,
            "param" => TagKind::Param,
            "returns" => TagKind::Returns,
            "group" => TagKind::Group,
            "description" => TagKind::Description,
            "table" => TagKind::Table,
            "todo" => TagKind::Todo,
            other => TagKind::Other(other.to_string()),
        }
    }
}

/// One `@tag name description` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
    pub description: String,
}

impl Tag {
    pub fn new(kind: TagKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Parameter documentation tree, keyed by path segment.
pub type ParamTree = BTreeMap<String, ParamNode>;

/// Documentation for one parameter path segment. Carries no type information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamNode {
    pub description: Option<String>,
    /// Only populated when an annotation path continues past this segment.
    pub children: ParamTree,
}

impl ParamNode {
    /// Description if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// One `@returns` entry. `name` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnEntry {
    pub name: String,
    pub desc: String,
}

/// Compiled documentation for one documented unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub description: String,
    pub author: Option<String>,
    pub group: Option<String>,
    pub params: ParamTree,
    pub returns: Vec<ReturnEntry>,
    pub tables: Vec<String>,
    /// Supplementary `@description` notes, in source order.
    pub etcs: Vec<String>,
    pub todos: Vec<String>,
}

/// Summary row for the cross-document index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIndexEntry {
    pub name: String,
    pub group: String,
    pub description: String,
    pub url: String,
}

/// Group assigned to units without an `@group` tag.
pub const DEFAULT_GROUP: &str = "其他";
