//! Parameter path resolution.
//!
//! Annotation names describe nested structures with `.` (object property)
//! and `[]` (array element) markers:
//!
//! - `user.address.city` → `user` / `address` / `city`
//! - `items[].id`        → elements of `items` / `id`
//! - `tags[]`            → the array `tags` itself
//!
//! A path is tokenized once into [`Segment`]s, then walked into the
//! [`ParamTree`]. Malformed paths are rejected before the tree is touched.

use crate::diagnostics::Diagnostics;
use crate::model::ParamTree;

/// One non-terminal step of a parameter path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `name.`: a property of an object.
    Field(&'a str),
    /// `name[].`: a property of each array element.
    ArrayOf(&'a str),
}

impl<'a> Segment<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Segment::Field(name) | Segment::ArrayOf(name) => name,
        }
    }
}

/// A tokenized parameter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath<'a> {
    pub parents: Vec<Segment<'a>>,
    pub leaf: &'a str,
}

/// Tokenize a parameter path. Returns `None` for malformed paths.
///
/// At each step the first `[]` wins over the first `.` only when it comes
/// first; `name[]` at the end of a path names the array itself, and any
/// character other than `.` right after `[]` is malformed. Empty segments
/// (`x.`, `.x`, `x[].`) are malformed too.
pub fn parse(path: &str) -> Option<ParamPath<'_>> {
    let mut parents = Vec::new();
    let mut rest = path;

    loop {
        if rest.is_empty() || rest.starts_with('.') || rest.starts_with("[]") {
            return None;
        }

        let array = rest.find("[]");
        let dot = rest.find('.');

        match (array, dot) {
            (Some(a), o) if o.map_or(true, |o| o > a) => {
                let main = &rest[..a];
                let sub = &rest[a + 2..];
                if sub.is_empty() {
                    return Some(ParamPath {
                        parents,
                        leaf: main,
                    });
                }
                let next = sub.strip_prefix('.')?;
                parents.push(Segment::ArrayOf(main));
                rest = next;
            }
            (_, Some(o)) => {
                parents.push(Segment::Field(&rest[..o]));
                rest = &rest[o + 1..];
            }
            _ => {
                return Some(ParamPath {
                    parents,
                    leaf: rest,
                })
            }
        }
    }
}

/// Store `description` for `path` inside `into`, creating intermediate nodes.
///
/// Malformed paths and redefinitions of an already described parameter
/// emit a warning; a redefinition keeps the first description.
pub fn resolve(
    path: &str,
    description: &str,
    into: &mut ParamTree,
    unit: &str,
    diags: &mut Diagnostics,
) {
    let Some(parsed) = parse(path) else {
        diags.warning(format!("- non-conforming annotation path ({}): {}", path, unit));
        return;
    };

    let mut tree = into;
    for segment in &parsed.parents {
        tree = &mut tree.entry(segment.name().to_string()).or_default().children;
    }

    let node = tree.entry(parsed.leaf.to_string()).or_default();
    if node.text().is_some() {
        diags.warning(format!(
            "- duplicate annotation for parameter ({}): {}",
            path, unit
        ));
    } else {
        node.description = Some(description.to_string());
    }
}
