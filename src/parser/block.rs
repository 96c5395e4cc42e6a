//! `/** ... */` block tokenizer.
//!
//! Splits a source file's doc blocks into a description and a flat list of
//! `@tag` entries. Knows nothing about what the tags mean.

use crate::model::{Tag, TagKind};
use regex::Regex;
use std::sync::LazyLock;

static RE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").unwrap());

// Leading gutter: indentation, one `*`, one optional space
static RE_GUTTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*\*?[[:blank:]]?").unwrap());

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][A-Za-z0-9_-]*)[[:blank:]]*(.*)$").unwrap());

static RE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{[^}]*\}[[:blank:]]*").unwrap());

/// One tokenized doc block.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RawComment {
    pub description: String,
    pub tags: Vec<Tag>,
}

/// Tag being accumulated across continuation lines.
struct PendingTag {
    kind: TagKind,
    name: String,
    description: String,
}

impl PendingTag {
    fn start(kind: TagKind, rest: &str) -> Self {
        let rest = rest.trim_end();
        match kind {
            TagKind::Param | TagKind::Returns => {
                let rest = RE_TYPE.replace(rest, "");
                let (name, description) = match rest.split_once(char::is_whitespace) {
                    Some((name, desc)) => (name, desc.trim_start()),
                    None => (&*rest, ""),
                };
                Self {
                    kind,
                    name: strip_optional_brackets(name).to_string(),
                    description: description.to_string(),
                }
            }
            TagKind::Description => Self {
                kind,
                name: String::new(),
                description: rest.to_string(),
            },
            _ => Self {
                kind,
                name: rest.to_string(),
                description: String::new(),
            },
        }
    }

    fn continue_with(&mut self, line: &str) {
        if matches!(self.kind, TagKind::Description) && self.description.is_empty() {
            self.description.push_str(line);
            return;
        }
        self.description.push('\n');
        self.description.push_str(line);
    }

    fn finish(mut self) -> Tag {
        let trimmed = self.description.trim_end().len();
        self.description.truncate(trimmed);
        Tag::new(self.kind, self.name, self.description)
    }
}

/// `[name=default]` → `name`. Leaves `name[]` alone.
fn strip_optional_brackets(name: &str) -> &str {
    match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        Some(inner) => inner.split('=').next().unwrap_or(inner),
        None => name,
    }
}

/// Tokenize every doc block in `source`, in source order.
pub fn parse_blocks(source: &str) -> Vec<RawComment> {
    RE_BLOCK
        .captures_iter(source)
        .map(|caps| parse_block(&caps[1]))
        .collect()
}

/// Tokenize the inside of one `/** ... */` block.
fn parse_block(body: &str) -> RawComment {
    let mut description: Vec<String> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();
    let mut pending: Option<PendingTag> = None;

    for raw_line in body.lines() {
        let line = RE_GUTTER.replace(raw_line, "");
        let line = line.trim_end();

        if let Some(caps) = RE_TAG.captures(line) {
            if let Some(done) = pending.take() {
                tags.push(done.finish());
            }
            let kind = TagKind::from_name(&caps[1]);
            pending = Some(PendingTag::start(kind, &caps[2]));
            continue;
        }

        match pending.as_mut() {
            Some(tag) => tag.continue_with(line),
            None => description.push(line.to_string()),
        }
    }

    if let Some(done) = pending.take() {
        tags.push(done.finish());
    }

    RawComment {
        description: description.join("\n").trim().to_string(),
        tags,
    }
}
