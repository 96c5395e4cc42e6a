//! Fold a flat tag list into a [`DocComment`].

use crate::diagnostics::Diagnostics;
use crate::model::{DocComment, ReturnEntry, Tag, TagKind};
use crate::path;

/// Strip exactly one leading `\n` left over from comment formatting.
pub(crate) fn strip_leading_newline(text: &str) -> &str {
    text.strip_prefix('\n').unwrap_or(text)
}

/// `name` when the tag has no body, otherwise the body.
fn effective_text(tag: &Tag) -> &str {
    if tag.description.is_empty() {
        &tag.name
    } else {
        &tag.description
    }
}

/// Compile one comment block. Tags are applied in source order.
pub fn compile(description: &str, tags: &[Tag], unit: &str, diags: &mut Diagnostics) -> DocComment {
    let mut doc = DocComment {
        description: description.to_string(),
        ..Default::default()
    };

    for tag in tags {
        match &tag.kind {
            TagKind::Author => {
                let author = if tag.name.is_empty() {
                    &tag.description
                } else {
                    &tag.name
                };
                doc.author = Some(author.clone());
            }
            TagKind::Param => {
                let desc = strip_leading_newline(&tag.description);
                path::resolve(&tag.name, desc, &mut doc.params, unit, diags);
            }
            TagKind::Returns => {
                let desc = strip_leading_newline(&tag.description);
                let entry = if desc.is_empty() {
                    ReturnEntry {
                        name: String::new(),
                        desc: tag.name.clone(),
                    }
                } else {
                    ReturnEntry {
                        name: tag.name.clone(),
                        desc: desc.to_string(),
                    }
                };
                doc.returns.push(entry);
            }
            TagKind::Group => {
                doc.group = Some(effective_text(tag).to_string());
            }
            TagKind::Description => doc.etcs.push(tag.description.clone()),
            TagKind::Table => {
                let text = strip_leading_newline(effective_text(tag));
                doc.tables.push(text.to_string());
            }
            TagKind::Todo => {
                let text = strip_leading_newline(effective_text(tag));
                doc.todos.push(text.to_string());
            }
            TagKind::Other(_) => {}
        }
    }

    doc
}
