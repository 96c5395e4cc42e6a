//! Parser module: tokenize a handler source and compile its first doc block.

pub mod block;
pub mod compile;

use crate::diagnostics::Diagnostics;
use crate::model::DocComment;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Compile the first doc block of `source`.
///
/// Returns `None` when the source has no doc block at all; callers treat
/// that as missing documentation for the whole unit.
pub fn read_comment(unit: &str, source: &str, diags: &mut Diagnostics) -> Option<DocComment> {
    let raw = block::parse_blocks(source).into_iter().next()?;
    Some(compile::compile(&raw.description, &raw.tags, unit, diags))
}

/// Read and compile a handler source file.
pub fn read_comment_file(path: &Path, diags: &mut Diagnostics) -> Result<Option<DocComment>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(read_comment(&path.to_string_lossy(), &source, diags))
}

/// Locate the handler source for a route key.
///
/// `user/create` → `<root>/user/create.<ext>`, `user/` → `<root>/user/index.<ext>`.
pub fn handler_source(root: &Path, key: &str, ext: &str) -> PathBuf {
    let file = if key.ends_with('/') {
        format!("{}index.{}", key, ext)
    } else {
        format!("{}.{}", key, ext)
    };
    root.join(file.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_without_block_is_none() {
        let mut diags = Diagnostics::new();
        assert!(read_comment("a.js", "module.exports = 1;\n", &mut diags).is_none());
    }

    #[test]
    fn only_first_block_is_compiled() {
        let mut diags = Diagnostics::new();
        let src = "/** 第一个\n * @group 用户 */\n/** 第二个\n * @group 订单 */\n";
        let doc = read_comment("a.js", src, &mut diags).unwrap();
        assert_eq!(doc.description, "第一个");
        assert_eq!(doc.group.as_deref(), Some("用户"));
    }

    #[test]
    fn handler_source_for_plain_key() {
        assert_eq!(
            handler_source(Path::new("app/http"), "user/create", "js"),
            PathBuf::from("app/http/user/create.js")
        );
    }

    #[test]
    fn handler_source_for_directory_key() {
        assert_eq!(
            handler_source(Path::new("app/http"), "user/", "js"),
            PathBuf::from("app/http/user/index.js")
        );
    }
}
