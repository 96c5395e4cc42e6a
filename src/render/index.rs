//! Cross-document index: one table per canonical group.
//!
//! Also the place where whole-build problems surface: entries in groups
//! outside the canonical list, and distinct units sharing one description.

use crate::diagnostics::Diagnostics;
use crate::model::GroupIndexEntry;
use crate::render::{Page, Section};
use indexmap::IndexMap;

/// Render the index page.
///
/// `name_header` is the title of the first column (`接口`, `表名`, ...).
pub fn render_index(
    entries: &[GroupIndexEntry],
    groups: &[String],
    name_header: &str,
    diags: &mut Diagnostics,
) -> Page {
    let mut page = Page::default();

    for group in groups {
        let mut members: Vec<&GroupIndexEntry> =
            entries.iter().filter(|e| &e.group == group).collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| a.name.cmp(&b.name));

        let mut section = Section::titled(3, group.as_str());
        section.line(format!("| {} | 注释 |", name_header));
        section.line("|:---|:---|");
        for entry in members {
            section.line(format!(
                "| [{}]({}) | {} |",
                entry.name, entry.url, entry.description
            ));
        }
        page.push(section);
    }

    report_unindexed(entries, groups, diags);
    report_duplicates(entries, diags);
    page
}

/// One warning per group that is not in the canonical list.
fn report_unindexed(entries: &[GroupIndexEntry], groups: &[String], diags: &mut Diagnostics) {
    let mut unknown: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for entry in entries {
        if !groups.contains(&entry.group) {
            unknown.entry(&entry.group).or_default().push(&entry.name);
        }
    }
    for (group, names) in unknown {
        diags.warning(format!("* unindexed group [{}]: {}", group, names.join(",")));
    }
}

/// One error per non-empty description shared by two or more distinct names.
fn report_duplicates(entries: &[GroupIndexEntry], diags: &mut Diagnostics) {
    let mut by_desc: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for entry in entries.iter().filter(|e| !e.description.is_empty()) {
        let names = by_desc.entry(&entry.description).or_default();
        if !names.contains(&entry.name.as_str()) {
            names.push(&entry.name);
        }
    }
    for (desc, names) in by_desc {
        if names.len() > 1 {
            diags.error(format!(
                "* duplicate description \"{}\": {}",
                desc,
                names.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, group: &str, desc: &str) -> GroupIndexEntry {
        GroupIndexEntry {
            name: name.into(),
            group: group.into(),
            description: desc.into(),
            url: format!("https://docs{}", name),
        }
    }

    fn groups() -> Vec<String> {
        vec!["用户".into(), "订单".into()]
    }

    #[test]
    fn tables_follow_canonical_order_sorted_by_name() {
        let entries = [
            entry("/order/pay", "订单", "支付订单"),
            entry("/user/login", "用户", "登录"),
            entry("/order/create", "订单", "创建订单"),
        ];
        let mut diags = Diagnostics::new();
        let page = render_index(&entries, &groups(), "接口", &mut diags);
        assert_eq!(page.titles(), ["用户", "订单"]);
        assert_eq!(
            page.sections[1].to_markdown(),
            "### 订单\n\n| 接口 | 注释 |\n|:---|:---|\n\
             | [/order/create](https://docs/order/create) | 创建订单 |\n\
             | [/order/pay](https://docs/order/pay) | 支付订单 |\n\n"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn unknown_group_excluded_and_warned_once() {
        let entries = [
            entry("/user/login", "用户", "登录"),
            entry("/misc/ping", "未分组X", "心跳"),
        ];
        let mut diags = Diagnostics::new();
        let text = render_index(&entries, &groups(), "接口", &mut diags).to_markdown();
        assert!(!text.contains("/misc/ping"));
        assert_eq!(diags.warnings().len(), 1);
        assert!(diags.warnings()[0].contains("未分组X"));
        assert!(diags.warnings()[0].contains("/misc/ping"));
    }

    #[test]
    fn duplicate_descriptions_are_one_error() {
        let entries = [
            entry("/order/create", "订单", "创建订单"),
            entry("/order/new", "订单", "创建订单"),
            entry("/order/pay", "订单", ""),
            entry("/order/refund", "订单", ""),
        ];
        let mut diags = Diagnostics::new();
        render_index(&entries, &groups(), "接口", &mut diags);
        assert_eq!(diags.errors().len(), 1);
        assert!(diags.errors()[0].contains("/order/create, /order/new"));
    }

    #[test]
    fn same_name_twice_is_not_a_duplicate() {
        let entries = [entry("users", "用户", "用户表"), entry("users", "用户", "用户表")];
        let mut diags = Diagnostics::new();
        render_index(&entries, &groups(), "表名", &mut diags);
        assert!(diags.errors().is_empty());
    }
}
