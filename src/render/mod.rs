//! Renderer module. Documents are assembled as ordered sections and turned
//! into markdown once, at the end.

pub mod api;
pub mod index;
pub mod table;

/// One titled (or untitled) block of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading depth (`2` → `##`).
    pub level: usize,
    pub title: Option<String>,
    pub body: String,
}

impl Section {
    pub fn untitled() -> Self {
        Self {
            level: 0,
            title: None,
            body: String::new(),
        }
    }

    pub fn titled(level: usize, title: impl Into<String>) -> Self {
        Self {
            level,
            title: Some(title.into()),
            body: String::new(),
        }
    }

    /// Append one line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.body.push_str(text.as_ref());
        self.body.push('\n');
    }

    /// Append pre-formatted markdown verbatim.
    pub fn raw(&mut self, text: &str) {
        self.body.push_str(text);
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        if let Some(ref title) = self.title {
            out.push_str(&"#".repeat(self.level.max(1)));
            out.push(' ');
            out.push_str(title);
            out.push_str("\n\n");
        }
        out.push_str(&self.body);
        out.push('\n');
        out
    }
}

/// A rendered document: sections in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub sections: Vec<Section>,
}

impl Page {
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.title.as_deref() == Some(title))
    }

    pub fn titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| s.title.as_deref())
            .collect()
    }

    pub fn to_markdown(&self) -> String {
        self.sections.iter().map(Section::to_markdown).collect()
    }
}

/// Turn a list of free-text notes into `* item` lines.
pub(crate) fn bullet_section(title: &str, items: &[String]) -> Option<Section> {
    if items.is_empty() {
        return None;
    }
    let mut section = Section::titled(2, title);
    for item in items {
        section.line(format!("* {}", item));
    }
    Some(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titled_section_markdown() {
        let mut section = Section::titled(2, "补充说明");
        section.line("* a");
        assert_eq!(section.to_markdown(), "## 补充说明\n\n* a\n\n");
    }

    #[test]
    fn untitled_section_markdown() {
        let mut section = Section::untitled();
        section.line("创建订单");
        assert_eq!(section.to_markdown(), "创建订单\n\n");
    }

    #[test]
    fn page_concatenates_in_order() {
        let mut page = Page::default();
        page.push(bullet_section("一", &["a".to_string()]).unwrap());
        page.push(bullet_section("二", &["b".to_string()]).unwrap());
        assert_eq!(page.titles(), ["一", "二"]);
        assert_eq!(page.to_markdown(), "## 一\n\n* a\n\n## 二\n\n* b\n\n");
    }

    #[test]
    fn empty_bullets_are_omitted() {
        assert!(bullet_section("未完成事项", &[]).is_none());
    }
}
