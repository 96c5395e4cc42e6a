//! Route handler documentation.
//!
//! Section order is fixed: description, base info, parameters, returns,
//! supplementary notes, referenced tables, todos. Empty sections are left
//! out, except returns, which is always rendered.

use crate::config::{Config, ImplicitParam};
use crate::diagnostics::Diagnostics;
use crate::model::{DocComment, ReturnEntry};
use crate::render::{bullet_section, Page, Section};
use crate::resolve::ResolvedType;
use crate::schema::Route;
use crate::store::page_key;
use indexmap::IndexMap;

/// Placeholder row text for undocumented top-level parameters.
pub const MISSING_PARAM_DESC: &str = "该参数缺少注释，请联系开发者补充";

/// Placeholder text for undocumented return values.
pub const MISSING_RETURNS: &str = "缺少返回注释，请通知开发者补上";

const PARAMS_HEAD: &str =
    "| 参数 | 类型 | 是否可选 | 默认值 | 说明 |\n|:-----|:----|:--------|:-------|:-----|\n";

/// Renders one route page.
pub struct ApiRenderer<'a> {
    config: &'a Config,
    /// Page index: physical key → URL.
    pages: &'a IndexMap<String, String>,
}

impl<'a> ApiRenderer<'a> {
    pub fn new(config: &'a Config, pages: &'a IndexMap<String, String>) -> Self {
        Self { config, pages }
    }

    pub fn render(
        &self,
        doc: &DocComment,
        route: &Route,
        resolved: &IndexMap<String, ResolvedType>,
        unit: &str,
        diags: &mut Diagnostics,
    ) -> Page {
        let mut page = Page::default();

        if !doc.description.is_empty() {
            let mut section = Section::untitled();
            section.line(&doc.description);
            page.push(section);
        }
        page.push(base_info(route));
        if let Some(section) = self.params(doc, route, resolved, unit, diags) {
            page.push(section);
        }
        page.push(returns(&doc.returns, unit, diags));
        if let Some(section) = bullet_section("补充说明", &doc.etcs) {
            page.push(section);
        }
        if let Some(section) = self.tables(&doc.tables, unit, diags) {
            page.push(section);
        }
        if let Some(section) = bullet_section("未完成事项", &doc.todos) {
            page.push(section);
        }

        page
    }

    fn implicit_params(&self, route: &Route) -> Vec<&'a ImplicitParam> {
        let access = route.access();
        self.config
            .api
            .implicit_params
            .iter()
            .filter(|p| access.contains(&p.when))
            .collect()
    }

    fn params(
        &self,
        doc: &DocComment,
        route: &Route,
        resolved: &IndexMap<String, ResolvedType>,
        unit: &str,
        diags: &mut Diagnostics,
    ) -> Option<Section> {
        // Implicit rows never stand alone
        if route.params.is_empty() {
            return None;
        }

        let mut rows = String::new();
        let mut details = String::new();

        for param in self.implicit_params(route) {
            rows.push_str(&format!(
                "| {} | {} | 必填 | - | {} |\n",
                param.name, param.ty, param.desc
            ));
        }

        for (name, schema) in &route.params {
            if self.config.api.special_param_names.contains(name) {
                diags.warning(format!(
                    "- parameter shadows a special parameter ({}): {}",
                    name, unit
                ));
            }

            let ty = match resolved.get(name) {
                Some(resolved) => {
                    for section in &resolved.details {
                        details.push_str(&section.to_markdown());
                    }
                    resolved.canonical.as_str()
                }
                None => "any",
            };

            let required = if schema.is_optional() { "可选" } else { "必填" };
            let desc = match doc.params.get(name).and_then(|n| n.text()) {
                Some(text) => text,
                None => {
                    diags.warning(format!("- parameter missing annotation ({}): {}", name, unit));
                    MISSING_PARAM_DESC
                }
            };

            rows.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                name,
                ty,
                required,
                schema.default_text(),
                desc
            ));
        }

        let mut section = Section::titled(2, "参数");
        section.raw(PARAMS_HEAD);
        section.raw(&rows);
        if !details.is_empty() {
            section.line("");
            section.raw(details.trim_end());
            section.line("");
        }
        Some(section)
    }

    fn tables(&self, tables: &[String], unit: &str, diags: &mut Diagnostics) -> Option<Section> {
        if tables.is_empty() {
            return None;
        }

        let mut section = Section::titled(2, "操作的数据表");
        for table in tables {
            match split_table_ref(table) {
                Some((database, name)) => {
                    let url = self
                        .config
                        .db_path(database)
                        .and_then(|path| self.pages.get(&page_key(path, name)));
                    match url {
                        Some(url) => section.line(format!("* [{}]({})", table, url)),
                        None => section.line(format!("* {}", table)),
                    }
                }
                None => {
                    diags.warning(format!("* malformed table reference ({}): {}", table, unit));
                    section.line(format!("* {}", table));
                }
            }
        }
        Some(section)
    }
}

/// `db/table` → `("db", "table")`; anything else is malformed.
fn split_table_ref(reference: &str) -> Option<(&str, &str)> {
    let mut parts = reference.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(db), Some(table), None) if !db.is_empty() && !table.is_empty() => Some((db, table)),
        _ => None,
    }
}

fn base_info(route: &Route) -> Section {
    let mut access = "无限制".to_string();
    if let Some(ref sources) = route.rpc_auth {
        access = format!("限内部服务器访问\n* 允许的访问来源：{}", sources.joined());
    }
    if let Some(ref auth) = route.auth {
        let rule = if auth.check {
            "特殊权限"
        } else {
            auth.rule.as_deref().unwrap_or("无")
        };
        access = format!("限登陆用户访问\n* 需要的权限：{}", rule);
    }

    let on_off = |flag: bool| if flag { "启用" } else { "未启用" };

    let mut section = Section::titled(2, "基本信息");
    section.line(format!("* 接口：【{}】{}", route.method, route.path));
    section.line(format!("* 访问权限：{}", access));
    section.line(format!(
        "* IP限制：{}",
        if route.ip || route.rpc_auth.is_some() { "有限制" } else { "无限制" }
    ));
    section.line(format!("* 接口缓存：{}", on_off(route.cache)));
    section.line(format!("* 操作日志：{}", on_off(route.logger)));
    section
}

fn returns(entries: &[ReturnEntry], unit: &str, diags: &mut Diagnostics) -> Section {
    let mut section = Section::titled(2, "返回结果");

    match entries {
        [] => {
            diags.error(format!("* return value undocumented: {}", unit));
            section.line(MISSING_RETURNS);
        }
        [only] if only.desc.starts_with('\n') => section.line(&only.desc),
        _ => {
            for entry in entries {
                if !entry.name.is_empty() {
                    section.line(format!("### {}", entry.name));
                }
                if entry.desc.find('\n').is_some_and(|i| i > 0) {
                    section.line("```js");
                    section.line(entry.desc.trim_end_matches('\n'));
                    section.line("```");
                } else {
                    section.line(&entry.desc);
                }
                section.line("");
            }
        }
    }

    section
}
