//! Database table documentation: field table, column notes, keys.

use crate::diagnostics::Diagnostics;
use crate::render::{Page, Section};
use crate::schema::{Column, TableSchema};
use serde_json::Value;

/// Render one table page. `unit` is `database.table`.
pub fn render_table(unit: &str, table: &TableSchema, diags: &mut Diagnostics) -> Page {
    let mut page = Page::default();

    let comment = match table.documented_comment() {
        Some(comment) => comment,
        None => {
            diags.error(format!("* table [{}] has no comment", unit));
            ""
        }
    };
    let mut summary = Section::untitled();
    summary.line(format!("-  {}", comment));
    page.push(summary);

    let mut fields = Section::titled(2, "字段说明");
    fields.line("|字段|类型|允许为空|默认值|注释|");
    fields.line("|:---|:---|:---|---|---|");
    for (name, column) in &table.columns {
        let comment = column.comment.as_deref().unwrap_or("");
        if comment.is_empty() {
            diags.error(format!("* column [{}.{}] has no comment", unit, name));
        }
        fields.line(format!(
            "|{}|{}|{}|{}|{}|",
            name,
            column.ty,
            if column.allow_null { "是" } else { "否" },
            default_cell(column),
            comment
        ));
    }
    page.push(fields);

    for note in &table.notes {
        let mut section = Section::titled(4, format!("字段详解：{}", note.column));
        section.line(&note.desc);
        page.push(section);
    }

    let mut keys = Section::titled(2, "数据索引");
    for (name, key) in &table.keys {
        let columns = key.keys.join(",");
        if name == "PRIMARY" {
            keys.line(format!("- 主键：{}", columns));
        } else {
            let kind = if key.unique { "唯一索引" } else { "普通索引" };
            keys.line(format!("- {} {}:{}", kind, name, columns));
        }
    }
    page.push(keys);

    page
}

fn default_cell(column: &Column) -> String {
    if column.auto_increment {
        return "自增字段".to_string();
    }
    match &column.default_value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders() -> TableSchema {
        serde_json::from_value(json!({
            "comment": "订单表",
            "group": "订单",
            "columns": {
                "id": { "type": "BIGINT", "auto_increment": true, "comment": "主键" },
                "status": { "type": "TINYINT", "default_value": 0, "comment": "状态" },
                "remark": { "type": "VARCHAR(255)", "allow_null": true, "default_value": "" }
            },
            "keys": {
                "PRIMARY": { "keys": ["id"] },
                "uk_no": { "keys": ["order_no"], "unique": true },
                "idx_user": { "keys": ["user_id", "created_at"] }
            },
            "notes": [{ "column": "status", "desc": "0 待支付 1 已支付" }]
        }))
        .unwrap()
    }

    #[test]
    fn renders_fields_notes_and_keys() {
        let mut diags = Diagnostics::new();
        let page = render_table("main.orders", &orders(), &mut diags);
        let text = page.to_markdown();

        assert!(text.starts_with("-  订单表\n\n## 字段说明\n\n"));
        assert!(text.contains("|id|BIGINT|否|自增字段|主键|\n"));
        assert!(text.contains("|status|TINYINT|否|0|状态|\n"));
        assert!(text.contains("|remark|VARCHAR(255)|是|||\n"));
        assert!(text.contains("#### 字段详解：status\n\n0 待支付 1 已支付\n"));
        assert!(text.contains("- 主键：id\n- 唯一索引 uk_no:order_no\n- 普通索引 idx_user:user_id,created_at\n"));

        assert_eq!(diags.errors(), ["* column [main.orders.remark] has no comment"]);
    }

    #[test]
    fn uncommented_table_is_an_error() {
        let mut table = orders();
        table.comment = None;
        let mut diags = Diagnostics::new();
        render_table("main.orders", &table, &mut diags);
        assert!(diags.errors().iter().any(|e| e.contains("table [main.orders]")));
    }

    #[test]
    fn section_order() {
        let mut diags = Diagnostics::new();
        let page = render_table("main.orders", &orders(), &mut diags);
        assert_eq!(page.titles(), ["字段说明", "字段详解：status", "数据索引"]);
    }
}
