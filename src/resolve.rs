//! Reconcile the documentation tree against declared parameter schemas.
//!
//! Produces canonical type strings (`string`, `object`, `[]object`,
//! `[]any`, ...) and one [`DetailSection`] per object with declared
//! properties. Detail sections are ordered depth-first, parent first, and
//! named by their dotted path so headings are unique within one document.

use crate::diagnostics::Diagnostics;
use crate::model::ParamNode;
use crate::schema::{ParamSchema, Shape};

/// Placeholder for object properties nobody documented.
pub const MISSING_PROPERTY_DESC: &str = "该参数缺少注释";

/// One row of an object detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub name: String,
    pub ty: String,
    pub desc: String,
}

/// Property table for one object-typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    /// Dotted path of the object, e.g. `order.items`.
    pub name: String,
    pub rows: Vec<PropertyRow>,
}

impl DetailSection {
    pub fn title(&self) -> String {
        format!("{}对象详解", self.name)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "#### {}\n\n| 属性 | 类型 | 说明 |\n|:----|:-----|:-----|\n",
            self.title()
        );
        for row in &self.rows {
            out.push_str(&format!("| {} | {} | {} |\n", row.name, row.ty, row.desc));
        }
        out.push('\n');
        out
    }
}

/// Result of resolving one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub canonical: String,
    pub details: Vec<DetailSection>,
}

impl ResolvedType {
    fn plain(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            details: Vec::new(),
        }
    }
}

/// Resolver bound to one documented unit; diagnostics name that unit.
pub struct TypeResolver<'a> {
    unit: &'a str,
    diags: &'a mut Diagnostics,
}

impl<'a> TypeResolver<'a> {
    pub fn new(unit: &'a str, diags: &'a mut Diagnostics) -> Self {
        Self { unit, diags }
    }

    pub fn resolve(
        &mut self,
        name: &str,
        schema: &ParamSchema,
        node: Option<&ParamNode>,
    ) -> ResolvedType {
        match &schema.shape {
            Shape::Scalar(ty) => ResolvedType::plain(ty.as_str()),
            Shape::Array(None) => {
                self.diags.warning(format!(
                    "- array parameter missing element type annotation ({}): {}",
                    name, self.unit
                ));
                ResolvedType::plain("[]any")
            }
            Shape::Array(Some(items)) => {
                // Elements share the array's name and documentation node
                let inner = self.resolve(name, items, node);
                ResolvedType {
                    canonical: format!("[]{}", inner.canonical),
                    details: inner.details,
                }
            }
            Shape::Object(None) => ResolvedType::plain("object"),
            Shape::Object(Some(properties)) => {
                let mut section = DetailSection {
                    name: name.to_string(),
                    rows: Vec::with_capacity(properties.len()),
                };
                let mut nested = Vec::new();

                for (key, prop) in properties {
                    let child = node.and_then(|n| n.children.get(key));
                    let desc = match child.and_then(ParamNode::text) {
                        Some(text) => text.to_string(),
                        None => {
                            self.diags.warning(format!(
                                "- object property missing annotation ({}.{}): {}",
                                name, key, self.unit
                            ));
                            MISSING_PROPERTY_DESC.to_string()
                        }
                    };
                    let ty = if prop.is_compound() {
                        let inner = self.resolve(&format!("{}.{}", name, key), prop, child);
                        nested.extend(inner.details);
                        inner.canonical
                    } else {
                        self.resolve(key, prop, child).canonical
                    };
                    section.rows.push(PropertyRow {
                        name: key.clone(),
                        ty,
                        desc,
                    });
                }

                let mut details = vec![section];
                details.extend(nested);
                ResolvedType {
                    canonical: "object".to_string(),
                    details,
                }
            }
        }
    }
}

/// Resolve one parameter without keeping a resolver around.
pub fn resolve_type(
    name: &str,
    schema: &ParamSchema,
    node: Option<&ParamNode>,
    unit: &str,
    diags: &mut Diagnostics,
) -> ResolvedType {
    TypeResolver::new(unit, diags).resolve(name, schema, node)
}
