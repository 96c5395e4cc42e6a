//! Registry inputs: parameter schemas, route metadata and table schemas.
//!
//! These are the externally supplied ground truth that documentation is
//! reconciled against. Parameter schemas arrive loosely typed (a bare type
//! name or a descriptor object) and are normalized into [`Shape`] once, at
//! deserialization.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Declared shape of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar(String),
    /// Element schema, when declared.
    Array(Option<Box<ParamSchema>>),
    /// Declared properties, when any.
    Object(Option<IndexMap<String, ParamSchema>>),
}

/// Declared schema of one route parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSchema")]
pub struct ParamSchema {
    pub shape: Shape,
    pub optional: bool,
    pub default: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchema {
    Bare(String),
    Full {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        items: Option<Box<RawSchema>>,
        #[serde(default)]
        properties: Option<IndexMap<String, RawSchema>>,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        default: Option<Value>,
    },
}

impl From<RawSchema> for ParamSchema {
    fn from(raw: RawSchema) -> Self {
        match raw {
            RawSchema::Bare(ty) => ParamSchema {
                shape: shape_of(ty, None, None),
                optional: false,
                default: None,
            },
            RawSchema::Full {
                ty,
                items,
                properties,
                optional,
                default,
            } => ParamSchema {
                shape: shape_of(ty, items, properties),
                optional,
                default,
            },
        }
    }
}

fn shape_of(
    ty: String,
    items: Option<Box<RawSchema>>,
    properties: Option<IndexMap<String, RawSchema>>,
) -> Shape {
    match ty.as_str() {
        "array" => Shape::Array(items.map(|i| Box::new(ParamSchema::from(*i)))),
        "object" => Shape::Object(properties.map(|props| {
            props
                .into_iter()
                .map(|(k, v)| (k, ParamSchema::from(v)))
                .collect()
        })),
        _ => Shape::Scalar(ty),
    }
}

impl ParamSchema {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            optional: false,
            default: None,
        }
    }

    pub fn scalar(ty: &str) -> Self {
        Self::new(Shape::Scalar(ty.to_string()))
    }

    pub fn array(items: Option<ParamSchema>) -> Self {
        Self::new(Shape::Array(items.map(Box::new)))
    }

    pub fn object<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ParamSchema)>,
    {
        Self::new(Shape::Object(Some(
            properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )))
    }

    /// Optional when marked so or when a default is declared.
    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    /// JSON form of the default value, `-` when there is none.
    pub fn default_text(&self) -> String {
        match &self.default {
            Some(value) => value.to_string(),
            None => "-".to_string(),
        }
    }

    /// Whether rendering this parameter expands into detail sections.
    pub fn is_compound(&self) -> bool {
        matches!(self.shape, Shape::Array(_) | Shape::Object(_))
    }
}

// -- Routes -------------------------------------------------------------------

/// Route metadata supplied by the route registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Route {
    /// Handler location relative to the source root.
    pub key: String,
    pub path: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub params: IndexMap<String, ParamSchema>,
    #[serde(default)]
    pub auth: Option<AuthRule>,
    #[serde(default)]
    pub rpc_auth: Option<RpcSources>,
    #[serde(default)]
    pub ip: bool,
    #[serde(default)]
    pub cache: bool,
    #[serde(default)]
    pub logger: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Logged-in user requirement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthRule {
    /// Custom permission check instead of a named rule.
    #[serde(default)]
    pub check: bool,
    #[serde(default)]
    pub rule: Option<String>,
}

/// Allowed internal callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RpcSources {
    One(String),
    Many(Vec<String>),
}

impl RpcSources {
    pub fn joined(&self) -> String {
        match self {
            RpcSources::One(source) => source.clone(),
            RpcSources::Many(sources) => sources.join("，"),
        }
    }
}

/// Caller class used to pick implicit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Rpc,
    Auth,
}

impl Route {
    /// Access classes this route belongs to, in implicit-row order.
    pub fn access(&self) -> Vec<Access> {
        if self.rpc_auth.is_some() {
            return vec![Access::Rpc];
        }
        let mut access = vec![Access::Public];
        if self.auth.is_some() {
            access.push(Access::Auth);
        }
        access
    }
}

// -- Tables -------------------------------------------------------------------

/// `database → table → schema`, in declaration order.
pub type TableRegistry = IndexMap<String, IndexMap<String, TableSchema>>;

/// Placeholder some schema dumpers emit for uncommented tables.
pub const NO_TABLE_COMMENT: &str = " No comment for this table";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub columns: IndexMap<String, Column>,
    #[serde(default)]
    pub keys: IndexMap<String, TableKey>,
    /// Long-form explanations attached to single columns.
    #[serde(default)]
    pub notes: Vec<ColumnNote>,
}

impl TableSchema {
    /// Table comment unless absent, empty or the dumper placeholder.
    pub fn documented_comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .filter(|c| !c.is_empty() && *c != NO_TABLE_COMMENT)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub allow_null: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableKey {
    pub keys: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnNote {
    pub column: String,
    pub desc: String,
}
