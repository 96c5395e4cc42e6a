//! Build configuration, read from `apidoc.toml`.

use crate::schema::Access;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for page URLs. Pages get relative URLs when unset.
    pub base_url: Option<String>,
    /// Where rendered pages are written.
    pub output: PathBuf,
    pub api: ApiConfig,
    /// Per-database settings, keyed by database name.
    pub db: IndexMap<String, DbConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            output: PathBuf::from("docs"),
            api: ApiConfig::default(),
            db: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub source_root: PathBuf,
    pub source_ext: String,
    pub doc_path: String,
    pub index_path: String,
    pub index_name: String,
    /// Canonical group order of the index page.
    pub groups: Vec<String>,
    /// Names reserved for implicit parameters.
    pub special_param_names: Vec<String>,
    pub implicit_params: Vec<ImplicitParam>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            source_ext: "js".to_string(),
            doc_path: "api".to_string(),
            index_path: "api".to_string(),
            index_name: "接口索引".to_string(),
            groups: Vec::new(),
            special_param_names: Vec::new(),
            implicit_params: Vec::new(),
        }
    }
}

/// A parameter every route of an access class receives without declaring it.
#[derive(Debug, Clone, Deserialize)]
pub struct ImplicitParam {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub ty: String,
    pub desc: String,
    pub when: Access,
}

fn default_param_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Physical documentation path; keys the page index.
    pub path: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default = "default_db_index_name")]
    pub index_name: String,
}

fn default_db_index_name() -> String {
    "索引".to_string()
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load a config file; a relative `source_root` is taken relative to it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("in {}", path.display()))?;
        if let Some(dir) = path.parent() {
            if config.api.source_root.is_relative() {
                config.api.source_root = dir.join(&config.api.source_root);
            }
        }
        Ok(config)
    }

    /// Physical path of `database`, if configured.
    pub fn db_path(&self, database: &str) -> Option<&str> {
        self.db.get(database).map(|d| d.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.api.index_name, "接口索引");
        assert_eq!(config.output, PathBuf::from("docs"));
        assert!(config.db.is_empty());
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml(
            r#"
base_url = "https://docs.example.com"

[api]
source_root = "app/http"
groups = ["用户", "订单"]
special_param_names = ["TTP"]

[[api.implicit_params]]
name = "TTP"
desc = "调用接口的客户端"
when = "public"

[db.main]
path = "db/main"
groups = ["核心"]
"#,
        )
        .unwrap();
        assert_eq!(config.api.groups, ["用户", "订单"]);
        assert_eq!(config.api.implicit_params[0].ty, "string");
        assert_eq!(config.api.implicit_params[0].when, Access::Public);
        assert_eq!(config.db_path("main"), Some("db/main"));
        assert_eq!(config.db["main"].index_name, "索引");
        assert_eq!(config.db_path("other"), None);
    }

    #[test]
    fn unknown_access_class_is_rejected() {
        let err = Config::from_toml(
            "[[api.implicit_params]]\nname = \"x\"\ndesc = \"y\"\nwhen = \"admin\"\n",
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid configuration"));
    }
}
