//! Page storage: where rendered documents go and where the page index
//! comes from.
//!
//! The page index maps a physical key (`<dir>/<name>`) to the URL a page was
//! published under. It is what lets a route page link to table pages
//! produced by an earlier build.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for rendered pages.
pub trait PageStore {
    /// Current page index: physical key → URL.
    fn pages(&mut self) -> Result<IndexMap<String, String>>;

    /// Persist a page and return its URL. `order` is the display order.
    fn save(&mut self, dir: &str, name: &str, content: &str, order: usize) -> Result<String>;
}

/// Physical key of a page: `dir/name` without stray slashes.
pub fn page_key(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    let name = name.trim_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

fn page_url(base_url: Option<&str>, key: &str) -> String {
    match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        None => format!("{}.md", key),
    }
}

// -- In-memory store ----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub content: String,
    pub order: usize,
    pub url: String,
}

/// Keeps pages in memory. Used for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    base_url: Option<String>,
    pub pages: IndexMap<String, StoredPage>,
}

impl MemoryStore {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            pages: IndexMap::new(),
        }
    }

    /// Seed the index with a page published elsewhere.
    pub fn with_page(mut self, key: &str, url: &str) -> Self {
        self.pages.insert(
            key.to_string(),
            StoredPage {
                content: String::new(),
                order: 0,
                url: url.to_string(),
            },
        );
        self
    }
}

impl PageStore for MemoryStore {
    fn pages(&mut self) -> Result<IndexMap<String, String>> {
        Ok(self
            .pages
            .iter()
            .map(|(k, p)| (k.clone(), p.url.clone()))
            .collect())
    }

    fn save(&mut self, dir: &str, name: &str, content: &str, order: usize) -> Result<String> {
        let key = page_key(dir, name);
        let url = page_url(self.base_url.as_deref(), &key);
        self.pages.insert(
            key,
            StoredPage {
                content: content.to_string(),
                order,
                url: url.clone(),
            },
        );
        Ok(url)
    }
}

// -- Filesystem store ---------------------------------------------------------

/// File name of the persisted page index inside the output directory.
pub const INDEX_FILE: &str = "pages.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PageIndex {
    pages: IndexMap<String, PageRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PageRecord {
    url: String,
    order: usize,
}

/// Writes `<root>/<dir>/<name>.md` and keeps `<root>/pages.json` current.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
    base_url: Option<String>,
    index: PageIndex,
}

impl FsStore {
    /// Open an output directory, loading its page index if there is one.
    pub fn open(root: &Path, base_url: Option<String>) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("failed to create output directory: {}", root.display()))?;
        let index_path = root.join(INDEX_FILE);
        let index = if index_path.is_file() {
            let text = fs::read_to_string(&index_path)
                .with_context(|| format!("failed to read {}", index_path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid page index: {}", index_path.display()))?
        } else {
            PageIndex::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            base_url,
            index,
        })
    }

    fn persist_index(&self) -> Result<()> {
        let path = self.root.join(INDEX_FILE);
        let text = serde_json::to_string_pretty(&self.index)?;
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl PageStore for FsStore {
    fn pages(&mut self) -> Result<IndexMap<String, String>> {
        Ok(self
            .index
            .pages
            .iter()
            .map(|(k, r)| (k.clone(), r.url.clone()))
            .collect())
    }

    fn save(&mut self, dir: &str, name: &str, content: &str, order: usize) -> Result<String> {
        let key = page_key(dir, name);
        let path = self.root.join(format!("{}.md", key));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;

        let url = page_url(self.base_url.as_deref(), &key);
        self.index.pages.insert(
            key,
            PageRecord {
                url: url.clone(),
                order,
            },
        );
        self.persist_index()?;
        Ok(url)
    }
}
