//! Build passes: routes → API pages, tables → database pages, plus one
//! index page per pass.
//!
//! Units are processed strictly in registry order. Each saved page gets the
//! next value of a per-pass counter as its display order; the index page
//! always comes first. A unit that fails (no doc block, unreadable source,
//! failed save) is reported and left out of the index; the pass goes on.

use crate::config::{Config, DbConfig};
use crate::diagnostics::Diagnostics;
use crate::model::{GroupIndexEntry, DEFAULT_GROUP};
use crate::parser;
use crate::render::api::ApiRenderer;
use crate::render::index::render_index;
use crate::render::table::render_table;
use crate::resolve::TypeResolver;
use crate::schema::{Route, TableRegistry, TableSchema};
use crate::store::PageStore;
use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Display order of index pages.
const INDEX_ORDER: usize = 1;
/// Display order of the first unit page.
const FIRST_UNIT_ORDER: usize = 2;

/// Outcome of one pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Rendered index markdown.
    pub index: String,
    pub entries: Vec<GroupIndexEntry>,
    /// Units that could not be documented.
    pub failed: usize,
}

/// Documents every route of a registry.
pub struct ApiBuilder<'a, S: PageStore> {
    config: &'a Config,
    store: &'a mut S,
    diags: &'a mut Diagnostics,
}

impl<'a, S: PageStore> ApiBuilder<'a, S> {
    pub fn new(config: &'a Config, store: &'a mut S, diags: &'a mut Diagnostics) -> Self {
        Self {
            config,
            store,
            diags,
        }
    }

    /// Run one pass. Clears the diagnostics collector first.
    pub fn build(&mut self, routes: &[Route]) -> Result<BuildReport> {
        self.diags.clear();
        let mut report = BuildReport::default();

        for (counter, route) in routes.iter().enumerate() {
            match self.build_route(route, FIRST_UNIT_ORDER + counter) {
                Ok(Some(entry)) => {
                    info!(path = %route.path, "updated api document");
                    report.entries.push(entry);
                }
                Ok(None) => report.failed += 1,
                Err(e) => {
                    self.diags
                        .error(format!("* failed to document {}: {:#}", route.path, e));
                    report.failed += 1;
                }
            }
        }

        let api = &self.config.api;
        let page = render_index(&report.entries, &api.groups, "接口", self.diags);
        report.index = page.to_markdown();
        match self
            .store
            .save(&api.index_path, &api.index_name, &report.index, INDEX_ORDER)
        {
            Ok(_) => info!(name = %api.index_name, "updated api index"),
            Err(e) => self
                .diags
                .error(format!("* failed to save index {}: {:#}", api.index_name, e)),
        }

        Ok(report)
    }

    fn build_route(&mut self, route: &Route, order: usize) -> Result<Option<GroupIndexEntry>> {
        let config = self.config;
        let api = &config.api;
        let source = parser::handler_source(&api.source_root, &route.key, &api.source_ext);
        let unit = source.to_string_lossy().to_string();
        debug!(%unit, "reading handler comment");

        let Some(doc) = parser::read_comment_file(&source, self.diags)? else {
            self.diags
                .error(format!("* handler has no doc comment: {}", unit));
            return Ok(None);
        };

        let pages = self.store.pages()?;

        let mut resolved = IndexMap::new();
        let mut resolver = TypeResolver::new(&unit, self.diags);
        for (name, schema) in &route.params {
            let ty = resolver.resolve(name, schema, doc.params.get(name));
            resolved.insert(name.clone(), ty);
        }

        let page = ApiRenderer::new(config, &pages).render(&doc, route, &resolved, &unit, self.diags);
        let url = self
            .store
            .save(&api.doc_path, &route.path, &page.to_markdown(), order)?;

        Ok(Some(GroupIndexEntry {
            name: route.path.clone(),
            group: doc.group.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            description: doc.description,
            url,
        }))
    }
}

/// Documents every configured database of a table registry.
pub struct DbBuilder<'a, S: PageStore> {
    config: &'a Config,
    store: &'a mut S,
    diags: &'a mut Diagnostics,
}

impl<'a, S: PageStore> DbBuilder<'a, S> {
    pub fn new(config: &'a Config, store: &'a mut S, diags: &'a mut Diagnostics) -> Self {
        Self {
            config,
            store,
            diags,
        }
    }

    /// Run one pass over all databases. Clears the diagnostics collector first.
    ///
    /// Databases without a `[db.<name>]` section are skipped.
    pub fn build(&mut self, registry: &TableRegistry) -> Result<IndexMap<String, BuildReport>> {
        self.diags.clear();
        let config = self.config;
        let mut reports = IndexMap::new();

        for (database, tables) in registry {
            let Some(db_config) = config.db.get(database) else {
                self.diags
                    .info(format!("* database {} is not configured, skipped", database));
                continue;
            };
            let report = self.build_database(database, tables, db_config);
            reports.insert(database.clone(), report);
        }

        Ok(reports)
    }

    fn build_database(
        &mut self,
        database: &str,
        tables: &IndexMap<String, TableSchema>,
        db_config: &DbConfig,
    ) -> BuildReport {
        let mut report = BuildReport::default();

        for (counter, (name, table)) in tables.iter().enumerate() {
            let unit = format!("{}.{}", database, name);
            let page = render_table(&unit, table, self.diags);
            let saved = self.store.save(
                &db_config.path,
                name,
                &page.to_markdown(),
                FIRST_UNIT_ORDER + counter,
            );
            match saved {
                Ok(url) => {
                    info!(path = %db_config.path, table = %name, "updated table document");
                    report.entries.push(GroupIndexEntry {
                        name: name.clone(),
                        group: table
                            .group
                            .clone()
                            .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
                        description: table.documented_comment().unwrap_or_default().to_string(),
                        url,
                    });
                }
                Err(e) => {
                    self.diags
                        .error(format!("* failed to save table {}: {:#}", unit, e));
                    report.failed += 1;
                }
            }
        }

        let page = render_index(&report.entries, &db_config.groups, "表名", self.diags);
        report.index = page.to_markdown();
        match self.store.save(
            &db_config.path,
            &db_config.index_name,
            &report.index,
            INDEX_ORDER,
        ) {
            Ok(_) => info!(path = %db_config.path, "updated table index"),
            Err(e) => self
                .diags
                .error(format!("* failed to save index for {}: {:#}", database, e)),
        }

        report
    }
}
