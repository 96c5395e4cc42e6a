//! apidoc: compile tag-annotated doc comments of route handlers and
//! database tables into markdown documentation.
//!
//! Pipeline for one route:
//!
//! 1. [`parser`] tokenizes the handler's first `/** ... */` block and folds
//!    its tags into a [`model::DocComment`] ([`path`] builds the nested
//!    parameter tree).
//! 2. [`resolve`] reconciles that tree with the declared [`schema`].
//! 3. [`render`] lays out the page; [`build`] drives whole passes and the
//!    group index, publishing through a [`store::PageStore`].
//!
//! Every problem found along the way is a [`diagnostics::Diagnostic`], never
//! a hard failure.

pub mod build;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod parser;
pub mod path;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod store;
