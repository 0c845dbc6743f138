//! # Bookshelf Architecture
//!
//! Bookshelf is a **UI-agnostic library catalog**. The `bookshelf` binary is one
//! client of it; the library itself never touches the terminal.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, runs the menu, formats output          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, one method per domain intent                │
//! │  - Injects defaults (new books start `available`)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository Layer (repository/)                             │
//! │  - ISBN uniqueness, required fields                         │
//! │  - Guarded status transitions, search, statistics           │
//! │  - Catalog envelope (metadata + records)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Generic RecordStore: ids, load/save, CRUD                │
//! │  - StorageBackend trait: FsBackend, MemBackend (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Model
//!
//! The whole catalog is one JSON file. It is read once by an explicit
//! initialization step ([`api::CatalogApi::init`]) which tells a first run
//! apart from an existing catalog and refuses a corrupt file. Every mutation
//! rewrites the file; if the write fails the mutation is rolled back in memory
//! and the error is returned.
//!
//! ## Errors vs Outcomes
//!
//! - A missing book on a read is `None`, never an error.
//! - A refused status change is a [`repository::Transition`], never an error.
//! - Validation ([`error::CatalogError::DuplicateIsbn`],
//!   [`error::CatalogError::MissingField`]) and persistence failures are
//!   errors.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`repository`]: Book rules on top of the generic store
//! - [`store`]: Generic record store and storage backends
//! - [`model`]: Core data types (`Book`, `BookStatus`, drafts and patches)
//! - [`config`]: Configuration management
//! - [`sample`]: Bundled example books
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod sample;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
