// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for ideabot.
//!
//! Two kinds of store live here:
//! - the SQLite audit log ([`SqliteStorage`]), written through a single
//!   tokio-rusqlite thread so records keep their processing order
//! - small JSON documents in the data directory (routing configuration,
//!   autoreply table, task queue), each replaced atomically on save

pub mod adapter;
pub mod autoreply;
pub mod database;
pub mod json_store;
pub mod migrations;
pub mod queries;
pub mod routing;
pub mod tasks;

pub use adapter::SqliteStorage;
pub use autoreply::{AutoReplyStore, default_autoreplies};
pub use database::Database;
pub use routing::RoutingStore;
pub use tasks::TaskQueue;
