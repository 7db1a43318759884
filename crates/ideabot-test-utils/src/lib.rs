// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ideabot integration tests.
//!
//! Mock adapters and a [`TestHarness`] that wires them to real file-backed
//! stores and a real SQLite audit log in a temporary directory.

pub mod harness;
pub mod mock_channel;
pub mod mock_executor;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder, group_event};
pub use mock_channel::MockChannel;
pub use mock_executor::MockExecutor;
pub use mock_provider::MockProvider;
