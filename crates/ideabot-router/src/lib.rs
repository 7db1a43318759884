// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification and routing decisions.
//!
//! Everything in this crate is pure: given an event, the current routing
//! configuration, and the persisted autoreply table, [`MessageRouter::route`]
//! decides what the bot should do without performing any I/O.

pub mod classifier;
pub mod directive;
pub mod fallback;
pub mod router;
pub mod trigger;

pub use classifier::classify;
pub use directive::{contains_trigger, parse_set_model};
pub use fallback::fallback_reply;
pub use router::{build_prompt, MessageRouter, Route};
pub use trigger::should_respond;
