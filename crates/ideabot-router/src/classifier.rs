// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based intent classification.
//!
//! Case-insensitive substring matching against ordered keyword families.
//! The first family with a hit wins, so "bug in the feature" is an issue.

use ideabot_core::Category;

const ISSUE_KEYWORDS: &[&str] = &["issue", "bug", "error", "problem"];
const FEATURE_KEYWORDS: &[&str] = &["feature", "enhancement", "request", "add"];
const QUESTION_KEYWORDS: &[&str] = &["question", "how", "what", "?"];

/// Families in precedence order.
const FAMILIES: &[(&[&str], Category)] = &[
    (ISSUE_KEYWORDS, Category::Issue),
    (FEATURE_KEYWORDS, Category::FeatureRequest),
    (QUESTION_KEYWORDS, Category::Question),
];

/// Classifies message text into a [`Category`]. Total and side-effect free.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    FAMILIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Message)
}
