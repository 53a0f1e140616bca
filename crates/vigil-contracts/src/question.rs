//! Assessment item types.
//!
//! The question bank is opaque collaborator input: the runtime renders and
//! collects answers for these items but never interprets their content.

use serde::{Deserialize, Serialize};

/// Discriminant for the supported item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    ShortAnswer,
    Essay,
}

/// One assessment item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: QuestionKind,

    pub text: String,

    /// Choice labels; populated only for multiple-choice items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Index into `options`; only for multiple-choice items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,

    /// Input hint; only for the free-text kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}
