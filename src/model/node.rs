use super::{AnswerValue, CombineBehavior, VisibilityRule};
use serde::{Deserialize, Serialize};

/// The answer type of a definition item, or its grouping role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Group,
    Display,
    Boolean,
    Integer,
    Decimal,
    String,
    Text,
    Date,
    DateTime,
    Coding,
    Quantity,
}

/// A single item of the static form definition.
///
/// Definition trees are read-only for the lifetime of a form session; the
/// engine never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormNode {
    /// Identifier connecting this item to its response node(s).
    /// Unique within a definition.
    pub link_id: String,
    /// Display text shown alongside the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Whether the item may be answered multiple times. Instances appear in
    /// the response as consecutive siblings sharing this item's linkId.
    #[serde(default)]
    pub repeats: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormNode>,
    /// Enable-when conditions. An item with no rules is always visible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<VisibilityRule>,
    #[serde(default)]
    pub combine: CombineBehavior,
}

impl FormNode {
    pub fn new(link_id: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            link_id: link_id.into(),
            text: None,
            item_type,
            repeats: false,
            children: Vec::new(),
            rules: Vec::new(),
            combine: CombineBehavior::default(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<FormNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_rules(mut self, rules: Vec<VisibilityRule>, combine: CombineBehavior) -> Self {
        self.rules = rules;
        self.combine = combine;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeats = true;
        self
    }
}

/// A single item of the mutable answer tree, addressed by the same linkId
/// scheme as the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseNode {
    pub link_id: String,
    /// User-entered answers. Empty means "no answer yet".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<AnswerValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResponseNode>,
}

impl ResponseNode {
    pub fn new(link_id: impl Into<String>) -> Self {
        Self {
            link_id: link_id.into(),
            answers: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_answers(mut self, answers: Vec<AnswerValue>) -> Self {
        self.answers = answers;
        self
    }

    pub fn with_children(mut self, children: Vec<ResponseNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether the node carries any child items or answers at all.
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || !self.answers.is_empty()
    }

    /// Whether the node carries an answer worth keeping. A sequence whose
    /// first value is an empty string counts as unanswered, regardless of
    /// what follows it.
    pub fn has_meaningful_answer(&self) -> bool {
        match self.answers.first() {
            Some(first) => !first.is_blank(),
            None => false,
        }
    }
}
