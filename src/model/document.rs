use super::{FormNode, ResponseNode};
use serde::{Deserialize, Serialize};

/// A pointer to an external party attached to a saved response, such as the
/// subject the answers are about or the practitioner who entered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// The static, authored form: document metadata plus the item tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Canonical URL identifying this definition across servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FormNode>,
}

impl FormDefinition {
    /// A human-readable name for display, falling back through title, name,
    /// the first item's text, and finally a placeholder.
    pub fn display_name(&self) -> String {
        if let Some(title) = &self.title {
            if !title.is_empty() && title.len() < 75 {
                return title.clone();
            }
        }
        if let Some(name) = &self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(text) = self.items.first().and_then(|item| item.text.as_ref()) {
            return text.clone();
        }
        match &self.id {
            Some(id) => format!("Unnamed form-{}", id),
            None => "Unnamed form".to_string(),
        }
    }

    /// The reference a fresh response should carry back to this definition:
    /// the canonical URL when one exists, otherwise an id-based reference.
    pub fn canonical_reference(&self) -> Option<String> {
        if let Some(url) = &self.url {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }
        self.id.as_ref().map(|id| format!("Form/{}", id))
    }
}

/// Lifecycle status of a response document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseStatus {
    #[default]
    InProgress,
    Completed,
    Amended,
}

/// The user's answers plus the metadata stamped at save time.
///
/// The engine only ever returns new documents; the caller's live copy is
/// never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    /// Persisted identifier. Present once the server has stored the document;
    /// its presence is what selects the update path on the next save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: ResponseStatus,
    /// Canonical reference back to the definition this response answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    /// Generated human-readable title of the form, for display in lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,
    /// Timestamp of the save, supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ResponseNode>,
}

impl ResponseDocument {
    pub fn with_items(items: Vec<ResponseNode>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}
