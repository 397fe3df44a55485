//! The response assembler: clones, prunes, and stamps a response document
//! before it is handed to the external persistence collaborator.
//!
//! The assembler performs no I/O. Transport, retries, and the guarantee of
//! at-most-one in-flight save per response identity are the caller's
//! responsibility.

use crate::error::AssembleError;
use crate::expression::ExpressionEvaluator;
use crate::index::DependencyIndex;
use crate::model::{FormDefinition, Reference, ResponseDocument};
use crate::reconcile::reconcile_children;
use crate::visibility::{UnresolvedPolicy, VisibilityContext};
use serde::{Deserialize, Serialize};

/// Identity and clock data injected by the surrounding application at save
/// time. The engine treats all of it as opaque values; in particular it
/// never reads the clock itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,
    /// Save timestamp, preformatted by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored: Option<String>,
}

/// The outcome of preparing a response for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSave {
    pub document: ResponseDocument,
    /// True when the incoming document already carried a persisted
    /// identifier; the transport collaborator should update rather than
    /// create. A pass-through decision, not an algorithmic one.
    pub is_update: bool,
}

/// Orchestrates one save cycle: clone, reconcile, stamp.
#[derive(Default)]
pub struct ResponseAssembler<'a> {
    policy: UnresolvedPolicy,
    expressions: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> ResponseAssembler<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swaps in a custom evaluator for expression-flavored rules.
    pub fn with_expression_evaluator(mut self, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        self.expressions = Some(evaluator);
        self
    }

    /// Prepares the caller's live response for persistence, building the
    /// dependency index on the spot.
    ///
    /// Sessions that save repeatedly should hold the index in an
    /// [`crate::index::IndexCache`] and use [`Self::prepare_with_index`].
    pub fn prepare_for_save(
        &self,
        definition: &FormDefinition,
        live: &ResponseDocument,
        save: &SaveContext,
    ) -> Result<PreparedSave, AssembleError> {
        let index = DependencyIndex::build(definition);
        self.prepare_with_index(&index, definition, live, save)
    }

    /// Like [`Self::prepare_for_save`], with a prebuilt dependency index.
    pub fn prepare_with_index(
        &self,
        index: &DependencyIndex,
        definition: &FormDefinition,
        live: &ResponseDocument,
        save: &SaveContext,
    ) -> Result<PreparedSave, AssembleError> {
        if definition.items.is_empty() {
            return Err(AssembleError::EmptyDefinition);
        }

        let mut visibility = VisibilityContext::new(index, live).with_policy(self.policy);
        if let Some(evaluator) = self.expressions {
            visibility = visibility.with_expression_evaluator(evaluator);
        }

        // The caller's live tree is never mutated; all pruning happens on
        // the clone.
        let mut document = live.clone();
        document.items = reconcile_children(&definition.items, &live.items, &visibility);

        document.subject = save.subject.clone();
        document.author = save.author.clone();
        document.authored = save.authored.clone();
        document.form_display = Some(definition.display_name());

        let is_update = document.id.is_some();
        if !is_update {
            // Fresh creates carry the canonical linkage back to their
            // definition; updates already have it.
            document.form = definition.canonical_reference();
        }

        log::debug!(
            "prepared response for save: {} top-level items survived, is_update={}",
            document.items.len(),
            is_update
        );

        Ok(PreparedSave {
            document,
            is_update,
        })
    }
}
