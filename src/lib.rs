//! # Renkei - Conditional Visibility and Response Reconciliation Engine
//!
//! **Renkei** keeps a user's answer tree consistent with a hierarchical form
//! definition. Given a definition whose items may declare enable-when rules,
//! and a response holding in-progress answers, it decides which items are
//! currently visible and prunes answers belonging to hidden or empty items,
//! so the response that gets persisted is always a well-formed,
//! linkId-addressable document.
//!
//! ## Core Workflow
//!
//! The engine operates on plain data structures and performs no I/O. The
//! primary workflow is:
//!
//! 1.  **Load Your Definition**: Parse your form definition into a
//!     [`FormDefinition`] tree (the whole model derives serde, so JSON works
//!     out of the box).
//! 2.  **Index**: Build a [`DependencyIndex`] once per definition (or let an
//!     [`IndexCache`] do it, keyed by definition identity). It maps every
//!     source question to the items whose visibility depends on it.
//! 3.  **Evaluate**: Create a [`VisibilityContext`] from the index and the
//!     current response to query per-item enabled state, and
//!     [`VisibilityContext::explain`] to see why.
//! 4.  **Reconcile & Assemble**: Call
//!     [`ResponseAssembler::prepare_for_save`] to clone the live response,
//!     prune it against the definition, and stamp save metadata. Hand the
//!     result to your own transport.
//!
//! ## Quick Start
//!
//! ```rust
//! use renkei::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // A survey: "age", and a details group only visible for adults.
//!     let definition = FormDefinition {
//!         title: Some("Intake survey".to_string()),
//!         items: vec![
//!             FormNode::new("age", ItemType::Integer),
//!             FormNode::new("details", ItemType::Group)
//!                 .with_children(vec![FormNode::new("employer", ItemType::String)])
//!                 .with_rules(
//!                     vec![VisibilityRule::Simple(EnableWhenRule {
//!                         source: "age".to_string(),
//!                         operator: ComparisonOp::GreaterOrEqual,
//!                         expected: AnswerValue::Integer(18),
//!                     })],
//!                     CombineBehavior::All,
//!                 ),
//!         ],
//!         ..FormDefinition::default()
//!     };
//!
//!     // A minor answered the employer question before entering their age;
//!     // the whole details subtree must be pruned on save.
//!     let response = ResponseDocument::with_items(vec![
//!         ResponseNode::new("age").with_answers(vec![AnswerValue::Integer(16)]),
//!         ResponseNode::new("details").with_children(vec![
//!             ResponseNode::new("employer")
//!                 .with_answers(vec![AnswerValue::String("Acme".to_string())]),
//!         ]),
//!     ]);
//!
//!     let prepared = ResponseAssembler::new().prepare_for_save(
//!         &definition,
//!         &response,
//!         &SaveContext {
//!             subject: Some(Reference::new("Patient/42")),
//!             author: Some(Reference::new("Practitioner/7")),
//!             authored: Some("2024-05-01T10:00:00Z".to_string()),
//!         },
//!     )?;
//!
//!     assert_eq!(prepared.document.items.len(), 1); // only "age" survives
//!     assert!(!prepared.is_update); // no id yet: create, not update
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod error;
pub mod expression;
pub mod index;
pub mod model;
pub mod prelude;
pub mod reconcile;
pub mod trace;
pub mod visibility;
