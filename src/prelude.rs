//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the renkei crate. Import
//! this module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use renkei::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definition: FormDefinition =
//!     serde_json::from_str(&std::fs::read_to_string("definition.json")?)?;
//! let response: ResponseDocument =
//!     serde_json::from_str(&std::fs::read_to_string("response.json")?)?;
//!
//! let prepared = ResponseAssembler::new().prepare_for_save(
//!     &definition,
//!     &response,
//!     &SaveContext::default(),
//! )?;
//! println!("{}", serde_json::to_string_pretty(&prepared.document)?);
//! # Ok(())
//! # }
//! ```

// Core reconciliation and assembly
pub use crate::assemble::{PreparedSave, ResponseAssembler, SaveContext};
pub use crate::reconcile::{reconcile, reconcile_children};

// Visibility evaluation
pub use crate::index::{DependencyIndex, DependentEntry, IndexCache};
pub use crate::visibility::{UnresolvedPolicy, VisibilityContext};

// Data model
pub use crate::model::{
    AnswerValue, Coding, CombineBehavior, ComparisonOp, EnableWhenRule, FormDefinition, FormNode,
    ItemType, Quantity, Reference, ResponseDocument, ResponseNode, ResponseStatus, VisibilityRule,
};

// Expression rules
pub use crate::expression::{AnswerMap, ExpressionEvaluator, RuleExpression, RuleInterpreter};

// Error types
pub use crate::error::{AssembleError, ExpressionError};

// Trace formatting
pub use crate::trace::{RuleTrace, TraceFormatter, VisibilityTrace};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
