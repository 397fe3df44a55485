use crate::model::AnswerValue;
use thiserror::Error;

/// Errors surfaced while preparing a response document for persistence.
///
/// Malformed-but-tolerable input (unknown rule sources, response trees
/// misaligned with the definition) is never an error; it is absorbed by the
/// lenient defaults of the evaluator and reconciler. Only genuine caller
/// contract violations surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error(
        "The form definition has no items; assembling a response against it would be meaningless"
    )]
    EmptyDefinition,
}

/// Errors that can occur while interpreting an expression-flavored
/// visibility rule.
///
/// The visibility evaluator downgrades these to "rule unsatisfied"; they are
/// only observable when driving the interpreter directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Type mismatch during '{operation}': expected {expected}, but found value '{found}'")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: AnswerValue,
    },
}
