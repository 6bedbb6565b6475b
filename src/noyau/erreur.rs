// src/noyau/erreur.rs

use thiserror::Error;

/// Rejets du découpage en jetons.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(char),
    #[error("Missing operator.")]
    MissingOperator,
    #[error("Mismatched parentheses.")]
    MismatchedParentheses,
}

/// Rejets de l’analyse (descente récursive).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing function argument.")]
    MissingFunctionArgument,
    #[error("Mismatched parentheses.")]
    MismatchedParentheses,
    #[error("Input Invalid.")]
    InvalidInput,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Expression too deeply nested.")]
    TooDeep,
}

/// Rejets de l’évaluation. Les domaines (sqrt(-1), ln(0)…) donnent nan/inf, pas une erreur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Unknown constant: {0}")]
    UnknownConstant(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl CoreError {
    /// Étape du pipeline qui a échoué (journal).
    pub fn etape(&self) -> &'static str {
        match self {
            CoreError::Lex(_) => "jetons",
            CoreError::Parse(_) => "analyse",
            CoreError::Eval(_) => "évaluation",
        }
    }
}
