use strum::EnumIs;
use thiserror::Error;

use crate::{node::NodeType, types::Type};

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// An operand does not have the type required by the operator.
    #[error(
        "Operator `{operator}` expects an operand of type {expected}, but found an operand of type `{found}`."
    )]
    TypeMismatch {
        operator: NodeType,
        expected: String,
        found: Type,
    },

    /// A name was declared twice with different types.
    #[error(
        "Symbol `{name}` is already declared with type `{declared}` and cannot be redeclared with type `{requested}`."
    )]
    SymbolRedeclared {
        name: String,
        declared: Type,
        requested: Type,
    },

    /// A name reserved by a fresh-symbol allocation was declared by the user.
    #[error("Symbol name `{name}` is reserved for a fresh symbol and cannot be declared.")]
    ReservedName { name: String },

    /// A non-function symbol was used in a function application.
    #[error("Symbol `{name}` of type `{ty}` is not a function and cannot be applied.")]
    NotAFunction { name: String, ty: Type },

    /// A function was applied to the wrong number of arguments.
    #[error("Function `{name}` expects {expected} arguments, but {found} were provided.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A binder expected a symbol but received a compound formula.
    #[error("Operator `{operator}` binds symbols only, but `{formula}` is not a symbol.")]
    NotASymbol { operator: NodeType, formula: String },

    /// An n-ary operator was given too few operands.
    #[error("Operator `{operator}` requires at least {min} operands, but {found} were provided.")]
    NotEnoughOperands {
        operator: NodeType,
        min: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
