//! Semantic types attached to symbols and formula nodes.
//!
//! The type language is deliberately small: Booleans, the two arithmetic sorts and
//! first-order function types over them. Every [`FNode`](crate::node::FNode) carries the type
//! computed by the [`FormulaManager`](crate::manager::FormulaManager) when it was built.
use std::{fmt, sync::Arc};

use strum::EnumIs;

/// Type of a symbol or of the value produced by a formula node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
pub enum Type {
    /// Propositional values.
    Bool,
    /// Unbounded integers.
    Int,
    /// Real numbers.
    Real,
    /// Uninterpreted function over the other sorts.
    Function(Arc<FunctionType>),
}

impl Type {
    /// Build a function type `(params...) -> ret`.
    pub fn function(ret: Type, params: impl IntoIterator<Item = Type>) -> Self {
        Type::Function(Arc::new(FunctionType {
            ret,
            params: params.into_iter().collect(),
        }))
    }

    /// `true` for `Int` and `Real`.
    #[inline]
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Type::Int | Type::Real)
    }

    /// Access the signature when this is a function type.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// Signature of an uninterpreted function.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionType {
    pub ret: Type,
    pub params: Vec<Type>,
}

impl FunctionType {
    /// Number of parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Int => write!(f, "Int"),
            Type::Real => write!(f, "Real"),
            Type::Function(func) => func.fmt(f),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}
