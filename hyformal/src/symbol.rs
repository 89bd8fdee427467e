//! Named, typed symbols.
//!
//! A cheap-to-clone handle around a shared name and its declared [`Type`]. Symbols are
//! declared through the [`FormulaManager`](crate::manager::FormulaManager), which guarantees
//! that a name maps to a single type.
use std::{fmt, sync::Arc};

use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Declared symbol: a name together with its type.
pub struct Symbol {
    name: Arc<str>,
    ty: Type,
}

impl Symbol {
    pub(crate) fn new(name: Arc<str>, ty: Type) -> Self {
        Self { name, ty }
    }

    /// The symbol name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    #[inline]
    pub fn get_type(&self) -> &Type {
        &self.ty
    }

    /// Whether this symbol was declared with the given type.
    #[inline]
    pub fn is_of_type(&self, ty: &Type) -> bool {
        &self.ty == ty
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}: {}", self.name, self.ty)
        } else {
            write!(f, "{}", self.name)
        }
    }
}
