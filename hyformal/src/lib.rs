//! Hyformal: a shared, hash-consed formula DAG for propositional and arithmetic logic.
//!
//! Formulas mix Boolean connectives with "theory" atoms over integers and reals
//! (comparisons, arithmetic, uninterpreted functions) and may be quantified. They are built
//! through a [`FormulaManager`](manager::FormulaManager), which deduplicates every
//! construction: structurally equal formulas are the same node, and node identity is a cheap
//! integer comparison.
//!
//! Layout
//!  - [`types`] and [`symbol`]: the small type language and named, typed symbols.
//!  - [`node`]: immutable [`FNode`](node::FNode) handles and the closed
//!    [`FormulaView`](node::FormulaView) over node kinds.
//!  - [`manager`]: the hash-consing factory, symbol table and fresh-symbol allocator.
//!  - [`walker`]: a memoizing, explicit-stack post-order walker for computations over the DAG.
//!  - [`pretty`]: width-aware, optionally colored rendering.
//!
//! Example
//! ```
//! use hyformal::prelude::*;
//!
//! let mgr = FormulaManager::new();
//! let x = mgr.symbol("x", Type::Int).unwrap();
//! let p = mgr.symbol("p", Type::Bool).unwrap();
//!
//! // p & !(x <= 3) -> x + 1 = 5
//! let le = mgr.le(x.clone(), mgr.int(3)).unwrap();
//! let lhs = mgr.and([p, mgr.not(le).unwrap()]).unwrap();
//! let sum = mgr.plus([x, mgr.int(1)]).unwrap();
//! let f = mgr.implies(lhs, mgr.equals(sum, mgr.int(5)).unwrap()).unwrap();
//!
//! assert_eq!(f.node_type(), NodeType::Implies);
//! assert_eq!(f.to_string(), "p & !(x <= 3) -> x + 1 = 5");
//! ```

/// Crate errors and result alias.
pub mod error;
/// Hash-consing formula factory and symbol table.
pub mod manager;
/// Formula node handles and views.
pub mod node;
/// Pretty-printing of formulas.
pub mod pretty;
/// Named, typed symbols.
pub mod symbol;
/// Semantic types.
pub mod types;
/// Memoizing DAG walker.
pub mod walker;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - The manager, node handles, views and kinds
    //! - Types and symbols
    //! - The walker trait and its memoization table
    //! - Pretty-printing via `PrettyFormula`
    pub use crate::manager::FormulaManager;
    pub use crate::node::{FNode, FormulaView, NodeId, NodeType};
    pub use crate::pretty::PrettyFormula;
    pub use crate::symbol::Symbol;
    pub use crate::types::{FunctionType, Type};
    pub use crate::walker::{DagWalker, Memoization};
}
