//! Hycnf: equisatisfiable conjunctive normal form for hyformal formulas.
//!
//! The conversion is a Tseitin transformation over the shared formula DAG: every distinct
//! compound Boolean node gets one fresh variable, defined by a handful of clauses, so the
//! output grows linearly with the number of distinct nodes even when the formula, read as a
//! tree, is exponentially larger. Comparisons and Boolean function applications are kept as
//! opaque atoms; integer and real terms below them are never looked into. Quantified formulas
//! are rejected.
//!
//! Layout
//!  - [`encoder`]: the [`Cnfizer`](encoder::Cnfizer) and its per-connective rules.
//!  - [`assembler`]: final pruning, formula materialization and debug output.
//!  - [`clause`]: the [`Clause`](clause::Clause) and [`ClauseSet`](clause::ClauseSet) model.
//!
//! Example
//! ```
//! use hyformal::prelude::*;
//!
//! let mgr = FormulaManager::new();
//! let a = mgr.symbol("a", Type::Bool).unwrap();
//! let b = mgr.symbol("b", Type::Bool).unwrap();
//!
//! let t = mgr.or([a.clone(), mgr.not(a.clone()).unwrap()]).unwrap();
//! assert_eq!(hycnf::cnf_as_set(&mgr, &mgr.true_()).unwrap().to_string(), "{ }");
//! assert_eq!(hycnf::cnf_as_set(&mgr, &mgr.false_()).unwrap().to_string(), "{ { } }");
//!
//! let f = hycnf::cnf(&mgr, &mgr.iff(t, b).unwrap()).unwrap();
//! assert_eq!(f.node_type(), NodeType::And);
//! ```

/// Final assembly and debug output.
pub mod assembler;
/// Clause model.
pub mod clause;
/// Tseitin encoder.
pub mod encoder;
/// Crate errors.
pub mod error;

use hyformal::{manager::FormulaManager, node::FNode};

pub use error::{CnfError, CnfResult};

/// One-shot conversion of `formula` to a CNF formula, using a throwaway encoder.
pub fn cnf(mgr: &FormulaManager, formula: &FNode) -> CnfResult<FNode> {
    encoder::Cnfizer::new(mgr).convert_as_formula(formula)
}

/// One-shot conversion of `formula` to a clause set, using a throwaway encoder.
pub fn cnf_as_set(mgr: &FormulaManager, formula: &FNode) -> CnfResult<clause::ClauseSet> {
    encoder::Cnfizer::new(mgr).convert(formula)
}

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::assembler::{materialize, printer, serialize};
    pub use crate::clause::{Clause, ClauseSet};
    pub use crate::encoder::{Cnfizer, Encoded};
    pub use crate::error::{CnfError, CnfResult};
    pub use crate::{cnf, cnf_as_set};
    pub use hyformal::walker::DagWalker;
}
