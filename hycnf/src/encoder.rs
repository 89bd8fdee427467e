//! Tseitin encoder.
//!
//! [`Cnfizer`] walks a formula DAG bottom-up (see [`DagWalker`]) and assigns every distinct
//! Boolean node an [`Encoded`] result: a representative literal plus the clauses that define
//! that literal in terms of its operands' literals. Compound connectives get one fresh Boolean variable per node identity; atoms stand for
//! themselves; theory terms (integer and real expressions) have no clausal form and are marked
//! [`Encoded::TheoryPlaceholder`].
//!
//! The memo table and the fresh-variable cache belong to the encoder and survive across
//! conversions, so converting several formulas that share subformulas with one encoder reuses
//! both the clauses and the variables of the shared part. Each memo entry holds only the local
//! definition of its node; [`Cnfizer::convert`](crate::encoder::Cnfizer::convert) gathers the
//! definitions reachable from a root once each.
use std::{collections::HashMap, sync::Arc};

use hyformal::{
    manager::FormulaManager,
    node::{FNode, FormulaView, NodeId, NodeType},
    types::Type,
    walker::{DagWalker, Memoization},
};
use log::debug;
use smallvec::SmallVec;
use strum::EnumIs;

use crate::{
    clause::Clause,
    error::{CnfError, CnfResult},
};

/// Result of encoding one node.
#[derive(Debug, Clone, EnumIs)]
pub enum Encoded {
    /// `literal` is equisatisfiable with the node once the definitions of the node and of
    /// every connective below it hold.
    Clausal {
        literal: FNode,
        /// Clauses relating `literal` to the literals of the direct operands. Empty for atoms.
        definition: Arc<[Clause]>,
    },
    /// The node is a theory term and has no Boolean encoding.
    TheoryPlaceholder,
}

impl Encoded {
    fn atom(literal: FNode) -> Self {
        Encoded::Clausal {
            literal,
            definition: Vec::<Clause>::new().into(),
        }
    }

    /// The representative literal, if the node is Boolean.
    pub fn literal(&self) -> Option<&FNode> {
        match self {
            Encoded::Clausal { literal, .. } => Some(literal),
            Encoded::TheoryPlaceholder => None,
        }
    }

    /// The local defining clauses, if the node is Boolean.
    pub fn definition(&self) -> Option<&[Clause]> {
        match self {
            Encoded::Clausal { definition, .. } => Some(&definition[..]),
            Encoded::TheoryPlaceholder => None,
        }
    }

    fn into_literal(self, parent: NodeType) -> FNode {
        match self {
            Encoded::Clausal { literal, .. } => literal,
            Encoded::TheoryPlaceholder => {
                panic!("Boolean connective `{}` has a theory term as operand", parent)
            }
        }
    }
}

/// Tseitin CNF encoder bound to one [`FormulaManager`].
///
/// Example
/// ```
/// use hycnf::prelude::*;
/// use hyformal::prelude::*;
///
/// let mgr = FormulaManager::new();
/// let a = mgr.symbol("a", Type::Bool).unwrap();
/// let b = mgr.symbol("b", Type::Bool).unwrap();
/// let f = mgr.or([a.clone(), mgr.not(b).unwrap()]).unwrap();
///
/// let mut cnfizer = Cnfizer::new(&mgr);
/// let cnf = cnfizer.convert(&f).unwrap();
///
/// // One variable for the disjunction, one for the negation
/// assert_eq!(cnfizer.introduced_variables().len(), 2);
/// let k = cnfizer.fresh_variable_for(&f).unwrap();
/// assert!(cnf.contains(&Clause::unit(k.clone())));
/// ```
pub struct Cnfizer<'m> {
    mgr: &'m FormulaManager,
    memoization: Memoization<Encoded>,
    introduced_variables: HashMap<NodeId, FNode>,
}

impl<'m> Cnfizer<'m> {
    /// Create an encoder with empty caches. Fresh variables are allocated from `mgr`.
    pub fn new(mgr: &'m FormulaManager) -> Self {
        Self {
            mgr,
            memoization: Memoization::new(),
            introduced_variables: HashMap::new(),
        }
    }

    /// The manager literals and fresh variables are built with.
    pub fn manager(&self) -> &'m FormulaManager {
        self.mgr
    }

    /// Encode `formula`, returning its representative literal and local definition.
    ///
    /// The result is the raw encoding of the root only: the definitions below it stay in the
    /// memo table, the top literal is not asserted and constants are not pruned. See
    /// [`Cnfizer::convert`] for the final clause set.
    pub fn encode(&mut self, formula: &FNode) -> CnfResult<Encoded> {
        self.walk(formula)
    }

    /// Fresh variables introduced so far, keyed by the node they stand for.
    pub fn introduced_variables(&self) -> &HashMap<NodeId, FNode> {
        &self.introduced_variables
    }

    /// The fresh variable standing for `node`, if one was introduced.
    pub fn fresh_variable_for(&self, node: &FNode) -> Option<&FNode> {
        self.introduced_variables.get(&node.id())
    }

    fn key_var(&mut self, node: &FNode) -> FNode {
        if let Some(k) = self.introduced_variables.get(&node.id()) {
            return k.clone();
        }

        let k = self.mgr.fresh_symbol(Type::Bool);
        debug!(
            "Introduced `{}` for node #{} ({}).",
            k,
            node.id().raw(),
            node.node_type()
        );
        self.introduced_variables.insert(node.id(), k.clone());
        k
    }

    fn negate(&self, literal: &FNode) -> CnfResult<FNode> {
        Ok(self.mgr.negate(literal)?)
    }

    /// `(k, definition(k))` for the fresh variable `k` of `node`.
    fn define(
        &mut self,
        node: &FNode,
        definition: impl FnOnce(&Self, &FNode) -> CnfResult<Vec<Clause>>,
    ) -> CnfResult<Encoded> {
        let k = self.key_var(node);
        let definition = definition(self, &k)?;
        Ok(Encoded::Clausal {
            literal: k,
            definition: definition.into(),
        })
    }

    fn encode_not(&mut self, node: &FNode, operand: Encoded) -> CnfResult<Encoded> {
        let a = operand.into_literal(NodeType::Not);
        if a.is_true() {
            return Ok(Encoded::atom(self.mgr.false_()));
        }
        if a.is_false() {
            return Ok(Encoded::atom(self.mgr.true_()));
        }

        self.define(node, |this, k| {
            let not_k = this.negate(k)?;
            let not_a = this.negate(&a)?;
            Ok(vec![
                Clause::from_iter([not_k, not_a]),
                Clause::from_iter([k.clone(), a.clone()]),
            ])
        })
    }

    fn encode_nary(
        &mut self,
        node: &FNode,
        kind: NodeType,
        mut operands: SmallVec<[Encoded; 4]>,
    ) -> CnfResult<Encoded> {
        if operands.len() == 1 {
            return Ok(operands.remove(0));
        }

        let literals: SmallVec<[FNode; 4]> = operands
            .into_iter()
            .map(|operand| operand.into_literal(kind))
            .collect();
        let conjunction = kind == NodeType::And;

        self.define(node, |this, k| {
            let not_k = this.negate(k)?;
            // And: k | !a1 | ... | !an, and a_i | !k for each i. Or is the dual.
            let (k_pos, k_neg) = if conjunction {
                (k.clone(), not_k)
            } else {
                (not_k, k.clone())
            };

            let mut clauses = Vec::with_capacity(literals.len() + 1);
            let mut long = Clause::unit(k_pos);
            for a in literals.iter() {
                let not_a = this.negate(a)?;
                let (in_long, in_binary) = if conjunction {
                    (not_a, a.clone())
                } else {
                    (a.clone(), not_a)
                };
                long.insert(in_long);
                clauses.push(Clause::from_iter([in_binary, k_neg.clone()]));
            }
            clauses.push(long);
            Ok(clauses)
        })
    }

    fn encode_implies(&mut self, node: &FNode, lhs: Encoded, rhs: Encoded) -> CnfResult<Encoded> {
        let a = lhs.into_literal(NodeType::Implies);
        let b = rhs.into_literal(NodeType::Implies);

        self.define(node, |this, k| {
            let not_a = this.negate(&a)?;
            let not_b = this.negate(&b)?;
            Ok(vec![
                Clause::from_iter([not_a, b.clone(), k.clone()]),
                Clause::from_iter([a.clone(), k.clone()]),
                Clause::from_iter([not_b, k.clone()]),
            ])
        })
    }

    fn encode_iff(&mut self, node: &FNode, lhs: Encoded, rhs: Encoded) -> CnfResult<Encoded> {
        let a = lhs.into_literal(NodeType::Iff);
        let b = rhs.into_literal(NodeType::Iff);

        self.define(node, |this, k| {
            let not_a = this.negate(&a)?;
            let not_b = this.negate(&b)?;
            let not_k = this.negate(k)?;
            Ok(vec![
                Clause::from_iter([not_a.clone(), not_b.clone(), k.clone()]),
                Clause::from_iter([not_a, b.clone(), not_k.clone()]),
                Clause::from_iter([a.clone(), not_b, not_k]),
                Clause::from_iter([a.clone(), b.clone(), k.clone()]),
            ])
        })
    }

    fn encode_ite(
        &mut self,
        node: &FNode,
        condition: Encoded,
        then_branch: Encoded,
        else_branch: Encoded,
    ) -> CnfResult<Encoded> {
        if then_branch.is_theory_placeholder() || else_branch.is_theory_placeholder() {
            return Ok(Encoded::TheoryPlaceholder);
        }

        let i = condition.into_literal(NodeType::Ite);
        let t = then_branch.into_literal(NodeType::Ite);
        let e = else_branch.into_literal(NodeType::Ite);

        self.define(node, |this, k| {
            let not_i = this.negate(&i)?;
            let not_t = this.negate(&t)?;
            let not_e = this.negate(&e)?;
            let not_k = this.negate(k)?;
            Ok(vec![
                Clause::from_iter([not_i.clone(), not_t, k.clone()]),
                Clause::from_iter([not_i, t.clone(), not_k.clone()]),
                Clause::from_iter([i.clone(), not_e, k.clone()]),
                Clause::from_iter([i.clone(), e.clone(), not_k]),
            ])
        })
    }

    fn encode_relation(node: &FNode, operands: [Encoded; 2]) -> Encoded {
        assert!(
            operands.iter().all(Encoded::is_theory_placeholder),
            "relation `{}` has a Boolean operand",
            node.node_type()
        );
        Encoded::atom(node.clone())
    }

    fn reject(node: &FNode) -> CnfError {
        CnfError::UnsupportedConstruct {
            kind: node.node_type(),
            formula: node.to_string(),
        }
    }
}

impl DagWalker for Cnfizer<'_> {
    type Output = Encoded;
    type Error = CnfError;

    fn memoization(&self) -> &Memoization<Encoded> {
        &self.memoization
    }

    fn memoization_mut(&mut self) -> &mut Memoization<Encoded> {
        &mut self.memoization
    }

    fn enter(&mut self, node: &FNode) -> CnfResult<()> {
        if node.is_quantifier() {
            return Err(Self::reject(node));
        }
        Ok(())
    }

    fn walk_node(&mut self, node: &FNode, view: FormulaView<'_, Encoded>) -> CnfResult<Encoded> {
        match view {
            // Atoms at the Boolean level
            FormulaView::Symbol(_) | FormulaView::Function { .. } => Ok(if node.is_bool() {
                Encoded::atom(node.clone())
            } else {
                Encoded::TheoryPlaceholder
            }),
            FormulaView::BoolConstant(_) => Ok(Encoded::atom(node.clone())),
            FormulaView::Equals(a, b) | FormulaView::Le(a, b) | FormulaView::Lt(a, b) => {
                Ok(Self::encode_relation(node, [a, b]))
            }

            // Connectives
            FormulaView::Not(a) => self.encode_not(node, a),
            FormulaView::And(operands) => self.encode_nary(node, NodeType::And, operands),
            FormulaView::Or(operands) => self.encode_nary(node, NodeType::Or, operands),
            FormulaView::Implies(a, b) => self.encode_implies(node, a, b),
            FormulaView::Iff(a, b) => self.encode_iff(node, a, b),
            FormulaView::Ite {
                condition,
                then_branch,
                else_branch,
            } => self.encode_ite(node, condition, then_branch, else_branch),

            // Theory terms
            FormulaView::IntConstant(_)
            | FormulaView::RealConstant(_)
            | FormulaView::Plus(_)
            | FormulaView::Minus(..)
            | FormulaView::Times(_)
            | FormulaView::ToReal(_) => Ok(Encoded::TheoryPlaceholder),

            FormulaView::Forall { .. } | FormulaView::Exists { .. } => Err(Self::reject(node)),
        }
    }
}
