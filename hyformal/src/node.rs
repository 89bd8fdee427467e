//! Formula nodes: immutable, hash-consed and shared.
//!
//! Role
//! - [`FNode`] is a cheap handle (`Arc`) to an immutable node owned by the DAG. Cloning a handle
//!   never copies the node.
//! - Identity is the [`NodeId`] assigned at creation, unique across every manager of the
//!   process. Because the [`FormulaManager`](crate::manager::FormulaManager) hash-conses every
//!   construction, structurally equal formulas built by the same manager are the same node,
//!   so identity comparison is both correct and O(1).
//! - [`FormulaView`] decodes the outer constructor of a node into a closed enum whose
//!   children are of a generic type `C`. Walkers use [`FormulaView::map`] to substitute
//!   children with already-computed results.
//!
//! Example
//! ```
//! use hyformal::prelude::*;
//!
//! let mgr = FormulaManager::new();
//! let a = mgr.symbol("a", Type::Bool).unwrap();
//! let b = mgr.symbol("b", Type::Bool).unwrap();
//! let f = mgr.and([a.clone(), b.clone()]).unwrap();
//!
//! // Same construction, same node.
//! assert_eq!(f, mgr.and([a, b]).unwrap());
//! assert!(matches!(f.view(), FormulaView::And(children) if children.len() == 2));
//! ```
use std::{fmt, hash::Hash, sync::Arc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use smallvec::SmallVec;
use strum::{Display, EnumDiscriminants, EnumIs, EnumIter};

use crate::{pretty, symbol::Symbol, types::Type};

/// Process-unique identity of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value of the identifier.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Payload of a node. Children are stored separately, in order, in the node itself.
///
/// The discriminant enum [`NodeType`] is the closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumDiscriminants)]
#[strum_discriminants(name(NodeType))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, Display, EnumIter))]
#[strum_discriminants(vis(pub))]
pub(crate) enum NodeData {
    Symbol(Symbol),
    BoolConstant(bool),
    IntConstant(BigInt),
    RealConstant(BigDecimal),
    Not,
    And,
    Or,
    Implies,
    Iff,
    Ite,
    Equals,
    Le,
    Lt,
    Plus,
    Minus,
    Times,
    ToReal,
    Function(Symbol),
    Forall(SmallVec<[Symbol; 2]>),
    Exists(SmallVec<[Symbol; 2]>),
}

impl NodeType {
    /// `Forall` or `Exists`.
    #[inline]
    pub fn is_quantifier(self) -> bool {
        matches!(self, NodeType::Forall | NodeType::Exists)
    }

    /// Theory relations producing a Boolean from theory terms.
    #[inline]
    pub fn is_relation(self) -> bool {
        matches!(self, NodeType::Equals | NodeType::Le | NodeType::Lt)
    }

    /// Propositional connectives.
    #[inline]
    pub fn is_connective(self) -> bool {
        matches!(
            self,
            NodeType::Not
                | NodeType::And
                | NodeType::Or
                | NodeType::Implies
                | NodeType::Iff
                | NodeType::Ite
        )
    }

    /// Constants of any sort.
    #[inline]
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            NodeType::BoolConstant | NodeType::IntConstant | NodeType::RealConstant
        )
    }
}

pub(crate) struct FNodeData {
    pub(crate) id: NodeId,
    pub(crate) data: NodeData,
    pub(crate) args: SmallVec<[FNode; 3]>,
    pub(crate) ty: Type,
}

/// Shared handle to an immutable formula node.
///
/// Equality, ordering and hashing are by identity ([`NodeId`]).
#[derive(Clone)]
pub struct FNode(pub(crate) Arc<FNodeData>);

impl FNode {
    /// Identity of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    /// Kind of this node.
    #[inline]
    pub fn node_type(&self) -> NodeType {
        NodeType::from(&self.0.data)
    }

    /// Ordered children.
    #[inline]
    pub fn args(&self) -> &[FNode] {
        &self.0.args
    }

    /// Type of the value this node denotes.
    #[inline]
    pub fn get_type(&self) -> &Type {
        &self.0.ty
    }

    /// Whether this node denotes a Boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        self.0.ty.is_bool()
    }

    /// The constant `true`.
    #[inline]
    pub fn is_true(&self) -> bool {
        matches!(self.0.data, NodeData::BoolConstant(true))
    }

    /// The constant `false`.
    #[inline]
    pub fn is_false(&self) -> bool {
        matches!(self.0.data, NodeData::BoolConstant(false))
    }

    /// Any constant (Boolean or numeric).
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.node_type().is_constant()
    }

    /// A symbol leaf, optionally of a given type.
    pub fn is_symbol(&self, ty: Option<&Type>) -> bool {
        match &self.0.data {
            NodeData::Symbol(s) => ty.is_none_or(|ty| s.is_of_type(ty)),
            _ => false,
        }
    }

    /// `Forall` or `Exists`.
    #[inline]
    pub fn is_quantifier(&self) -> bool {
        self.node_type().is_quantifier()
    }

    /// `Not`.
    #[inline]
    pub fn is_not(&self) -> bool {
        matches!(self.0.data, NodeData::Not)
    }

    /// The symbol of a symbol leaf.
    pub fn symbol(&self) -> Option<&Symbol> {
        match &self.0.data {
            NodeData::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// The applied function symbol of a function application.
    pub fn function_symbol(&self) -> Option<&Symbol> {
        match &self.0.data {
            NodeData::Function(s) => Some(s),
            _ => None,
        }
    }

    /// Decode the outer constructor, exposing children as `&FNode`.
    pub fn view(&self) -> FormulaView<'_, &FNode> {
        let a = &self.0.args;
        match &self.0.data {
            NodeData::Symbol(s) => FormulaView::Symbol(s),
            NodeData::BoolConstant(b) => FormulaView::BoolConstant(*b),
            NodeData::IntConstant(i) => FormulaView::IntConstant(i),
            NodeData::RealConstant(r) => FormulaView::RealConstant(r),
            NodeData::Not => FormulaView::Not(&a[0]),
            NodeData::And => FormulaView::And(a.iter().collect()),
            NodeData::Or => FormulaView::Or(a.iter().collect()),
            NodeData::Implies => FormulaView::Implies(&a[0], &a[1]),
            NodeData::Iff => FormulaView::Iff(&a[0], &a[1]),
            NodeData::Ite => FormulaView::Ite {
                condition: &a[0],
                then_branch: &a[1],
                else_branch: &a[2],
            },
            NodeData::Equals => FormulaView::Equals(&a[0], &a[1]),
            NodeData::Le => FormulaView::Le(&a[0], &a[1]),
            NodeData::Lt => FormulaView::Lt(&a[0], &a[1]),
            NodeData::Plus => FormulaView::Plus(a.iter().collect()),
            NodeData::Minus => FormulaView::Minus(&a[0], &a[1]),
            NodeData::Times => FormulaView::Times(a.iter().collect()),
            NodeData::ToReal => FormulaView::ToReal(&a[0]),
            NodeData::Function(func) => FormulaView::Function {
                func,
                args: a.iter().collect(),
            },
            NodeData::Forall(vars) => FormulaView::Forall {
                variables: vars,
                body: &a[0],
            },
            NodeData::Exists(vars) => FormulaView::Exists {
                variables: vars,
                body: &a[0],
            },
        }
    }
}

impl PartialEq for FNode {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for FNode {}

impl PartialOrd for FNode {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FNode {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl Hash for FNode {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for FNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty::to_plain_string(self, pretty::INLINE_WIDTH))
    }
}

impl fmt::Debug for FNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.0.id.0, self)
    }
}

/// Closed view over the outer constructor of a formula node.
///
/// `C` is the child type: `&FNode` when obtained from [`FNode::view`], or any per-child
/// result after [`FormulaView::map`].
#[derive(Debug, Clone, EnumIs)]
pub enum FormulaView<'a, C> {
    // Leaves
    Symbol(&'a Symbol),
    BoolConstant(bool),
    IntConstant(&'a BigInt),
    RealConstant(&'a BigDecimal),

    // Propositional connectives
    Not(C),
    And(SmallVec<[C; 4]>),
    Or(SmallVec<[C; 4]>),
    Implies(C, C),
    Iff(C, C),
    Ite {
        condition: C,
        then_branch: C,
        else_branch: C,
    },

    // Theory relations
    Equals(C, C),
    Le(C, C),
    Lt(C, C),

    // Arithmetic
    Plus(SmallVec<[C; 4]>),
    Minus(C, C),
    Times(SmallVec<[C; 4]>),
    ToReal(C),

    // Uninterpreted functions
    Function {
        func: &'a Symbol,
        args: SmallVec<[C; 4]>,
    },

    // Quantifiers
    Forall {
        variables: &'a [Symbol],
        body: C,
    },
    Exists {
        variables: &'a [Symbol],
        body: C,
    },
}

impl<'a, C> FormulaView<'a, C> {
    /// Replace every child, in order, by `f(child)`.
    pub fn map<D, F: FnMut(C) -> D>(self, mut f: F) -> FormulaView<'a, D> {
        use FormulaView::*;
        match self {
            Symbol(s) => Symbol(s),
            BoolConstant(b) => BoolConstant(b),
            IntConstant(i) => IntConstant(i),
            RealConstant(r) => RealConstant(r),
            Not(c) => Not(f(c)),
            And(cs) => And(cs.into_iter().map(f).collect()),
            Or(cs) => Or(cs.into_iter().map(f).collect()),
            Implies(a, b) => {
                let a = f(a);
                Implies(a, f(b))
            }
            Iff(a, b) => {
                let a = f(a);
                Iff(a, f(b))
            }
            Ite {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = f(condition);
                let then_branch = f(then_branch);
                Ite {
                    condition,
                    then_branch,
                    else_branch: f(else_branch),
                }
            }
            Equals(a, b) => {
                let a = f(a);
                Equals(a, f(b))
            }
            Le(a, b) => {
                let a = f(a);
                Le(a, f(b))
            }
            Lt(a, b) => {
                let a = f(a);
                Lt(a, f(b))
            }
            Plus(cs) => Plus(cs.into_iter().map(f).collect()),
            Minus(a, b) => {
                let a = f(a);
                Minus(a, f(b))
            }
            Times(cs) => Times(cs.into_iter().map(f).collect()),
            ToReal(c) => ToReal(f(c)),
            Function { func, args } => Function {
                func,
                args: args.into_iter().map(f).collect(),
            },
            Forall { variables, body } => Forall {
                variables,
                body: f(body),
            },
            Exists { variables, body } => Exists {
                variables,
                body: f(body),
            },
        }
    }

    /// Kind of the viewed node.
    pub fn node_type(&self) -> NodeType {
        use FormulaView::*;
        match self {
            Symbol(_) => NodeType::Symbol,
            BoolConstant(_) => NodeType::BoolConstant,
            IntConstant(_) => NodeType::IntConstant,
            RealConstant(_) => NodeType::RealConstant,
            Not(_) => NodeType::Not,
            And(_) => NodeType::And,
            Or(_) => NodeType::Or,
            Implies(..) => NodeType::Implies,
            Iff(..) => NodeType::Iff,
            Ite { .. } => NodeType::Ite,
            Equals(..) => NodeType::Equals,
            Le(..) => NodeType::Le,
            Lt(..) => NodeType::Lt,
            Plus(_) => NodeType::Plus,
            Minus(..) => NodeType::Minus,
            Times(_) => NodeType::Times,
            ToReal(_) => NodeType::ToReal,
            Function { .. } => NodeType::Function,
            Forall { .. } => NodeType::Forall,
            Exists { .. } => NodeType::Exists,
        }
    }
}
