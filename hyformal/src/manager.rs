//! Formula manager: hash-consing node factory and symbol table.
//!
//! Every node is created through a [`FormulaManager`]. The manager deduplicates constructions
//! (two calls with the same kind, payload and child identities return the same [`FNode`]),
//! type-checks operands and owns the symbol table used for declarations and fresh symbols.
//!
//! Concurrency
//! - The manager is `Sync`. Lookups take a read lock; an insertion upgrades an upgradable read
//!   lock, so concurrent readers are never blocked by a lookup that hits.
//! - Node ids and the fresh-symbol counter are atomics. Node ids are drawn from one
//!   process-wide counter, so nodes of different managers never share an identity.
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use bigdecimal::BigDecimal;
use log::{debug, trace};
use num_bigint::BigInt;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use smallvec::{SmallVec, smallvec};

use crate::{
    error::{Error, Result},
    node::{FNode, FNodeData, NodeData, NodeId, NodeType},
    symbol::Symbol,
    types::Type,
};

/// Prefix used for fresh symbols unless configured otherwise.
pub const DEFAULT_FRESH_PREFIX: &str = "FV";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(PartialEq, Eq, Hash)]
struct NodeKey {
    data: NodeData,
    args: SmallVec<[NodeId; 3]>,
}

#[derive(Default)]
struct SymbolTable {
    declared: HashMap<Arc<str>, Symbol>,
    /// Names handed out by `fresh_symbol`; user declarations may not reuse them.
    fresh: HashSet<Arc<str>>,
}

/// Factory and owner of all formula nodes of one DAG.
///
/// Example
/// ```
/// use hyformal::prelude::*;
///
/// let mgr = FormulaManager::new();
/// let x = mgr.symbol("x", Type::Int).unwrap();
/// let le = mgr.le(x.clone(), mgr.int(3)).unwrap();
/// assert!(le.is_bool());
///
/// // Operand types are checked
/// assert!(mgr.and([x.clone()]).is_err());
///
/// // Negation simplifies double negations and constants
/// let not_le = mgr.negate(&le).unwrap();
/// assert_eq!(mgr.negate(&not_le).unwrap(), le);
/// assert!(mgr.negate(&mgr.true_()).unwrap().is_false());
/// ```
pub struct FormulaManager {
    unique_table: RwLock<HashMap<NodeKey, FNode>>,
    symbols: RwLock<SymbolTable>,
    fresh_counter: AtomicU64,
    fresh_prefix: Box<str>,
}

impl Default for FormulaManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaManager {
    /// Create an empty manager whose fresh symbols are named `FV0`, `FV1`, ...
    pub fn new() -> Self {
        Self::with_fresh_prefix(DEFAULT_FRESH_PREFIX)
    }

    /// Create an empty manager whose fresh symbols are named `{prefix}0`, `{prefix}1`, ...
    pub fn with_fresh_prefix(prefix: &str) -> Self {
        Self {
            unique_table: Default::default(),
            symbols: Default::default(),
            fresh_counter: AtomicU64::new(0),
            fresh_prefix: prefix.into(),
        }
    }

    /// Number of distinct nodes created so far.
    pub fn num_nodes(&self) -> usize {
        self.unique_table.read().len()
    }

    fn create_node(&self, data: NodeData, args: SmallVec<[FNode; 3]>, ty: Type) -> FNode {
        let key = NodeKey {
            data,
            args: args.iter().map(FNode::id).collect(),
        };

        let table = self.unique_table.upgradable_read();
        if let Some(node) = table.get(&key) {
            return node.clone();
        }

        let mut table = RwLockUpgradableReadGuard::upgrade(table);
        let id = NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed));
        let node = FNode(Arc::new(FNodeData {
            id,
            data: key.data.clone(),
            args,
            ty,
        }));
        trace!("New node #{} of kind {}.", id.raw(), node.node_type());
        table.insert(key, node.clone());
        node
    }

    // ============================= Symbols =============================

    /// Declare `name` with type `ty`, or return the existing declaration.
    ///
    /// Redeclaring a name with a different type is an error, and so is declaring a name
    /// previously allocated by [`Self::fresh_symbol`].
    pub fn declare(&self, name: &str, ty: Type) -> Result<Symbol> {
        let mut symbols = self.symbols.write();
        if symbols.fresh.contains(name) {
            return Err(Error::ReservedName {
                name: name.to_string(),
            });
        }
        if let Some(existing) = symbols.declared.get(name) {
            if existing.get_type() != &ty {
                return Err(Error::SymbolRedeclared {
                    name: name.to_string(),
                    declared: existing.get_type().clone(),
                    requested: ty,
                });
            }
            return Ok(existing.clone());
        }

        let name: Arc<str> = name.into();
        let symbol = Symbol::new(Arc::clone(&name), ty);
        debug!("Declared symbol `{:#}`.", symbol);
        symbols.declared.insert(name, symbol.clone());
        Ok(symbol)
    }

    /// Look up a declared or fresh symbol.
    pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.read().declared.get(name).cloned()
    }

    /// Declare `name` (see [`Self::declare`]) and return its leaf node.
    pub fn symbol(&self, name: &str, ty: Type) -> Result<FNode> {
        let symbol = self.declare(name, ty)?;
        Ok(self.symbol_node(&symbol))
    }

    /// Leaf node of an already declared symbol.
    pub fn symbol_node(&self, symbol: &Symbol) -> FNode {
        let ty = symbol.get_type().clone();
        self.create_node(NodeData::Symbol(symbol.clone()), smallvec![], ty)
    }

    /// Allocate a symbol whose name was never declared on this manager. The name is reserved
    /// from then on.
    pub fn fresh_symbol(&self, ty: Type) -> FNode {
        let symbol = {
            let mut symbols = self.symbols.write();
            loop {
                let n = self.fresh_counter.fetch_add(1, Ordering::Relaxed);
                let name: Arc<str> = format!("{}{}", self.fresh_prefix, n).into();
                if symbols.declared.contains_key(&name) {
                    continue;
                }
                let symbol = Symbol::new(Arc::clone(&name), ty.clone());
                symbols.fresh.insert(Arc::clone(&name));
                symbols.declared.insert(name, symbol.clone());
                break symbol;
            }
        };
        debug!("Allocated fresh symbol `{:#}`.", symbol);
        self.symbol_node(&symbol)
    }

    // ============================= Constants =============================

    /// The constant `true`.
    pub fn true_(&self) -> FNode {
        self.bool(true)
    }

    /// The constant `false`.
    pub fn false_(&self) -> FNode {
        self.bool(false)
    }

    /// A Boolean constant.
    pub fn bool(&self, value: bool) -> FNode {
        self.create_node(NodeData::BoolConstant(value), smallvec![], Type::Bool)
    }

    /// An integer constant.
    pub fn int(&self, value: impl Into<BigInt>) -> FNode {
        self.create_node(NodeData::IntConstant(value.into()), smallvec![], Type::Int)
    }

    /// A real constant.
    pub fn real(&self, value: impl Into<BigDecimal>) -> FNode {
        self.create_node(NodeData::RealConstant(value.into()), smallvec![], Type::Real)
    }

    // ============================= Connectives =============================

    /// `!a`, without simplification.
    pub fn not(&self, a: FNode) -> Result<FNode> {
        expect_bool(NodeType::Not, &a)?;
        Ok(self.create_node(NodeData::Not, smallvec![a], Type::Bool))
    }

    /// Negation with immediate simplification: `!!a` is `a`, `!true` is `false` and `!false`
    /// is `true`. Any other operand is wrapped in a `Not` node.
    pub fn negate(&self, a: &FNode) -> Result<FNode> {
        if a.is_not() {
            return Ok(a.args()[0].clone());
        }
        if a.is_true() {
            return Ok(self.false_());
        }
        if a.is_false() {
            return Ok(self.true_());
        }
        self.not(a.clone())
    }

    /// N-ary conjunction. An empty operand list yields `true`; a single operand is returned
    /// unchanged.
    pub fn and(&self, args: impl IntoIterator<Item = FNode>) -> Result<FNode> {
        let args = collect_bool(NodeType::And, args)?;
        Ok(match args.len() {
            0 => self.true_(),
            1 => args[0].clone(),
            _ => self.create_node(NodeData::And, args, Type::Bool),
        })
    }

    /// N-ary disjunction. An empty operand list yields `false`; a single operand is returned
    /// unchanged.
    pub fn or(&self, args: impl IntoIterator<Item = FNode>) -> Result<FNode> {
        let args = collect_bool(NodeType::Or, args)?;
        Ok(match args.len() {
            0 => self.false_(),
            1 => args[0].clone(),
            _ => self.create_node(NodeData::Or, args, Type::Bool),
        })
    }

    /// `a -> b`.
    pub fn implies(&self, a: FNode, b: FNode) -> Result<FNode> {
        expect_bool(NodeType::Implies, &a)?;
        expect_bool(NodeType::Implies, &b)?;
        Ok(self.create_node(NodeData::Implies, smallvec![a, b], Type::Bool))
    }

    /// `a <-> b`.
    pub fn iff(&self, a: FNode, b: FNode) -> Result<FNode> {
        expect_bool(NodeType::Iff, &a)?;
        expect_bool(NodeType::Iff, &b)?;
        Ok(self.create_node(NodeData::Iff, smallvec![a, b], Type::Bool))
    }

    /// `ite(condition, then_branch, else_branch)`. Both branches must share a type, which is
    /// also the type of the result; non-Boolean branches make this a theory term.
    pub fn ite(&self, condition: FNode, then_branch: FNode, else_branch: FNode) -> Result<FNode> {
        expect_bool(NodeType::Ite, &condition)?;
        let ty = then_branch.get_type().clone();
        expect_type(NodeType::Ite, &else_branch, &ty)?;
        Ok(self.create_node(
            NodeData::Ite,
            smallvec![condition, then_branch, else_branch],
            ty,
        ))
    }

    // ============================= Relations =============================

    /// Equality between two theory terms of the same sort.
    pub fn equals(&self, a: FNode, b: FNode) -> Result<FNode> {
        if !a.get_type().is_arithmetic() {
            return Err(Error::TypeMismatch {
                operator: NodeType::Equals,
                expected: "`Int` or `Real`".to_string(),
                found: a.get_type().clone(),
            });
        }
        expect_type(NodeType::Equals, &b, a.get_type())?;
        Ok(self.create_node(NodeData::Equals, smallvec![a, b], Type::Bool))
    }

    /// `a <= b`.
    pub fn le(&self, a: FNode, b: FNode) -> Result<FNode> {
        expect_same_arithmetic(NodeType::Le, &a, &b)?;
        Ok(self.create_node(NodeData::Le, smallvec![a, b], Type::Bool))
    }

    /// `a < b`.
    pub fn lt(&self, a: FNode, b: FNode) -> Result<FNode> {
        expect_same_arithmetic(NodeType::Lt, &a, &b)?;
        Ok(self.create_node(NodeData::Lt, smallvec![a, b], Type::Bool))
    }

    // ============================= Arithmetic =============================

    /// N-ary sum, at least one operand.
    pub fn plus(&self, args: impl IntoIterator<Item = FNode>) -> Result<FNode> {
        self.arithmetic_nary(NodeType::Plus, NodeData::Plus, args)
    }

    /// N-ary product, at least one operand.
    pub fn times(&self, args: impl IntoIterator<Item = FNode>) -> Result<FNode> {
        self.arithmetic_nary(NodeType::Times, NodeData::Times, args)
    }

    /// `a - b`.
    pub fn minus(&self, a: FNode, b: FNode) -> Result<FNode> {
        expect_same_arithmetic(NodeType::Minus, &a, &b)?;
        let ty = a.get_type().clone();
        Ok(self.create_node(NodeData::Minus, smallvec![a, b], ty))
    }

    /// Integer to real conversion. Real operands are returned unchanged.
    pub fn to_real(&self, a: FNode) -> Result<FNode> {
        match a.get_type() {
            Type::Real => Ok(a),
            Type::Int => Ok(self.create_node(NodeData::ToReal, smallvec![a], Type::Real)),
            other => Err(Error::TypeMismatch {
                operator: NodeType::ToReal,
                expected: "`Int`".to_string(),
                found: other.clone(),
            }),
        }
    }

    fn arithmetic_nary(
        &self,
        operator: NodeType,
        data: NodeData,
        args: impl IntoIterator<Item = FNode>,
    ) -> Result<FNode> {
        let args: SmallVec<[FNode; 3]> = args.into_iter().collect();
        let Some(first) = args.first() else {
            return Err(Error::NotEnoughOperands {
                operator,
                min: 1,
                found: 0,
            });
        };
        for arg in args.iter() {
            expect_same_arithmetic(operator, first, arg)?;
        }
        if args.len() == 1 {
            return Ok(first.clone());
        }
        let ty = first.get_type().clone();
        Ok(self.create_node(data, args, ty))
    }

    // ============================= Functions =============================

    /// Apply an uninterpreted function symbol to arguments.
    pub fn apply(&self, func: &Symbol, args: impl IntoIterator<Item = FNode>) -> Result<FNode> {
        let Some(signature) = func.get_type().as_function() else {
            return Err(Error::NotAFunction {
                name: func.name().to_string(),
                ty: func.get_type().clone(),
            });
        };

        let args: SmallVec<[FNode; 3]> = args.into_iter().collect();
        if args.len() != signature.arity() {
            return Err(Error::ArityMismatch {
                name: func.name().to_string(),
                expected: signature.arity(),
                found: args.len(),
            });
        }
        for (arg, param) in args.iter().zip(signature.params.iter()) {
            expect_type(NodeType::Function, arg, param)?;
        }

        let ret = signature.ret.clone();
        Ok(self.create_node(NodeData::Function(func.clone()), args, ret))
    }

    // ============================= Quantifiers =============================

    /// Universal quantification over symbol nodes. No variables returns `body`.
    pub fn forall(&self, variables: impl IntoIterator<Item = FNode>, body: FNode) -> Result<FNode> {
        let variables = collect_binders(NodeType::Forall, variables)?;
        expect_bool(NodeType::Forall, &body)?;
        if variables.is_empty() {
            return Ok(body);
        }
        Ok(self.create_node(NodeData::Forall(variables), smallvec![body], Type::Bool))
    }

    /// Existential quantification over symbol nodes. No variables returns `body`.
    pub fn exists(&self, variables: impl IntoIterator<Item = FNode>, body: FNode) -> Result<FNode> {
        let variables = collect_binders(NodeType::Exists, variables)?;
        expect_bool(NodeType::Exists, &body)?;
        if variables.is_empty() {
            return Ok(body);
        }
        Ok(self.create_node(NodeData::Exists(variables), smallvec![body], Type::Bool))
    }
}

fn expect_type(operator: NodeType, node: &FNode, expected: &Type) -> Result<()> {
    if node.get_type() == expected {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            operator,
            expected: format!("`{}`", expected),
            found: node.get_type().clone(),
        })
    }
}

#[inline]
fn expect_bool(operator: NodeType, node: &FNode) -> Result<()> {
    expect_type(operator, node, &Type::Bool)
}

fn expect_same_arithmetic(operator: NodeType, a: &FNode, b: &FNode) -> Result<()> {
    if !a.get_type().is_arithmetic() {
        return Err(Error::TypeMismatch {
            operator,
            expected: "`Int` or `Real`".to_string(),
            found: a.get_type().clone(),
        });
    }
    expect_type(operator, b, a.get_type())
}

fn collect_bool(
    operator: NodeType,
    args: impl IntoIterator<Item = FNode>,
) -> Result<SmallVec<[FNode; 3]>> {
    let args: SmallVec<[FNode; 3]> = args.into_iter().collect();
    for arg in args.iter() {
        expect_bool(operator, arg)?;
    }
    Ok(args)
}

fn collect_binders(
    operator: NodeType,
    variables: impl IntoIterator<Item = FNode>,
) -> Result<SmallVec<[Symbol; 2]>> {
    variables
        .into_iter()
        .map(|v| {
            v.symbol().cloned().ok_or_else(|| Error::NotASymbol {
                operator,
                formula: v.to_string(),
            })
        })
        .collect()
}
