//! Memoizing post-order walker over the formula DAG.
//!
//! A [`DagWalker`] computes one result per distinct node (by [`NodeId`](crate::node::NodeId)),
//! children before parents, and stores it in a [`Memoization`] table it owns. A node reached
//! through several parents is computed once; every further visit is a table hit.
//!
//! Traversal strategy
//! - Explicit `Enter`/`Exit` work stack (no recursion), so depth is bounded by the heap only.
//! - On `Enter`, a memoized node is skipped. Otherwise [`DagWalker::enter`] runs (it may abort
//!   the walk), an `Exit` frame is pushed and the children are scheduled left to right.
//! - On `Exit`, the node's [`FormulaView`] is mapped to the memoized child results and handed
//!   to [`DagWalker::walk_node`].
//! - The table persists across calls to [`DagWalker::walk`], so successive walks over
//!   overlapping DAGs share work.
//!
//! Example: count the distinct nodes below a root
//! ```
//! use hyformal::prelude::*;
//!
//! #[derive(Default)]
//! struct Size(Memoization<usize>);
//!
//! impl DagWalker for Size {
//!     type Output = usize;
//!     type Error = std::convert::Infallible;
//!
//!     fn memoization(&self) -> &Memoization<usize> { &self.0 }
//!     fn memoization_mut(&mut self) -> &mut Memoization<usize> { &mut self.0 }
//!
//!     fn walk_node(&mut self, _: &FNode, _: FormulaView<'_, usize>) -> Result<usize, Self::Error> {
//!         Ok(self.0.len() + 1)
//!     }
//! }
//!
//! let mgr = FormulaManager::new();
//! let s = mgr.symbol("s", Type::Bool).unwrap();
//! let t = mgr.symbol("t", Type::Bool).unwrap();
//! let shared = mgr.or([s, t]).unwrap();
//! let root = mgr.and([shared.clone(), mgr.not(shared).unwrap()]).unwrap();
//!
//! let mut size = Size::default();
//! assert_eq!(size.walk(&root).unwrap(), 5);
//! assert_eq!(size.memoization().hits(), 1);
//! ```
mod memo;

use log::trace;
use smallvec::{SmallVec, smallvec};

use crate::node::{FNode, FormulaView};

pub use memo::Memoization;

/// Post-order, identity-memoized computation over a formula DAG.
pub trait DagWalker {
    /// Per-node result. Cloned out of the table for each parent that consumes it.
    type Output: Clone;
    type Error;

    fn memoization(&self) -> &Memoization<Self::Output>;

    fn memoization_mut(&mut self) -> &mut Memoization<Self::Output>;

    /// Pre-visit hook, called once per unmemoized node before its children are scheduled.
    ///
    /// Returning an error aborts the walk before any child of `node` is visited.
    fn enter(&mut self, _node: &FNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Compute the result of `node` given the results of its children, in `view` order.
    fn walk_node(
        &mut self,
        node: &FNode,
        view: FormulaView<'_, Self::Output>,
    ) -> Result<Self::Output, Self::Error>;

    /// Result of `root`, computing every missing node below it exactly once.
    fn walk(&mut self, root: &FNode) -> Result<Self::Output, Self::Error> {
        enum Frame<'n> {
            Enter(&'n FNode),
            Exit(&'n FNode),
        }

        let mut stack: SmallVec<[Frame<'_>; 16]> = smallvec![Frame::Enter(root)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node) => {
                    if self.memoization().contains(node.id()) {
                        trace!("Memo hit on node #{}.", node.id().raw());
                        self.memoization_mut().record_hit();
                        continue;
                    }

                    self.enter(node)?;

                    // Post-order: children first, leftmost on top
                    stack.push(Frame::Exit(node));
                    for child in node.args().iter().rev() {
                        stack.push(Frame::Enter(child));
                    }
                }
                Frame::Exit(node) => {
                    let memo = self.memoization();
                    let view = node.view().map(|child| {
                        memo.get(child.id())
                            .cloned()
                            .expect("children are resolved before their parent")
                    });
                    let output = self.walk_node(node, view)?;
                    self.memoization_mut().insert(node.id(), output);
                }
            }
        }

        Ok(self
            .memoization()
            .get(root.id())
            .cloned()
            .expect("root is resolved once the stack is drained"))
    }
}
