//! Final clause-set assembly, materialization and debug output.
use std::{
    collections::HashSet,
    io::{self, Write},
    sync::Arc,
};

use hyformal::{manager::FormulaManager, node::FNode, walker::DagWalker};
use log::debug;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    clause::{Clause, ClauseSet},
    encoder::{Cnfizer, Encoded},
    error::{CnfError, CnfResult},
};

impl Cnfizer<'_> {
    /// Convert `formula` to an equisatisfiable clause set.
    ///
    /// The top literal is asserted as a unit clause next to the definitions of every connective
    /// reachable from `formula` (each collected once, whatever the sharing), then
    /// constants are pruned: a clause holding `true` is dropped, `false` literals are removed
    /// from the others. If any clause ends up empty the result is the canonical false set
    /// `{ { } }`; a formula reducing to `true` gives the empty set.
    ///
    /// Fails with [`CnfError::UnsupportedConstruct`] on quantifiers and with
    /// [`CnfError::NonBooleanFormula`] when `formula` is a theory term.
    pub fn convert(&mut self, formula: &FNode) -> CnfResult<ClauseSet> {
        let top = match self.walk(formula)? {
            Encoded::Clausal { literal, .. } => literal,
            Encoded::TheoryPlaceholder => {
                return Err(CnfError::NonBooleanFormula {
                    formula: formula.to_string(),
                    ty: formula.get_type().clone(),
                });
            }
        };

        let top = Clause::unit(top);
        let definitions = self.reachable_definitions(formula);
        let mut result = ClauseSet::new();
        for clause in std::iter::once(&top).chain(definitions.iter().flat_map(|d| d.iter())) {
            if clause.iter().any(FNode::is_true) {
                continue;
            }

            let pruned: Clause = clause.iter().filter(|l| !l.is_false()).cloned().collect();
            if pruned.is_empty() {
                debug!("Converted node #{} to false.", formula.id().raw());
                return Ok(ClauseSet::false_());
            }
            result.insert(pruned);
        }

        debug!(
            "Converted node #{}: {} clauses, {} fresh variables, {} memoized nodes ({} hits).",
            formula.id().raw(),
            result.len(),
            self.introduced_variables().len(),
            self.memoization().len(),
            self.memoization().hits()
        );
        Ok(result)
    }

    /// Local definitions of the connectives below `root`, one entry per distinct node.
    ///
    /// The descent stops at atoms: relations and function applications stay opaque, so the
    /// clauses of Boolean subterms inside them are not part of the result.
    fn reachable_definitions(&self, root: &FNode) -> Vec<Arc<[Clause]>> {
        let mut definitions = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id()) {
                continue;
            }
            if let Some(Encoded::Clausal { definition, .. }) = self.memoization().get(node.id()) {
                if !definition.is_empty() {
                    definitions.push(Arc::clone(definition));
                }
            }
            if node.node_type().is_connective() {
                stack.extend(node.args());
            }
        }
        definitions
    }

    /// [`Cnfizer::convert`], materialized as a conjunction of disjunctions.
    pub fn convert_as_formula(&mut self, formula: &FNode) -> CnfResult<FNode> {
        let cnf = self.convert(formula)?;
        Ok(materialize(self.manager(), &cnf)?)
    }
}

/// Build the formula `(l11 | l12 | ...) & (l21 | ...) & ...` for a clause set.
///
/// Unit clauses become their literal, the empty clause becomes `false` and the empty set
/// `true`.
pub fn materialize(mgr: &FormulaManager, cnf: &ClauseSet) -> hyformal::Result<FNode> {
    let clauses = cnf
        .iter()
        .map(|clause| mgr.or(clause.iter().cloned()))
        .collect::<hyformal::Result<Vec<_>>>()?;
    mgr.and(clauses)
}

/// Debug text of a clause set, `{ { l1 l2 } { l3 } }`.
pub fn serialize(cnf: &ClauseSet) -> String {
    cnf.to_string()
}

/// Write the debug text of `cnf` to `out`, dimming the braces.
pub fn write_colored<W: WriteColor + Write>(cnf: &ClauseSet, out: &mut W) -> io::Result<()> {
    fn brace<W: WriteColor + Write>(out: &mut W, text: &str) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        out.write_all(text.as_bytes())?;
        out.reset()
    }

    brace(out, "{")?;
    for clause in cnf {
        brace(out, " {")?;
        for literal in clause {
            write!(out, " {}", literal)?;
        }
        brace(out, " }")?;
    }
    brace(out, " }")
}

/// Print the debug text of `cnf` on stdout, colored when supported.
pub fn printer(cnf: &ClauseSet) -> io::Result<()> {
    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();
    write_colored(cnf, &mut stdout)?;
    writeln!(stdout)
}
