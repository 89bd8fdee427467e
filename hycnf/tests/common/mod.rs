#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};

use hycnf::prelude::*;
use hyformal::prelude::*;

pub type Model = HashMap<NodeId, bool>;

/// The atom under an optional negation.
pub fn atom_of(literal: &FNode) -> &FNode {
    match literal.view() {
        FormulaView::Not(inner) => inner,
        _ => literal,
    }
}

pub fn literal_value(literal: &FNode, model: &Model) -> bool {
    match literal.view() {
        FormulaView::BoolConstant(b) => b,
        FormulaView::Not(inner) => !literal_value(inner, model),
        _ => model[&literal.id()],
    }
}

/// Distinct non-constant atoms of a clause set.
pub fn atoms(cnf: &ClauseSet) -> Vec<FNode> {
    cnf.literals()
        .map(atom_of)
        .filter(|atom| !atom.is_constant())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Brute force: does some extension of `fixed` satisfy every clause?
pub fn satisfiable_with(cnf: &ClauseSet, fixed: &Model) -> bool {
    let free: Vec<FNode> = atoms(cnf)
        .into_iter()
        .filter(|atom| !fixed.contains_key(&atom.id()))
        .collect();
    assert!(free.len() < 24, "too many free atoms for enumeration");

    (0..1u64 << free.len()).any(|mask| {
        let mut model = fixed.clone();
        for (i, atom) in free.iter().enumerate() {
            model.insert(atom.id(), mask & (1 << i) != 0);
        }
        cnf.iter()
            .all(|clause| clause.iter().any(|l| literal_value(l, &model)))
    })
}

pub fn satisfiable(cnf: &ClauseSet) -> bool {
    satisfiable_with(cnf, &Model::new())
}

/// Truth value of a quantifier-free Boolean formula whose atoms are all assigned in `model`.
pub fn eval(formula: &FNode, model: &Model) -> bool {
    match formula.view() {
        FormulaView::BoolConstant(b) => b,
        FormulaView::Not(a) => !eval(a, model),
        FormulaView::And(cs) => cs.iter().all(|c| eval(c, model)),
        FormulaView::Or(cs) => cs.iter().any(|c| eval(c, model)),
        FormulaView::Implies(a, b) => !eval(a, model) || eval(b, model),
        FormulaView::Iff(a, b) => eval(a, model) == eval(b, model),
        FormulaView::Ite {
            condition,
            then_branch,
            else_branch,
        } => {
            if eval(condition, model) {
                eval(then_branch, model)
            } else {
                eval(else_branch, model)
            }
        }
        _ => model[&formula.id()],
    }
}

/// Every assignment of `atoms`.
pub fn assignments(atoms: &[FNode]) -> impl Iterator<Item = Model> + '_ {
    (0..1u64 << atoms.len()).map(move |mask| {
        atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (atom.id(), mask & (1 << i) != 0))
            .collect()
    })
}

pub fn bools(mgr: &FormulaManager, names: &[&str]) -> Vec<FNode> {
    names
        .iter()
        .map(|n| mgr.symbol(n, Type::Bool).unwrap())
        .collect()
}
