use std::convert::Infallible;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hyformal::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const NUM_ATOMS: usize = 16;

fn build_random_formula(mgr: &FormulaManager, seed: u64, budget: usize) -> FNode {
    // Seeded for determinism. A small atom pool makes hash-consing find plenty of sharing.
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let atoms: Vec<FNode> = (0..NUM_ATOMS)
        .map(|i| mgr.symbol(&format!("p{}", i), Type::Bool).unwrap())
        .collect();

    fn next_create(
        budget: usize,
        rng: &mut impl Rng,
        mgr: &FormulaManager,
        atoms: &[FNode],
    ) -> FNode {
        if budget == 0 || rng.random_bool(0.15) {
            return atoms[rng.random_range(0..atoms.len())].clone();
        }

        match rng.random_range(0..=4) {
            0 => {
                let inner = next_create(budget - 1, rng, mgr, atoms);
                mgr.not(inner).unwrap()
            }
            1 => {
                let left = next_create(budget - 1, rng, mgr, atoms);
                let right = next_create(budget - 1, rng, mgr, atoms);
                mgr.and([left, right]).unwrap()
            }
            2 => {
                let left = next_create(budget - 1, rng, mgr, atoms);
                let right = next_create(budget - 1, rng, mgr, atoms);
                mgr.or([left, right]).unwrap()
            }
            3 => {
                let left = next_create(budget - 1, rng, mgr, atoms);
                let right = next_create(budget - 1, rng, mgr, atoms);
                mgr.iff(left, right).unwrap()
            }
            4 => {
                let condition = next_create(budget - 1, rng, mgr, atoms);
                let then_branch = next_create(budget - 1, rng, mgr, atoms);
                let else_branch = next_create(budget - 1, rng, mgr, atoms);
                mgr.ite(condition, then_branch, else_branch).unwrap()
            }
            _ => unreachable!(),
        }
    }

    next_create(budget, &mut rng, mgr, &atoms)
}

#[derive(Default)]
struct CountNodes(Memoization<()>);

impl DagWalker for CountNodes {
    type Output = ();
    type Error = Infallible;

    fn memoization(&self) -> &Memoization<()> {
        &self.0
    }

    fn memoization_mut(&mut self) -> &mut Memoization<()> {
        &mut self.0
    }

    fn walk_node(&mut self, _: &FNode, _: FormulaView<'_, ()>) -> Result<(), Infallible> {
        Ok(())
    }
}

fn bench_hash_consing(c: &mut Criterion) {
    c.bench_function("build_random_fresh_manager", |b| {
        b.iter(|| {
            let mgr = FormulaManager::new();
            black_box(build_random_formula(&mgr, 0x42, 12));
        })
    });

    // Every construction hits the unique table
    let mgr = FormulaManager::new();
    build_random_formula(&mgr, 0x42, 12);
    c.bench_function("build_random_warm_manager", |b| {
        b.iter(|| {
            black_box(build_random_formula(&mgr, 0x42, 12));
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let mgr = FormulaManager::new();
    let expr = build_random_formula(&mgr, 0x42, 16);

    c.bench_function("walk_memoized_count", |b| {
        b.iter(|| {
            let mut walker = CountNodes::default();
            walker.walk(&expr).unwrap();
            black_box(walker.memoization().len());
        })
    });

    c.bench_function("pretty_plain_string", |b| {
        b.iter(|| {
            black_box(expr.pretty_string(100));
        })
    });
}

criterion_group!(benches, bench_hash_consing, bench_walk);
criterion_main!(benches);
