use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hycnf::prelude::*;
use hyformal::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn build_random_formula(mgr: &FormulaManager, seed: u64, budget: usize) -> FNode {
    // Seeded for determinism. A small atom pool gives the DAG a lot of sharing.
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let atoms: Vec<FNode> = (0..12)
        .map(|i| mgr.symbol(&format!("p{}", i), Type::Bool).unwrap())
        .collect();

    fn next_create(
        budget: usize,
        rng: &mut impl Rng,
        mgr: &FormulaManager,
        atoms: &[FNode],
    ) -> FNode {
        if budget == 0 || rng.random_bool(0.1) {
            return atoms[rng.random_range(0..atoms.len())].clone();
        }

        match rng.random_range(0..=5) {
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
                mgr.implies(left, right).unwrap()
            }
            4 => {
                let left = next_create(budget - 1, rng, mgr, atoms);
                let right = next_create(budget - 1, rng, mgr, atoms);
                mgr.iff(left, right).unwrap()
            }
            5 => {
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

fn build_shared_tower(mgr: &FormulaManager, height: usize) -> FNode {
    // Read as a tree this has 2^height leaves; as a DAG it has 2 nodes per level.
    let a = mgr.symbol("a", Type::Bool).unwrap();
    let b = mgr.symbol("b", Type::Bool).unwrap();
    let mut f = mgr.or([a, b]).unwrap();
    for i in 0..height {
        f = if i % 2 == 0 {
            mgr.and([f.clone(), mgr.not(f).unwrap()]).unwrap()
        } else {
            mgr.iff(f.clone(), f).unwrap()
        };
    }
    f
}

fn bench_convert(c: &mut Criterion) {
    let mgr = FormulaManager::new();
    let random = build_random_formula(&mgr, 0x42, 10);
    let tower = build_shared_tower(&mgr, 200);

    c.bench_function("convert_random", |b| {
        b.iter(|| {
            let mut cnfizer = Cnfizer::new(&mgr);
            black_box(cnfizer.convert(&random).unwrap());
        })
    });

    c.bench_function("convert_shared_tower", |b| {
        b.iter(|| {
            let mut cnfizer = Cnfizer::new(&mgr);
            black_box(cnfizer.convert(&tower).unwrap());
        })
    });

    // Every node is a memo hit on the second conversion
    let mut warm = Cnfizer::new(&mgr);
    warm.convert(&random).unwrap();
    c.bench_function("convert_random_warm", |b| {
        b.iter(|| {
            black_box(warm.convert(&random).unwrap());
        })
    });
}

fn bench_materialize(c: &mut Criterion) {
    let mgr = FormulaManager::new();
    let random = build_random_formula(&mgr, 0x42, 10);
    let cnf = cnf_as_set(&mgr, &random).unwrap();

    c.bench_function("materialize_random", |b| {
        b.iter(|| {
            black_box(materialize(&mgr, &cnf).unwrap());
        })
    });

    c.bench_function("serialize_random", |b| {
        b.iter(|| {
            black_box(serialize(&cnf));
        })
    });
}

criterion_group!(benches, bench_convert, bench_materialize);
criterion_main!(benches);
