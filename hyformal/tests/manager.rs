use hyformal::Error;
use hyformal::prelude::*;

fn bools(mgr: &FormulaManager, names: &[&str]) -> Vec<FNode> {
    names
        .iter()
        .map(|n| mgr.symbol(n, Type::Bool).unwrap())
        .collect()
}

#[test]
fn structurally_equal_constructions_are_identical() {
    let mgr = FormulaManager::new();
    let v = bools(&mgr, &["a", "b"]);

    let f1 = mgr.and([v[0].clone(), v[1].clone()]).unwrap();
    let before = mgr.num_nodes();
    let f2 = mgr.and([v[0].clone(), v[1].clone()]).unwrap();

    assert_eq!(f1, f2);
    assert_eq!(f1.id(), f2.id());
    assert_eq!(mgr.num_nodes(), before);

    // Children are ordered
    let f3 = mgr.and([v[1].clone(), v[0].clone()]).unwrap();
    assert_ne!(f1, f3);

    // Redeclaring with the same type returns the same leaf
    assert_eq!(mgr.symbol("a", Type::Bool).unwrap(), v[0]);
}

#[test]
fn constants_are_shared() {
    let mgr = FormulaManager::new();
    assert_eq!(mgr.true_(), mgr.bool(true));
    assert_eq!(mgr.int(3), mgr.int(3u8));
    assert_ne!(mgr.int(3), mgr.int(4));
    assert!(mgr.true_().is_true());
    assert!(mgr.false_().is_false());
    assert!(mgr.int(7).is_constant());
    assert!(!mgr.int(7).is_bool());
}

#[test]
fn nary_connectives_degenerate_cases() {
    let mgr = FormulaManager::new();
    let v = bools(&mgr, &["a"]);

    assert!(mgr.and([]).unwrap().is_true());
    assert!(mgr.or([]).unwrap().is_false());
    assert_eq!(mgr.and([v[0].clone()]).unwrap(), v[0]);
    assert_eq!(mgr.or([v[0].clone()]).unwrap(), v[0]);

    let x = mgr.symbol("x", Type::Int).unwrap();
    assert_eq!(mgr.plus([x.clone()]).unwrap(), x);
    assert_eq!(
        mgr.plus([]),
        Err(Error::NotEnoughOperands {
            operator: NodeType::Plus,
            min: 1,
            found: 0
        })
    );
}

#[test]
fn negate_simplifies() {
    let mgr = FormulaManager::new();
    let v = bools(&mgr, &["a"]);
    let a = &v[0];

    let not_a = mgr.negate(a).unwrap();
    assert_eq!(not_a.node_type(), NodeType::Not);
    assert_eq!(not_a, mgr.not(a.clone()).unwrap());
    assert_eq!(&mgr.negate(&not_a).unwrap(), a);
    assert_eq!(mgr.negate(&mgr.true_()).unwrap(), mgr.false_());
    assert_eq!(mgr.negate(&mgr.false_()).unwrap(), mgr.true_());

    // `not` never simplifies
    let not_not_a = mgr.not(not_a.clone()).unwrap();
    assert_eq!(not_not_a.args(), &[not_a]);
}

#[test]
fn declarations_keep_one_type_per_name() {
    let mgr = FormulaManager::new();
    mgr.declare("x", Type::Int).unwrap();

    let err = mgr.symbol("x", Type::Bool).unwrap_err();
    assert!(err.is_symbol_redeclared());
    assert_eq!(
        err,
        Error::SymbolRedeclared {
            name: "x".to_string(),
            declared: Type::Int,
            requested: Type::Bool,
        }
    );
    assert_eq!(mgr.get_symbol("x").unwrap().get_type(), &Type::Int);
    assert!(mgr.get_symbol("y").is_none());
}

#[test]
fn fresh_symbols_never_collide() {
    let mgr = FormulaManager::new();
    mgr.declare("FV0", Type::Bool).unwrap();
    mgr.declare("FV2", Type::Int).unwrap();

    let k1 = mgr.fresh_symbol(Type::Bool);
    let k2 = mgr.fresh_symbol(Type::Bool);
    let k3 = mgr.fresh_symbol(Type::Bool);

    assert_eq!(k1.symbol().unwrap().name(), "FV1");
    assert_eq!(k2.symbol().unwrap().name(), "FV3");
    assert_eq!(k3.symbol().unwrap().name(), "FV4");
    assert!(k1.is_symbol(Some(&Type::Bool)));

    // Fresh names are reserved, whatever the requested type
    assert!(mgr.symbol("FV1", Type::Int).is_err());
    assert_eq!(
        mgr.symbol("FV3", Type::Bool).unwrap_err(),
        Error::ReservedName {
            name: "FV3".to_string()
        }
    );
    // Names declared by the user before the allocation stay usable
    assert!(mgr.symbol("FV0", Type::Bool).is_ok());
    assert_eq!(mgr.get_symbol("FV4").unwrap().get_type(), &Type::Bool);
}

#[test]
fn node_ids_are_unique_across_managers() {
    let m1 = FormulaManager::new();
    let m2 = FormulaManager::new();

    let a = m1.symbol("a", Type::Bool).unwrap();
    let t = m2.true_();
    let a2 = m2.symbol("a", Type::Bool).unwrap();

    assert_ne!(a.id(), t.id());
    assert_ne!(a, a2, "equal structure in two managers is two nodes");
    assert_eq!(a2, m2.symbol("a", Type::Bool).unwrap());
}

#[test]
fn fresh_prefix_is_configurable() {
    let mgr = FormulaManager::with_fresh_prefix("k!");
    let k = mgr.fresh_symbol(Type::Bool);
    assert_eq!(k.symbol().unwrap().name(), "k!0");
}

#[test]
fn operand_types_are_checked() {
    let mgr = FormulaManager::new();
    let x = mgr.symbol("x", Type::Int).unwrap();
    let r = mgr.symbol("r", Type::Real).unwrap();
    let p = mgr.symbol("p", Type::Bool).unwrap();

    assert!(mgr.and([p.clone(), x.clone()]).unwrap_err().is_type_mismatch());
    assert!(mgr.not(x.clone()).unwrap_err().is_type_mismatch());
    assert!(mgr.le(x.clone(), r.clone()).unwrap_err().is_type_mismatch());
    assert!(mgr.equals(p.clone(), p.clone()).unwrap_err().is_type_mismatch());
    assert!(mgr.ite(p.clone(), x.clone(), p.clone()).unwrap_err().is_type_mismatch());

    // Mixed sorts are fine once converted
    let lt = mgr.lt(mgr.to_real(x.clone()).unwrap(), r.clone()).unwrap();
    assert!(lt.is_bool());
    assert_eq!(mgr.to_real(r.clone()).unwrap(), r);

    // Non-Boolean ite is a term of the branch sort
    let term = mgr.ite(p, x.clone(), mgr.int(0)).unwrap();
    assert_eq!(term.get_type(), &Type::Int);
}

#[test]
fn function_application_is_checked() {
    let mgr = FormulaManager::new();
    let f = mgr
        .declare("f", Type::function(Type::Bool, [Type::Int, Type::Int]))
        .unwrap();
    let x = mgr.symbol("x", Type::Int).unwrap();
    let p = mgr.declare("p", Type::Bool).unwrap();

    let app = mgr.apply(&f, [x.clone(), mgr.int(1)]).unwrap();
    assert!(app.is_bool());
    assert_eq!(app.function_symbol(), Some(&f));

    assert_eq!(
        mgr.apply(&f, [x.clone()]),
        Err(Error::ArityMismatch {
            name: "f".to_string(),
            expected: 2,
            found: 1
        })
    );
    assert!(mgr.apply(&p, [x]).unwrap_err().is_not_a_function());
}

#[test]
fn quantifiers_bind_symbols() {
    let mgr = FormulaManager::new();
    let x = mgr.symbol("x", Type::Int).unwrap();
    let body = mgr.le(x.clone(), mgr.int(3)).unwrap();

    let q = mgr.forall([x.clone()], body.clone()).unwrap();
    assert!(q.is_quantifier());
    assert!(matches!(q.view(), FormulaView::Forall { variables, .. } if variables.len() == 1));

    assert_eq!(mgr.exists([], body.clone()).unwrap(), body);
    assert!(
        mgr.forall([mgr.int(1)], body)
            .unwrap_err()
            .is_not_a_symbol()
    );
}

#[test]
fn manager_is_shared_across_threads() {
    let mgr = FormulaManager::new();
    let v = bools(&mgr, &["a", "b", "c"]);

    let built: Vec<FNode> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let ab = mgr.or([v[0].clone(), v[1].clone()]).unwrap();
                    mgr.and([ab, mgr.not(v[2].clone()).unwrap()]).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(built.windows(2).all(|w| w[0] == w[1]));
}
