use hyformal::prelude::*;

fn main() -> hyformal::Result<()> {
    let mgr = FormulaManager::new();

    let x = mgr.symbol("x", Type::Int)?;
    let y = mgr.symbol("y", Type::Int)?;
    let p = mgr.symbol("p", Type::Bool)?;
    let f = mgr.declare("f", Type::function(Type::Int, [Type::Int, Type::Int]))?;

    let fxy = mgr.apply(&f, [x.clone(), y.clone()])?;
    let bound = mgr.le(fxy, mgr.plus([x.clone(), y.clone(), mgr.int(1)])?)?;
    let guarded = mgr.implies(p.clone(), bound)?;
    let choice = mgr.ite(p, mgr.lt(x.clone(), y.clone())?, mgr.equals(x.clone(), y.clone())?)?;
    let body = mgr.iff(guarded, mgr.negate(&choice)?)?;
    let expr = mgr.forall([x, y], body)?;

    expr.pretty_print().unwrap();
    println!();
    println!("{} distinct nodes", mgr.num_nodes());
    Ok(())
}
