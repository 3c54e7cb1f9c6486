use entwine::node::Value;
use entwine::{Graph, decode, encode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn two_node_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut g = Graph::new();
    let a = g.create();
    let b = g.create();
    g.set(a, "next", Value::Ref(b))?;
    g.set(b, "next", Value::Ref(a))?;

    let tree = encode(&g, a)?;
    // a is shared (entered as root, referenced by b), b is reached once
    assert_eq!(tree, json!({"id": 1, "next": {"next": {"ref": 1}}}));

    let (out, ra) = decode(&tree)?;
    let Some(&Value::Ref(rb)) = out.field(ra, "next") else {
        return Err("expected ref".into());
    };
    assert_eq!(out.field(rb, "next"), Some(&Value::Ref(ra)));
    assert_ne!(ra, rb);
    Ok(())
}

#[test]
fn self_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut g = Graph::new();
    let n = g.create();
    g.set(n, "me", Value::Ref(n))?;

    let tree = encode(&g, n)?;
    assert_eq!(tree, json!({"id": 1, "me": {"ref": 1}}));

    let (out, root) = decode(&tree)?;
    assert_eq!(out.field(root, "me"), Some(&Value::Ref(root)));
    Ok(())
}

#[test]
fn cycle_through_sequence() -> Result<(), Box<dyn std::error::Error>> {
    let mut g = Graph::new();
    let owner = g.create();
    let item = g.create();
    g.set(owner, "items", Value::List(vec![Value::Ref(item)]))?;
    g.set(item, "owner", Value::Ref(owner))?;

    let tree = encode(&g, owner)?;
    let (out, root) = decode(&tree)?;

    let Some(Value::List(items)) = out.field(root, "items") else {
        return Err("expected list".into());
    };
    let Value::Ref(rid) = items[0] else {
        return Err("expected ref".into());
    };
    assert_eq!(out.field(rid, "owner"), Some(&Value::Ref(root)));
    Ok(())
}

#[test]
fn shared_member_inside_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut g = Graph::new();
    let a = g.create();
    let b = g.create();
    let shared = g.create();
    g.set(shared, "tag", Value::Str("s".to_string()))?;
    g.set(a, "next", Value::Ref(b))?;
    g.set(a, "data", Value::Ref(shared))?;
    g.set(b, "back", Value::Ref(a))?;
    g.set(b, "data", Value::Ref(shared))?;

    let (out, root) = decode(&encode(&g, a)?)?;

    let Some(&Value::Ref(rb)) = out.field(root, "next") else {
        return Err("expected ref".into());
    };
    assert_eq!(out.field(rb, "back"), Some(&Value::Ref(root)));

    let (Some(&Value::Ref(s1)), Some(&Value::Ref(s2))) =
        (out.field(root, "data"), out.field(rb, "data"))
    else {
        return Err("expected refs".into());
    };
    assert_eq!(s1, s2);
    assert_eq!(out.field(s1, "tag"), Some(&Value::Str("s".to_string())));
    Ok(())
}

#[test]
fn cyclic_graph_equivalence_terminates() -> Result<(), Box<dyn std::error::Error>> {
    let mut g = Graph::new();
    let a = g.create();
    let b = g.create();
    g.set(a, "next", Value::Ref(b))?;
    g.set(b, "next", Value::Ref(a))?;

    let (out, root) = decode(&encode(&g, a)?)?;
    assert!(g.equivalent(a, &out, root));
    Ok(())
}
