use super::*;
use crate::builder::{component, element};
use crate::node::Component;
use std::cell::Cell;
use std::rc::Rc;

fn counted(_props: &Props, scope: &Scope<'_>) -> anyhow::Result<Node> {
    let count = scope.render_counter()?;
    Ok(element("span").child(count).build())
}

fn expansion_text(node: &Node) -> String {
    let span = node.as_element().expect("span");
    span.children()[0].as_text().expect("text").to_string()
}

#[test]
fn evaluate_invokes_component_once_per_node() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let widget = Component::new(move |_props: &Props, _scope: &Scope<'_>| {
        seen.set(seen.get() + 1);
        Ok(Node::from("hi"))
    });
    let node = component(&widget).build();
    let component_node = node.as_component().expect("component node");

    assert!(matches!(component_node.expansion(), Expansion::Unevaluated));
    assert_eq!(calls.get(), 0);

    let first = evaluate(component_node).expect("evaluate").clone();
    let second = evaluate(component_node).expect("evaluate");
    assert_eq!(calls.get(), 1);
    assert_eq!(first.as_text(), second.as_text());
    assert!(matches!(component_node.expansion(), Expansion::Evaluated(_)));
}

#[test]
fn building_does_not_invoke_component() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let widget = Component::new(move |_props: &Props, _scope: &Scope<'_>| {
        seen.set(seen.get() + 1);
        Ok(Node::Empty)
    });
    let _ = component(&widget).prop("label", "x").build();
    assert_eq!(calls.get(), 0);
}

#[test]
fn props_and_children_reach_the_component() {
    let echo = Component::new(|props: &Props, scope: &Scope<'_>| {
        assert_eq!(scope.props().get_str("label"), Some("hello"));
        let label = props.get_str("label").unwrap_or_default().to_owned();
        Ok(element("div")
            .child(label)
            .children(props.children().iter().cloned())
            .build())
    });
    let node = component(&echo)
        .prop("label", "hello")
        .child(element("b").build())
        .build();
    let output = evaluate(node.as_component().expect("component")).expect("evaluate");
    let div = output.as_element().expect("div");
    assert_eq!(div.children().len(), 2);
    assert_eq!(div.children()[1].as_element().map(|e| e.tag()), Some("b"));
}

#[test]
fn render_counter_starts_at_one() {
    let widget = Component::new(counted);
    let node = component(&widget).build();
    let output = evaluate(node.as_component().expect("component")).expect("evaluate");
    assert_eq!(expansion_text(output), "1");
}

#[test]
fn render_counter_continues_on_inherited_state() {
    let widget = Component::new(counted);
    let first = component(&widget).build();
    let second = component(&widget).build();
    let first_node = first.as_component().expect("component");
    let second_node = second.as_component().expect("component");

    assert_eq!(expansion_text(evaluate(first_node).expect("evaluate")), "1");
    second_node.inherit_state(first_node);
    assert_eq!(expansion_text(evaluate(second_node).expect("evaluate")), "2");
}

#[test]
fn inheriting_state_leaves_the_previous_node_untouched() {
    let widget = Component::new(counted);
    let first = component(&widget).build();
    let first_node = first.as_component().expect("component");
    evaluate(first_node).expect("evaluate");

    for _ in 0..2 {
        let retry = component(&widget).build();
        let retry_node = retry.as_component().expect("component");
        retry_node.inherit_state(first_node);
        assert_eq!(expansion_text(evaluate(retry_node).expect("evaluate")), "2");
    }
}

#[test]
fn fresh_node_without_inherited_state_resets() {
    let widget = Component::new(counted);
    let first = component(&widget).build();
    let second = component(&widget).build();
    evaluate(first.as_component().expect("component")).expect("evaluate");
    let output = evaluate(second.as_component().expect("component")).expect("evaluate");
    assert_eq!(expansion_text(output), "1");
}

#[test]
fn state_slot_rejects_a_different_type() {
    let confused = Component::new(|_props: &Props, scope: &Scope<'_>| {
        scope.render_counter()?;
        let label = scope.state(|| String::from("oops"))?;
        Ok(Node::from(label.get()))
    })
    .named("Confused");
    let node = component(&confused).build();
    let err = evaluate(node.as_component().expect("component")).expect_err("type mismatch");
    match err {
        RenderError::Component { component, source } => {
            assert_eq!(component, "Confused");
            let state_error = source.downcast_ref::<StateError>().expect("state error");
            assert!(matches!(state_error, StateError::TypeMismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_component_is_not_cached() {
    let attempts = Rc::new(Cell::new(0));
    let seen = Rc::clone(&attempts);
    let flaky = Component::new(move |_props: &Props, _scope: &Scope<'_>| {
        seen.set(seen.get() + 1);
        if seen.get() == 1 {
            anyhow::bail!("first call fails");
        }
        Ok(Node::from("ok"))
    });
    let node = component(&flaky).build();
    let component_node = node.as_component().expect("component");

    assert!(evaluate(component_node).is_err());
    assert!(matches!(component_node.expansion(), Expansion::Unevaluated));
    assert!(evaluate(component_node).is_ok());
    assert_eq!(attempts.get(), 2);
}

#[test]
fn same_function_keeps_component_identity() {
    let a = Component::new(counted);
    let b = Component::new(counted);
    let other = Component::new(|_props: &Props, _scope: &Scope<'_>| Ok(Node::Empty));
    assert!(a.same_type(&b));
    assert!(!a.same_type(&other));
    assert_eq!(a.name(), "counted");
}

fn alpha(_props: &Props, _scope: &Scope<'_>) -> anyhow::Result<Node> {
    Ok(element("alpha").build())
}

fn beta(_props: &Props, _scope: &Scope<'_>) -> anyhow::Result<Node> {
    Ok(element("beta").child("b").build())
}

#[test]
fn function_pointers_are_told_apart_by_address() {
    let table: [fn(&Props, &Scope<'_>) -> anyhow::Result<Node>; 2] = [alpha, beta];
    let a = Component::new(table[0]);
    let b = Component::new(table[1]);
    assert!(!a.same_type(&b));
    assert!(a.same_type(&Component::new(table[0])));
}
