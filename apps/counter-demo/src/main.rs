use std::env;
use std::thread;
use std::time::Duration;

use reakt_core::{
    component, element, Component, Handler, MemoryTree, Node, OutputTree, Props, Renderer, Scope,
};

const DEFAULT_TICKS: usize = 3;
const TICK_INTERVAL: Duration = Duration::from_millis(250);

fn greeting(props: &Props, scope: &Scope<'_>) -> anyhow::Result<Node> {
    let renders = scope.render_counter()?;
    let name = props.get_str("name").unwrap_or("world").to_owned();
    let on_key = Handler::new(|value| log::info!("key pressed: {value}"));
    Ok(element("div")
        .attr("style", "color: red")
        .child(
            element("p")
                .child("Hello ")
                .child(element("strong").child(name))
                .child(element("input").attr("type", "text").attr("onkeydown", on_key)),
        )
        .child(element("small").child(renders))
        .build())
}

fn app(_props: &Props, _scope: &Scope<'_>) -> anyhow::Result<Node> {
    let greeting = Component::new(greeting);
    Ok(element("div")
        .child(component(&greeting).prop("name", "world"))
        .child(component(&greeting).prop("name", "reakt"))
        .build())
}

fn ticks_from_env() -> usize {
    match env::var("REAKT_TICKS") {
        Ok(raw) => raw.parse().unwrap_or_else(|err| {
            log::warn!("ignoring REAKT_TICKS={raw:?}: {err}");
            DEFAULT_TICKS
        }),
        Err(_) => DEFAULT_TICKS,
    }
}

fn first_input(tree: &MemoryTree, id: usize) -> Option<usize> {
    if tree.tag(id) == Some("input") {
        return Some(id);
    }
    tree.children(id)
        .iter()
        .find_map(|child| first_input(tree, *child))
}

fn main() {
    env_logger::init();

    let ticks = ticks_from_env();
    println!("=== reakt counter demo ===");
    println!("Rendering {ticks} timer ticks into an in-memory tree.");
    println!();

    let mut tree = MemoryTree::new();
    let root = tree.root();
    let mut renderer = Renderer::new();

    for tick in 1..=ticks {
        tree.reset_counts();
        let next = component(&Component::new(app)).build();
        if let Err(err) = renderer.render(next, &mut tree, root) {
            log::error!("render failed: {err:#}");
            return;
        }
        let counts = tree.counts();
        println!(
            "tick {tick}: {} text writes, {} structural changes, {} live nodes",
            counts.text_writes,
            counts.structural(),
            tree.len()
        );
        println!("  {}", tree.inner_markup(root));
        thread::sleep(TICK_INTERVAL);
    }

    if let Some(input) = first_input(&tree, root) {
        match tree.dispatch(input, "onkeydown", "a") {
            Ok(true) => {}
            Ok(false) => log::warn!("input {input} has no key handler"),
            Err(err) => log::error!("dispatch failed: {err}"),
        }
    }

    println!();
    print!("{}", tree.dump_tree());
    println!("root has {} children", tree.child_count(root));
}
