//! Simple inspector for yEd XGML files.

use std::process;

use xgml::{BuildOptions, Document, NodeRef, parse_file_with_options};
use xgml::validate::validate_graph_with_options;

fn describe_node(node: NodeRef<'_>) -> String {
    let first_line = node.label().line(0).unwrap_or("");
    let mut s = format!("[{}] id={} {:?}", node.index(), node.original_id(), first_line);
    if node.is_group() {
        s.push_str(&format!(" group({} members)", node.num_children()));
    }
    if let Some(group) = node.group() {
        s.push_str(&format!(" in [{}]", group.index()));
    }
    s
}

fn print_document(doc: &Document) {
    let graph = doc.graph();

    println!("\n=== Document ===");
    println!("Creator: {}", doc.creator());
    println!("Version: {}", doc.version());
    if !graph.label().is_empty() {
        println!("Label: {}", graph.label());
    }
    println!("Directed: {}, hierarchic: {}", graph.directed(), graph.hierarchic());

    println!("\n=== Nodes ({}) ===", graph.num_nodes());
    for node in graph.nodes() {
        println!("{}", describe_node(node));
        let mut tags: Vec<_> = node.label().tags().iter().collect();
        tags.sort();
        for (key, value) in tags {
            println!("      {} = {}", key, value);
        }
    }

    println!("\n=== Edges ({}) ===", graph.num_edges());
    for edge in graph.edges() {
        println!(
            "[{}] [{}] -> [{}] {} {:?}",
            edge.index(),
            edge.src().index(),
            edge.dst().index(),
            edge.color(),
            edge.label().text()
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inspect_file <file.xgml> [--permissive]");
        process::exit(2);
    };
    let options = if args.any(|a| a == "--permissive") {
        BuildOptions::permissive()
    } else {
        BuildOptions::default()
    };

    println!("Reading: {}", path);
    let doc = match parse_file_with_options(&path, options) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("error {}: {}", err.code().code(), err);
            process::exit(1);
        }
    };

    if let Err(err) = validate_graph_with_options(doc.graph(), &options) {
        eprintln!("invariant violated: {}", err);
        process::exit(1);
    }

    print_document(&doc);
}
