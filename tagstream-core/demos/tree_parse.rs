//! Example: Parse XML to a tree and navigate it.
//!
//! Run with: cargo run --example tree_parse
//! Set RUST_LOG=tagstream_core=trace to watch the tokenizer.

use tagstream_core::{parse, Element, Node};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input = r#"<?xml version="1.0"?>
<article id="intro" class="featured">
  <meta author="Joseph Wecker" date="2025-12-22"/>
  <heading>Welcome to tagstream</heading>
  <!-- prose and structure side by side -->
  <section>
    <p>First paragraph with <em>emphasis</em> &amp; <strong>bold</strong>.</p>
    <p>Second paragraph.</p>
    <code><![CDATA[if a < b { swap(a, b) }]]></code>
  </section>
</article>
"#;

    let nodes = match parse(input) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("parse failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("=== Document Tree ===\n");
    for node in &nodes {
        print_node(node, 0);
    }

    println!("\n=== Element Details ===\n");
    for el in nodes.iter().filter_map(Node::as_element) {
        print_details(el);
        if let Some(section) = el.find("section") {
            for p in section.children().filter(|n| n.as_element().is_some_and(|e| e.name == "p")) {
                println!("  paragraph: {:?}", p.all_text());
            }
        }
    }
}

fn print_details(el: &Element) {
    let kind = if el.is_declaration() { "Declaration" } else { "Element" };
    println!("{}: {}", kind, el.name);
    for (name, value) in el.attrs() {
        println!("  {} = {:?}", name, value);
    }
    println!();
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);

    match node {
        Node::Element(el) => {
            let mut desc = el.name.clone();
            for (name, value) in el.attrs() {
                desc.push_str(&format!(" {}={:?}", name, value));
            }
            if el.is_declaration() {
                println!("{}<?{}?>", indent, desc);
            } else if el.is_self_closing() {
                println!("{}<{}/>", indent, desc);
            } else {
                println!("{}<{}>", indent, desc);
                for child in el.children() {
                    print_node(child, depth + 1);
                }
            }
        }
        Node::Text(s) => {
            let text = s.trim();
            if text.chars().count() > 40 {
                let head: String = text.chars().take(40).collect();
                println!("{}\"{}...\"", indent, head);
            } else {
                println!("{}\"{}\"", indent, text);
            }
        }
        Node::Cdata(s) => println!("{}[CDATA {:?}]", indent, s),
        Node::Comment(s) => println!("{}<!-- {} -->", indent, s.trim()),
    }
}
