//! Example: Pull item titles out of a feed without building a tree.
//!
//! Run with: cargo run --example walk_feed [path] [dotted.path]
//! Defaults to the bundled sample feed and `rss.channel.item.title`.

use std::ops::ControlFlow;
use std::process::ExitCode;

use tagstream_core::{ParseOptions, Tokenizer, WalkOutcome, Walker};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = include_str!("../benches/data/feed.xml");

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("{}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => SAMPLE.to_string(),
    };
    let wanted = args.next().unwrap_or_else(|| "rss.channel.item.title".to_string());

    let options = ParseOptions::default();
    let tokens = Tokenizer::with_options(input.chars().collect::<Vec<_>>(), options);

    let mut matches = 0;
    let outcome = Walker::new(options.max_depth).walk(tokens, |path, node, ancestors| {
        if path != wanted {
            return ControlFlow::Continue(());
        }
        let Some(text) = node.text() else {
            return ControlFlow::Continue(());
        };
        let id = ancestors
            .iter()
            .rev()
            .find_map(|open| open.attr("id"))
            .unwrap_or("-");
        println!("{:<6} {}", id, text.trim());
        matches += 1;
        ControlFlow::Continue(())
    });

    match outcome {
        Ok(WalkOutcome::Completed) | Ok(WalkOutcome::Stopped) => {
            eprintln!("{} match(es) for {}", matches, wanted);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
