//! Example: Print the token stream of XML read from stdin.
//!
//! Run with: cargo run --example stdin_tokens < file.xml
//! Pass `--keep-whitespace` to see whitespace-only text runs.

use std::io::Read;
use std::process::ExitCode;

use tagstream_core::{ParseOptions, TagCategory, TokenKind, Tokenizer};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let keep_whitespace = std::env::args().any(|a| a == "--keep-whitespace");
    let options = ParseOptions::new().skip_whitespace(!keep_whitespace);

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("reading stdin: {}", err);
        return ExitCode::FAILURE;
    }
    let chars: Vec<char> = input.chars().collect();

    for token in Tokenizer::with_options(chars, options) {
        match token {
            Ok(token) => {
                let label = match (token.kind, token.tag) {
                    (TokenKind::Text, _) => "text",
                    (_, TagCategory::Comment) => "comment",
                    (_, TagCategory::Cdata) => "cdata",
                    (_, TagCategory::Declaration) => "decl",
                    (TokenKind::TagOpen, _) => "open",
                    (TokenKind::TagClose, _) => "close",
                    (TokenKind::TagSelfClose, _) => "empty",
                };
                print!("{:>5}..{:<5} {:<7} {:?}", token.start, token.end, label, token.text());
                for attr in &token.attributes {
                    print!(" {}={:?}", attr.key_str(), attr.value_str());
                }
                println!();
            }
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
