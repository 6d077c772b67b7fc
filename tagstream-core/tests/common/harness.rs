//! Test harness for running fixtures with stochastic variations

use crate::common::{ExpectedToken, Gen, TestCase};
use tagstream_core::{tokenize, Error, ErrorKind, TagCategory, Token, TokenKind};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Route `tracing` output through the test writer; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Tokenize with default options, keeping the terminal error if any
pub fn collect_tokens(input: &str) -> Vec<Result<Token, Error>> {
    tokenize(input).collect()
}

/// Format a token for comparison (no spans)
pub fn format_token(token: &Token) -> String {
    let label = match (token.kind, token.tag) {
        (TokenKind::Text, _) => "Text",
        (_, TagCategory::Comment) => "Comment",
        (_, TagCategory::Cdata) => "Cdata",
        (_, TagCategory::Declaration) => "Decl",
        (TokenKind::TagOpen, _) => "Open",
        (TokenKind::TagClose, _) => "Close",
        (TokenKind::TagSelfClose, _) => "Empty",
    };
    let mut out = format!("{} {:?}", label, token.text());
    for attr in &token.attributes {
        out.push_str(&format!(" {}={:?}", attr.key_str(), attr.value_str()));
    }
    out
}

/// Format an error by variant only
pub fn format_error(err: &Error) -> String {
    let name = match err {
        Error::Syntax(e) => match e.kind {
            ErrorKind::InvalidCodepoint(_) => "InvalidCodepoint",
            ErrorKind::UnexpectedChar => "UnexpectedChar",
            ErrorKind::MalformedMarkup => "MalformedMarkup",
            ErrorKind::DeclarationEndOnElement => "DeclarationEndOnElement",
            ErrorKind::ExpectedEquals => "ExpectedEquals",
            ErrorKind::ExpectedQuote => "ExpectedQuote",
            ErrorKind::UnknownEntity(_) => "UnknownEntity",
            ErrorKind::UnexpectedEof => "UnexpectedEof",
        },
        Error::TagMismatch { .. } => "TagMismatch",
        Error::InvalidInput { .. } => "InvalidInput",
        Error::NestingTooDeep { .. } => "NestingTooDeep",
    };
    format!("Error {:?}", name)
}

pub fn format_result(result: &Result<Token, Error>) -> String {
    match result {
        Ok(token) => format_token(token),
        Err(err) => format_error(err),
    }
}

/// Format expected token for comparison
fn format_expected(token: &ExpectedToken) -> String {
    match token {
        ExpectedToken::WithContent(kind, content) => format!("{} {:?}", kind, content),
        ExpectedToken::WithAttributes(kind, content, attributes) => {
            let mut out = format!("{} {:?}", kind, content);
            for (key, value) in attributes {
                out.push_str(&format!(" {}={:?}", key, value));
            }
            out
        }
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual: Vec<String> = collect_tokens(&case.xml).iter().map(format_result).collect();
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Token count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Token {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input: case.xml.clone(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - Random parent element around the case
/// - 40% chance of sibling markup before
/// - Random whitespace before the case
/// - 40% chance of sibling markup after
///
/// Cases that end in an error only get context before them: anything
/// appended could turn an end-of-input error into a different one.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let ends_in_error = case.tokens.last().is_some_and(ExpectedToken::is_error);
    let parent = gen.name();
    let mut input = String::new();

    input.push_str(&format!("<{}>", parent));
    if gen.chance(0.4) {
        input.push_str(&gen.xml_fragment(2));
    }
    input.push_str(&gen.whitespace());

    input.push_str(&case.xml);

    // Appended markup starts right at `<` so a trailing text run keeps its
    // exact content.
    if !ends_in_error {
        if gen.chance(0.4) {
            input.push_str(&gen.xml_fragment(2));
        }
        input.push_str(&format!("</{}>", parent));
    }

    let actual: Vec<String> = collect_tokens(&input).iter().map(format_result).collect();
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    // Expected tokens must appear in order (subsequence match); the
    // wrapping context contributes tokens of its own.
    let mut errors = Vec::new();
    let mut exp_idx = 0;

    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }

    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected tokens starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    for act in &actual {
        if act.starts_with("Error") && !ends_in_error {
            errors.push(format!("Unexpected error: {}", act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set TAGSTREAM_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", self.input);
        eprintln!("\nExpected tokens:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual tokens:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
