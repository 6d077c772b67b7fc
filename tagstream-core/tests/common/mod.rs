//! Test infrastructure for the tagstream tokenizer
//!
//! Provides fixture loading, stochastic context wrapping, and token
//! formatting helpers shared by the integration tests.

#![allow(dead_code)]

mod loader;
mod harness;
mod generators;

#[allow(unused_imports)]
pub use loader::{TestCase, ExpectedToken, load_fixtures_by_name};
#[allow(unused_imports)]
pub use harness::{
    collect_tokens, format_error, format_result, format_token, init_tracing, run_test,
    run_with_variations,
};
#[allow(unused_imports)]
pub use generators::Gen;
