//! Fixture loading from YAML files

use serde::Deserialize;

use std::path::Path;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub xml: String,
    pub tokens: Vec<ExpectedToken>,
}

/// Expected token - `[Kind, content]` or `[Kind, content, [[key, value], ...]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedToken {
    WithContent(String, String),
    WithAttributes(String, String, Vec<(String, String)>),
}

impl ExpectedToken {
    pub fn kind(&self) -> &str {
        match self {
            ExpectedToken::WithContent(kind, _) => kind,
            ExpectedToken::WithAttributes(kind, _, _) => kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind() == "Error"
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
