//! Unique identifiers for end-to-end test runs
//!
//! Suites run against a shared live backend, so every entity a test creates
//! (usernames, club titles, team slugs) carries a per-run identifier. The
//! identifier also travels as the `x-test-id` request header so backend logs
//! can be correlated with the test that produced them.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Request header carrying the test identifier
pub const TEST_ID_HEADER: &str = "x-test-id";

/// Build a [`TestId`] for the calling source file
#[macro_export]
macro_rules! test_id {
    () => {
        $crate::testing::TestId::for_file(file!())
    };
}

/// `{yyMMdd-HHmmss}{4 random hex chars}{file name}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestId(String);

impl TestId {
    /// Identifier for a test defined in `path`
    pub fn for_file(path: &str) -> Self {
        Self::at(Local::now(), Uuid::new_v4(), path)
    }

    fn at(now: DateTime<Local>, nonce: Uuid, path: &str) -> Self {
        let file_name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        let nonce = nonce.simple().to_string();

        TestId(format!(
            "{}{}{}",
            now.format("%y%m%d-%H%M%S"),
            &nonce[..4],
            file_name
        ))
    }

    /// `{prefix}-{id}`, for names that must be unique per run
    pub fn prefixed(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
