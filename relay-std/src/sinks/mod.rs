//! Standard sinks.
//!
//! - [`LarkSink`]: posts a push summary to Lark bot webhooks
//! - [`BytebaseIssueSink`]: opens Bytebase issues for merged migration files
//!
//! Both sinks keep going after a partial failure and report every failure
//! they hit as one [`PartialFailure`].

mod bytebase;
mod lark;

pub use bytebase::{BytebaseIssueSink, BytebaseSinkConfig};
pub use lark::{LarkSink, render_push};

use std::fmt;

/// Failures of individual deliveries inside one sink invocation.
#[derive(Debug, Default)]
pub struct PartialFailure {
    failures: Vec<String>,
}

impl PartialFailure {
    /// Record one failed delivery.
    pub fn push(&mut self, failure: impl Into<String>) {
        self.failures.push(failure.into());
    }

    /// The recorded failures, in order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), PartialFailure> {
        if self.failures.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.failures.join("; "))
    }
}

impl std::error::Error for PartialFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_joins_entries() {
        let mut failures = PartialFailure::default();
        assert!(PartialFailure::default().into_result().is_ok());
        failures.push("a");
        failures.push("b");
        assert_eq!(failures.failures().len(), 2);
        assert_eq!(failures.into_result().unwrap_err().to_string(), "a; b");
    }
}
