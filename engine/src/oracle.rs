//! The solving oracle seam and its stand-in implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tessera_types::settings::MockOracleSettings;
use tessera_types::{OracleVerdict, SolveRequest};

/// Oracle call future type alias.
pub type OracleFut = Pin<Box<dyn Future<Output = Result<OracleVerdict, OracleError>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle timed out after {}ms", elapsed.as_millis())]
    Timeout { elapsed: Duration },
    #[error("oracle rejected the request: {message}")]
    Rejected { message: String },
    #[error("oracle task failed: {message}")]
    Crashed { message: String },
}

/// External decision service: given visible candidates, picks indices to select.
///
/// Called at most once per solve attempt. The engine bounds the call with its
/// own timeout; implementations need not.
pub trait Oracle: Send + Sync {
    fn name(&self) -> &'static str;
    fn solve(&self, request: SolveRequest) -> OracleFut;
}

/// Oracle that answers with a fixed verdict after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockOracle {
    settings: MockOracleSettings,
}

impl MockOracle {
    #[must_use]
    pub fn new(settings: MockOracleSettings) -> Self {
        Self { settings }
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new(MockOracleSettings::default())
    }
}

impl Oracle for MockOracle {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn solve(&self, request: SolveRequest) -> OracleFut {
        let delay = self.settings.delay;
        let verdict = OracleVerdict {
            success: self.settings.success,
            selections: self.settings.selections.clone(),
        };
        tracing::debug!(
            candidates = request.len(),
            positions = request.positions.len(),
            "Mock oracle received request"
        );
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(verdict)
        })
    }
}
