//! Analysis session state machine.
//!
//! One session owns the current claim sequence and allows at most one
//! extraction in flight. A new request clears previously held claims, and
//! the session returns to idle whether the call succeeds or fails. There
//! is no way to abort a call once issued; a future dropped mid-flight
//! leaves the session rejecting further requests.

use crate::analysis::{self, ClaimStats};
use crate::extractor::{ClaimExtractor, ExtractError};
use crate::models::Claim;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the session boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An extraction is already in flight for this session.
    #[error("an analysis is already in progress")]
    Busy,

    /// The extraction itself failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Session state: idle or one extraction in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InFlight,
}

/// A single-user analysis session.
pub struct AnalysisSession {
    extractor: ClaimExtractor,
    state: SessionState,
    claims: Vec<Claim>,
}

impl AnalysisSession {
    /// Create an idle session around an extraction client.
    pub fn new(extractor: ClaimExtractor) -> Self {
        Self {
            extractor,
            state: SessionState::Idle,
            claims: Vec::new(),
        }
    }

    /// Current session state.
    #[allow(dead_code)] // Utility for embedding callers
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Claims from the last successful analysis, in display order
    /// (significance descending, ties in arrival order).
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Statistics over the held claims, or `None` when there are none
    /// (the dashboard is suppressed for zero claims).
    pub fn stats(&self) -> Option<ClaimStats> {
        if self.claims.is_empty() {
            None
        } else {
            Some(analysis::summarize(&self.claims))
        }
    }

    /// Analyze the given text, replacing any previously held claims.
    ///
    /// Rejects the call with [`SessionError::Busy`] if an extraction is
    /// already in flight. A failed extraction leaves the session holding
    /// zero claims.
    pub async fn analyze(&mut self, text: &str) -> Result<&[Claim], SessionError> {
        if self.state == SessionState::InFlight {
            warn!("Rejecting analyze call: session busy");
            return Err(SessionError::Busy);
        }

        self.state = SessionState::InFlight;
        self.claims.clear();

        let result = self.extractor.extract(text).await;
        self.state = SessionState::Idle;

        match result {
            Ok(mut claims) => {
                analysis::sort_by_significance(&mut claims);
                info!("Session holds {} claims", claims.len());
                self.claims = claims;
                Ok(&self.claims)
            }
            Err(e) => Err(SessionError::Extract(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::client::GenerateRequest;
    use crate::extractor::{ExtractorConfig, ModelTransport};
    use async_trait::async_trait;
    use futures::FutureExt;

    struct FixedTransport {
        payload: Result<String, String>,
    }

    #[async_trait]
    impl ModelTransport for FixedTransport {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String, ExtractError> {
            match &self.payload {
                Ok(p) => Ok(p.clone()),
                Err(m) => Err(ExtractError::Transport(m.clone())),
            }
        }
    }

    /// Transport that never resolves, for in-flight state tests.
    struct PendingTransport;

    #[async_trait]
    impl ModelTransport for PendingTransport {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String, ExtractError> {
            futures::future::pending().await
        }
    }

    fn session_with(transport: Box<dyn ModelTransport>) -> AnalysisSession {
        let config = ExtractorConfig {
            api_key: "test-key".to_string(),
            ..ExtractorConfig::default()
        };
        AnalysisSession::new(ClaimExtractor::new(config, transport))
    }

    const CLAIMS_3_9_5: &str = r#"[
        {"summary": "three", "category": "AI", "claim_type": "factual",
         "significance": 3, "entities": {}},
        {"summary": "nine", "category": "AI", "claim_type": "factual",
         "significance": 9, "entities": {}},
        {"summary": "five", "category": "AI", "claim_type": "factual",
         "significance": 5, "entities": {}}
    ]"#;

    #[tokio::test]
    async fn test_analyze_sorts_by_significance() {
        let mut session = session_with(Box::new(FixedTransport {
            payload: Ok(CLAIMS_3_9_5.to_string()),
        }));

        let claims = session.analyze("digest").await.unwrap();
        let order: Vec<&str> = claims.iter().map(|c| c.summary.as_str()).collect();
        assert_eq!(order, vec!["nine", "five", "three"]);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_failed_analysis_holds_zero_claims() {
        let mut session = session_with(Box::new(FixedTransport {
            payload: Ok(CLAIMS_3_9_5.to_string()),
        }));
        session.analyze("digest").await.unwrap();
        assert_eq!(session.claims().len(), 3);

        // Swap in a failing run: old claims must not survive.
        let mut failing = session_with(Box::new(FixedTransport {
            payload: Err("server error".to_string()),
        }));
        failing.claims = session.claims().to_vec();

        let err = failing.analyze("digest").await.unwrap_err();
        assert!(matches!(err, SessionError::Extract(_)));
        assert!(failing.claims().is_empty());
        assert_eq!(failing.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_session_recovers_after_failure() {
        let mut session = session_with(Box::new(FixedTransport {
            payload: Err("quota exceeded".to_string()),
        }));

        let err = session.analyze("digest").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));

        // Back to idle: a new attempt is permitted.
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.analyze("digest").await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_in_flight_call_leaves_session_busy() {
        let mut session = session_with(Box::new(PendingTransport));

        // Poll the call once, then drop it before it resolves.
        {
            let fut = session.analyze("digest");
            assert!(fut.now_or_never().is_none());
        }
        assert_eq!(session.state(), SessionState::InFlight);

        // No abort mechanism exists, so the session stays busy.
        let err = session.analyze("digest").await.unwrap_err();
        assert!(matches!(err, SessionError::Busy));
    }

    #[tokio::test]
    async fn test_stats_suppressed_for_empty_session() {
        let session = session_with(Box::new(FixedTransport {
            payload: Ok("[]".to_string()),
        }));
        assert!(session.stats().is_none());
    }

    #[tokio::test]
    async fn test_stats_reflect_held_claims() {
        let mut session = session_with(Box::new(FixedTransport {
            payload: Ok(CLAIMS_3_9_5.to_string()),
        }));
        session.analyze("digest").await.unwrap();

        let stats = session.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert!((stats.avg_significance - 17.0 / 3.0).abs() < 1e-9);
    }
}
