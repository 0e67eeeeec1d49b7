//! The scoring collaborator.
//!
//! The engine only needs the asynchronous contract: accept a job and a
//! candidate, eventually succeed or fail. How the score is produced and
//! persisted is the collaborator's business.

use std::sync::Arc;

use async_trait::async_trait;
use roster::{Assessment, RequirementScore, RosterStore};
use scoring_client::{ScoringClient, ScoringConfig};
use tracing::debug;

use crate::error::{Result, ScoringFailure};

/// Scores one candidate against a job and persists the outcome.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, job_id: &str, candidate_id: &str) -> std::result::Result<(), ScoringFailure>;
}

/// Scores through the AI scoring service and records the assessment in
/// the roster store.
pub struct RemoteScorer {
    client: ScoringClient,
    store: Arc<dyn RosterStore>,
}

impl RemoteScorer {
    pub fn new(client: ScoringClient, store: Arc<dyn RosterStore>) -> Self {
        Self { client, store }
    }

    /// Connect to the scoring service.
    pub async fn connect(config: ScoringConfig, store: Arc<dyn RosterStore>) -> Result<Self> {
        let client = ScoringClient::connect(config).await?;
        Ok(Self::new(client, store))
    }

    pub fn service_address(&self) -> &str {
        self.client.service_address()
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn score(&self, job_id: &str, candidate_id: &str) -> std::result::Result<(), ScoringFailure> {
        let response = self.client.score_candidate(job_id, candidate_id).await?;

        let assessment = Assessment {
            scores: response
                .scores
                .into_iter()
                .map(|s| RequirementScore::new(s.requirement, s.score))
                .collect(),
            strengths: response.strengths,
            weaknesses: response.weaknesses,
            summary: response.summary,
        };
        debug!(
            "Recording {} requirement scores for candidate {}",
            assessment.scores.len(),
            candidate_id
        );

        self.store
            .record_assessment(job_id, candidate_id, assessment)
            .await?;
        Ok(())
    }
}
