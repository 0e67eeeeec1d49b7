//! Scoring client for the AI candidate-scoring gRPC service.
//!
//! This crate provides a Rust client for the service that reads a
//! candidate's resume against a job's weighted requirements. It handles:
//! - Connection management to the scoring service
//! - Building protobuf requests
//! - Attaching the API key as request metadata
//! - Validating the returned assessment
//!
//! The message types and the client stub are generated from
//! `proto/scoring.proto` at build time.
//!
//! No timeout and no retry policy are applied here. Each call is bounded
//! only by the service itself.

pub mod credentials;

use thiserror::Error;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::Channel;
use tracing::{debug, error, info};

pub use credentials::{CredentialStore, EnvCredentials, StaticCredentials};

// Include the generated protobuf code
pub mod screening {
    tonic::include_proto!("screening");
}

use screening::{
    candidate_scorer_client::CandidateScorerClient, ScoreCandidateRequest,
    ScoreCandidateResponse,
};

/// Errors that can occur when interacting with the scoring service
#[derive(Error, Debug)]
pub enum ScoringClientError {
    #[error("Failed to connect to scoring service: {0}")]
    ConnectionError(String),

    #[error("API key is not valid header text")]
    InvalidApiKey,

    #[error("Failed to score candidate: {0}")]
    ScoringError(String),

    #[error("Invalid response from scoring service: {0}")]
    InvalidResponse(String),
}

/// Where the scoring service lives and how to authenticate with it.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub addr: String,
    pub api_key: Option<String>,
}

impl ScoringConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            api_key: None,
        }
    }

    /// Take the API key from an injected credential store.
    pub fn with_credentials(mut self, credentials: &dyn CredentialStore) -> Self {
        self.api_key = credentials.api_key();
        self
    }
}

/// Client for the scoring service.
///
/// Cloning is cheap: clones share the underlying channel, so one client can
/// serve many concurrent scoring calls.
#[derive(Clone)]
pub struct ScoringClient {
    client: CandidateScorerClient<Channel>,
    service_addr: String,
    authorization: Option<AsciiMetadataValue>,
}

impl ScoringClient {
    /// Connect to the scoring service.
    ///
    /// # Arguments
    /// * `config` - Address (e.g., "http://localhost:50051") and optional API key
    ///
    /// # Returns
    /// A connected client ready to score candidates
    pub async fn connect(config: ScoringConfig) -> Result<Self, ScoringClientError> {
        let authorization = config
            .api_key
            .as_deref()
            .map(|key| {
                format!("Bearer {key}")
                    .parse::<AsciiMetadataValue>()
                    .map_err(|_| ScoringClientError::InvalidApiKey)
            })
            .transpose()?;

        info!("Connecting to scoring service at {}", config.addr);

        let channel = Channel::from_shared(config.addr.clone())
            .map_err(|e| ScoringClientError::ConnectionError(e.to_string()))?
            .connect()
            .await
            .map_err(|e| ScoringClientError::ConnectionError(e.to_string()))?;

        Ok(ScoringClient {
            client: CandidateScorerClient::new(channel),
            service_addr: config.addr,
            authorization,
        })
    }

    /// Score one candidate against a job.
    ///
    /// # Returns
    /// The service's assessment, guaranteed to carry at least one finite
    /// requirement score.
    pub async fn score_candidate(
        &self,
        job_id: &str,
        candidate_id: &str,
    ) -> Result<ScoreCandidateResponse, ScoringClientError> {
        debug!("Scoring candidate {} for job {}", candidate_id, job_id);

        let mut request = tonic::Request::new(ScoreCandidateRequest {
            job_id: job_id.to_string(),
            candidate_id: candidate_id.to_string(),
        });
        if let Some(value) = &self.authorization {
            request.metadata_mut().insert("authorization", value.clone());
        }

        // Clones share the channel; the generated stub needs `&mut self`
        let mut client = self.client.clone();
        let response = client
            .score_candidate(request)
            .await
            .map_err(|status| {
                error!(
                    "gRPC error while scoring candidate {}: {}",
                    candidate_id, status
                );
                ScoringClientError::ScoringError(status.message().to_string())
            })?
            .into_inner();

        validate_response(&response)?;
        Ok(response)
    }

    /// Get the address of the scoring service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

fn validate_response(response: &ScoreCandidateResponse) -> Result<(), ScoringClientError> {
    if response.scores.is_empty() {
        error!("Scoring service returned no requirement scores");
        return Err(ScoringClientError::InvalidResponse(
            "No requirement scores returned".into(),
        ));
    }
    if let Some(bad) = response.scores.iter().find(|s| !s.score.is_finite()) {
        return Err(ScoringClientError::InvalidResponse(format!(
            "Score for {} is not a number",
            bad.requirement
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn response(scores: Vec<screening::RequirementScore>) -> ScoreCandidateResponse {
        ScoreCandidateResponse {
            scores,
            strengths: vec!["Distributed systems".to_string()],
            weaknesses: vec![],
            summary: Some("Strong backend profile".to_string()),
        }
    }

    #[test]
    fn test_response_wire_format() {
        let original = response(vec![screening::RequirementScore {
            requirement: "Rust".to_string(),
            score: 8.5,
        }]);

        let bytes = original.encode_to_vec();
        let decoded = ScoreCandidateResponse::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_request_field_tags_match_contract() {
        let request = ScoreCandidateRequest {
            job_id: "job-1".to_string(),
            candidate_id: "c-7".to_string(),
        };

        // job_id = 1, candidate_id = 2, both length-delimited
        let mut expected = vec![0x0a, 5];
        expected.extend_from_slice(b"job-1");
        expected.extend_from_slice(&[0x12, 3]);
        expected.extend_from_slice(b"c-7");

        assert_eq!(request.encode_to_vec(), expected);
    }

    #[test]
    fn test_validate_response() {
        assert!(matches!(
            validate_response(&response(vec![])),
            Err(ScoringClientError::InvalidResponse(_))
        ));
        assert!(matches!(
            validate_response(&response(vec![screening::RequirementScore {
                requirement: "Rust".to_string(),
                score: f32::NAN,
            }])),
            Err(ScoringClientError::InvalidResponse(_))
        ));
        assert!(validate_response(&response(vec![screening::RequirementScore {
            requirement: "Rust".to_string(),
            score: 7.0,
        }]))
        .is_ok());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_address() {
        let result = ScoringClient::connect(ScoringConfig::new("not a uri")).await;
        assert!(matches!(result, Err(ScoringClientError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_unprintable_api_key() {
        let config = ScoringConfig::new("http://127.0.0.1:1")
            .with_credentials(&StaticCredentials::new("line\nbreak"));

        let result = ScoringClient::connect(config).await;
        assert!(matches!(result, Err(ScoringClientError::InvalidApiKey)));
    }

    #[tokio::test]
    #[ignore] // needs a running scoring service: cargo test -- --ignored
    async fn test_score_candidate_integration() {
        let client = ScoringClient::connect(ScoringConfig::new("http://localhost:50051"))
            .await
            .expect("Failed to connect");

        let response = client
            .score_candidate("job-1", "candidate-1")
            .await
            .expect("Failed to score");

        assert!(!response.scores.is_empty());
    }
}
