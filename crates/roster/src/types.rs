//! Core domain types for a job's candidate roster.
//!
//! A [`Roster`] is the full candidate collection for one [`Job`]. Candidates
//! start out unprocessed (no scores) and become processed once an
//! [`Assessment`] from the scoring service is applied to them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a job posting, as issued by the hosted store
pub type JobId = String;

/// Identifier of a candidate, unique within a roster
pub type CandidateId = String;

// =============================================================================
// Job-related Types
// =============================================================================

/// A weighted requirement the candidates are scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    /// Relative importance. Requirements not listed on the job weigh 1.0.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl Requirement {
    pub fn new(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// A job posting with the requirements its candidates are scored against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl Job {
    pub fn new(id: impl Into<JobId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            requirements: Vec::new(),
        }
    }

    /// Add a requirement (builder pattern).
    pub fn with_requirement(mut self, name: impl Into<String>, weight: f32) -> Self {
        self.requirements.push(Requirement::new(name, weight));
        self
    }

    /// Weight of a requirement by name (case-insensitive), 1.0 when unlisted.
    pub fn weight_of(&self, requirement: &str) -> f32 {
        self.requirements
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(requirement))
            .map(|r| r.weight)
            .unwrap_or(1.0)
    }

    /// Weighted average of requirement scores.
    ///
    /// ## Algorithm
    /// 1. Look up each score's requirement weight
    /// 2. Sum `score * weight` and `weight`
    /// 3. Divide, or return 0.0 when there is nothing to divide by
    pub fn weighted_score(&self, scores: &[RequirementScore]) -> f32 {
        let (weighted_sum, total_weight) =
            scores.iter().fold((0.0_f32, 0.0_f32), |(sum, weights), s| {
                let weight = self.weight_of(&s.requirement);
                (sum + s.score * weight, weights + weight)
            });

        if total_weight <= 0.0 {
            0.0
        } else {
            weighted_sum / total_weight
        }
    }
}

// =============================================================================
// Candidate-related Types
// =============================================================================

/// Score for a single requirement, on a 0-10 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementScore {
    pub requirement: String,
    pub score: f32,
}

impl RequirementScore {
    pub fn new(requirement: impl Into<String>, score: f32) -> Self {
        Self {
            requirement: requirement.into(),
            score,
        }
    }
}

/// Everything the scoring service says about one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub scores: Vec<RequirementScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A candidate uploaded against a job.
///
/// `scores` being empty means the candidate has not been processed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub scores: Vec<RequirementScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub is_starred: bool,
    /// Derived from `scores` and the job's requirement weights
    #[serde(default)]
    pub overall_score: f32,
}

impl Candidate {
    /// Create an unprocessed, unstarred candidate
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scores: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            summary: None,
            is_starred: false,
            overall_score: 0.0,
        }
    }

    pub fn is_processed(&self) -> bool {
        !self.scores.is_empty()
    }
}

// =============================================================================
// Roster
// =============================================================================

/// Ordered candidates belonging to one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub job: Job,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl Roster {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            candidates: Vec::new(),
        }
    }

    /// Add a candidate (builder pattern).
    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn job_id(&self) -> &str {
        &self.job.id
    }

    pub fn get(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    fn get_mut(&mut self, candidate_id: &str) -> Result<&mut Candidate> {
        self.candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| RosterError::CandidateNotFound {
                candidate_id: candidate_id.to_string(),
            })
    }

    /// Identifiers of unprocessed candidates, in roster order.
    pub fn unprocessed_ids(&self) -> Vec<CandidateId> {
        self.candidates
            .iter()
            .filter(|c| !c.is_processed())
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn processed_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_processed()).count()
    }

    /// Record an assessment and recompute the candidate's overall score.
    ///
    /// An assessment without scores would leave the candidate looking
    /// unprocessed, so it is refused.
    pub fn apply_assessment(&mut self, candidate_id: &str, assessment: Assessment) -> Result<()> {
        if assessment.scores.is_empty() {
            return Err(RosterError::EmptyAssessment {
                candidate_id: candidate_id.to_string(),
            });
        }

        let overall_score = self.job.weighted_score(&assessment.scores);
        let candidate = self.get_mut(candidate_id)?;
        candidate.scores = assessment.scores;
        candidate.strengths = assessment.strengths;
        candidate.weaknesses = assessment.weaknesses;
        candidate.summary = assessment.summary;
        candidate.overall_score = overall_score;
        Ok(())
    }

    pub fn set_starred(&mut self, candidate_id: &str, starred: bool) -> Result<()> {
        self.get_mut(candidate_id)?.is_starred = starred;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_roster() -> Roster {
        let job = Job::new("job-1", "Backend Engineer")
            .with_requirement("Rust", 3.0)
            .with_requirement("SQL", 1.0);

        Roster::new(job)
            .with_candidate(Candidate::new("a", "Ada Lovelace"))
            .with_candidate(Candidate::new("b", "Grace Hopper"))
    }

    #[test]
    fn test_weighted_score_uses_requirement_weights() {
        let roster = create_test_roster();
        let scores = vec![
            RequirementScore::new("rust", 8.0),
            RequirementScore::new("SQL", 4.0),
        ];

        // (8*3 + 4*1) / 4
        assert_eq!(roster.job.weighted_score(&scores), 7.0);
    }

    #[test]
    fn test_weighted_score_unlisted_requirement_weighs_one() {
        let job = Job::new("job-1", "Designer");
        let scores = vec![
            RequirementScore::new("Figma", 6.0),
            RequirementScore::new("Typography", 8.0),
        ];

        assert_eq!(job.weighted_score(&scores), 7.0);
        assert_eq!(job.weighted_score(&[]), 0.0);
    }

    #[test]
    fn test_apply_assessment_marks_candidate_processed() {
        let mut roster = create_test_roster();
        assert_eq!(roster.unprocessed_ids(), vec!["a", "b"]);

        roster
            .apply_assessment(
                "b",
                Assessment {
                    scores: vec![RequirementScore::new("Rust", 9.0)],
                    strengths: vec!["Compilers".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();

        let b = roster.get("b").unwrap();
        assert!(b.is_processed());
        assert_eq!(b.overall_score, 9.0);
        assert_eq!(b.strengths, vec!["Compilers"]);
        assert_eq!(roster.unprocessed_ids(), vec!["a"]);
        assert_eq!(roster.processed_count(), 1);
    }

    #[test]
    fn test_apply_empty_assessment_is_refused() {
        let mut roster = create_test_roster();

        let result = roster.apply_assessment("a", Assessment::default());

        assert!(matches!(result, Err(RosterError::EmptyAssessment { .. })));
        assert!(!roster.get("a").unwrap().is_processed());
    }

    #[test]
    fn test_unknown_candidate() {
        let mut roster = create_test_roster();

        assert!(matches!(
            roster.set_starred("zzz", true),
            Err(RosterError::CandidateNotFound { .. })
        ));
    }

    #[test]
    fn test_candidate_json_defaults() {
        let candidate: Candidate =
            serde_json::from_str(r#"{"id": "c", "name": "Linus"}"#).unwrap();

        assert!(!candidate.is_processed());
        assert!(!candidate.is_starred);
        assert_eq!(candidate.overall_score, 0.0);
    }
}
