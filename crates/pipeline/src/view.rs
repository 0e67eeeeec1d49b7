//! Derives the candidate list shown to the viewer.

use roster::Candidate;

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{CategoryFilter, SearchFilter};
use crate::traits::FilterCriteria;

/// Turns a roster plus viewer criteria into the display list.
///
/// ## Algorithm
/// 1. A focused candidate (detail view) short-circuits everything else
/// 2. Category filter
/// 3. Search filter
/// 4. Stable sort, highest overall score first
///
/// Holds no state between calls, so it can be rerun on every change to the
/// roster or the criteria.
pub struct CandidateFilterEngine {
    pipeline: FilterPipeline,
}

impl CandidateFilterEngine {
    pub fn new() -> Self {
        Self {
            pipeline: FilterPipeline::new()
                .add_filter(CategoryFilter)
                .add_filter(SearchFilter),
        }
    }

    /// Compute the display list.
    ///
    /// # Arguments
    /// * `candidates` - The roster's candidates, in roster order
    /// * `criteria` - Search query and category selected by the viewer
    /// * `focused` - Candidate open in the detail view, if any
    pub fn filter(
        &self,
        candidates: &[Candidate],
        criteria: &FilterCriteria,
        focused: Option<&str>,
    ) -> Vec<Candidate> {
        if let Some(focused_id) = focused {
            return candidates
                .iter()
                .find(|c| c.id == focused_id)
                .cloned()
                .into_iter()
                .collect();
        }

        let mut visible = self.pipeline.apply(candidates.to_vec(), criteria);

        // sort_by is stable: equal scores keep roster order
        visible.sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));
        visible
    }
}

/// Sort key: the overall score, with NaN ranked below every real score.
fn rank_key(candidate: &Candidate) -> f32 {
    if candidate.overall_score.is_nan() {
        f32::NEG_INFINITY
    } else {
        candidate.overall_score
    }
}

impl Default for CandidateFilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Category;
    use roster::RequirementScore;

    fn scored(id: &str, name: &str, score: f32) -> Candidate {
        let mut candidate = Candidate::new(id, name);
        candidate.scores = vec![RequirementScore::new("req1", score)];
        candidate.overall_score = score;
        candidate
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_sorts_descending_by_overall_score() {
        let roster = vec![
            scored("low", "Low", 2.0),
            scored("high", "High", 9.0),
            scored("mid", "Mid", 5.5),
        ];

        let visible = CandidateFilterEngine::new().filter(&roster, &FilterCriteria::default(), None);

        assert_eq!(ids(&visible), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_scores_keep_roster_order() {
        let roster = vec![
            Candidate::new("a", "A"),
            scored("b", "B", 8.0),
            Candidate::new("c", "C"),
            Candidate::new("d", "D"),
        ];

        let visible = CandidateFilterEngine::new().filter(&roster, &FilterCriteria::default(), None);

        assert_eq!(ids(&visible), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_focused_candidate_ignores_criteria() {
        let roster = vec![scored("a", "Ada", 4.0), Candidate::new("b", "Bjarne")];
        let engine = CandidateFilterEngine::new();
        let criteria = FilterCriteria::new("ada", Category::Processed);

        let visible = engine.filter(&roster, &criteria, Some("b"));
        assert_eq!(ids(&visible), vec!["b"]);

        let visible = engine.filter(&roster, &criteria, Some("missing"));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let roster: Vec<Candidate> = (0..200)
            .map(|i| {
                if i % 7 == 0 {
                    let mut broken = scored(&format!("nan-{i}"), "NaN", 0.0);
                    broken.overall_score = f32::NAN;
                    broken
                } else {
                    scored(&format!("c-{i}"), "Scored", ((i * 37) % 101) as f32 / 10.0)
                }
            })
            .collect();

        let visible = CandidateFilterEngine::new().filter(&roster, &FilterCriteria::default(), None);
        assert_eq!(visible.len(), 200);

        let real: Vec<f32> = visible
            .iter()
            .map(|c| c.overall_score)
            .take_while(|s| !s.is_nan())
            .collect();
        assert_eq!(real.len(), 200 - 29);
        assert!(real.windows(2).all(|w| w[0] >= w[1]));
        assert!(visible[real.len()..].iter().all(|c| c.overall_score.is_nan()));

        // NaN entries keep roster order among themselves
        assert_eq!(visible[real.len()].id, "nan-0");
        assert_eq!(visible[real.len() + 1].id, "nan-7");
    }
}
