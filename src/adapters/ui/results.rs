//! Result view: one score gauge plus the four feedback panels.

use super::panel::FeedbackPanel;
use crate::domain::AnalysisResult;

/// Panel titles in display order.
pub const PANEL_TITLES: [&str; 4] = [
    "Strengths",
    "Weaknesses",
    "Missing Skills",
    "Improvement Suggestions",
];

/// Everything the terminal shows for a stored result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Target handed to the gauge animator.
    pub score_target: i64,
    pub panels: [FeedbackPanel; 4],
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let [strengths, weaknesses, missing, suggestions] = PANEL_TITLES;
        Self {
            score_target: result.ats_score,
            panels: [
                FeedbackPanel::new(strengths, result.strengths.clone()),
                FeedbackPanel::new(weaknesses, result.weaknesses.clone()),
                FeedbackPanel::new(missing, result.missing_skills.clone()),
                FeedbackPanel::new(suggestions, result.improvement_suggestions.clone()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fans_out_categories() {
        let result = AnalysisResult {
            ats_score: 140,
            strengths: vec!["S".into()],
            weaknesses: vec!["W1".into(), "W2".into()],
            missing_skills: vec![],
            improvement_suggestions: vec!["I".into()],
        };
        let view = ResultView::from_result(&result);

        assert_eq!(view.score_target, 140);
        let titles: Vec<&str> = view.panels.iter().map(|p| p.title()).collect();
        assert_eq!(titles, PANEL_TITLES);
        assert_eq!(view.panels[1].items(), ["W1", "W2"]);
        assert!(view.panels[2].is_empty());
    }
}
