//! CV score — a fixed point rubric over the document, with improvement tips.

use serde::{Deserialize, Serialize};

use crate::models::CvDocument;

const PHOTO_POINTS: u32 = 15;
const SUMMARY_FULL_POINTS: u32 = 20;
const SUMMARY_PARTIAL_POINTS: u32 = 10;
/// Characters, not bytes.
const SUMMARY_MIN_CHARS: usize = 150;
const SKILLS_POINTS: u32 = 20;
const SKILLS_MIN: usize = 5;
const EXPERIENCE_POINTS: u32 = 25;
const EXPERIENCE_MIN: usize = 2;
const EDUCATION_POINTS: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// 0 – 100
    pub score: u32,
    pub tier: ScoreTier,
    /// Ordered by rubric line; the UI shows the first two.
    pub tips: Vec<String>,
}

pub fn compute_score(doc: &CvDocument) -> ScoreReport {
    let mut score = 0;
    let mut tips = Vec::new();

    if !doc.personal_info.photo.is_empty() {
        score += PHOTO_POINTS;
    } else {
        tips.push("Ajoutez une photo pour gagner 15 points.".to_string());
    }

    let summary_len = doc.personal_info.summary.chars().count();
    if summary_len > SUMMARY_MIN_CHARS {
        score += SUMMARY_FULL_POINTS;
    } else if summary_len > 0 {
        score += SUMMARY_PARTIAL_POINTS;
        tips.push("Développez votre résumé (min 150 caractères) pour +10 points.".to_string());
    } else {
        tips.push("Rédigez un résumé pour gagner 20 points.".to_string());
    }

    if doc.skills.len() >= SKILLS_MIN {
        score += SKILLS_POINTS;
    } else {
        tips.push("Listez au moins 5 compétences pour +20 points.".to_string());
    }

    if doc.experiences.len() >= EXPERIENCE_MIN {
        score += EXPERIENCE_POINTS;
    } else {
        tips.push("Ajoutez au moins 2 expériences professionnelles.".to_string());
    }

    if !doc.education.is_empty() {
        score += EDUCATION_POINTS;
    } else {
        tips.push("Ajoutez votre formation.".to_string());
    }

    let tier = match score {
        s if s > 70 => ScoreTier::Strong,
        s if s > 40 => ScoreTier::Moderate,
        _ => ScoreTier::Weak,
    };

    ScoreReport { score, tier, tips }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_scores_zero() {
        let report = compute_score(&CvDocument::default());
        assert_eq!(report.score, 0);
        assert_eq!(report.tier, ScoreTier::Weak);
        assert_eq!(report.tips.len(), 5);
        assert_eq!(report.tips[0], "Ajoutez une photo pour gagner 15 points.");
        assert_eq!(report.tips[1], "Rédigez un résumé pour gagner 20 points.");
    }

    #[test]
    fn test_sample_scores_partial_summary() {
        // sample summary is under 150 characters
        let report = compute_score(&CvDocument::sample());
        assert_eq!(report.score, 15 + 10 + 20 + 25 + 20);
        assert_eq!(report.tier, ScoreTier::Strong);
        assert_eq!(
            report.tips,
            vec!["Développez votre résumé (min 150 caractères) pour +10 points."]
        );
    }

    #[test]
    fn test_full_marks() {
        let mut doc = CvDocument::sample();
        doc.personal_info.summary = "é".repeat(151);
        let report = compute_score(&doc);
        assert_eq!(report.score, 100);
        assert!(report.tips.is_empty());
    }

    #[test]
    fn test_summary_counts_characters_not_bytes() {
        let mut doc = CvDocument::sample();
        // 100 chars but 200 bytes
        doc.personal_info.summary = "é".repeat(100);
        assert_eq!(compute_score(&doc).score, 90);
    }

    #[test]
    fn test_tier_boundaries() {
        let mut doc = CvDocument::default();
        doc.experiences = CvDocument::sample().experiences;
        doc.education = CvDocument::sample().education;
        // 25 + 20 = 45
        let report = compute_score(&doc);
        assert_eq!(report.score, 45);
        assert_eq!(report.tier, ScoreTier::Moderate);

        doc.education.clear();
        doc.personal_info.photo = "x".to_string();
        // 25 + 15 = 40
        assert_eq!(compute_score(&doc).tier, ScoreTier::Weak);
    }
}
