//! Derived analytics for a completed quiz session.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use quiz_core::QuestionBank;
use quiz_core::model::{
    Category, CategoryId, Difficulty, QuestionId, QuizSettings, rounded_percentage,
};
use quiz_core::time::elapsed_seconds;

use crate::error::ResultsError;
use crate::sessions::QuizSession;

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Score and points for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub correct_count: usize,
    pub total_questions: usize,
    pub score_percentage: u32,
    pub points_earned: u32,
    pub max_points: u32,
}

/// Accuracy for one free-text topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicBreakdown {
    pub topic: String,
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Accuracy for one difficulty tier. Tiers absent from the session report zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub difficulty: Difficulty,
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

/// One row of the post-quiz review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub selected_option: String,
    pub correct_option: String,
    pub is_correct: bool,
    pub explanation: String,
    pub time_spent_seconds: u64,
}

/// Heuristic advice, in the order it is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Recommendation {
    ReviewFundamentals,
    FocusOnTopics(Vec<String>),
    WorkOnSpeed,
    /// The tier above the category's own, or `None` when it is already the hardest.
    TryHarderDifficulty(Option<Difficulty>),
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReviewFundamentals => f.write_str(
                "Review the fundamentals of this category before moving on to new material.",
            ),
            Self::FocusOnTopics(topics) => {
                write!(f, "Focus on improving these topics: {}.", topics.join(", "))
            }
            Self::WorkOnSpeed => f.write_str(
                "You took longer than expected. Practice more to build speed and confidence.",
            ),
            Self::TryHarderDifficulty(Some(next)) => {
                write!(f, "Great performance! Try {next} material to keep challenging yourself.")
            }
            Self::TryHarderDifficulty(None) => {
                f.write_str("Great performance! Try a harder difficulty to keep challenging yourself.")
            }
        }
    }
}

/// Full analytics for one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Results {
    pub category_id: CategoryId,
    pub category_title: String,
    pub score: ScoreSummary,
    /// Wall-clock time from start to completion.
    pub total_seconds: u64,
    /// Sum of per-question answer times. Each is measured from when the question
    /// was presented: the previous answer, or a later `mark_presented` call.
    /// Equals `total_seconds` unless the host marks questions as presented.
    pub answered_seconds: u64,
    pub average_seconds_per_question: u64,
    pub topic_breakdown: Vec<TopicBreakdown>,
    pub difficulty_breakdown: Vec<DifficultyBreakdown>,
    pub strong_areas: Vec<String>,
    pub weak_areas: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub review: Vec<QuestionReview>,
}

impl Results {
    #[must_use]
    pub fn score_percentage(&self) -> u32 {
        self.score.score_percentage
    }

    /// Recommendations rendered as display strings.
    #[must_use]
    pub fn recommendation_messages(&self) -> Vec<String> {
        self.recommendations.iter().map(ToString::to_string).collect()
    }
}

//
// ─── CALCULATION ───────────────────────────────────────────────────────────────
//

/// Derive results from a completed session.
///
/// Pure: identical inputs always yield identical output.
///
/// # Errors
///
/// Returns `ResultsError::SessionIncomplete` if questions remain unanswered, or
/// `ResultsError::CategoryMismatch` if the session's category is not in `bank`.
pub fn calculate_results(
    session: &QuizSession,
    bank: &QuestionBank,
    settings: &QuizSettings,
) -> Result<Results, ResultsError> {
    let completed_at = session
        .completed_at()
        .ok_or(ResultsError::SessionIncomplete)?;
    let category = bank
        .category(session.category_id())
        .ok_or_else(|| ResultsError::CategoryMismatch(session.category_id().clone()))?;

    let mut score = ScoreSummary {
        correct_count: 0,
        total_questions: session.total_questions(),
        score_percentage: 0,
        points_earned: 0,
        max_points: 0,
    };
    let mut topics = TopicTally::default();
    let mut tiers = Difficulty::ALL.map(|difficulty| DifficultyBreakdown {
        difficulty,
        correct: 0,
        total: 0,
        percentage: 0,
    });
    let mut answered_seconds = 0_u64;
    let mut review = Vec::with_capacity(session.total_questions());

    for (question, answer) in session.questions().iter().zip(session.answers()) {
        let is_correct = answer.is_correct();
        score.max_points = score.max_points.saturating_add(question.points());
        if is_correct {
            score.correct_count += 1;
            score.points_earned = score.points_earned.saturating_add(question.points());
        }
        answered_seconds = answered_seconds.saturating_add(answer.time_spent_seconds());

        topics.record(question.topic(), is_correct);
        if let Some(tier) = tiers.iter_mut().find(|t| t.difficulty == question.difficulty()) {
            tier.total += 1;
            tier.correct += usize::from(is_correct);
        }

        review.push(QuestionReview {
            question_id: question.id().clone(),
            prompt: question.prompt().to_owned(),
            selected_option: question
                .option(answer.selected_option_index())
                .unwrap_or_default()
                .to_owned(),
            correct_option: question.correct_option().to_owned(),
            is_correct,
            explanation: question.explanation().to_owned(),
            time_spent_seconds: answer.time_spent_seconds(),
        });
    }

    score.score_percentage = percentage(score.correct_count, score.total_questions);
    for tier in &mut tiers {
        tier.percentage = percentage(tier.correct, tier.total);
    }
    let topic_breakdown = topics.finish();

    let strong_areas: Vec<String> = topic_breakdown
        .iter()
        .filter(|t| t.percentage >= settings.strong_area_threshold())
        .map(|t| t.topic.clone())
        .collect();
    let weak_areas: Vec<String> = topic_breakdown
        .iter()
        .filter(|t| t.percentage < settings.weak_area_threshold())
        .map(|t| t.topic.clone())
        .collect();

    let total_seconds = elapsed_seconds(session.started_at(), completed_at);
    let recommendations = recommend(
        score.score_percentage,
        &weak_areas,
        total_seconds,
        category,
        settings,
    );

    let answered = u64::try_from(session.answers().len()).unwrap_or(u64::MAX).max(1);

    Ok(Results {
        category_id: category.id().clone(),
        category_title: category.title().to_owned(),
        score,
        total_seconds,
        answered_seconds,
        average_seconds_per_question: answered_seconds / answered,
        topic_breakdown,
        difficulty_breakdown: tiers.to_vec(),
        strong_areas,
        weak_areas,
        recommendations,
        review,
    })
}

fn recommend(
    score_percentage: u32,
    weak_areas: &[String],
    total_seconds: u64,
    category: &Category,
    settings: &QuizSettings,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if score_percentage < settings.weak_area_threshold() {
        out.push(Recommendation::ReviewFundamentals);
    }
    if !weak_areas.is_empty() {
        out.push(Recommendation::FocusOnTopics(weak_areas.to_vec()));
    }
    if is_slow(total_seconds, category.estimated_minutes(), settings.slow_pace_factor()) {
        out.push(Recommendation::WorkOnSpeed);
    }
    if score_percentage >= settings.mastery_threshold() {
        out.push(Recommendation::TryHarderDifficulty(category.difficulty().harder()));
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn is_slow(total_seconds: u64, estimated_minutes: u32, pace_factor: f64) -> bool {
    let budget = f64::from(estimated_minutes) * 60.0 * pace_factor;
    total_seconds as f64 > budget
}

fn percentage(part: usize, whole: usize) -> u32 {
    let part = u64::try_from(part).unwrap_or(u64::MAX);
    let whole = u64::try_from(whole).unwrap_or(u64::MAX);
    rounded_percentage(part, whole)
}

/// Groups topics in order of first appearance.
#[derive(Default)]
struct TopicTally {
    rows: Vec<TopicBreakdown>,
    index: HashMap<String, usize>,
}

impl TopicTally {
    fn record(&mut self, topic: &str, is_correct: bool) {
        let slot = match self.index.get(topic) {
            Some(&slot) => slot,
            None => {
                self.rows.push(TopicBreakdown {
                    topic: topic.to_owned(),
                    correct: 0,
                    total: 0,
                    percentage: 0,
                });
                self.index.insert(topic.to_owned(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        let row = &mut self.rows[slot];
        row.total += 1;
        row.correct += usize::from(is_correct);
    }

    fn finish(mut self) -> Vec<TopicBreakdown> {
        for row in &mut self.rows {
            row.percentage = percentage(row.correct, row.total);
        }
        self.rows
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
