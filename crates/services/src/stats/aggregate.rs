use serde::Serialize;

use quiz_core::model::{Attempt, rounded_percentage};

/// Totals folded over the attempt history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub total_attempts: usize,
    pub questions_answered: usize,
    pub correct_answers: usize,
    /// Mean attempt score, rounded half-up.
    pub average_score: u32,
    pub best_score: u32,
    /// Share of all answered questions that were correct.
    pub accuracy: u32,
    pub total_seconds: u64,
}

/// Fold the history into totals. An empty history yields all zeros.
#[must_use]
pub fn aggregate_stats(history: &[Attempt]) -> AggregateStats {
    let mut stats = AggregateStats::default();
    let mut score_sum = 0_u64;

    for attempt in history {
        stats.total_attempts += 1;
        stats.questions_answered += attempt.question_count();
        stats.correct_answers += usize::try_from(attempt.correct_count()).unwrap_or(usize::MAX);
        stats.best_score = stats.best_score.max(attempt.score_percentage());
        stats.total_seconds = stats.total_seconds.saturating_add(attempt.total_seconds());
        score_sum += u64::from(attempt.score_percentage());
    }

    stats.average_score = rounded_mean(score_sum, stats.total_attempts);
    stats.accuracy = rounded_percentage(
        u64::try_from(stats.correct_answers).unwrap_or(u64::MAX),
        u64::try_from(stats.questions_answered).unwrap_or(u64::MAX),
    );
    stats
}

fn rounded_mean(sum: u64, count: usize) -> u32 {
    let count = u64::try_from(count).unwrap_or(u64::MAX);
    if count == 0 {
        return 0;
    }
    u32::try_from((2 * sum + count) / (2 * count)).unwrap_or(u32::MAX)
}

/// Count consecutive most-recent attempts scoring at least `pass_threshold`.
///
/// Attempts are ordered by `ended_at`; ties keep history order, so the later
/// entry counts as more recent.
#[must_use]
pub fn compute_streak(history: &[Attempt], pass_threshold: u32) -> usize {
    let mut ordered: Vec<(usize, &Attempt)> = history.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| b.ended_at().cmp(&a.ended_at()).then(ib.cmp(ia)));

    ordered
        .into_iter()
        .take_while(|(_, attempt)| attempt.passed(pass_threshold))
        .count()
}
