use crate::session::answer::{UserAnswer, correct_count};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    Strong,
    Passing,
    Weak,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of correct answers, rounded to two decimals. An empty ledger
/// scores zero.
pub fn compute_score(answers: &[UserAnswer]) -> f64 {
    score_percent(correct_count(answers), answers.len())
}

pub fn score_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(correct as f64 / total as f64 * 100.0)
}

pub fn grade(score: f64) -> Grade {
    if score >= 80.0 {
        Grade::Strong
    } else if score >= 50.0 {
        Grade::Passing
    } else {
        Grade::Weak
    }
}
