use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Study,
    Exam,
}

impl QuizMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Study => "study",
            QuizMode::Exam => "exam",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizMode::Study => "Study",
            QuizMode::Exam => "Exam",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    /// Empty means every category.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    pub question_count: usize,
    /// Seconds.
    pub time_limit: u32,
}

impl QuizSettings {
    pub fn new(categories: BTreeSet<String>, question_count: usize, time_limit: u32) -> Self {
        Self {
            categories,
            question_count,
            time_limit,
        }
    }

    pub fn all_categories(question_count: usize, time_limit: u32) -> Self {
        Self::new(BTreeSet::new(), question_count, time_limit)
    }
}
