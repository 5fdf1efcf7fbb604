use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::question::KnowledgeBase;
use crate::engine::scoring;
use crate::session::answer::{self, UserAnswer};
use crate::session::settings::{QuizMode, QuizSettings};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub knowledge_base_id: String,
    pub knowledge_base_name: String,
    pub mode: QuizMode,
    pub settings: QuizSettings,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub user_answers: Vec<UserAnswer>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl QuizAttempt {
    pub fn start(
        base: &KnowledgeBase,
        mode: QuizMode,
        settings: QuizSettings,
        answers: Vec<UserAnswer>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            knowledge_base_id: base.id.clone(),
            knowledge_base_name: base.name.clone(),
            mode,
            settings,
            started_at: Utc::now(),
            completed_at: None,
            user_answers: answers,
            score: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn correct_count(&self) -> usize {
        answer::correct_count(&self.user_answers)
    }

    pub fn answered_count(&self) -> usize {
        answer::answered_count(&self.user_answers)
    }

    /// Seal the attempt with its final ledger. A sealed attempt never changes
    /// again; returns false if it was already complete.
    pub fn finalize(&mut self, answers: Vec<UserAnswer>, at: DateTime<Utc>) -> bool {
        if self.is_complete() {
            return false;
        }
        self.score = Some(scoring::compute_score(&answers));
        self.user_answers = answers;
        self.completed_at = Some(at);
        true
    }
}
