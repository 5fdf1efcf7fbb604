use rand::Rng;
use rand::seq::SliceRandom;

use crate::bank::question::Question;
use crate::engine::filter::CategoryFilter;
use crate::session::answer::UserAnswer;
use crate::session::settings::QuizSettings;

/// The questions drawn for one attempt and the matching blank ledger.
#[derive(Clone, Debug)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub answers: Vec<UserAnswer>,
}

/// Filter, shuffle and truncate the pool. Returns `None` when nothing would be
/// drawn, which callers treat as "start is blocked".
pub fn build_session<R: Rng + ?Sized>(
    pool: &[Question],
    settings: &QuizSettings,
    rng: &mut R,
) -> Option<SessionPlan> {
    let mut selected: Vec<&Question> = CategoryFilter::new(&settings.categories).apply(pool);
    selected.shuffle(rng);
    selected.truncate(settings.question_count);
    if selected.is_empty() {
        return None;
    }

    let questions: Vec<Question> = selected.into_iter().cloned().collect();
    let answers = questions.iter().map(UserAnswer::unanswered).collect();
    Some(SessionPlan { questions, answers })
}
