use std::time::Duration;

use crate::bank::question::Question;
use crate::session::answer::UserAnswer;
use crate::session::builder::SessionPlan;
use crate::session::countdown::Countdown;
use crate::session::settings::QuizMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    AnsweringStudy,
    FeedbackShownStudy,
    AnsweringExam,
    Completed,
}

/// What a transition asks of the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not allowed in the current state; nothing changed.
    Ignored,
    /// View state changed (cursor, feedback); the ledger did not.
    Updated,
    /// The ledger changed and should be persisted.
    AnswerRecorded,
    /// The session just completed; the ledger is final.
    Finished,
}

pub struct QuizSession {
    attempt_id: String,
    mode: QuizMode,
    questions: Vec<Question>,
    answers: Vec<UserAnswer>,
    current: usize,
    phase: QuizPhase,
    countdown: Countdown,
    timed_out: bool,
}

fn answering(mode: QuizMode) -> QuizPhase {
    match mode {
        QuizMode::Study => QuizPhase::AnsweringStudy,
        QuizMode::Exam => QuizPhase::AnsweringExam,
    }
}

impl QuizSession {
    pub fn new(attempt_id: &str, mode: QuizMode, plan: SessionPlan, time_limit_secs: u32) -> Self {
        Self {
            attempt_id: attempt_id.to_string(),
            mode,
            questions: plan.questions,
            answers: plan.answers,
            current: 0,
            phase: answering(mode),
            countdown: Countdown::new(time_limit_secs),
            timed_out: false,
        }
    }

    /// Re-open an interrupted attempt at its first unanswered question.
    pub fn resume(
        attempt_id: &str,
        mode: QuizMode,
        questions: Vec<Question>,
        answers: Vec<UserAnswer>,
        time_limit_secs: u32,
    ) -> Self {
        let current = answers
            .iter()
            .position(|a| !a.is_answered())
            .unwrap_or(answers.len().saturating_sub(1));
        let mut session = Self::new(
            attempt_id,
            mode,
            SessionPlan { questions, answers },
            time_limit_secs,
        );
        session.current = current;
        // A study answer already on record was checked before the interruption.
        if mode == QuizMode::Study && session.current_answer().is_some_and(UserAnswer::is_answered) {
            session.phase = QuizPhase::FeedbackShownStudy;
        }
        session
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn feedback_shown(&self) -> bool {
        self.phase == QuizPhase::FeedbackShownStudy
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn current_answer(&self) -> Option<&UserAnswer> {
        self.answers.get(self.current)
    }

    pub fn select_option(&mut self, option_index: usize) -> Outcome {
        if !matches!(
            self.phase,
            QuizPhase::AnsweringStudy | QuizPhase::AnsweringExam
        ) {
            return Outcome::Ignored;
        }
        let (Some(question), Some(answer)) = (
            self.questions.get(self.current),
            self.answers.get_mut(self.current),
        ) else {
            return Outcome::Ignored;
        };
        if answer.selected_option_index == Some(option_index) {
            return Outcome::Ignored;
        }
        if answer.record(question, option_index) {
            Outcome::AnswerRecorded
        } else {
            Outcome::Ignored
        }
    }

    pub fn can_check(&self) -> bool {
        self.phase == QuizPhase::AnsweringStudy
            && self.current_answer().is_some_and(UserAnswer::is_answered)
    }

    /// Study mode: reveal the correct option and lock the current answer.
    pub fn check_answer(&mut self) -> Outcome {
        if !self.can_check() {
            return Outcome::Ignored;
        }
        self.phase = QuizPhase::FeedbackShownStudy;
        Outcome::Updated
    }

    pub fn can_advance(&self) -> bool {
        if self.is_last() {
            return false;
        }
        match self.phase {
            QuizPhase::AnsweringExam | QuizPhase::FeedbackShownStudy => true,
            QuizPhase::AnsweringStudy | QuizPhase::Completed => false,
        }
    }

    pub fn next(&mut self) -> Outcome {
        if !self.can_advance() {
            return Outcome::Ignored;
        }
        self.current += 1;
        self.phase = answering(self.mode);
        Outcome::Updated
    }

    pub fn can_go_back(&self) -> bool {
        self.phase == QuizPhase::AnsweringExam && self.current > 0
    }

    pub fn previous(&mut self) -> Outcome {
        if !self.can_go_back() {
            return Outcome::Ignored;
        }
        self.current -= 1;
        Outcome::Updated
    }

    pub fn can_submit(&self) -> bool {
        if !self.is_last() {
            return false;
        }
        match self.phase {
            QuizPhase::AnsweringExam | QuizPhase::FeedbackShownStudy => true,
            QuizPhase::AnsweringStudy | QuizPhase::Completed => false,
        }
    }

    pub fn submit(&mut self) -> Outcome {
        if !self.can_submit() {
            return Outcome::Ignored;
        }
        self.finish(false)
    }

    /// Feed elapsed wall time into the countdown. Reaching zero forces a
    /// submission with whatever the ledger holds, in any state.
    pub fn tick(&mut self, elapsed: Duration) -> Outcome {
        if self.is_complete() {
            return Outcome::Ignored;
        }
        if self.countdown.advance(elapsed) {
            return self.finish(true);
        }
        Outcome::Ignored
    }

    fn finish(&mut self, timed_out: bool) -> Outcome {
        self.phase = QuizPhase::Completed;
        self.timed_out = timed_out;
        Outcome::Finished
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::bank::question::fixtures;
    use crate::engine::scoring;
    use crate::session::builder::build_session;
    use crate::session::settings::QuizSettings;

    fn session(mode: QuizMode, count: usize, time_limit: u32) -> QuizSession {
        let pool = fixtures::pool(count as u64, 0);
        let settings = QuizSettings::new(BTreeSet::new(), count, time_limit);
        let mut rng = SmallRng::seed_from_u64(11);
        let plan = build_session(&pool, &settings, &mut rng).unwrap();
        QuizSession::new("attempt-1", mode, plan, time_limit)
    }

    fn correct_index(s: &QuizSession) -> usize {
        s.current_question().unwrap().correct_answer_index
    }

    fn wrong_index(s: &QuizSession) -> usize {
        let q = s.current_question().unwrap();
        (q.correct_answer_index + 1) % q.options.len()
    }

    #[test]
    fn test_exam_answers_stay_mutable() {
        let mut s = session(QuizMode::Exam, 3, 600);
        assert_eq!(s.phase(), QuizPhase::AnsweringExam);

        let wrong = wrong_index(&s);
        assert_eq!(s.select_option(wrong), Outcome::AnswerRecorded);
        assert_eq!(s.current_answer().unwrap().is_correct, Some(false));

        let right = correct_index(&s);
        assert_eq!(s.select_option(right), Outcome::AnswerRecorded);
        assert_eq!(s.current_answer().unwrap().is_correct, Some(true));

        assert_eq!(s.select_option(right), Outcome::Ignored);
    }

    #[test]
    fn test_exam_navigation_both_ways() {
        let mut s = session(QuizMode::Exam, 3, 600);
        assert_eq!(s.previous(), Outcome::Ignored);
        assert_eq!(s.next(), Outcome::Updated);
        assert_eq!(s.next(), Outcome::Updated);
        assert!(s.is_last());
        assert_eq!(s.next(), Outcome::Ignored);
        assert_eq!(s.previous(), Outcome::Updated);
        assert_eq!(s.index(), 1);
    }

    #[test]
    fn test_exam_submit_only_on_last_question() {
        let mut s = session(QuizMode::Exam, 2, 600);
        assert_eq!(s.submit(), Outcome::Ignored);
        s.next();
        assert_eq!(s.submit(), Outcome::Finished);
        assert!(s.is_complete());
        assert!(!s.timed_out());
        assert_eq!(s.select_option(0), Outcome::Ignored);
    }

    #[test]
    fn test_study_check_requires_selection() {
        let mut s = session(QuizMode::Study, 2, 600);
        assert!(!s.can_check());
        assert_eq!(s.check_answer(), Outcome::Ignored);
        let pick = wrong_index(&s);
        s.select_option(pick);
        assert_eq!(s.check_answer(), Outcome::Updated);
        assert_eq!(s.phase(), QuizPhase::FeedbackShownStudy);
    }

    #[test]
    fn test_study_answer_locked_after_check() {
        let mut s = session(QuizMode::Study, 2, 600);
        let wrong = wrong_index(&s);
        s.select_option(wrong);
        s.check_answer();

        let right = correct_index(&s);
        assert_eq!(s.select_option(right), Outcome::Ignored);
        let answer = s.current_answer().unwrap();
        assert_eq!(answer.selected_option_index, Some(wrong));
        assert_eq!(answer.is_correct, Some(false));
    }

    #[test]
    fn test_study_advance_is_gated_by_feedback() {
        let mut s = session(QuizMode::Study, 3, 600);
        assert_eq!(s.next(), Outcome::Ignored);
        let pick = correct_index(&s);
        s.select_option(pick);
        assert_eq!(s.next(), Outcome::Ignored);
        s.check_answer();
        assert_eq!(s.next(), Outcome::Updated);
        assert_eq!(s.phase(), QuizPhase::AnsweringStudy);
        assert!(!s.feedback_shown());
        assert_eq!(s.previous(), Outcome::Ignored);
    }

    #[test]
    fn test_study_submit_requires_feedback_on_last() {
        let mut s = session(QuizMode::Study, 1, 600);
        let pick = correct_index(&s);
        s.select_option(pick);
        assert_eq!(s.submit(), Outcome::Ignored);
        s.check_answer();
        assert_eq!(s.submit(), Outcome::Finished);
        assert_eq!(scoring::compute_score(s.answers()), 100.0);
    }

    #[test]
    fn test_time_expiry_forces_submit_with_blank_ledger() {
        let mut s = session(QuizMode::Exam, 3, 1);
        assert_eq!(s.tick(Duration::from_millis(500)), Outcome::Ignored);
        assert_eq!(s.tick(Duration::from_millis(500)), Outcome::Finished);
        assert!(s.is_complete());
        assert!(s.timed_out());
        assert_eq!(scoring::compute_score(s.answers()), 0.0);
        assert_eq!(s.tick(Duration::from_secs(1)), Outcome::Ignored);
    }

    #[test]
    fn test_time_expiry_overrides_unchecked_study_state() {
        let mut s = session(QuizMode::Study, 2, 1);
        let pick = correct_index(&s);
        s.select_option(pick);
        assert_eq!(s.tick(Duration::from_secs(1)), Outcome::Finished);
        assert_eq!(s.answers()[0].is_correct, Some(true));
        assert!(s.answers()[1].is_correct.is_none());
        assert_eq!(scoring::compute_score(s.answers()), 50.0);
    }

    #[test]
    fn test_resume_lands_on_first_unanswered() {
        let pool = fixtures::pool(3, 0);
        let mut answers: Vec<UserAnswer> = pool.iter().map(UserAnswer::unanswered).collect();
        answers[0].record(&pool[0], 1);
        let s = QuizSession::resume("a", QuizMode::Exam, pool.clone(), answers, 60);
        assert_eq!(s.index(), 1);
        assert_eq!(s.countdown().remaining_secs(), 60);

        let mut all: Vec<UserAnswer> = pool.iter().map(UserAnswer::unanswered).collect();
        for (a, q) in all.iter_mut().zip(&pool) {
            a.record(q, 0);
        }
        let s = QuizSession::resume("a", QuizMode::Exam, pool, all, 60);
        assert_eq!(s.index(), 2);
    }

    #[test]
    fn test_resumed_study_answer_stays_locked() {
        let pool = fixtures::pool(2, 0);
        let mut all: Vec<UserAnswer> = pool.iter().map(UserAnswer::unanswered).collect();
        for (a, q) in all.iter_mut().zip(&pool) {
            a.record(q, q.correct_answer_index);
        }
        let mut s = QuizSession::resume("a", QuizMode::Study, pool, all, 60);
        assert_eq!(s.index(), 1);
        assert_eq!(s.phase(), QuizPhase::FeedbackShownStudy);

        let before = s.current_answer().cloned();
        let wrong = wrong_index(&s);
        assert_eq!(s.select_option(wrong), Outcome::Ignored);
        assert_eq!(s.current_answer().cloned(), before);
        assert!(s.can_submit());
        assert_eq!(s.submit(), Outcome::Finished);
    }

    #[test]
    fn test_resumed_study_lands_unlocked_on_open_question() {
        let pool = fixtures::pool(2, 0);
        let mut answers: Vec<UserAnswer> = pool.iter().map(UserAnswer::unanswered).collect();
        answers[0].record(&pool[0], 0);
        let s = QuizSession::resume("a", QuizMode::Study, pool, answers, 60);
        assert_eq!(s.index(), 1);
        assert_eq!(s.phase(), QuizPhase::AnsweringStudy);
    }
}
