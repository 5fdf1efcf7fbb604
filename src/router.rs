use crate::session::settings::QuizMode;

/// Every screen carries the ids it needs; the data itself lives in the stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    KnowledgeBases,
    Import,
    Menu { base_id: String },
    Setup { base_id: String, mode: QuizMode },
    Quiz { base_id: String, attempt_id: String },
    Results { base_id: String, attempt_id: String },
    /// `base_id` is the menu to return to, if history was opened from one.
    History { base_id: Option<String> },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::KnowledgeBases => "knowledge-bases",
            Screen::Import => "import",
            Screen::Menu { .. } => "menu",
            Screen::Setup { .. } => "setup",
            Screen::Quiz { .. } => "quiz",
            Screen::Results { .. } => "results",
            Screen::History { .. } => "history",
        }
    }

    pub fn base_id(&self) -> Option<&str> {
        match self {
            Screen::Menu { base_id }
            | Screen::Setup { base_id, .. }
            | Screen::Quiz { base_id, .. }
            | Screen::Results { base_id, .. } => Some(base_id),
            Screen::History { base_id } => base_id.as_deref(),
            Screen::Login | Screen::KnowledgeBases | Screen::Import => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    LoggedIn,
    LoggedOut,
    OpenImport,
    CancelImport,
    BaseImported { base_id: String },
    BaseSelected { base_id: String },
    ModeChosen(QuizMode),
    BackToBases,
    BackToMenu,
    QuizStarted { attempt_id: String },
    QuizFinished,
    QuizAbandoned,
    OpenHistory,
    CloseHistory,
    ReviewAttempt { base_id: String, attempt_id: String },
    ResumeAttempt { base_id: String, attempt_id: String },
}

/// Next screen for `route`. Routes that make no sense on the current screen
/// leave it unchanged.
pub fn reduce(screen: Screen, route: Route) -> Screen {
    match (screen, route) {
        (_, Route::LoggedOut) => Screen::Login,
        (Screen::Login, Route::LoggedIn) => Screen::KnowledgeBases,

        (Screen::KnowledgeBases, Route::OpenImport) => Screen::Import,
        (Screen::Import, Route::CancelImport) => Screen::KnowledgeBases,
        (Screen::Import, Route::BaseImported { base_id })
        | (Screen::KnowledgeBases, Route::BaseSelected { base_id }) => Screen::Menu { base_id },

        (Screen::Menu { base_id }, Route::ModeChosen(mode)) => Screen::Setup { base_id, mode },
        (Screen::Menu { .. } | Screen::Setup { .. } | Screen::Results { .. }, Route::BackToBases) => {
            Screen::KnowledgeBases
        }
        (Screen::Setup { base_id, .. } | Screen::Results { base_id, .. }, Route::BackToMenu) => {
            Screen::Menu { base_id }
        }

        (Screen::Setup { base_id, .. }, Route::QuizStarted { attempt_id }) => {
            Screen::Quiz { base_id, attempt_id }
        }
        (Screen::Quiz { base_id, attempt_id }, Route::QuizFinished) => {
            Screen::Results { base_id, attempt_id }
        }
        (Screen::Quiz { base_id, .. }, Route::QuizAbandoned) => Screen::Menu { base_id },

        (Screen::KnowledgeBases, Route::OpenHistory) => Screen::History { base_id: None },
        (Screen::Menu { base_id }, Route::OpenHistory) => Screen::History {
            base_id: Some(base_id),
        },
        (Screen::History { base_id }, Route::CloseHistory) => match base_id {
            Some(base_id) => Screen::Menu { base_id },
            None => Screen::KnowledgeBases,
        },
        (Screen::History { .. }, Route::ReviewAttempt { base_id, attempt_id }) => {
            Screen::Results { base_id, attempt_id }
        }
        (Screen::History { .. }, Route::ResumeAttempt { base_id, attempt_id }) => {
            Screen::Quiz { base_id, attempt_id }
        }

        (screen, _) => screen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Screen {
        Screen::Menu {
            base_id: "b1".into(),
        }
    }

    #[test]
    fn test_happy_path_through_a_quiz() {
        let mut s = reduce(Screen::Login, Route::LoggedIn);
        assert_eq!(s, Screen::KnowledgeBases);
        s = reduce(s, Route::BaseSelected {
            base_id: "b1".into(),
        });
        assert_eq!(s, menu());
        s = reduce(s, Route::ModeChosen(QuizMode::Exam));
        assert_eq!(
            s,
            Screen::Setup {
                base_id: "b1".into(),
                mode: QuizMode::Exam
            }
        );
        s = reduce(s, Route::QuizStarted {
            attempt_id: "a1".into(),
        });
        assert_eq!(s.name(), "quiz");
        s = reduce(s, Route::QuizFinished);
        assert_eq!(
            s,
            Screen::Results {
                base_id: "b1".into(),
                attempt_id: "a1".into()
            }
        );
        assert_eq!(reduce(s.clone(), Route::BackToMenu), menu());
        assert_eq!(reduce(s, Route::BackToBases), Screen::KnowledgeBases);
    }

    #[test]
    fn test_import_flow() {
        let s = reduce(Screen::KnowledgeBases, Route::OpenImport);
        assert_eq!(s, Screen::Import);
        assert_eq!(reduce(s.clone(), Route::CancelImport), Screen::KnowledgeBases);
        assert_eq!(
            reduce(s, Route::BaseImported {
                base_id: "b1".into()
            }),
            menu()
        );
    }

    #[test]
    fn test_logout_from_anywhere() {
        assert_eq!(reduce(menu(), Route::LoggedOut), Screen::Login);
        let quiz = Screen::Quiz {
            base_id: "b".into(),
            attempt_id: "a".into(),
        };
        assert_eq!(reduce(quiz, Route::LoggedOut), Screen::Login);
    }

    #[test]
    fn test_history_returns_where_it_came_from() {
        let from_bases = reduce(Screen::KnowledgeBases, Route::OpenHistory);
        assert_eq!(reduce(from_bases, Route::CloseHistory), Screen::KnowledgeBases);
        let from_menu = reduce(menu(), Route::OpenHistory);
        assert_eq!(from_menu.base_id(), Some("b1"));
        assert_eq!(reduce(from_menu, Route::CloseHistory), menu());
    }

    #[test]
    fn test_history_can_review_or_resume() {
        let history = Screen::History { base_id: None };
        let review = reduce(history.clone(), Route::ReviewAttempt {
            base_id: "b".into(),
            attempt_id: "a".into(),
        });
        assert_eq!(review.name(), "results");
        let resume = reduce(history, Route::ResumeAttempt {
            base_id: "b".into(),
            attempt_id: "a".into(),
        });
        assert_eq!(resume.name(), "quiz");
    }

    #[test]
    fn test_abandoning_quiz_returns_to_menu() {
        let quiz = Screen::Quiz {
            base_id: "b1".into(),
            attempt_id: "a".into(),
        };
        assert_eq!(reduce(quiz, Route::QuizAbandoned), menu());
    }

    #[test]
    fn test_invalid_routes_keep_screen() {
        assert_eq!(reduce(Screen::Login, Route::OpenImport), Screen::Login);
        assert_eq!(reduce(menu(), Route::QuizFinished), menu());
        assert_eq!(
            reduce(Screen::KnowledgeBases, Route::ModeChosen(QuizMode::Study)),
            Screen::KnowledgeBases
        );
    }
}
