use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error, info, warn};

use crate::bank::import::{self, ImportedSet};
use crate::bank::question::{KnowledgeBase, Question};
use crate::config::Config;
use crate::identity::User;
use crate::router::{self, Route, Screen};
use crate::session::answer;
use crate::session::attempt::QuizAttempt;
use crate::session::builder::build_session;
use crate::session::quiz::{Outcome, QuizSession};
use crate::session::settings::QuizMode;
use crate::session::setup::SetupForm;
use crate::store::UserLibrary;
use crate::store::kv::{FileKvStore, KeyValueStore};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Name,
}

/// The import screen asks for a file first, then a name for the new base.
pub enum ImportStep {
    Path,
    Name(ImportedSet),
}

pub struct App {
    pub screen: Screen,
    pub config: Config,
    pub theme: &'static Theme,
    pub user: Option<User>,
    pub library: UserLibrary,
    pub session: Option<QuizSession>,
    pub setup: Option<SetupForm>,
    pub menu: Menu<'static>,
    pub login_input: LineInput,
    pub login_name: LineInput,
    pub login_focus: LoginField,
    pub import_path: LineInput,
    pub import_name: LineInput,
    pub import_step: ImportStep,
    pub base_selected: usize,
    pub base_confirm_delete: bool,
    pub history_selected: usize,
    pub quiz_confirm_quit: bool,
    pub results_scroll: usize,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    config_file: Option<PathBuf>,
    rng: SmallRng,
    last_tick: Instant,
}

impl App {
    /// File-backed app rooted at the configured data directory.
    pub fn new(config: Config, theme: &'static Theme) -> Result<Self> {
        let kv = FileKvStore::with_base_dir(config.data_dir())?;
        info!(data_dir = %kv.base_dir().display(), "storage ready");
        let mut app = Self::with_store(config, theme, Rc::new(kv));
        app.config_file = Some(Config::config_path());
        Ok(app)
    }

    pub fn with_store(config: Config, theme: &'static Theme, kv: Rc<dyn KeyValueStore>) -> Self {
        let login_input = LineInput::new(config.last_user.as_deref().unwrap_or_default());
        Self {
            screen: Screen::Login,
            config,
            theme,
            user: None,
            library: UserLibrary::new(kv),
            session: None,
            setup: None,
            menu: Menu::new(theme),
            login_input,
            login_name: LineInput::new(""),
            login_focus: LoginField::Email,
            import_path: LineInput::for_path(""),
            import_name: LineInput::new(""),
            import_step: ImportStep::Path,
            base_selected: 0,
            base_confirm_delete: false,
            history_selected: 0,
            quiz_confirm_quit: false,
            results_scroll: 0,
            status: None,
            should_quit: false,
            config_file: None,
            rng: SmallRng::from_entropy(),
            last_tick: Instant::now(),
        }
    }

    fn navigate(&mut self, route: Route) {
        let from = std::mem::replace(&mut self.screen, Screen::Login);
        let from_name = from.name();
        self.screen = router::reduce(from, route);
        debug!(from = from_name, to = self.screen.name(), "navigate");
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(message = %text, "shown to user");
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text,
        });
    }

    /// Storage writes that fail leave the in-memory state in place.
    fn report_write_error(&mut self, err: anyhow::Error) {
        error!(error = %err, "storage write failed");
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: format!("Could not save: {err}"),
        });
    }

    // --- identity ---

    pub fn toggle_login_field(&mut self) {
        self.login_focus = match self.login_focus {
            LoginField::Email => LoginField::Name,
            LoginField::Name => LoginField::Email,
        };
    }

    pub fn sign_in(&mut self) {
        let user = match User::sign_in(self.login_input.value(), Some(self.login_name.value())) {
            Ok(user) => user,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        self.library.hydrate(Some(&user.storage_id()));
        info!(
            bases = self.library.bases.len(),
            attempts = self.library.attempts.attempts().len(),
            "signed in"
        );

        self.config.last_user = Some(user.email.clone());
        if let Some(path) = &self.config_file {
            // Only the remembered user is written back; CLI overrides stay in memory.
            let mut on_disk = Config::load_from(path).unwrap_or_default();
            on_disk.last_user = Some(user.email.clone());
            if let Err(e) = on_disk.save_to(path) {
                warn!(error = %e, "could not remember last user");
            }
        }

        self.user = Some(user);
        self.base_selected = 0;
        self.base_confirm_delete = false;
        self.status = None;
        self.navigate(Route::LoggedIn);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.email, "signed out");
        }
        self.session = None;
        self.setup = None;
        self.library.hydrate(None);
        self.login_input = LineInput::new(self.config.last_user.as_deref().unwrap_or_default());
        self.login_name = LineInput::new("");
        self.login_focus = LoginField::Email;
        self.navigate(Route::LoggedOut);
    }

    // --- knowledge bases ---

    pub fn selected_base(&self) -> Option<&KnowledgeBase> {
        self.library.bases.bases().get(self.base_selected)
    }

    /// The base the current screen is about.
    pub fn current_base(&self) -> Option<&KnowledgeBase> {
        self.screen
            .base_id()
            .and_then(|id| self.library.bases.select(id))
    }

    pub fn base_cursor_down(&mut self) {
        if self.base_selected + 1 < self.library.bases.len() {
            self.base_selected += 1;
        }
    }

    pub fn base_cursor_up(&mut self) {
        self.base_selected = self.base_selected.saturating_sub(1);
    }

    pub fn open_selected_base(&mut self) {
        let Some(base) = self.selected_base() else {
            return;
        };
        let base_id = base.id.clone();
        self.open_base(&base_id);
        self.navigate(Route::BaseSelected { base_id });
    }

    fn open_base(&mut self, base_id: &str) {
        if let Some(base) = self.library.bases.select(base_id) {
            let subtitle = format!(
                "{} questions, {} categories",
                base.questions.len(),
                base.categories().len()
            );
            self.menu.set_heading(&base.name, subtitle);
        }
    }

    pub fn request_delete_base(&mut self) {
        if self.selected_base().is_some() {
            self.base_confirm_delete = true;
        }
    }

    pub fn confirm_delete_base(&mut self) {
        self.base_confirm_delete = false;
        let Some(base) = self.selected_base() else {
            return;
        };
        let (id, name) = (base.id.clone(), base.name.clone());
        match self.library.delete_base(&id) {
            Ok(_) => self.set_info(format!("Deleted \"{name}\" and its attempts")),
            Err(e) => self.report_write_error(e),
        }
        let len = self.library.bases.len();
        self.base_selected = self.base_selected.min(len.saturating_sub(1));
    }

    // --- import ---

    pub fn open_import(&mut self) {
        self.import_path = LineInput::for_path("");
        self.import_step = ImportStep::Path;
        self.navigate(Route::OpenImport);
    }

    /// Esc on the name step goes back to the file step.
    pub fn cancel_import(&mut self) {
        match self.import_step {
            ImportStep::Name(_) => self.import_step = ImportStep::Path,
            ImportStep::Path => self.navigate(Route::CancelImport),
        }
    }

    pub fn submit_import_path(&mut self) {
        let raw = self.import_path.value().trim().to_string();
        if raw.is_empty() {
            self.set_error("Enter the path of a question file");
            return;
        }
        let path = expand_home(&raw);
        match import::load_question_file(&path) {
            Ok(set) => {
                info!(path = %path.display(), questions = set.questions.len(), "question file parsed");
                self.import_name = LineInput::new(&set.suggested_name);
                self.import_step = ImportStep::Name(set);
                self.status = None;
            }
            Err(e) => self.set_error(format!("Import failed: {e}")),
        }
    }

    pub fn submit_import_name(&mut self) {
        let name = self.import_name.value().trim().to_string();
        if name.is_empty() {
            self.set_error("Give the knowledge base a name");
            return;
        }
        let ImportStep::Name(set) = std::mem::replace(&mut self.import_step, ImportStep::Path) else {
            return;
        };
        let count = set.questions.len();
        match self.library.bases.create(&name, set.questions) {
            Ok(base) => {
                self.base_selected = self.library.bases.len().saturating_sub(1);
                self.open_base(&base.id);
                self.set_info(format!("Imported {count} questions into \"{name}\""));
                self.navigate(Route::BaseImported { base_id: base.id });
            }
            Err(e) => {
                self.report_write_error(e);
                self.navigate(Route::CancelImport);
            }
        }
    }

    // --- menu and setup ---

    pub fn activate_menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::Study => self.start_setup(QuizMode::Study),
            MenuAction::Exam => self.start_setup(QuizMode::Exam),
            MenuAction::History => self.open_history(),
            MenuAction::Back => self.navigate(Route::BackToBases),
        }
    }

    pub fn start_setup(&mut self, mode: QuizMode) {
        let Some(base) = self.current_base() else {
            return;
        };
        self.setup = Some(SetupForm::new(
            mode,
            base.categories(),
            self.config.default_question_count,
            self.config.default_time_limit_minutes,
        ));
        self.navigate(Route::ModeChosen(mode));
    }

    pub fn cancel_setup(&mut self) {
        self.setup = None;
        self.navigate(Route::BackToMenu);
    }

    /// Run `f` against the setup form and the pool of the base being set up.
    pub fn update_setup(&mut self, f: impl FnOnce(&mut SetupForm, &[Question])) {
        let Some(base) = self
            .screen
            .base_id()
            .and_then(|id| self.library.bases.select(id))
        else {
            return;
        };
        if let Some(form) = self.setup.as_mut() {
            f(form, &base.questions);
        }
    }

    pub fn start_quiz(&mut self) {
        let Screen::Setup { base_id, mode } = &self.screen else {
            return;
        };
        let mode = *mode;
        let Some(base) = self.library.bases.select(base_id).cloned() else {
            self.set_error("This knowledge base no longer exists");
            return;
        };
        let Some(form) = self.setup.as_ref() else {
            return;
        };
        let settings = form.to_settings(&base.questions);
        let Some(plan) = build_session(&base.questions, &settings, &mut self.rng) else {
            self.set_error("No questions match the selected categories");
            return;
        };

        let attempt = QuizAttempt::start(&base, mode, settings.clone(), plan.answers.clone());
        let attempt_id = attempt.id.clone();
        info!(
            attempt = %attempt_id,
            mode = mode.as_str(),
            questions = plan.questions.len(),
            "quiz started"
        );
        if let Err(e) = self.library.attempts.append(attempt) {
            self.report_write_error(e);
        }

        self.session = Some(QuizSession::new(&attempt_id, mode, plan, settings.time_limit));
        self.setup = None;
        self.quiz_confirm_quit = false;
        self.last_tick = Instant::now();
        self.navigate(Route::QuizStarted { attempt_id });
    }

    // --- quiz ---

    pub fn quiz_select(&mut self, option_index: usize) {
        self.quiz_action(|s| s.select_option(option_index));
    }

    /// Enter: check in study, submit on the last question, otherwise advance.
    pub fn quiz_primary(&mut self) {
        self.quiz_action(|s| {
            if s.can_check() {
                s.check_answer()
            } else if s.can_submit() {
                s.submit()
            } else if s.can_advance() {
                s.next()
            } else {
                Outcome::Ignored
            }
        });
    }

    pub fn quiz_next(&mut self) {
        self.quiz_action(QuizSession::next);
    }

    pub fn quiz_previous(&mut self) {
        self.quiz_action(QuizSession::previous);
    }

    pub fn quiz_submit(&mut self) {
        self.quiz_action(QuizSession::submit);
    }

    /// Leave without submitting. The attempt stays in progress in history.
    pub fn abandon_quiz(&mut self) {
        self.quiz_confirm_quit = false;
        if let Some(session) = self.session.take() {
            info!(
                attempt = session.attempt_id(),
                answered = answer::answered_count(session.answers()),
                "quiz left unfinished"
            );
            self.set_info("Attempt saved. Resume it from History.");
        }
        self.navigate(Route::QuizAbandoned);
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance_clock(elapsed);
    }

    fn advance_clock(&mut self, elapsed: Duration) {
        if matches!(self.screen, Screen::Quiz { .. }) {
            self.quiz_action(|s| s.tick(elapsed));
        }
    }

    fn quiz_action(&mut self, f: impl FnOnce(&mut QuizSession) -> Outcome) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match f(session) {
            Outcome::Ignored | Outcome::Updated => {}
            Outcome::AnswerRecorded => {
                let saved = self
                    .library
                    .attempts
                    .update_answers(session.attempt_id(), session.answers());
                if let Err(e) = saved {
                    self.report_write_error(e);
                }
            }
            Outcome::Finished => self.finish_quiz(),
        }
    }

    fn finish_quiz(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match self
            .library
            .attempts
            .complete(session.attempt_id(), session.answers().to_vec())
        {
            Ok(Some(attempt)) => info!(attempt = %attempt.id, score = ?attempt.score, "quiz completed"),
            Ok(None) => warn!(attempt = session.attempt_id(), "attempt missing or already complete"),
            Err(e) => self.report_write_error(e),
        }
        if session.timed_out() {
            self.set_info("Time is up. Your answers were submitted.");
        }
        self.results_scroll = 0;
        self.navigate(Route::QuizFinished);
    }

    // --- results ---

    pub fn results_view(&self) -> Option<(&KnowledgeBase, &QuizAttempt)> {
        let Screen::Results {
            base_id,
            attempt_id,
        } = &self.screen
        else {
            return None;
        };
        Some((
            self.library.bases.select(base_id)?,
            self.library.attempts.get(attempt_id)?,
        ))
    }

    pub fn leave_results(&mut self, route: Route) {
        let base_id = self.screen.base_id().map(str::to_string);
        self.navigate(route);
        if let Some(id) = base_id {
            self.open_base(&id);
        }
    }

    /// Back to setup with the mode of the attempt on screen.
    pub fn retake(&mut self) {
        let Some(mode) = self.results_view().map(|(_, a)| a.mode) else {
            return;
        };
        self.leave_results(Route::BackToMenu);
        self.start_setup(mode);
    }

    // --- history ---

    pub fn open_history(&mut self) {
        self.history_selected = 0;
        self.navigate(Route::OpenHistory);
    }

    pub fn close_history(&mut self) {
        self.navigate(Route::CloseHistory);
    }

    /// Attempts shown on the history screen, newest first.
    pub fn history_rows(&self) -> Vec<&QuizAttempt> {
        let only_base = match &self.screen {
            Screen::History { base_id } => base_id.as_deref(),
            _ => None,
        };
        self.library
            .attempts
            .history()
            .into_iter()
            .filter(|a| only_base.is_none_or(|id| a.knowledge_base_id == id))
            .collect()
    }

    pub fn history_cursor_down(&mut self) {
        if self.history_selected + 1 < self.history_rows().len() {
            self.history_selected += 1;
        }
    }

    pub fn history_cursor_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Completed attempts open their results; unfinished ones resume.
    pub fn open_history_entry(&mut self) {
        let Some(attempt) = self.history_rows().get(self.history_selected).copied() else {
            return;
        };
        let base_id = attempt.knowledge_base_id.clone();
        let attempt_id = attempt.id.clone();

        if attempt.is_complete() {
            self.results_scroll = 0;
            self.navigate(Route::ReviewAttempt {
                base_id,
                attempt_id,
            });
            return;
        }

        let resumed = self.library.bases.select(&base_id).and_then(|base| {
            let questions: Option<Vec<Question>> = attempt
                .user_answers
                .iter()
                .map(|a| base.question(a.question_id).cloned())
                .collect();
            questions.map(|questions| {
                QuizSession::resume(
                    &attempt.id,
                    attempt.mode,
                    questions,
                    attempt.user_answers.clone(),
                    attempt.settings.time_limit,
                )
            })
        });
        let Some(session) = resumed else {
            self.set_error("This attempt's questions are no longer available");
            return;
        };

        info!(attempt = %attempt_id, "quiz resumed");
        self.session = Some(session);
        self.quiz_confirm_quit = false;
        self.last_tick = Instant::now();
        self.navigate(Route::ResumeAttempt {
            base_id,
            attempt_id,
        });
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
