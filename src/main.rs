use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use tracing::{error, info, warn};

use quizmaster::app::{App, ImportStep, LoginField, StatusKind};
use quizmaster::config::Config;
use quizmaster::event::{AppEvent, EventHandler, TICK_RATE};
use quizmaster::logging;
use quizmaster::router::{Route, Screen};
use quizmaster::ui::components::menu::MenuAction;
use quizmaster::ui::components::base_list::BaseList;
use quizmaster::ui::components::confirm_dialog::ConfirmDialog;
use quizmaster::ui::components::history::HistoryTable;
use quizmaster::ui::components::quiz_view::QuizView;
use quizmaster::ui::components::results::ResultsView;
use quizmaster::ui::components::setup_form::SetupView;
use quizmaster::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use quizmaster::ui::line_input::{InputResult, LineInput};
use quizmaster::ui::theme::{Theme, ThemeColors};

#[derive(Parser)]
#[command(name = "quizmaster", version, about = "Terminal quiz trainer with study and exam modes")]
struct Cli {
    #[arg(short, long, help = "Sign in as this email address on start")]
    user: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for stored knowledge bases, attempts and logs")]
    data_dir: Option<String>,

    #[arg(short, long, help = "Default number of questions per quiz")]
    questions: Option<usize>,

    #[arg(short, long, help = "Default time limit in minutes")]
    minutes: Option<u32>,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(count) = cli.questions {
        config.default_question_count = count;
    }
    if let Some(minutes) = cli.minutes {
        config.default_time_limit_minutes = minutes;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate();

    if let Err(e) = logging::init(&config.data_dir(), &config.log_level) {
        eprintln!("warning: logging disabled: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");
    if let Some(e) = config_error {
        warn!(error = %e, "config file unreadable, using defaults");
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, theme)?;
    if let Some(user) = cli.user {
        app.login_input = LineInput::new(&user);
        app.sign_in();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Release events are filtered out in the event thread when reported.
    let keyboard_enhanced = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);
    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }
    info!("stopped");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.status = None;

    match app.screen {
        Screen::Login => handle_login_key(app, key),
        Screen::KnowledgeBases => handle_bases_key(app, key),
        Screen::Import => handle_import_key(app, key),
        Screen::Menu { .. } => handle_menu_key(app, key),
        Screen::Setup { .. } => handle_setup_key(app, key),
        Screen::Quiz { .. } => handle_quiz_key(app, key),
        Screen::Results { .. } => handle_results_key(app, key),
        Screen::History { .. } => handle_history_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
        app.toggle_login_field();
        return;
    }
    let input = match app.login_focus {
        LoginField::Email => &mut app.login_input,
        LoginField::Name => &mut app.login_name,
    };
    match input.handle(key) {
        InputResult::Submit => app.sign_in(),
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue => {}
    }
}

fn handle_bases_key(app: &mut App, key: KeyEvent) {
    if app.base_confirm_delete {
        match key.code {
            KeyCode::Char('y') => app.confirm_delete_base(),
            KeyCode::Char('n') | KeyCode::Esc => app.base_confirm_delete = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.base_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.base_cursor_up(),
        KeyCode::Enter => app.open_selected_base(),
        KeyCode::Char('i') => app.open_import(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete_base(),
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('o') => app.sign_out(),
        _ => {}
    }
}

fn handle_import_key(app: &mut App, key: KeyEvent) {
    let on_name_step = matches!(app.import_step, ImportStep::Name(_));
    let input = if on_name_step {
        &mut app.import_name
    } else {
        &mut app.import_path
    };
    match input.handle(key) {
        InputResult::Submit if on_name_step => app.submit_import_name(),
        InputResult::Submit => app.submit_import_path(),
        InputResult::Cancel => app.cancel_import(),
        InputResult::Continue => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.activate_menu(MenuAction::Back),
        KeyCode::Char('j') | KeyCode::Down => app.menu.next(),
        KeyCode::Char('k') | KeyCode::Up => app.menu.prev(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                app.activate_menu(action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.activate_menu(action);
            }
        }
        _ => {}
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_setup(),
        KeyCode::Enter => app.start_quiz(),
        KeyCode::Char('j') | KeyCode::Down => app.update_setup(|form, _| form.cursor_down()),
        KeyCode::Char('k') | KeyCode::Up => app.update_setup(|form, _| form.cursor_up()),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.update_setup(|form, _| form.toggle_current()),
        KeyCode::Char('a') => app.update_setup(|form, _| form.select_all()),
        KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Right => {
            app.update_setup(|form, pool| form.increase(pool))
        }
        KeyCode::Char('h') | KeyCode::Char('-') | KeyCode::Left => {
            app.update_setup(|form, pool| form.decrease(pool))
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if app.quiz_confirm_quit {
        match key.code {
            KeyCode::Char('y') => app.abandon_quiz(),
            KeyCode::Char('n') | KeyCode::Esc => app.quiz_confirm_quit = false,
            _ => {}
        }
        return;
    }

    let option_count = app
        .session
        .as_ref()
        .and_then(|s| s.current_question())
        .map_or(0, |q| q.options.len());
    let selected = app
        .session
        .as_ref()
        .and_then(|s| s.current_answer())
        .and_then(|a| a.selected_option_index);

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.quiz_confirm_quit = true,
        KeyCode::Char(ch @ '1'..='9') => {
            app.quiz_select(ch as usize - '1' as usize);
        }
        KeyCode::Char(ch @ 'a'..='f') => {
            app.quiz_select(ch as usize - 'a' as usize);
        }
        KeyCode::Down | KeyCode::Char('j') if option_count > 0 => {
            app.quiz_select(selected.map_or(0, |i| (i + 1) % option_count));
        }
        KeyCode::Up | KeyCode::Char('k') if option_count > 0 => {
            app.quiz_select(selected.map_or(option_count - 1, |i| {
                (i + option_count - 1) % option_count
            }));
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.quiz_primary(),
        KeyCode::Right | KeyCode::Char('n') => app.quiz_next(),
        KeyCode::Left | KeyCode::Char('p') => app.quiz_previous(),
        KeyCode::Char('s') => app.quiz_submit(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('m') => app.leave_results(Route::BackToMenu),
        KeyCode::Char('b') => app.leave_results(Route::BackToBases),
        KeyCode::Char('r') => app.retake(),
        KeyCode::Char('j') | KeyCode::Down => app.results_scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => app.results_scroll = app.results_scroll.saturating_sub(1),
        KeyCode::PageDown => app.results_scroll += 10,
        KeyCode::PageUp => app.results_scroll = app.results_scroll.saturating_sub(10),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_history(),
        KeyCode::Char('j') | KeyCode::Down => app.history_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.history_cursor_up(),
        KeyCode::Enter => app.open_history_entry(),
        _ => {}
    }
}

// --- rendering ---

fn screen_hints(app: &App) -> Vec<&'static str> {
    match &app.screen {
        Screen::Login => vec!["[Enter] Sign in", "[Tab] Switch field", "[Esc] Quit"],
        Screen::KnowledgeBases => vec![
            "[Enter] Open",
            "[j/k] Move",
            "[i] Import",
            "[x] Delete",
            "[h] History",
            "[o] Sign out",
            "[q] Quit",
        ],
        Screen::Import => match app.import_step {
            ImportStep::Path => vec!["[Enter] Load", "[Tab] Complete path", "[Esc] Cancel"],
            ImportStep::Name(_) => vec!["[Enter] Create", "[Esc] Back"],
        },
        Screen::Menu { .. } => vec!["[1] Study", "[2] Exam", "[h] History", "[Esc] Back"],
        Screen::Setup { .. } => vec![
            "[j/k] Move",
            "[Space] Toggle",
            "[a] All",
            "[h/l] Adjust",
            "[Enter] Start",
            "[Esc] Back",
        ],
        Screen::Quiz { .. } => {
            let mut hints = vec!["[1-9/a-f] Choose", "[j/k] Cycle"];
            if let Some(session) = &app.session {
                if session.can_check() {
                    hints.push("[Enter] Check");
                }
                if session.can_advance() {
                    hints.push("[n] Next");
                }
                if session.can_go_back() {
                    hints.push("[p] Previous");
                }
                if session.can_submit() {
                    hints.push("[s] Submit");
                }
            }
            hints.push("[Esc] Leave");
            hints
        }
        Screen::Results { .. } => vec![
            "[j/k] Scroll",
            "[r] Retake",
            "[Enter] Menu",
            "[b] Knowledge bases",
        ],
        Screen::History { .. } => vec!["[Enter] Review/Resume", "[j/k] Move", "[Esc] Back"],
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let hints = pack_hint_lines(&screen_hints(app), area.width as usize);
    let footer_height = hints.len() as u16 + u16::from(app.status.is_some());
    let layout = AppLayout::new(area, footer_height);

    render_header(frame, app, layout.header);

    match &app.screen {
        Screen::Login => render_login(frame, app, layout.main),
        Screen::KnowledgeBases => render_bases(frame, app, layout.main),
        Screen::Import => render_import(frame, app, layout.main),
        Screen::Menu { .. } => {
            frame.render_widget(&app.menu, centered_rect(50, 80, layout.main));
        }
        Screen::Setup { .. } => render_setup(frame, app, layout.main),
        Screen::Quiz { .. } => render_quiz(frame, app, layout.main),
        Screen::Results { .. } => render_results(frame, app, layout.main),
        Screen::History { .. } => render_history(frame, app, layout.main),
    }

    let mut footer: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.success(),
            StatusKind::Error => colors.error(),
        };
        footer.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }
    footer.extend(
        hints
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.text_muted())))),
    );
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let mut info = String::new();
    if let Some(user) = &app.user {
        info.push_str(&format!(" {} <{}>", user.name, user.email));
    }
    if let Some(base) = app.current_base() {
        info.push_str(&format!(" | {}", base.name));
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizmaster ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

/// A text field with a block cursor.
fn input_line<'a>(label: &'a str, input: &'a LineInput, colors: &ThemeColors) -> Line<'a> {
    let (before, at, after) = input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
    let text_style = Style::default().fg(colors.fg());
    let mut spans = vec![
        Span::styled(label, Style::default().fg(colors.accent())),
        Span::styled(before, text_style),
    ];
    match at {
        Some(ch) => {
            spans.push(Span::styled(ch.to_string(), cursor_style));
            spans.push(Span::styled(after, text_style));
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    Line::from(spans)
}

fn login_line<'a>(
    label: &'a str,
    input: &'a LineInput,
    focused: bool,
    colors: &ThemeColors,
) -> Line<'a> {
    if focused {
        return input_line(label, input, colors);
    }
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors.text_muted())),
        Span::styled(input.value(), Style::default().fg(colors.fg())),
    ])
}

fn render_login(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let popup = centered_rect(50, 40, area);
    let block = Block::bordered()
        .title(" Sign in ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Knowledge bases and attempts are kept per email address.",
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(""),
        login_line("  Email: ", &app.login_input, app.login_focus == LoginField::Email, colors),
        login_line("  Name:  ", &app.login_name, app.login_focus == LoginField::Name, colors),
    ];
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, frame.buffer_mut());
}

fn render_bases(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    frame.render_widget(
        BaseList::new(
            app.library.bases.bases(),
            app.library.attempts.attempts(),
            app.base_selected,
            app.theme,
        ),
        area,
    );
    if app.base_confirm_delete {
        if let Some(base) = app.selected_base() {
            frame.render_widget(
                ConfirmDialog::new(format!("Delete \"{}\" and its attempts?", base.name), app.theme),
                area,
            );
        }
    }
}

fn render_import(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let popup = centered_rect(70, 50, area);
    let block = Block::bordered()
        .title(" Import Questions ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let muted = Style::default().fg(colors.text_muted());
    let lines = match &app.import_step {
        ImportStep::Path => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  A JSON array of questions, or {\"name\": ..., \"questions\": [...]}.",
                    muted,
                )),
                Line::from(Span::styled(
                    "  Each question: id, question, options, correctAnswerIndex, category, source.",
                    muted,
                )),
                Line::from(""),
                input_line("  File: ", &app.import_path, colors),
            ];
            if app.import_path.completion_error {
                lines.push(Line::from(Span::styled(
                    "  (could not read that directory)",
                    Style::default().fg(colors.warning()),
                )));
            }
            lines
        }
        ImportStep::Name(set) => {
            let categories: std::collections::BTreeSet<&str> =
                set.questions.iter().map(|q| q.category.as_str()).collect();
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "  Found {} questions in {} categories.",
                        set.questions.len(),
                        categories.len()
                    ),
                    Style::default().fg(colors.success()),
                )),
                Line::from(""),
                input_line("  Name: ", &app.import_name, colors),
            ]
        }
    };
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, frame.buffer_mut());
}

fn render_setup(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let (Some(form), Some(base)) = (app.setup.as_ref(), app.current_base()) else {
        return;
    };
    frame.render_widget(
        SetupView::new(form, &base.questions, &base.name, app.theme),
        centered_rect(60, 80, area),
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    frame.render_widget(QuizView::new(session, app.theme), area);
    if app.quiz_confirm_quit {
        frame.render_widget(
            ConfirmDialog::new("Leave this quiz? Progress is kept.", app.theme),
            area,
        );
    }
}

fn render_results(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    if let Some((base, attempt)) = app.results_view() {
        frame.render_widget(ResultsView::new(base, attempt, app.results_scroll, app.theme), area);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let rows = app.history_rows();
    let title = match app.current_base() {
        Some(base) => format!("History: {}", base.name),
        None => "History".to_string(),
    };
    frame.render_widget(
        HistoryTable::new(&rows, app.history_selected, title, app.theme),
        area,
    );
}
