mod app;
mod event;
mod ui;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::{info, warn};

use devtype::config::Config;
use devtype::engine::filter::ContentFilter;
use devtype::keyboard::layout::{LayoutKind, TransliterationLayout};
use devtype::keyboard::model::KeyboardModel;
use devtype::keyboard::transliterate::KeyResolver;
use devtype::session::lesson::LessonCatalog;
use devtype::session::tracker::SessionPhase;
use devtype::store::json_store::JsonStore;
use devtype::telemetry;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::menu::LessonMenu;
use ui::components::progress_bar::ProgressBar;
use ui::components::stats_sidebar::StatsSidebar;
use ui::components::typing_area::TypingArea;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "devtype", version, about = "Terminal Hindi typing tutor for the InScript layout")]
struct Cli {
    #[arg(short, long, help = "Transliteration layout (inscript)")]
    layout: Option<String>,

    #[arg(short, long, help = "Run timed attempts of this many seconds")]
    timer: Option<u64>,

    #[arg(long, help = "Open this lesson id directly")]
    lesson: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check text against the prohibited-word list. Exits 1 when blocked.
    Check { text: String },
    /// Transliterate a QWERTY key sequence; uppercase letters mean Shift.
    Translit { keys: String },
    /// Print per-lesson progress.
    Progress,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let store = JsonStore::new();
    let log_dir = match &store {
        Ok(s) => s.base_dir().clone(),
        Err(_) => PathBuf::from("."),
    };
    if let Err(e) = telemetry::init_tracing(&log_dir) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(
            error = ?e,
            path = %Config::config_path().display(),
            "config unreadable, using defaults"
        );
        Config::default()
    });
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if LayoutKind::from_name(&config.layout).is_none() {
        let known: Vec<&str> = LayoutKind::ALL.iter().map(|k| k.name()).collect();
        warn!(layout = %config.layout, ?known, "unknown layout, using default");
        eprintln!(
            "warning: unknown layout {:?}; known layouts: {}",
            config.layout,
            known.join(", ")
        );
    }
    if let Some(secs) = cli.timer {
        config.timer_secs = secs;
        config.timed_mode = true;
    }
    config.normalize();

    match cli.command {
        Some(Command::Check { text }) => return run_check(&config, &text),
        Some(Command::Translit { keys }) => {
            let model = KeyboardModel::qwerty();
            let layout = TransliterationLayout::new(config.layout_kind());
            println!("{}", KeyResolver::new(&model, &layout).transliterate_qwerty(&keys));
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Progress) => {
            print_progress(&store?)?;
            return Ok(ExitCode::SUCCESS);
        }
        None => {}
    }

    let store = store
        .inspect_err(|e| warn!(error = %e, "progress will not be saved"))
        .ok();
    let mut app = App::new(config, store)?;
    if let Some(id) = cli.lesson {
        if app.select_lesson(&id) {
            app.start_lesson();
        } else {
            eprintln!("warning: unknown lesson {id:?}");
        }
    }
    info!(layout = %app.config.layout, timed = app.config.timed_mode, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Report event kinds so auto-repeat arrives as Repeat, not Press
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();
    if !keyboard_enhanced {
        warn!("terminal does not report key event types; held keys will repeat");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_check(config: &Config, text: &str) -> Result<ExitCode> {
    let filter = ContentFilter::with_extra(&config.extra_prohibited_words)?;
    let validation = filter.validate_typing_input(text);
    if validation.is_valid {
        println!("ok");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", validation.warning);
        Ok(ExitCode::from(1))
    }
}

fn print_progress(store: &JsonStore) -> Result<()> {
    let catalog = LessonCatalog::builtin()?;
    let progress = store.load_progress().into_tracker();

    for lesson in catalog.iter() {
        match progress.get(&lesson.id) {
            Some(p) => {
                let done = match p.completed_date {
                    Some(date) => format!("completed {}", date.format("%Y-%m-%d")),
                    None => "in progress".to_string(),
                };
                println!(
                    "{:<24} {:>3} wpm {:>3}%  {} attempts  {done}",
                    lesson.id, p.best_wpm, p.best_accuracy, p.attempts
                );
            }
            None => println!("{:<24} not started", lesson.id),
        }
    }
    println!(
        "{}/{} lessons completed ({}%)",
        progress.completed_count(),
        catalog.len(),
        progress.progress_percentage(catalog.len())
    );
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
    // Only process Press events; Repeat would inflate input
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.start_lesson(),
        _ => {}
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.stop(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_key(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.retry_lesson(),
        KeyCode::Char('n') => app.next_lesson(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Result => render_result(frame, app),
    }
}

fn header_line<'a>(title: &'a str, info: String, app: &App) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(colors.header_fg)
                .bg(colors.header_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending)
                .bg(colors.header_bg),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg))
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let timed = if app.config.timed_mode {
        format!(" | timed {}s", app.config.timer_secs)
    } else {
        String::new()
    };
    let info = format!(" layout {}{timed}", app.layout_name());
    frame.render_widget(header_line(" devtype ", info, app), layout[0]);

    let menu_area = ui::layout::centered_rect(60, 90, layout[1]);
    let menu = LessonMenu::new(&app.catalog, &app.progress, app.selected, &app.theme);
    frame.render_widget(menu, menu_area);

    let bar = ProgressBar::new(
        app.progress.completed_count(),
        app.catalog.len(),
        app.progress_percentage(),
        &app.theme,
    );
    frame.render_widget(bar, layout[2]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Enter] Start  [j/k] Select  [q] Quit ",
        Style::default().fg(colors.text_pending),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(lesson) = app.current_lesson() else {
        return;
    };
    let app_layout = AppLayout::new(area);
    let m = &app.live_metrics;

    // Narrow terminals get compact stats in the header
    let info = if app_layout.tier.show_sidebar() {
        String::new()
    } else {
        let left = app
            .time_remaining()
            .map(|s| format!(" | Left: {s}s"))
            .unwrap_or_default();
        format!(" | WPM: {} | Acc: {}% | Errors: {}{left}", m.wpm, m.accuracy, m.errors)
    };
    let title = format!(" {} ", lesson.title);
    frame.render_widget(header_line(&title, info, app), app_layout.header);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(app_layout.main);

    let typing = TypingArea::new(&lesson.text, &app.typed, &app.theme);
    frame.render_widget(typing, main_layout[0]);

    if let Some(warning) = &app.warning {
        let warn = Paragraph::new(Line::from(Span::styled(
            warning.as_str(),
            Style::default().fg(colors.error),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(colors.error)));
        frame.render_widget(warn, main_layout[1]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let sidebar = StatsSidebar::new(
            m,
            app.threshold(),
            app.time_remaining(),
            app.progress.get(&lesson.id),
            &app.theme,
        );
        frame.render_widget(sidebar, sidebar_area);
    }

    let hint = match app.phase() {
        SessionPhase::Idle => " Start typing to begin  [ESC] Back ",
        _ => " [ESC] End attempt  [Backspace] Delete ",
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(colors.text_pending),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(result) = &app.last_result {
        let centered = ui::layout::centered_rect(60, 70, area);
        let dashboard = Dashboard::new(
            result,
            app.threshold(),
            app.progress.get(&result.lesson_id),
            app.warning.as_deref(),
            &app.theme,
        );
        frame.render_widget(dashboard, centered);
    }
}
