pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::app::{AppContext, Result};
use crate::config::Keymap;
use crate::controller::PaginationController;

use self::app::{TuiApp, PAGE_SIZE};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let controller = PaginationController::launch(
        Arc::clone(&ctx.source),
        Arc::clone(&ctx.store),
        ctx.config.paging.clone(),
    );
    let keymap = ctx.config.keybindings.keymap();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut tui_app = TuiApp::new();

    loop {
        tui_app.sync(&controller);
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) if tui_app.search_input.is_some() => {
                handle_search_key(&mut tui_app, &controller, key);
            }
            AppEvent::Key(key) => handle_action(&mut tui_app, &controller, &keymap, key),
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    controller.dispose();
    Ok(())
}

fn handle_action(app: &mut TuiApp, controller: &PaginationController, keymap: &Keymap, key: KeyEvent) {
    let action = keymap.action(&key);
    if action != Action::None {
        app.status_message = None;
    }

    let moved = match action {
        Action::Quit => {
            app.should_quit = true;
            None
        }
        Action::MoveUp => app.move_by(-1),
        Action::MoveDown => app.move_by(1),
        Action::PageUp => app.move_by(-(PAGE_SIZE as isize)),
        Action::PageDown => app.move_by(PAGE_SIZE as isize),
        Action::JumpTop => app.jump_top(),
        Action::JumpBottom => app.jump_bottom(),
        Action::NextPane | Action::PrevPane => {
            app.active_pane = app.active_pane.toggle();
            None
        }
        Action::ToggleMaximize => {
            app.toggle_maximize();
            None
        }
        Action::OpenInBrowser => {
            if let Some(article) = app.selected_article() {
                let url = article.url.clone();
                match open::that(&url) {
                    Ok(()) => app.set_status(format!("Opened {}", url)),
                    Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
                }
            }
            None
        }
        Action::Refresh => {
            if controller.refresh().is_none() {
                app.set_status("Already loading");
            }
            None
        }
        Action::Retry => {
            controller.retry();
            None
        }
        Action::Search => {
            app.start_search();
            None
        }
        Action::None => None,
    };

    if let Some(index) = moved {
        if controller.on_scrolled(index).is_some() {
            debug!(index, "Prefetching next page");
        }
    }
}

fn handle_search_key(app: &mut TuiApp, controller: &PaginationController, key: KeyEvent) {
    let Some(input) = app.search_input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.search_input = None,
        KeyCode::Enter => {
            let query = input.trim().to_string();
            app.search_input = None;
            controller.update_search_query(&query);
            app.selected = 0;
            app.list_state.select(Some(0));
        }
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.push(c),
        _ => {}
    }
}
