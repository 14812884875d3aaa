//! Terminal UI client for the taskdeck server.

mod app;
mod client;
mod event;
mod identity;
mod ui;

use anyhow::Context;
use app::{App, Focus};
use clap::Parser;
use client::ApiClient;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use taskdeck_config::{TaskdeckConfig, default_data_dir};
use taskdeck_core::TaskPatch;
use tokio::sync::mpsc;

/// Command-line options for the TUI client.
#[derive(Parser)]
#[command(name = "taskdeck-tui", version)]
struct Cli {
    /// Optional path to a taskdeck.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Server base URL, e.g. http://localhost:5000
    #[arg(long)]
    server: Option<String>,
    /// Directory holding the persisted user id
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Entry point for the taskdeck TUI client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting TUI (config_set={}, server_set={})",
        cli.config.is_some(),
        cli.server.is_some()
    );

    let config = match &cli.config {
        Some(path) => TaskdeckConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => TaskdeckConfig::default(),
    };

    let server_url = cli
        .server
        .unwrap_or_else(|| config.client.server_url.clone());
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let user_id = identity::load_or_create(&data_dir).context("failed to load user identity")?;
    info!("identity ready (user_id={user_id})");

    let client = ApiClient::new(server_url.clone(), user_id.clone());
    let mut app = App::new(user_id, server_url);

    match client.list_tasks(None).await {
        Ok(tasks) => app.set_tasks(tasks),
        Err(err) => {
            warn!("initial fetch failed: {err:#}");
            app.push_status(format!("failed to fetch tasks: {err}"));
        }
    }

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        let Some(event) = rx.recv().await else { break };
        let AppEvent::Input(key) = event;
        if handle_input(key, &client, &mut app).await? {
            break;
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

/// Dispatch a key press and return true when the app should exit.
async fn handle_input(key: KeyEvent, client: &ApiClient, app: &mut App) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    if app.editing.is_some() {
        handle_edit_input(key, client, app).await;
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab => app.cycle_focus(),
        _ => match app.focus {
            Focus::Input => handle_new_task_input(key, client, app).await,
            Focus::Search => handle_search_input(key, app),
            Focus::List => handle_list_input(key, client, app).await,
        },
    }

    Ok(false)
}

/// Keys while the edit buffer is open.
async fn handle_edit_input(key: KeyEvent, client: &ApiClient, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel_editing(),
        KeyCode::Tab => app.cycle_editing_priority(),
        KeyCode::Enter => save_edit(client, app).await,
        KeyCode::Backspace => {
            if let Some(editing) = app.editing.as_mut() {
                editing.title.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(editing) = app.editing.as_mut() {
                editing.title.push(c);
            }
        }
        _ => {}
    }
}

async fn save_edit(client: &ApiClient, app: &mut App) {
    let Some(editing) = app.editing.take() else {
        return;
    };
    let title = editing.title.trim().to_string();
    if title.is_empty() {
        app.push_status("title cannot be empty");
        app.editing = Some(editing);
        return;
    }

    let patch = TaskPatch {
        title: Some(title),
        priority: Some(editing.priority),
        completed: None,
    };
    match client.update_task(editing.id, &patch).await {
        Ok(task) => {
            app.replace_task(task);
            app.push_status("task updated");
        }
        Err(err) => {
            warn!("update failed: {err:#}");
            app.push_status(format!("update failed: {err}"));
        }
    }
}

/// Keys while the new-task input line has focus.
async fn handle_new_task_input(key: KeyEvent, client: &ApiClient, app: &mut App) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('p') {
        app.cycle_input_priority();
        return;
    }

    match key.code {
        KeyCode::Enter => {
            let title = app.input.trim().to_string();
            if title.is_empty() {
                return;
            }
            match client.create_task(&title, app.input_priority).await {
                Ok(task) => {
                    app.insert_task(task);
                    app.input.clear();
                    app.input_priority = taskdeck_core::Priority::Low;
                    app.push_status("task added");
                }
                Err(err) => {
                    warn!("create failed: {err:#}");
                    app.push_status(format!("create failed: {err}"));
                }
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

/// Keys while the search line has focus.
fn handle_search_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Backspace => {
            app.search.pop();
            app.selected = 0;
        }
        KeyCode::Char(c) => {
            app.search.push(c);
            app.selected = 0;
        }
        _ => {}
    }
}

/// Keys while the task list has focus.
async fn handle_list_input(key: KeyEvent, client: &ApiClient, app: &mut App) {
    match key.code {
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Char(' ') => toggle_selected(client, app).await,
        KeyCode::Char('e') => app.start_editing(),
        KeyCode::Char('d') => delete_selected(client, app).await,
        KeyCode::Char('p') => {
            app.cycle_priority_filter();
            refresh(client, app).await;
        }
        KeyCode::Char('r') => refresh(client, app).await,
        _ => {}
    }
}

async fn toggle_selected(client: &ApiClient, app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let patch = TaskPatch {
        title: None,
        priority: None,
        completed: Some(!task.completed),
    };
    match client.update_task(task.id, &patch).await {
        Ok(task) => app.replace_task(task),
        Err(err) => {
            warn!("toggle failed: {err:#}");
            app.push_status(format!("update failed: {err}"));
        }
    }
}

async fn delete_selected(client: &ApiClient, app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let id = task.id;
    match client.delete_task(id).await {
        Ok(()) => {
            app.remove_task(id);
            app.push_status("task deleted");
        }
        Err(err) => {
            warn!("delete failed: {err:#}");
            app.push_status(format!("delete failed: {err}"));
        }
    }
}

async fn refresh(client: &ApiClient, app: &mut App) {
    match client.list_tasks(app.priority_filter).await {
        Ok(tasks) => {
            app.set_tasks(tasks);
            app.push_status("tasks refreshed");
        }
        Err(err) => {
            warn!("refresh failed: {err:#}");
            app.push_status(format!("failed to fetch tasks: {err}"));
        }
    }
}

fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = crossterm::event::poll(Duration::from_millis(30)) {
                while let Ok(true) = crossterm::event::poll(Duration::from_millis(0)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    if let CrosstermEvent::Key(key) = event {
                        let _ = sender.send(AppEvent::Input(key)).await;
                    }
                }
            }
        }
    });
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
