use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use session_logging::session_warn;
use tripreport_core::{update, AppState, Msg};
use tripreport_engine::{BackendSettings, EngineConfig};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;

/// Events feeding the main loop: core messages plus app control.
pub(crate) enum AppEvent {
    Core(Msg),
    Quit,
}

pub fn run_app() -> io::Result<()> {
    logging::initialize(LogDestination::File);

    let settings = backend_settings_from_env()?;
    let download_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("downloads");
    let mut config = EngineConfig::with_download_dir(download_dir);
    config.settings = settings;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner =
        EffectRunner::new(event_tx.clone(), config).map_err(|err| io::Error::other(err.to_string()))?;

    spawn_stdin_reader(event_tx);

    println!("Trip Analytics Tool");
    println!("{}", ui::render::COMMANDS_HELP);

    let mut state = AppState::new();
    while let Ok(event) = event_rx.recv() {
        let msg = match event {
            AppEvent::Quit => break,
            AppEvent::Core(msg) => msg,
        };
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.enqueue(effects);
        if state.consume_dirty() {
            ui::render::render(&state.view());
        }
    }
    Ok(())
}

/// Backend base URL from argv, then the environment, then the default.
fn backend_settings_from_env() -> io::Result<BackendSettings> {
    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TRIPREPORT_BACKEND_URL").ok());
    match base_url {
        Some(url) => BackendSettings::with_base_url(&url)
            .map_err(|err| io::Error::other(format!("invalid backend url: {err}"))),
        None => Ok(BackendSettings::default()),
    }
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => {
                    let _ = event_tx.send(AppEvent::Quit);
                    return;
                }
                Ok(Some(Command::Help)) => println!("{}", ui::render::COMMANDS_HELP),
                Ok(Some(command)) => match event_for(command) {
                    Ok(event) => {
                        if event_tx.send(event).is_err() {
                            return;
                        }
                    }
                    Err(message) => {
                        session_warn!("{}", message);
                        eprintln!("{message}");
                    }
                },
                Err(message) => eprintln!("{message}"),
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(PathBuf),
    Sheet(String),
    Generate,
    Download(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let command = match (verb, rest) {
        ("select", "") => return Err("usage: select <path>".into()),
        ("select", path) => Command::Select(PathBuf::from(path)),
        ("sheet", "") => return Err("usage: sheet <name>".into()),
        ("sheet", name) => Command::Sheet(name.to_string()),
        ("generate", _) => Command::Generate,
        ("download", "") => return Err("usage: download <filename>".into()),
        ("download", filename) => Command::Download(filename.to_string()),
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn event_for(command: Command) -> Result<AppEvent, String> {
    let msg = match command {
        Command::Select(path) => load_selected_file(&path)?,
        Command::Sheet(name) => Msg::WorksheetSelected(name),
        Command::Generate => Msg::GenerateClicked,
        Command::Download(filename) => Msg::DownloadClicked { filename },
        // Help and Quit never reach here; the reader loop handles them.
        Command::Help | Command::Quit => Msg::NoOp,
    };
    Ok(AppEvent::Core(msg))
}

/// The terminal stand-in for the file picker, including its extension
/// filter. Core never re-validates the extension.
fn load_selected_file(path: &Path) -> Result<Msg, String> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("not a file path: {}", path.display()))?
        .to_string();
    if !(name.ends_with(".csv") || name.ends_with(".xlsx")) {
        return Err("only .csv and .xlsx files are supported".to_string());
    }
    let payload =
        std::fs::read(path).map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    Ok(Msg::FileSelected { name, payload })
}
