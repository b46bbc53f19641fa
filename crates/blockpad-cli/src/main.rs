use anyhow::Result;
use blockpad_config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::{self, File},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

mod app;
mod store;
mod ui;

use app::{App, Flow};

fn main() -> Result<()> {
    // Determine document path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let document_path: PathBuf;
    let mut indent_width = 2;
    let mut first_run = false;

    if args.len() == 2 {
        document_path = PathBuf::from(&args[1]);
        match Config::load() {
            Ok(Some(config)) => indent_width = config.indent_width,
            Ok(None) => first_run = true,
            Err(e) => eprintln!("Warning: Ignoring config file: {e}"),
        }
    } else if args.len() == 1 {
        match Config::load() {
            Ok(Some(config)) => {
                document_path = config.document_path;
                indent_width = config.indent_width;
            }
            Ok(None) => {
                eprintln!("Error: No document path provided and no config file found");
                eprintln!("Usage: {} <document.toml>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <document.toml>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [document.toml]", args[0]);
        process::exit(1);
    };

    init_logging(&config_path, &document_path);
    log::info!(
        "starting blockpad-cli with {} (indent width {indent_width})",
        document_path.display()
    );

    // Remember the document so later runs can omit the argument
    if first_run {
        match remember_document(&config_path, &document_path) {
            Ok(()) => log::info!("wrote default config to {}", config_path.display()),
            Err(e) => log::warn!("failed to write config {}: {e}", config_path.display()),
        }
    }

    // Load before touching the terminal so parse errors print normally
    let mut app = match App::new(document_path.clone(), indent_width) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.is_dirty() {
        eprintln!("Unsaved changes to {} were discarded", document_path.display());
    }

    Ok(())
}

/// Write a default config pointing at `document_path`
fn remember_document(config_path: &Path, document_path: &Path) -> Result<()> {
    let absolute = std::path::absolute(document_path)?;
    Config::new(absolute).save_to_path(config_path)
}

/// Log file beside the config file, never the document itself
fn log_path(config_path: &Path, document_path: &Path) -> Option<PathBuf> {
    let path = config_path.with_file_name("blockpad.log");
    let document = std::path::absolute(document_path).unwrap_or_else(|_| document_path.into());
    (path != document).then_some(path)
}

/// Log to a file; stderr belongs to the terminal UI
fn init_logging(config_path: &Path, document_path: &Path) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);

    let file = log_path(config_path, document_path).and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        File::create(path).ok()
    });
    match file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key) == Flow::Quit
        {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_run_config_remembers_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("blockpad").join("config.toml");
        let document = dir.path().join("notes.toml");

        remember_document(&config_path, &document).unwrap();
        let config = Config::load_from_path(&config_path).unwrap().unwrap();

        assert_eq!(config.document_path, document);
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_log_path_sits_beside_config() {
        let config = Path::new("/home/me/.config/blockpad/config.toml");

        assert_eq!(
            log_path(config, Path::new("/home/me/notes.log")),
            Some(PathBuf::from("/home/me/.config/blockpad/blockpad.log"))
        );
    }

    #[test]
    fn test_log_path_never_truncates_the_document() {
        let config = Path::new("/home/me/.config/blockpad/config.toml");
        let document = Path::new("/home/me/.config/blockpad/blockpad.log");

        assert_eq!(log_path(config, document), None);
    }
}
