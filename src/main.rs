mod app;
mod catalog;
mod config;
mod filter;
mod logging;
mod nav;
mod store;
mod tags;
mod theme;
mod ui;
mod view;

use chrono::Datelike;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    env,
    error::Error,
    fs, io,
    process::{Command, Stdio},
    thread,
};

use crate::app::{App, Effect};
use crate::store::{FileStore, PreferenceStore};
use crate::theme::ThemeController;

type AppResult<T> = Result<T, Box<dyn Error>>;

fn main() -> AppResult<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("browse") => {
            ensure_tty_stdin()?;
            run_browse()
        }
        Some("schema") => {
            println!("{}", catalog::catalog_schema()?);
            Ok(())
        }
        Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(_) => {
            eprintln!("Unknown command.");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn ensure_tty_stdin() -> AppResult<()> {
    #[cfg(unix)]
    {
        use std::io::IsTerminal;
        use std::os::unix::io::AsRawFd;

        if io::stdin().is_terminal() {
            return Ok(());
        }

        let tty = fs::File::open("/dev/tty")?;
        let result = unsafe { libc::dup2(tty.as_raw_fd(), libc::STDIN_FILENO) };
        if result == -1 {
            return Err(io::Error::last_os_error().into());
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:\n  folio [browse]\n  folio schema");
}

fn run_browse() -> AppResult<()> {
    let config = config::load_config()?;
    logging::init(&config)?;
    tracing::info!(
        catalog = ?config.catalog_path,
        preferences = %config.preferences_path.display(),
        "starting folio"
    );

    let catalog = catalog::load_catalog(config.catalog_path.as_deref())?;
    let store = FileStore::new(config.preferences_path.clone());
    let prefers_dark = theme::detect_prefers_dark(config.prefers_dark);
    let theme = ThemeController::activate(store, prefers_dark);
    tracing::info!(
        preference = theme.preference().label(),
        effective = ?theme.effective(),
        "theme activated"
    );

    let mut app = App::new(catalog, config.site.clone(), theme);
    run_app(&mut app)
}

fn run_app<S: PreferenceStore>(app: &mut App<S>) -> AppResult<()> {
    let (mut terminal, _guard) = setup_terminal()?;
    let year = chrono::Local::now().year();

    loop {
        let size = terminal.size()?;
        app.set_grid_columns(ui::grid_columns(size.width));
        terminal.draw(|frame| ui::draw(frame, app, year))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.handle_key(key) {
                Effect::None => {}
                Effect::Quit => break,
                Effect::OpenLink(url) => {
                    if let Err(err) = open_link(&url) {
                        tracing::warn!(%url, error = %err, "failed to open link");
                        app.set_status(format!("Could not open {}: {}", url, err));
                    }
                }
            },
            _ => {}
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

/// Hands the URL to the platform opener in its own process with no
/// inherited stdio, so nothing flows back into the terminal session.
fn open_link(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    let mut child = command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
    }
}

fn setup_terminal() -> AppResult<(Terminal<CrosstermBackend<io::Stderr>>, TerminalGuard)> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;
    Ok((terminal, TerminalGuard))
}
