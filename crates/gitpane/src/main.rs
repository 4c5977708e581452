use anyhow::{Context, Result};
use clap::Parser;
use gitpane_config::{AppConfig, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use gitpane_diff::{DeltaTool, DiffHighlighter, ToolMode};
use gitpane_vcs::{GitCli, VcsProvider};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{
            self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
            Event, KeyEventKind,
        },
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

mod browser;
mod cli;
mod clipboard;
mod command;
mod dispatcher;
mod executor;
mod hitmap;
mod input;
mod layout;
mod logger;
mod model;
mod msg;
mod render;
mod status;
mod theme;
mod watcher;

use cli::Cli;
use command::Command;
use dispatcher::Dispatcher;
use executor::{Executor, Services};
use input::{key_to_string, MouseInput};
use msg::Msg;
use status::{StatusView, ViewConfig};
use theme::Theme;
use watcher::RepoWatcher;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

const TICK: Duration = Duration::from_millis(100);
const TOAST_TTL: Duration = Duration::from_secs(3);

struct App {
    view: StatusView,
    executor: Executor,
    msg_rx: Receiver<Msg>,
    theme: Theme,
    highlighter: DiffHighlighter,
    editor: Option<String>,
    work_dir: PathBuf,
    toast: Option<(String, Instant)>,
    running: bool,
}

fn main() -> Result<()> {
    let log_file = logger::init();
    let cli = Cli::parse();

    log::info!("Starting gitpane");
    if let Ok(path) = &log_file {
        log::info!("Logging to {:?}", path);
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.no_watch {
        config.watch = false;
    }
    if let Some(mode) = cli.diff_tool {
        config.diff_tool = mode;
    }

    let vcs: Arc<dyn VcsProvider> = Arc::new(GitCli::new());
    let work_dir = vcs
        .repo_root(&cli.path)
        .with_context(|| format!("{:?} is not inside a git repository", cli.path))?;
    log::info!("Repository at {:?}", work_dir);

    // Keep the watcher alive for the whole session; dropping it ends WatchNext
    let (watcher, watch_rx) = if config.watch {
        match RepoWatcher::start(&work_dir, &work_dir.join(".git")) {
            Ok((watcher, rx)) => (Some(watcher), Some(Mutex::new(rx))),
            Err(e) => {
                log::warn!("File watching disabled: {}", e);
                config.watch = false;
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let preferences = preference_store();
    let saved = preferences.load().unwrap_or_else(|e| {
        log::warn!("Failed to load preferences: {:#}", e);
        Default::default()
    });

    let tool = match config.diff_tool {
        ToolMode::Builtin => DeltaTool::default(),
        ToolMode::Auto | ToolMode::Delta => DeltaTool::detect(),
    };

    let (msg_tx, msg_rx) = mpsc::channel();
    let services = Services {
        vcs,
        work_dir: work_dir.clone(),
        page_size: config.commit_page_size,
        tool_mode: config.diff_tool,
        tool: Arc::new(tool),
        clipboard: Arc::new(clipboard::SystemClipboard),
        preferences,
        watch_rx,
    };
    let mut app = App {
        view: StatusView::new(ViewConfig::from(&config), &saved),
        executor: Executor::new(services, Dispatcher::new(msg_tx))?,
        msg_rx,
        theme: Theme::dark(),
        highlighter: DiffHighlighter::with_theme_name(&config.syntax_theme),
        editor: config.resolved_editor(),
        work_dir,
        toast: None,
        running: true,
    };

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    drop(watcher);
    app.executor.shutdown();

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
    }
    log::info!("Exiting gitpane");
    result
}

fn preference_store() -> Arc<dyn PreferenceStore> {
    match FilePreferenceStore::default_location() {
        Ok(store) => {
            log::debug!("Preferences at {:?}", store.path());
            Arc::new(store)
        }
        Err(e) => {
            log::warn!("No preferences location, not persisting: {:#}", e);
            Arc::new(MemoryPreferenceStore::default())
        }
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    let commands = app.view.update(Msg::WindowSize {
        width: size.width,
        height: size.height,
    });
    app.apply(terminal, commands)?;
    let commands = app.view.init();
    app.apply(terminal, commands)?;

    while app.running {
        while let Ok(msg) = app.msg_rx.try_recv() {
            let commands = app.view.update(msg);
            app.apply(terminal, commands)?;
        }
        if app
            .toast
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= TOAST_TTL)
        {
            app.toast = None;
        }

        terminal.draw(|f| {
            render::render(f, &app.view, &app.theme, &mut app.highlighter);
            if let Some((text, _)) = &app.toast {
                render::render_toast(f, text, &app.theme);
            }
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        let commands = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(key) = key_to_string(&key) else {
                    continue;
                };
                if key == "ctrl+c" || (key == "q" && app.view.is_idle()) {
                    app.running = false;
                    continue;
                }
                app.view.handle_key(&key)
            }
            Event::Mouse(mouse) => {
                let input = MouseInput::from(mouse);
                app.view.handle_mouse(&input, Instant::now())
            }
            Event::Resize(width, height) => app.view.update(Msg::WindowSize { width, height }),
            Event::FocusGained => app.view.update(Msg::PluginFocused),
            _ => continue,
        };
        app.apply(terminal, commands)?;
    }
    Ok(())
}

impl App {
    /// Run commands the host owns and hand the rest to the executor
    fn apply(&mut self, terminal: &mut Tui, commands: Vec<Command>) -> Result<()> {
        for command in commands {
            match command {
                Command::OpenFile { path } => {
                    if let Err(e) = self.open_in_editor(terminal, &path) {
                        log::warn!("Opening {} failed: {:#}", path, e);
                        self.toast = Some((format!("Could not open {}", path), Instant::now()));
                    }
                }
                Command::Toast(text) => self.toast = Some((text, Instant::now())),
                command => self.executor.execute(command),
            }
        }
        Ok(())
    }

    /// Hand the terminal to the editor until it exits
    fn open_in_editor(&mut self, terminal: &mut Tui, path: &str) -> Result<()> {
        let Some(editor) = self.editor.clone() else {
            self.toast = Some(("Set $EDITOR to open files".into(), Instant::now()));
            return Ok(());
        };
        let mut parts = editor.split_whitespace();
        let program = parts.next().context("Editor command is empty")?;
        let file = self.work_dir.join(path);

        restore_terminal(terminal)?;
        let status = run_editor(program, parts, &file);
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        terminal.clear()?;

        let status = status?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", program, status);
        }
        let commands = self.view.update(Msg::RefreshRequested);
        self.apply(terminal, commands)
    }
}

fn run_editor<'a>(
    program: &str,
    args: impl Iterator<Item = &'a str>,
    file: &Path,
) -> Result<std::process::ExitStatus> {
    log::info!("Opening {:?} with {}", file, program);
    std::process::Command::new(program)
        .args(args)
        .arg(file)
        .status()
        .with_context(|| format!("Failed to start {}", program))
}
