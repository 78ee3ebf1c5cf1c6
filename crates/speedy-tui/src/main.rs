//! Speedy TUI - search overlay for files, folders and applications.
//!
//! This is the main entry point. It loads the config, starts indexing in
//! the background and runs the overlay in the terminal's alternate screen.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
};
use speedy_core::config::{Config, Directories};
use speedy_core::{IndexEngine, SearchEngine, Shell, SystemShell, UsageLog};
use speedy_tui::overlay::Overlay;
use speedy_tui::render::{self, Hints};
use speedy_tui::shortcut::{KeyBus, Shortcut, Subscription};
use speedy_tui::widgets::{kind_glyph, score_label};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;

use cli::{Cli, Commands};

/// What a global shortcut asks the event loop to do.
#[derive(Debug, Clone, Copy)]
enum BusCommand {
    Toggle,
    Quit,
}

fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("speedy-tui-{timestamp}.log");

    #[cfg(unix)]
    {
        let symlink_path = log_dir.join("speedy-tui.log");
        let _ = std::fs::remove_file(&symlink_path);
        let _ = std::os::unix::fs::symlink(log_dir.join(&log_filename), &symlink_path);
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| Directories::new().config_file);

    let mut config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if !cli.roots.is_empty() {
        config.index.roots.clone_from(&cli.roots);
    }

    config.validate()?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Index engine ranking with the persisted activation history.
fn open_engine(config: &Config) -> IndexEngine {
    let usage_file = Directories::new().usage_file;
    let usage = UsageLog::load(&usage_file).unwrap_or_else(|e| {
        tracing::warn!("Failed to read {}: {}", usage_file.display(), e);
        UsageLog::in_memory()
    });
    IndexEngine::with_usage(config.index.clone(), usage)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Index) => show_index_stats(&config).await?,
        Some(Commands::Query { query }) => search_query(&config, &query).await?,
        Some(Commands::Tui) | None => run_tui(&config).await?,
    }

    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let toggle = Shortcut::parse(&config.overlay.toggle_shortcut)?;
    let quit = Shortcut::parse(&config.overlay.quit_shortcut)?;
    let hints = Hints {
        toggle: toggle.to_string(),
        quit: quit.to_string(),
    };

    let engine = open_engine(config);
    let builder = engine.clone();
    tokio::spawn(async move {
        if let Err(e) = builder.build().await {
            tracing::error!("Indexing failed: {}", e);
        }
    });

    let engine: Arc<dyn SearchEngine> = Arc::new(engine);
    let shell: Arc<dyn Shell> = Arc::new(SystemShell::new());
    let (mut overlay, inbox) = Overlay::new(engine, shell, &config.overlay);
    if config.overlay.start_visible {
        overlay.open();
    }

    let bus = KeyBus::new();
    let (bus_tx, bus_rx) = mpsc::unbounded_channel();
    let subscriptions = subscribe_shortcuts(&bus, toggle, quit, &bus_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut overlay, inbox, &bus, bus_rx, &hints).await;

    drop(subscriptions);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn subscribe_shortcuts(
    bus: &KeyBus,
    toggle: Shortcut,
    quit: Shortcut,
    tx: &mpsc::UnboundedSender<BusCommand>,
) -> [Subscription; 2] {
    let toggle_tx = tx.clone();
    let quit_tx = tx.clone();
    [
        bus.subscribe(toggle, move || {
            let _ = toggle_tx.send(BusCommand::Toggle);
        }),
        bus.subscribe(quit, move || {
            let _ = quit_tx.send(BusCommand::Quit);
        }),
    ]
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    overlay: &mut Overlay,
    mut inbox: mpsc::UnboundedReceiver<speedy_tui::overlay::OverlayMsg>,
    bus: &KeyBus,
    mut bus_rx: mpsc::UnboundedReceiver<BusCommand>,
    hints: &Hints,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut needs_render = true;
    let mut list_area: Option<Rect> = None;

    loop {
        if needs_render {
            terminal.draw(|f| list_area = render::ui(f, overlay, hints))?;

            // Redraw once more if the new viewport moved the list
            let offset = overlay.scroll_offset();
            overlay.set_viewport_rows(list_area.map_or(0, |a| usize::from(a.height)));
            needs_render = overlay.scroll_offset() != offset;
        }

        tokio::select! {
            Some(msg) = inbox.recv() => {
                overlay.handle_message(msg);
                needs_render = true;
            }

            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::error!("Event stream error: {}", e);
                        continue;
                    }
                };

                match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        tracing::debug!("KEY EVENT: code={:?}, modifiers={:?}", key.code, key.modifiers);
                        if !bus.dispatch(&key) {
                            overlay.handle_key(&key);
                        }
                    }
                    Event::Mouse(mouse) => handle_mouse(overlay, &mouse, list_area),
                    Event::Resize(..) => {}
                    _ => continue,
                }
                needs_render = true;
            }
        }

        while let Ok(command) = bus_rx.try_recv() {
            match command {
                BusCommand::Toggle => overlay.toggle(),
                BusCommand::Quit => return Ok(()),
            }
            needs_render = true;
        }
    }
}

fn handle_mouse(overlay: &mut Overlay, mouse: &MouseEvent, list_area: Option<Rect>) {
    let Some(area) = list_area else {
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left)
            if area.contains(Position::new(mouse.column, mouse.row)) =>
        {
            overlay.click_row(usize::from(mouse.row - area.y));
        }
        MouseEventKind::ScrollDown => overlay.select_next(),
        MouseEventKind::ScrollUp => overlay.select_previous(),
        _ => {}
    }
}

async fn show_index_stats(config: &Config) -> Result<()> {
    let engine = open_engine(config);
    engine.build().await?;
    let stats = engine.stats();

    println!();
    println!("Index Statistics");
    println!("================");
    println!();
    println!("Total Items: {}", stats.total());
    println!();
    println!("  {:<14} {}", "applications", stats.applications);
    println!("  {:<14} {}", "folders", stats.folders);
    println!("  {:<14} {}", "files", stats.files);
    println!();

    Ok(())
}

async fn search_query(config: &Config, query: &str) -> Result<()> {
    println!("Searching: {query}");

    let engine = open_engine(config);
    engine.build().await?;

    let results = engine.search(query.to_string()).await?;

    println!();
    println!("Results: {} items", results.len());
    for (i, r) in results.iter().enumerate() {
        let score = score_label(r.clamped_score()).unwrap_or_default();
        println!(
            "  {}. {} {} - {} [{}] {}",
            i + 1,
            kind_glyph(r.kind),
            r.name,
            r.path,
            r.kind,
            score
        );
    }

    Ok(())
}
