use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use vaporwatch::source::{describe_port, discover_port, list_ports};
use vaporwatch::telemetry::duration::format_duration;
use vaporwatch::ui::{self, Theme};
use vaporwatch::{events, logging};
use vaporwatch::{App, DataSource, FileSource, PlantLimits, SerialSource, Settings, Timing};

#[derive(Parser, Debug)]
#[command(name = "vaporwatch", version)]
#[command(about = "Live dashboard for steam-plant telemetry read from a serial port")]
struct Args {
    /// Serial port to read (default: the first port that can be opened)
    #[arg(short, long, conflicts_with = "file")]
    port: Option<String>,

    /// Serial baud rate [default: 115200]
    #[arg(short, long)]
    baud: Option<u32>,

    /// Follow or replay a capture file of telemetry lines instead of a serial port
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Configuration file (TOML). Defaults to ./vaporwatch.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected controller cadence, e.g. "100ms"
    #[arg(long)]
    sample_interval: Option<String>,

    /// Time span kept on the charts, e.g. "20s"
    #[arg(short, long)]
    window: Option<String>,

    /// Redraw interval, e.g. "50ms"
    #[arg(short, long)]
    refresh: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_ports {
        return print_ports();
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);
    let timing = settings.timing()?;

    logging::init(settings.logging.file.as_deref(), &settings.logging.level)?;

    println!("=== VAPORWATCH - live steam plant monitor ===");
    println!("  - UI refresh:      {}", format_duration(timing.refresh));
    println!("  - Sample interval: {}", format_duration(timing.sample_interval));
    println!("  - Time window:     {}", format_duration(timing.window));

    // Sources spawn their readers onto this runtime
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source: Box<dyn DataSource> = match args.file {
        Some(ref path) => {
            let source = FileSource::new(path, timing.sample_interval);
            info!(path = %source.path().display(), "reading capture file");
            Box::new(source)
        }
        None => Box::new(open_serial(&settings)?),
    };

    let result = run_tui(source, &timing, settings.limits);

    info!("shutting down");
    rt.shutdown_background();
    result
}

/// Command-line flags win over configuration.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(ref port) = args.port {
        settings.serial.port = Some(port.clone());
    }
    if let Some(baud) = args.baud {
        settings.serial.baud_rate = baud;
    }
    if let Some(ref interval) = args.sample_interval {
        settings.display.sample_interval = interval.clone();
    }
    if let Some(ref window) = args.window {
        settings.display.window = window.clone();
    }
    if let Some(ref refresh) = args.refresh {
        settings.display.refresh = refresh.clone();
    }
    if let Some(ref log_file) = args.log_file {
        settings.logging.file = Some(log_file.clone());
    }
}

/// Open the configured port, or discover one.
fn open_serial(settings: &Settings) -> Result<SerialSource> {
    let baud_rate = settings.serial.baud_rate;
    let port = match settings.serial.port {
        Some(ref port) => port.clone(),
        None => {
            println!("Searching for a serial port...");
            discover_port(baud_rate)?
        }
    };

    println!("Connecting to {} at {} baud...", port, baud_rate);
    let source = SerialSource::open(&port, baud_rate)?;
    info!(port = source.port(), baud = source.baud_rate(), "serial port open");
    println!("Connected!");
    Ok(source)
}

fn print_ports() -> Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in &ports {
        println!("{}", describe_port(port));
    }
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, timing: &Timing, limits: PlantLimits) -> Result<()> {
    // Detect before raw mode; the query talks to the terminal
    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, timing, limits).with_theme(theme);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, timing.refresh);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("dashboard loop failed")
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh: Duration,
) -> Result<()> {
    while app.running {
        let now = Instant::now();

        // Pull everything the reader task has queued and pad gaps
        app.ingest(now);

        terminal.draw(|frame| ui::render(frame, app, now))?;

        // Wait for input until the next refresh is due
        let timeout = refresh.saturating_sub(now.elapsed());
        if let Some(event) = events::poll_event(timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
