use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use inti_showcase::app::{App, run_app_with_event_source};
use inti_showcase::event_source::KeyboardEventSource;
use inti_showcase::panic_handler;
use inti_showcase::sample_report::SampleReport;
use inti_showcase::settings;
use inti_showcase::viewer::ViewerService;

#[derive(Parser, Debug)]
#[command(name = "inti-showcase", version)]
#[command(about = "Inti Cash Bot showcase: PDF report viewer, chat mockup and demo form", long_about = None)]
struct Args {
    /// PDF to open in the viewer at startup
    file: Option<PathBuf>,

    /// Settings file to use instead of the platform config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, value_name = "PATH", default_value = "inti-showcase.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[cfg(feature = "pdf")]
fn spawn_viewer() -> ViewerService {
    ViewerService::spawn(inti_showcase::backend::MupdfBackend::new)
}

#[cfg(not(feature = "pdf"))]
fn spawn_viewer() -> ViewerService {
    ViewerService::spawn(|| inti_showcase::backend::UnsupportedBackend)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    WriteLogger::init(level, Config::default(), log_file)?;

    info!("Starting Inti showcase");
    settings::load_settings(args.config.as_deref());
    panic_handler::initialize_panic_handler();

    let report = SampleReport::new(
        settings::get_sample_report_path(),
        settings::get_site_origin(),
        settings::get_download_dir(),
    );
    let mut app = App::new(spawn_viewer(), report);
    if let Some(file) = args.file {
        app.open_file(file);
    }

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_with_event_source(&mut terminal, &mut app, &mut KeyboardEventSource);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down Inti showcase");
    Ok(())
}
