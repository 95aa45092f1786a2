use clap::Parser;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use tracing::{error, info};

mod cli;

use cli::{Cli, Commands};
use cortex_explore::{
    config::{Config, DataLocation},
    explore_tui::{ui::truncate_to_width, App},
    library::{detail, load, source_from_config, ExploreState},
    models::DocumentRecord,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "cortex_explore=info,cortex=info");
    }

    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(path) = cli.file.clone() {
        config = config.with_data(DataLocation::File(path));
    } else if let Some(url) = cli.url.clone() {
        config = config.with_data(DataLocation::Url(url));
    }

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(&config.log_file, interactive);

    info!("Starting CORTEX explorer with data from {}", config.data_description());
    config.validate()?;

    match cli.command {
        None | Some(Commands::Tui) => run_tui(config).await,
        Some(Commands::List { query, sort, asc, desc }) => {
            let spec = Commands::sort_spec(&sort, asc, desc)?;
            let mut state = load_state(&config).await;
            state.set_query(query.unwrap_or_default());
            state.set_sort(spec);
            print_listing(&state.view());
            Ok(())
        }
        Some(Commands::Show { id, analysis }) => {
            let mut state = load_state(&config).await;
            if !state.select(&id) {
                eprintln!("Document not found: {}", id);
                std::process::exit(1);
            }
            if analysis {
                state.toggle_analysis();
            }
            if let Some(detail) = state.detail() {
                print!("{}", detail);
            }
            Ok(())
        }
    }
}

/// Log to a file only for the explorer so output does not fight the
/// display; command mode also logs to stderr.
fn init_logging(log_file: &Path, interactive: bool) {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "cortex.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

/// Fetch the collection once for command mode; load failures end the process
async fn load_state(config: &Config) -> ExploreState {
    let records = match source_from_config(config) {
        Ok(source) => load(source.as_ref()).await,
        Err(e) => Err(e),
    };

    match records {
        Ok(records) => {
            let mut state = ExploreState::new().with_summary_search(config.search_summary);
            let ticket = state.begin_load();
            state.apply_load(ticket, Ok(records));
            state
        }
        Err(e) => {
            error!("Failed to load documents: {}", e);
            eprintln!("Failed to load documents from {}: {}", config.data_description(), e);
            std::process::exit(1);
        }
    }
}

fn print_listing(view: &[&DocumentRecord]) {
    if view.is_empty() {
        println!("No matching files found");
        return;
    }

    println!(
        "{} {} {} {} {}",
        truncate_to_width("TITLE", 40),
        truncate_to_width("AUTHORS", 25),
        truncate_to_width("CREATED", 14),
        truncate_to_width("ADDED", 14),
        "TAGS"
    );
    println!("{}", "-".repeat(110));

    for record in view {
        let (tags, hidden) = detail::row_tags(&record.tags);
        let mut tag_text = tags.join(", ");
        if hidden > 0 {
            tag_text.push_str(&format!(" +{}", hidden));
        }

        println!(
            "{} {} {} {} {}",
            truncate_to_width(record.display_title(), 40),
            truncate_to_width(&detail::format_authors(&record.authors), 25),
            truncate_to_width(&detail::format_date(record.created_date.as_deref()), 14),
            truncate_to_width(&detail::format_date(record.added_date.as_deref()), 14),
            tag_text
        );
    }

    println!();
    println!("Total: {} documents", view.len());
}

async fn run_tui(config: Config) -> Result<()> {
    let source = source_from_config(&config).context("Failed to create document source")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw terminal mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, source);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("CORTEX explorer exited successfully");
        }
        Err(e) => {
            error!("CORTEX explorer encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
