use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use nearby_buses::app::{App, AppError};
use nearby_buses::config::{AppConfig, ConfigError};
use nearby_buses::countdown::{CountdownContext, SystemClock, TICK};
use nearby_buses::domain::{Coordinates, InvalidStopCode, StopCode};
use nearby_buses::favorites::{AssumeYes, Confirm, FavoritesStore, SaveOutcome};
use nearby_buses::feed::{Feed, FeedClient, FetchError, MockFeed};
use nearby_buses::locator::{DeviceLocation, FixedPosition, Locator, PositionFile};
use nearby_buses::view::PanelKind;

#[derive(Parser, Debug)]
#[command(
    name = "nearby-buses",
    version,
    about = "Find the nearest bus stops and watch live arrival countdowns"
)]
struct Cli {
    /// Device latitude (use with --lon)
    #[arg(long, global = true, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Device longitude (use with --lat)
    #[arg(long, global = true, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Read the device position from a geolocation result document
    #[arg(long, global = true)]
    position_file: Option<PathBuf>,

    /// Favourites document
    #[arg(long, global = true)]
    favorites: Option<PathBuf>,

    /// Serve stops and arrivals from a fixture directory instead of the network
    #[arg(long, global = true)]
    mock_feed: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate and list the nearest stops
    Nearby {
        /// Show arrivals for the stop at this position in the list
        #[arg(long)]
        select: Option<usize>,

        /// Keep the selected board on screen, refreshing every second
        #[arg(long, requires = "select")]
        watch: bool,

        /// Save the stop at this position in the list as a favourite
        #[arg(long)]
        save: Option<usize>,
    },

    /// Show arrivals at a stop once
    Arrivals { code: String },

    /// Show arrivals at a stop, refreshing every second until Ctrl-C
    Watch { code: String },

    /// Manage favourite stops
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List saved favourites
    List,

    /// Save a stop
    Add {
        code: String,

        /// Display name; looked up in the stop registry when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove the favourite at this position
    Remove {
        index: usize,

        /// Don't ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Show arrivals for the favourite at this position
    Show {
        index: usize,

        /// Keep the board on screen, refreshing every second
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    StopCode(#[from] InvalidStopCode),

    #[error("positions start at 1")]
    ZeroIndex,

    #[error("stop {0} is not in the stop registry")]
    UnknownStop(StopCode),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Asks on the terminal.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

type Client = App<Feed, DeviceLocation>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "nearby_buses=debug"
    } else {
        "nearby_buses=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_env()?;

    match (cli.lat, cli.lon) {
        (None, None) => {}
        (Some(lat), Some(lon)) => {
            let position = Coordinates::new(lat, lon).map_err(ConfigError::from)?;
            config = config.with_position(position);
        }
        _ => return Err(ConfigError::IncompletePosition.into()),
    }
    if let Some(path) = &cli.position_file {
        config = config.with_position_file(path);
    }
    if let Some(path) = &cli.favorites {
        config = config.with_favorites_path(path);
    }

    Ok(config)
}

fn build_app(cli: &Cli, config: &AppConfig) -> Result<Client, CliError> {
    let feed = match &cli.mock_feed {
        Some(dir) => Feed::Mock(MockFeed::new(dir)?),
        None => Feed::Live(FeedClient::new(config.feed.clone())?),
    };

    let locator = match (config.position, &config.position_file) {
        (Some(position), _) => Locator::new(DeviceLocation::Fixed(FixedPosition(position))),
        (None, Some(path)) => Locator::new(DeviceLocation::File(PositionFile::new(path))),
        (None, None) => Locator::unsupported(),
    }
    .with_timeout(config.locate_timeout());

    let countdown = CountdownContext::new(Arc::new(SystemClock), config.countdown_floor());

    Ok(App::new(
        feed,
        locator,
        FavoritesStore::new(config.favorites()),
        config.nearest_count,
        countdown,
    ))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let app = build_app(&cli, &config)?;

    let result = match cli.command {
        Command::Nearby {
            select,
            watch,
            save,
        } => nearby(&app, select, watch, save).await,
        Command::Arrivals { code } => {
            let stop = StopCode::parse(&code)?;
            let result = app.select_stop(PanelKind::Nearby, stop).await;
            print!("{}", app.draw_board(PanelKind::Nearby).await?);
            result.map_err(CliError::from)
        }
        Command::Watch { code } => {
            let stop = StopCode::parse(&code)?;
            app.select_stop(PanelKind::Nearby, stop).await?;
            watch_board(&app, PanelKind::Nearby).await
        }
        Command::Favorites { action } => favorites(&app, action).await,
    };

    app.shutdown();
    result
}

async fn nearby(
    app: &Client,
    select: Option<usize>,
    watch: bool,
    save: Option<usize>,
) -> Result<(), CliError> {
    let located = app.locate_nearby().await;
    print!("{}", app.draw_stop_list().await?);
    located?;

    if let Some(index) = save {
        let outcome = app.save_nearby_favorite(zero_based(index)?).await?;
        report_save(outcome);
    }

    if let Some(index) = select {
        let selected = app.select_nearby(zero_based(index)?).await;
        if watch && selected.is_ok() {
            return watch_board(app, PanelKind::Nearby).await;
        }
        println!();
        print!("{}", app.draw_board(PanelKind::Nearby).await?);
        selected?;
    }

    Ok(())
}

async fn favorites(app: &Client, action: FavoritesCommand) -> Result<(), CliError> {
    match action {
        FavoritesCommand::List => print!("{}", app.draw_favorites()?),
        FavoritesCommand::Add { code, name } => {
            let stop = StopCode::parse(&code)?;
            let name = match name {
                Some(name) => name,
                None => match app.lookup_stop(&stop).await? {
                    Some(record) => record.name,
                    None => return Err(CliError::UnknownStop(stop)),
                },
            };
            report_save(app.save_favorite(stop, &name)?);
        }
        FavoritesCommand::Remove { index, yes } => {
            let index = zero_based(index)?;
            let removed = if yes {
                app.remove_favorite(index, &AssumeYes)?
            } else {
                app.remove_favorite(index, &PromptConfirm)?
            };
            println!("Removed {} from favourites.", removed.name);
        }
        FavoritesCommand::Show { index, watch } => {
            let selected = app.select_favorite(zero_based(index)?).await;
            if watch && selected.is_ok() {
                return watch_board(app, PanelKind::Favorites).await;
            }
            print!("{}", app.draw_board(PanelKind::Favorites).await?);
            selected?;
        }
    }
    Ok(())
}

/// Redraw `kind`'s board every tick until Ctrl-C.
async fn watch_board(app: &Client, kind: PanelKind) -> Result<(), CliError> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut interval = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = interval.tick() => {
                let board = app.draw_board(kind).await?;
                let mut stdout = io::stdout().lock();
                write!(stdout, "\x1b[2J\x1b[H{board}")?;
                stdout.flush()?;
            }
        }
    }

    println!();
    Ok(())
}

fn report_save(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved => println!("Saved to favourites."),
        SaveOutcome::AlreadySaved => println!("Already in favourites."),
    }
}

/// Positions are typed 1-based.
fn zero_based(index: usize) -> Result<usize, CliError> {
    index.checked_sub(1).ok_or(CliError::ZeroIndex)
}
