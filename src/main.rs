use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use vibecheck::api::{ApiClient, Catalog};
use vibecheck::config::{Command, Config, api_base_from_env_if_empty};
use vibecheck::detail::DetailFanoutLoader;
use vibecheck::event::{self, Event, EventLoop};
use vibecheck::playback::{PlaybackClock, SimulatedMedia};
use vibecheck::search::SearchFlow;
use vibecheck::state::NowPlaying;
use vibecheck::ui::{self, LyricPipe};

type BoxError = Box<dyn Error + Send + Sync>;

const TICK: Duration = Duration::from_millis(250);

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_search(client: &ApiClient, query: &str, limit: usize) -> Result<(), BoxError> {
    let resp = client.search(query.trim(), limit).await?;
    if let Some(intent) = resp.intent_type.as_deref() {
        println!("{} ({} results)", ui::intent_label(intent), resp.results.len());
    }
    for song in &resp.results {
        println!("{}", ui::result_row(song));
    }
    Ok(())
}

async fn run_random(client: &ApiClient, count: usize) -> Result<(), BoxError> {
    for song in client.random_songs(count).await? {
        println!("{:>10}  {} - {}", song.id, song.title, song.artist);
    }
    Ok(())
}

async fn run_song(
    client: ApiClient,
    cfg: &Config,
    id: &str,
    duration: Option<f64>,
    interactive: bool,
    restricted: bool,
) -> Result<(), BoxError> {
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::channel(64);

    let mut media = SimulatedMedia::new(TICK, duration);
    if restricted {
        media = media.restricted();
    }
    let clock = PlaybackClock::new(
        media,
        client.base_url(),
        signal_tx,
        cfg.volume,
    );
    let event_loop = EventLoop::new(
        NowPlaying::new(clock),
        DetailFanoutLoader::new(client.clone(), cfg.recommend_limit),
        SearchFlow::new(client, cfg.search_limit),
        event_tx.clone(),
        update_tx,
    );
    let handle = tokio::spawn(event_loop.run(event_rx, signal_rx));

    event_tx.send(Event::Command(event::Command::Open(id.to_string())))?;
    event_tx.send(Event::Command(event::Command::Play))?;
    if interactive {
        eprintln!("{}", ui::controls::HELP);
        ui::controls::spawn_controls(event_tx.clone());
    }

    let pipe = if interactive {
        LyricPipe::new(false).with_transport()
    } else {
        LyricPipe::new(true)
    };
    let result = ui::display_lyrics_pipe(update_rx, pipe).await;
    let _ = event_tx.send(Event::Shutdown);
    let _ = handle.await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    let mut cfg = Config::parse();
    api_base_from_env_if_empty(&mut cfg);
    init_logging(cfg.debug_log);

    let client = ApiClient::new(cfg.api_base(), cfg.timeout())?;
    let result = match cfg.command.clone() {
        Command::Search { query } => run_search(&client, &query, cfg.search_limit).await,
        Command::Random => run_random(&client, cfg.random_limit).await,
        Command::Song {
            id,
            duration,
            interactive,
            restricted,
        } => run_song(client, &cfg, &id, duration, interactive, restricted).await,
    };

    // Print error if any, for better diagnostics
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }
    Ok(())
}
