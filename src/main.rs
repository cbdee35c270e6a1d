use anyhow::Context;
use giftbox_rs::config::Config;
use giftbox_rs::console::{self, ConsolePlatform, ConsoleRenderer};
use giftbox_rs::events::Event;
use giftbox_rs::session::Session;
use giftbox_rs::storage::{FileStorage, Persistence};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let path = std::env::var("GIFTBOX_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg =
        Config::load_or_default(&path).with_context(|| format!("Failed to load {}", path))?;

    init_tracing(&cfg.general.log_level);
    info!(?cfg, "Loaded config");

    let storage = FileStorage::new(&cfg.storage.dir);
    let persistence = Persistence::new(storage, cfg.storage.key.clone());

    // Create the event channel
    let (tx, rx) = mpsc::channel::<Event>(100);

    // Start reading commands
    let (answer_tx, answer_rx) = mpsc::unbounded_channel();
    console::spawn_feed(tx.clone(), answer_tx);

    let session = Session::start(
        persistence,
        ConsolePlatform::new(cfg.user.clone(), answer_rx),
        ConsoleRenderer,
        cfg.session.clone(),
        tx,
        StdRng::from_os_rng(),
    );

    println!("Type 'help' for commands.");
    let state = session.run(rx).await;
    info!(balance = %state.balance, "Bye");
    Ok(())
}
