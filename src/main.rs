use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use thicket_core::{SimConfig, World};
use thicket_lib::app::App;
use thicket_lib::demo::{self, DemoLayout};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ticks to simulate (ignored with --realtime)
    #[arg(short, long, default_value_t = 3000)]
    ticks: u64,

    /// Run on the wall clock for this many seconds instead
    #[arg(long)]
    realtime: Option<u64>,

    /// Rooms in the demo dungeon
    #[arg(long, default_value_t = 4)]
    rooms: u32,

    /// Organisms per room
    #[arg(long, default_value_t = 40)]
    per_room: usize,

    /// Write every event as a JSON line to this file
    #[arg(short, long)]
    events: Option<PathBuf>,
}

fn main() -> Result<()> {
    thicket_core::init_logging();

    let args = Args::parse();
    let mut config = SimConfig::load_or_default(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }
    config.validate()?;

    let seed = config.world.seed.unwrap_or_else(rand::random);
    config.world.seed = Some(seed);
    let layout = DemoLayout {
        rooms: args.rooms.max(1),
        per_room: args.per_room,
        with_player: true,
    };
    let (rooms, entities) = demo::generate(seed, layout);
    let world = World::new(config, rooms, entities).context("building demo dungeon")?;

    let mut app = App::new(world);
    if let Some(path) = &args.events {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        app = app.with_event_sink(Box::new(BufWriter::new(file)));
    }

    let summary = match args.realtime {
        Some(secs) => app.run_realtime(Duration::from_secs(secs))?,
        None => app.run_ticks(args.ticks)?,
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary)?;
    writeln!(stdout)?;
    Ok(())
}
