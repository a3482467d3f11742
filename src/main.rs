mod brush;
mod config;
mod driver;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use chisel_blocks::BlockRegistry;
use chisel_edit::{ChangeQueueOwner, Location, LogMessenger, MemoryWorld, WorldId};
use chisel_geom::Vector3i;

use brush::BrushKind;
use config::ChiselConfig;
use driver::TickDriver;

const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

#[derive(Parser, Debug)]
#[command(name = "chisel", about = "Apply one brush stroke to an in-memory world, tick by tick")]
struct Cli {
    /// Path to chisel.toml
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = BrushKind::Ellipsoid)]
    shape: BrushKind,
    /// Brush box as W H L
    #[arg(long, num_args = 3, value_names = ["W", "H", "L"], default_values_t = [9, 9, 9])]
    size: Vec<i32>,
    /// Stroke anchor as X Y Z
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true, default_values_t = [0, 0, 0])]
    at: Vec<i32>,
    /// Block name from the registry
    #[arg(long, default_value = "stone")]
    material: String,
    /// Fill the brush's box and hollow the brush out of it
    #[arg(long)]
    carve: bool,
    /// Changes to undo once the stroke has been applied
    #[arg(long, default_value_t = 0)]
    undo: usize,
    /// Changes to redo after undoing
    #[arg(long, default_value_t = 0)]
    redo: usize,
    /// Give up after this many ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
    /// Overrides `tick_budget` from the config
    #[arg(long)]
    budget: Option<usize>,
}

fn triple(v: &[i32]) -> [i32; 3] {
    [v[0], v[1], v[2]]
}

fn run(cli: Cli, cfg: ChiselConfig) -> Result<(), Box<dyn Error>> {
    let registry = match &cfg.blocks {
        Some(path) => BlockRegistry::load_from_path(path)?,
        None => BlockRegistry::from_toml_str(BUILTIN_BLOCKS)?,
    };
    let material = registry
        .block(&cli.material, 0)
        .ok_or_else(|| format!("unknown block `{}`", cli.material))?;

    let brush = brush::build_shape(cli.shape, triple(&cli.size))?;
    let [x, y, z] = triple(&cli.at);
    let at = Location::new(WorldId(0), Vector3i::new(x, y, z));

    let cs = cfg.chunk_size;
    let mut world = MemoryWorld::new(cs, cs, cs);
    let mut owners = vec![ChangeQueueOwner::new(
        "cli".to_string(),
        cfg.history_capacity,
        Box::new(LogMessenger::new("cli")),
    )];
    let mut driver = TickDriver::new(cli.budget.unwrap_or(cfg.tick_budget));

    let stroke = brush::stroke(&brush, material, cli.carve, at)?;
    owners[0].submit(stroke);
    let ticks = driver.run_until_idle(&mut world, &mut owners, cli.max_ticks);
    let stats = world.stats();
    log::info!(
        "applied {} {:?} stroke in {} tick(s): {} blocks in {} chunk(s)",
        cli.material,
        cli.shape,
        ticks,
        stats.stored_blocks,
        stats.chunk_entries
    );

    if cli.undo > 0 {
        owners[0].undo(&mut world, cli.undo);
    }
    if cli.redo > 0 {
        owners[0].redo(&mut world, cli.redo);
    }

    let stats = world.stats();
    println!(
        "blocks={} chunks={} writes={} ticks={} undoable={} redoable={}",
        stats.stored_blocks,
        stats.chunk_entries,
        stats.writes,
        driver.ticks(),
        owners[0].history().undo_len(),
        owners[0].history().redo_len()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => match ChiselConfig::load_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => ChiselConfig::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cfg.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(cli, cfg) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
