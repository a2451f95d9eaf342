use std::error::Error;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cave_generator::ascii;
use cave_generator::export::{self, RenderOptions};
use cave_generator::verify;
use cave_generator::{generate_with_seed, CaveConfig, CaveLevel, GenerationError, LevelSeed};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate connected cave levels with cellular automata")]
struct Args {
    /// Width of the level in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the level in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed key (derived from the clock if not specified)
    #[arg(short, long)]
    seed: Option<String>,

    /// Initial wall percentage (0-100)
    #[arg(long)]
    fill: Option<f64>,

    /// Number of smoothing passes
    #[arg(long)]
    smoothing: Option<usize>,

    /// Wall regions smaller than this are opened up
    #[arg(long)]
    wall_threshold: Option<usize>,

    /// Floor regions smaller than this are filled in
    #[arg(long)]
    room_threshold: Option<usize>,

    /// Passage brush radius
    #[arg(long)]
    radius: Option<i32>,

    /// Load settings from a JSON file (flags override it)
    #[arg(long)]
    config: Option<String>,

    /// Attempts before giving up when no rooms survive
    #[arg(long, default_value = "1")]
    max_attempts: u32,

    /// Print the level as ASCII
    #[arg(long)]
    ascii: bool,

    /// Mark passage centre lines in ASCII output and PNG export
    #[arg(long)]
    show_passages: bool,

    /// Export the level to a text file (e.g., "level.txt")
    #[arg(long)]
    export_txt: Option<String>,

    /// Export the level to a PNG image
    #[arg(long)]
    export_png: Option<String>,

    /// Export the level, rooms and connections as JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Pixels per tile for PNG export
    #[arg(long, default_value = "7")]
    tile_size: u32,

    /// Re-check border, reachability and accessibility after generation
    #[arg(long)]
    verify: bool,
}

impl Args {
    /// Start from the JSON config (or defaults) and apply flag overrides.
    fn build_config(&self) -> Result<CaveConfig, GenerationError> {
        let mut config = match &self.config {
            Some(path) => CaveConfig::from_json_file(path)?,
            None => CaveConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = &self.seed {
            config.seed = Some(seed.clone());
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(passes) = self.smoothing {
            config.smoothing_passes = passes;
        }
        if let Some(threshold) = self.wall_threshold {
            config.wall_threshold = threshold;
        }
        if let Some(threshold) = self.room_threshold {
            config.room_threshold = threshold;
        }
        if let Some(radius) = self.radius {
            config.passage_radius = radius;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(false))
        .init();
}

/// Generate, retrying with derived seeds while the failure is recoverable.
fn generate_with_retries(config: &CaveConfig, max_attempts: u32) -> Result<CaveLevel, GenerationError> {
    let base = LevelSeed::or_from_time(config.seed.as_deref());
    let attempts = max_attempts.max(1);

    let mut attempt = 0;
    loop {
        let seed = if attempt == 0 { base.clone() } else { base.retry(attempt) };
        match generate_with_seed(config, seed) {
            Ok(level) => return Ok(level),
            Err(err) if err.is_recoverable() && attempt + 1 < attempts => {
                warn!(attempt, %err, "retrying with a derived seed");
                println!("Attempt {} failed ({}), retrying...", attempt + 1, err);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let config = args.build_config()?;

    println!("Generating cave level");
    println!("Map size: {}x{}", config.width, config.height);
    println!(
        "Fill: {}%, smoothing passes: {}, passage radius: {}",
        config.fill_percent, config.smoothing_passes, config.passage_radius
    );

    let level = generate_with_retries(&config, args.max_attempts)?;
    let stats = level.stats();

    println!("Seed: {}", level.seed());
    println!(
        "Smoothing: {} walls -> {} walls",
        stats.initial_walls, stats.smoothed_walls
    );
    println!(
        "Filtering: removed {} wall regions and {} floor regions",
        stats.wall_regions_removed, stats.floor_regions_removed
    );
    println!(
        "Rooms: {} (main room {} tiles)",
        stats.rooms,
        level.main_room().size()
    );
    println!(
        "Passages: {} connections, {} tiles carved",
        stats.connections, stats.tiles_carved
    );
    println!(
        "Floor: {} tiles ({:.1}%)",
        stats.floor_tiles,
        100.0 * stats.floor_tiles as f64 / (level.width() * level.height()) as f64
    );

    if args.ascii {
        println!();
        ascii::print_ascii_map(&level, args.show_passages);
    }

    if let Some(path) = &args.export_txt {
        println!("Exporting level to {}...", path);
        ascii::export_level_file(&level, path)?;
        println!("Level exported successfully.");
    }

    if let Some(path) = &args.export_png {
        println!("Exporting image to {}...", path);
        let options = RenderOptions {
            tile_size: args.tile_size,
            show_passages: args.show_passages,
            ..Default::default()
        };
        export::export_level_png(&level, path, &options)?;
        println!("Image exported successfully.");
    }

    if let Some(path) = &args.export_json {
        println!("Exporting JSON to {}...", path);
        export::export_level_json(&level, path)?;
        println!("JSON exported successfully.");
    }

    if args.verify {
        let report = verify::verify_level(&level);
        println!("Verification: {}", report.summary());
        if !report.is_ok() {
            return Err("level failed verification".into());
        }
    }

    Ok(())
}
