//! Lattice Life CLI - Run a grid mode headlessly from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lattice_life::{
    compute::{CellGrid, GridSize, LifeSimulation, RadialGrowthEngine, generate_pattern, lifehash},
    schema::{DisplayMode, Pattern, Seed, SimulationConfig},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks]", args[0]);
        eprintln!();
        eprintln!("Run a Lattice Life grid from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to grid configuration file");
        eprintln!("  ticks        Number of ticks to run (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // Load or create seed
    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    let size = GridSize::new(config.columns, config.rows).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Lattice Life");
    println!("============");
    println!("Grid: {}x{}", config.columns, config.rows);
    println!("Mode: {:?}", config.mode);
    println!(
        "Rules: high_life={}, over_populate={}",
        config.rules.high_life, config.rules.over_populate
    );
    println!("Ticks: {}", ticks);
    println!();

    let mut grid = CellGrid::new(size, config.mode);
    let start = Instant::now();

    match config.mode {
        DisplayMode::Life => run_life(&config, &seed, size, ticks, &mut grid),
        DisplayMode::LifeHash => run_lifehash(&config, &seed, &mut grid),
        DisplayMode::Latix => run_latix(&config, &seed, size, ticks, &mut grid),
    }

    println!();
    print!("{}", grid.render_ascii());
    println!();
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
}

fn run_life(config: &SimulationConfig, seed: &Seed, size: GridSize, ticks: u64, grid: &mut CellGrid) {
    let cells = seed.generate(size, config.rules).unwrap_or_else(|e| {
        eprintln!("Error generating seed: {}", e);
        std::process::exit(1);
    });

    let mut life = LifeSimulation::new(size, config.rules);
    life.seed(cells, grid);
    println!("Initial population: {}", life.active().len());

    let start = Instant::now();
    for i in 0..ticks {
        let stats = life.step(grid);

        // Print progress every 10%
        if (i + 1) % (ticks / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Generation {}/{}: population={}, +{} -{}, {:.1} gen/s",
                stats.generation,
                ticks,
                stats.population,
                stats.births,
                stats.deaths,
                (i + 1) as f32 / elapsed
            );
        }

        if stats.population == 0 {
            println!("  Extinct at generation {}", stats.generation);
            break;
        }
    }
}

fn run_lifehash(config: &SimulationConfig, seed: &Seed, grid: &mut CellGrid) {
    let Pattern::LifeHash { text } = &seed.pattern else {
        eprintln!("LifeHash mode needs a LifeHash seed pattern");
        std::process::exit(1);
    };

    let pattern = generate_pattern(text, config.rules);
    println!("Seed: {:?}", text);
    println!("Generations: {}", pattern.generations);
    println!("Termination: {:?}", pattern.termination);
    println!("Cells: {}", pattern.cells.len());

    grid.show_pattern(&pattern.cells, lifehash::OUTPUT_SIZE);
}

fn run_latix(config: &SimulationConfig, seed: &Seed, size: GridSize, ticks: u64, grid: &mut CellGrid) {
    let mut engine = RadialGrowthEngine::new(size, &config.latix);
    if config.latix.warm_radius > 0 {
        // Detached; expansion computes any entry it reaches first.
        if let Err(e) = engine.warm_cache(config.latix.warm_radius) {
            eprintln!("Warning: cache warming not started: {}", e);
        }
    }

    for center in seed.selection_centers() {
        if engine.start_selection(center, None).is_none() {
            eprintln!("Warning: selection ({}, {}) is off the grid", center.x, center.y);
        }
    }
    println!("Selections: {}", engine.selections().len());

    let mut painted = 0usize;
    let mut tick = 0u64;
    while tick < ticks && !engine.is_idle() {
        for (_, outcome) in engine.tick() {
            painted += RadialGrowthEngine::paint(grid, &outcome);
        }
        tick += 1;
    }

    println!("Ticks run: {}", tick);
    println!("Cells painted: {}", painted);
    println!("Active selections: {}", engine.selections().len());
    println!("Cached radii: {}", engine.cache().len());
}

fn print_example_config() {
    let config = SimulationConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap_or_default());
    println!();
    println!("Example seed (config.seed.json):");
    println!("{}", serde_json::to_string_pretty(&seed).unwrap_or_default());
}
