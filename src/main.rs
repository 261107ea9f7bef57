use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

use intersection_sim::simulation::{SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Four-way signalised intersection simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1800")]
    ticks: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a summary every N ticks in headless mode
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    summary_every: u64,

    /// Print the text map with each summary
    #[arg(long)]
    map: bool,

    /// Milliseconds to sleep between summaries
    #[arg(long, default_value = "0")]
    pace_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.ui {
        return run_with_ui(config, cli.seed);
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,intersection_sim=info"),
    )
    .init();

    run_headless(&cli, config)
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn build_simulation(config: SimConfig, seed: Option<u64>) -> Result<Simulation> {
    let simulation = match seed {
        Some(seed) => Simulation::new_with_seed(config, seed),
        None => Simulation::new(config),
    };
    simulation.context("Invalid simulation configuration")
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli, config: SimConfig) -> Result<()> {
    println!("Running intersection simulation in headless mode...");
    println!("Ticks: {}, summary every {} ticks", cli.ticks, cli.summary_every);
    println!();

    let mut simulation = build_simulation(config, cli.seed)?;

    println!("Initial state:");
    simulation.print_summary();
    if cli.map {
        simulation.draw_map();
    }
    println!();

    for tick in 1..=cli.ticks {
        simulation.update();

        if tick % cli.summary_every == 0 {
            println!("--- After tick {} ---", tick);
            simulation.print_summary();
            if cli.map {
                simulation.draw_map();
            }
            println!();

            if cli.pace_ms > 0 && tick < cli.ticks {
                std::thread::sleep(std::time::Duration::from_millis(cli.pace_ms));
            }
        }
    }

    let stats = simulation.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", simulation.ticks);
    info!("Vehicles spawned: {}", stats.spawned);
    info!("Spawns rejected: {}", stats.rejected);
    info!("Vehicles exited: {}", stats.exited);
    info!("Active vehicles: {}", simulation.vehicles().len());
    info!("Overtakes started: {}", stats.overtakes);
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, seed: Option<u64>) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use intersection_sim::ui::{IntersectionUIPlugin, SimulationResource};

    let simulation = build_simulation(config, seed)?;
    let bounds = simulation.config().bounds;

    println!("Starting Intersection Sim UI...");
    println!();
    println!("Controls:");
    println!("  D    - Toggle debug overlay");
    println!("  ESC  - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,intersection_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Intersection Sim - Traffic Lights and Overtaking".into(),
                        resolution: (bounds.width as u32, bounds.height as u32).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(SimulationResource(simulation))
        .add_plugins(IntersectionUIPlugin)
        .run();

    Ok(())
}

#[cfg(not(feature = "ui"))]
fn run_with_ui(_config: SimConfig, _seed: Option<u64>) -> Result<()> {
    anyhow::bail!("UI feature is not enabled. Rebuild with --features ui")
}
