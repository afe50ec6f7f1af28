mod grid;

use bestfirst::{
    a_star, Euclidean, Octile, SearchConfig, SearchContext, SearchError, SearchOutcome, Zero,
};

use clap::{Parser, ValueEnum};
use movingai::SceneRecord;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Heuristic {
    /// Plain Dijkstra
    Zero,
    Euclidean,
    /// Exact on an obstacle free 8-connected grid
    Octile,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// The path to a .scen file from moving AI, or a directory of .scen files
    scenario: PathBuf,
    /// Maps directory
    #[arg(long)]
    maps: PathBuf,
    #[arg(long, value_enum, default_value_t = Heuristic::Octile)]
    heuristic: Heuristic,
    /// Reopen closed vertices when a cheaper path to them shows up
    #[arg(long)]
    reopen_closed: bool,
    /// Give up on a scenario after this many expansions
    #[arg(long)]
    max_expansions: Option<usize>,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .reopen_closed(self.reopen_closed)
            .max_expansions(self.max_expansions)
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} contains no scenarios", .0.display())]
    NoScenarios(PathBuf),
    #[error("all maps are not the same as {map} in {}", .file.display())]
    MixedMaps { file: PathBuf, map: String },
    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(Debug, Default)]
struct Summary {
    scenarios: usize,
    mismatches: usize,
    unreachable: usize,
    cancelled: usize,
    expanded: usize,
}

const TOLERANCE: f64 = 0.001;

fn parse_scenario_file(file: &Path) -> Result<(Vec<SceneRecord>, String), RunError> {
    let scenarios = movingai::parser::parse_scen_file(file).map_err(|source| RunError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let first_map = scenarios
        .first()
        .ok_or_else(|| RunError::NoScenarios(file.to_path_buf()))?
        .map_file
        .clone();
    if !scenarios.iter().all(|s| s.map_file == first_map) {
        return Err(RunError::MixedMaps {
            file: file.to_path_buf(),
            map: first_map,
        });
    }
    Ok((scenarios, first_map))
}

fn run_for_scenario_file(scenario: &Path, cli: &Cli, summary: &mut Summary) -> Result<(), RunError> {
    let (scenarios, first_map) = parse_scenario_file(scenario)?;
    let path = cli.maps.join(first_map);

    let raw_map = movingai::parser::parse_map_file(&path).map_err(|source| RunError::Io {
        path: path.clone(),
        source,
    })?;
    let grid = grid::build(&raw_map);
    let graph = &grid.graph;
    info!(
        "{} scenarios on {} ({} vertices, {} edges)",
        scenarios.len(),
        path.display(),
        graph.len(),
        graph.edge_count()
    );

    let mut ctx = SearchContext::for_graph(graph).with_config(cli.search_config());
    let pg = indicatif::ProgressBar::new(scenarios.len() as u64);
    for (scenario_idx, scenario) in scenarios.iter().enumerate() {
        pg.inc(1);
        let start = grid.node(scenario.start_pos);
        let goal = grid.node(scenario.goal_pos);
        let outcome = match cli.heuristic {
            Heuristic::Zero => a_star(&mut ctx, graph, start, goal, Zero)?,
            Heuristic::Euclidean => a_star(&mut ctx, graph, start, goal, Euclidean::new(graph))?,
            Heuristic::Octile => a_star(&mut ctx, graph, start, goal, Octile::new(graph))?,
        };
        let stats = ctx.stats();
        summary.scenarios += 1;
        summary.expanded += stats.expanded;
        debug!("Scenario {scenario_idx}: {outcome}, {stats:?}");

        match outcome {
            SearchOutcome::Found(found) => {
                let expected = scenario.optimal_length;
                let diff = (expected - found.cost).abs();
                if diff > TOLERANCE {
                    summary.mismatches += 1;
                    pg.println(format!(
                        "[{}/{}] shortest path mismatch. Start: {:?}, End: {:?}. Expected length {}, got {}, diff {}",
                        scenario_idx,
                        scenarios.len(),
                        scenario.start_pos,
                        scenario.goal_pos,
                        expected,
                        found.cost,
                        diff
                    ));
                }
            }
            SearchOutcome::Unreachable => {
                summary.unreachable += 1;
                pg.println(format!(
                    "[{}/{}] no path from {:?} to {:?}",
                    scenario_idx,
                    scenarios.len(),
                    scenario.start_pos,
                    scenario.goal_pos
                ));
            }
            SearchOutcome::Cancelled => summary.cancelled += 1,
        }
    }
    pg.finish_and_clear();
    Ok(())
}

fn scenario_files(path: &Path) -> Result<Vec<PathBuf>, RunError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let io_err = |source| RunError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?.path();
        if entry.extension().is_some_and(|ext| ext == "scen") {
            files.push(entry);
        }
    }
    files.sort();
    Ok(files)
}

fn run(cli: &Cli) -> Result<Summary, RunError> {
    let mut summary = Summary::default();
    for file in scenario_files(&cli.scenario)? {
        info!(
            "Running for scenarios in {p}. (cargo run --release -- {p} --maps {m})",
            p = file.display(),
            m = cli.maps.display(),
        );
        run_for_scenario_file(&file, cli, &mut summary)?;
    }
    Ok(summary)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let start = std::time::Instant::now();
    let summary = match run(&cli) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} scenarios: {} mismatched, {} unreachable, {} cancelled, {} expansions",
        summary.scenarios,
        summary.mismatches,
        summary.unreachable,
        summary.cancelled,
        summary.expanded
    );
    println!("Took {} s to run", start.elapsed().as_secs_f32());

    if summary.mismatches > 0 || summary.unreachable > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
