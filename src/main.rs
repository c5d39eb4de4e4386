// Box Separation Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/box-separation-simulator --input orders.csv
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/box-separation-simulator --input orders.csv --workers-per-station 2 --history runs.json --compare
// ```

use anyhow::{bail, Context, Result};
use box_separation_simulator::report::{self, format_duration, JsonOutput};
use box_separation_simulator::simulation::{
    LoggingConfig, SimulationHistory, SimulationRun, SimulationRunner,
};
use box_separation_simulator::types::config::CliArgs;
use box_separation_simulator::types::{InputFormat, OutputFormat, RunId, SimulationConfig};
use box_separation_simulator::workload::{load_work_items, WorkItem, WorkloadGenerator};
use chrono::Local;
use clap::Parser;
use std::path::Path;
use std::process;
use tracing::{error, info, warn};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let mut logging = LoggingConfig::from_flags(args.verbose, args.debug);
    if let Some(directory) = &args.log_dir {
        logging = logging.with_file_logging(directory.clone());
    }
    if args.log_json {
        logging = logging.with_json_format();
    }
    let _logging_guard = match logging.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Box Separation Simulator");

    if let Err(e) = run(args) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Box Separation Simulator completed successfully");
}

fn run(args: CliArgs) -> Result<()> {
    let config =
        SimulationConfig::from_cli_args(args.clone()).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let output_format = config.get_output_format().map_err(anyhow::Error::msg)?;

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    if output_format == OutputFormat::Text {
        print_startup_banner(&config);
    }

    let (items, run_id) = load_workload(&args)?;
    let runner = SimulationRunner::new(config.clone())?;
    let report = runner.run(items)?;

    let comparison = match &args.history {
        Some(path) => {
            let mut history = SimulationHistory::load(path, config.history_limit)
                .with_context(|| format!("Failed to load history from {}", path))?;
            history.record(SimulationRun::new(run_id.clone(), config.clone(), report.summary.clone()));
            history
                .save(path)
                .with_context(|| format!("Failed to save history to {}", path))?;
            info!(run_id = %run_id, runs = history.len(), "Run recorded in history");

            if args.compare {
                let comparison = history.compare_latest();
                if comparison.is_none() {
                    warn!("Nothing to compare yet, the history holds a single run");
                }
                comparison
            } else {
                None
            }
        }
        None => {
            if args.compare {
                warn!("--compare needs --history to find the previous run");
            }
            None
        }
    };

    match output_format {
        OutputFormat::Text => {
            println!("Run: {}", run_id);
            println!();
            print!("{}", report::render_summary(&report.summary));
            if let Some(comparison) = &comparison {
                println!();
                print!("{}", report::render_comparison(comparison));
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput { run_id: &run_id, report: &report, comparison: comparison.as_ref() };
            println!("{}", output.to_json()?);
        }
    }

    info!(
        run_id = %run_id,
        total = %format_duration(report.summary.total_duration),
        "Report written"
    );
    Ok(())
}

/// Read work items from the input file or generate them, and name the run
fn load_workload(args: &CliArgs) -> Result<(Vec<WorkItem>, RunId)> {
    let now = Local::now();

    if let Some(input) = &args.input {
        let format = match &args.input_format {
            Some(format) => Some(format.parse::<InputFormat>().map_err(anyhow::Error::msg)?),
            None => None,
        };
        let items = load_work_items(input, format)
            .with_context(|| format!("Failed to read work items from {}", input))?;

        let stem = match &args.label {
            Some(label) => label.clone(),
            None => Path::new(input)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string()),
        };
        return Ok((items, RunId::from_input(&stem, now)));
    }

    if let Some(boxes) = args.synthetic_boxes {
        let mut generator = match args.seed {
            Some(seed) => WorkloadGenerator::with_seed(seed),
            None => WorkloadGenerator::new(),
        };
        let items = generator.generate(boxes).map_err(anyhow::Error::msg)?;
        info!(boxes, rows = items.len(), "Generated synthetic workload");

        let run_id = match &args.label {
            Some(label) => RunId::from_input(label, now),
            None => RunId::generated(),
        };
        return Ok((items, run_id));
    }

    bail!("No workload given: pass --input <FILE> or --synthetic-boxes <N>")
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Box Separation Simulator");
    eprintln!("========================");
    eprintln!("Shortest-estimate-first separation across worker-limited stations");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Time per Item: {:.2}s", config.time_per_item);
    eprintln!("  Transit Time per Station: {:.2}s", config.transit_time_per_station);
    eprintln!("  Station Capacity: {}", config.station_capacity);
    eprintln!(
        "  Workers per Station: {:.2} ({} slot(s))",
        config.workers_per_station,
        config.default_worker_slots()
    );
    eprintln!("  Extra Time per Box: {:.2}s", config.extra_time_per_box);
    for (station, slots) in &config.station_slots {
        eprintln!("  Slots at {}: {}", station, slots);
    }
    eprintln!("  History Limit: {}", config.history_limit);
    eprintln!("  Output Format: {}", config.output_format);
    eprintln!();
}
