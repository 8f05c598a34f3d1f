use clap::{Parser, Subcommand};
use rg_core::{InitialParameters, parse_artifact_name, parse_run_name};
use rg_grid::{
    GridConfig, GridProgressEvent, GridResult, GridStage, RgbGrid, RunOutcome, RunPlan, plan_run,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rgbgrid")]
#[command(about = "rgbgrid - sample MESA progenitor grids around the RGB tip", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the grid table and archive the sampled checkpoint models
    Build {
        /// YAML configuration file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory holding the logs_* run directories
        #[arg(long)]
        grid_dir: Option<PathBuf>,
        /// Output table file
        #[arg(long)]
        output_file: Option<PathBuf>,
        /// Output directory for archived .mod files
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Number of checkpoints sampled before the anchor
        #[arg(long)]
        minus: Option<u32>,
        /// Number of checkpoints sampled after the anchor
        #[arg(long)]
        plus: Option<u32>,
        /// Upper log_Teff bound of the RGB tip search
        #[arg(long)]
        teff_max: Option<f64>,
        /// Keep runs that never exhausted core hydrogen instead of deleting them
        #[arg(long)]
        keep_rejected: bool,
        /// Drop history rows superseded by restarts
        #[arg(long)]
        remove_backups: bool,
        /// Write a JSON summary of the build
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show what a build would extract from a single run (read-only)
    Inspect {
        /// Run directory
        run_dir: PathBuf,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Upper log_Teff bound of the RGB tip search
        #[arg(long)]
        teff_max: Option<f64>,
        /// Drop history rows superseded by restarts
        #[arg(long)]
        remove_backups: bool,
    },
    /// Decode an archived model file name
    Artifact {
        /// File name such as rgb_m1.0_..._lvl-2_60.mod
        name: String,
    },
}

fn main() -> GridResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            grid_dir,
            output_file,
            output_dir,
            minus,
            plus,
            teff_max,
            keep_rejected,
            remove_backups,
            report,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(dir) = grid_dir {
                cfg.grid_dir = dir;
            }
            if let Some(file) = output_file {
                cfg.output_file = file;
            }
            if let Some(dir) = output_dir {
                cfg.output_dir = dir;
            }
            if let Some(n) = minus {
                cfg.window.minus_models = n;
            }
            if let Some(n) = plus {
                cfg.window.plus_models = n;
            }
            if let Some(t) = teff_max {
                cfg.teff_max = t;
            }
            if keep_rejected {
                cfg.delete_rejected = false;
            }
            if remove_backups {
                cfg.remove_backups = true;
            }
            cmd_build(cfg, report.as_deref())
        }
        Commands::Inspect {
            run_dir,
            config,
            teff_max,
            remove_backups,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(t) = teff_max {
                cfg.teff_max = t;
            }
            if remove_backups {
                cfg.remove_backups = true;
            }
            cmd_inspect(&cfg, &run_dir)
        }
        Commands::Artifact { name } => cmd_artifact(&name),
    }
}

fn load_config(path: Option<&Path>) -> GridResult<GridConfig> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading configuration");
            GridConfig::load_yaml(p)
        }
        None => Ok(GridConfig::default()),
    }
}

fn render_progress(event: &GridProgressEvent) {
    match event.stage {
        GridStage::PreparingOutput => {
            if let Some(msg) = &event.message {
                println!("{}", msg);
            }
        }
        GridStage::RunStarted => {
            if let Some(run) = &event.run {
                println!("[{}/{}] {}", event.position, event.total, run.display());
            }
        }
        GridStage::RunFinished => {
            if let Some(msg) = &event.message {
                println!("  {}", msg);
            }
            println!();
        }
        GridStage::WritingTable | GridStage::Completed => {}
    }
}

fn cmd_build(cfg: GridConfig, report_path: Option<&Path>) -> GridResult<()> {
    let grid = RgbGrid::new(cfg)?;
    println!(
        "Building RGB grid from {} ({} runs)",
        grid.config().grid_dir.display(),
        grid.runs().len()
    );

    let build = grid.build_with_progress(Some(&mut |event| render_progress(&event)))?;
    let report = &build.report;

    println!(
        "✓ Grid written: {} ({} rows)",
        grid.config().output_file.display(),
        build.rows.len()
    );
    println!("  Extracted: {}", report.count(&RunOutcome::Extracted));
    println!("  Deleted:   {}", report.count(&RunOutcome::Deleted));
    println!("  Kept:      {}", report.count(&RunOutcome::Kept));
    let failed = report.count(&RunOutcome::DeleteFailed {
        message: String::new(),
    });
    if failed > 0 {
        println!("  Delete failures: {}", failed);
    }

    if let Some(path) = report_path {
        report.save_json(path)?;
        println!("✓ Report written: {}", path.display());
    }
    Ok(())
}

fn print_parameters(params: &InitialParameters) {
    let names = rg_core::naming::RUN_FIELD_PREFIXES;
    for (name, value) in names.iter().zip(params.values()) {
        println!("  {:<12} {}", name, value);
    }
}

fn print_samples(cfg: &GridConfig, samples: usize) {
    if cfg.remove_backups {
        println!("  Samples: {} (superseded rows removed)", samples);
    } else {
        println!("  Samples: {}", samples);
    }
}

fn cmd_inspect(cfg: &GridConfig, run_dir: &Path) -> GridResult<()> {
    println!("Inspecting run: {}", run_dir.display());

    match plan_run(cfg, run_dir)? {
        RunPlan::Reject {
            initial,
            samples,
            last_center_h1,
            ..
        } => {
            print_samples(cfg, samples);
            println!("\nInitial parameters:");
            print_parameters(&initial);
            match last_center_h1 {
                Some(h1) => println!(
                    "\n✗ Core hydrogen not exhausted (last center_h1 = {:.3e}); a build would {} this run",
                    h1,
                    if cfg.delete_rejected { "delete" } else { "skip" }
                ),
                None => println!("\n✗ No samples"),
            }
        }
        RunPlan::Extract(plan) => {
            print_samples(cfg, plan.samples);
            println!("\nInitial parameters:");
            print_parameters(&plan.initial);
            println!("\nRGB tip: model {}", plan.tip_model);
            println!("Anchor:  model {}", plan.anchor);
            println!(
                "\n{:>6} {:>8} {:>10} {:>10}  {:<10} archive name",
                "level", "model", "log_Teff", "log_L", "checkpoint"
            );
            for (row, artifact) in plan.rows.iter().zip(&plan.artifacts) {
                let status = if artifact.source.exists() {
                    "present"
                } else {
                    "MISSING"
                };
                println!(
                    "{:>6} {:>8} {:>10.5} {:>10.5}  {:<10} {}",
                    artifact.level,
                    artifact.model_number,
                    row.log_teff,
                    row.log_l,
                    status,
                    artifact.file_name
                );
            }
        }
    }
    Ok(())
}

fn cmd_artifact(name: &str) -> GridResult<()> {
    let artifact = parse_artifact_name(name)?;
    println!("Run stem: {}", artifact.run_stem);
    println!("Level:    {}", artifact.level);
    println!("Model:    {}", artifact.model_number);

    if let Ok(params) = parse_run_name(&format!("logs_{}", artifact.run_stem)) {
        println!("\nInitial parameters:");
        print_parameters(&params);
    }
    Ok(())
}
