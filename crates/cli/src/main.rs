//! GeoKrig CLI - spatial interpolation and cross-validation

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use geokrig_algorithms::interpolation::{
    empirical_variogram, fit_best_variogram, FitStrategy, IdwParams, KrigingParams, TpsParams,
    VariogramParams,
};
use geokrig_algorithms::surface::{predict_surface, to_ascii_grid, GridSpec};
use geokrig_algorithms::validation::{cross_validate, evaluate, split};
use geokrig_core::io::read_points;
use geokrig_core::SampleSet;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geokrig")]
#[command(author, version, about = "Spatial interpolation and cross-validation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a point file
    Info {
        /// Input point file (x y [covariates…] value)
        input: PathBuf,
    },
    /// Holdout or k-fold accuracy for an interpolation method
    Validate {
        /// Input point file
        input: PathBuf,
        /// Interpolation method
        #[arg(long, value_enum, default_value = "idw")]
        method: Method,
        /// IDW power exponent
        #[arg(long, default_value_t = 2.0)]
        power: f64,
        /// Neighbor cap for IDW and kriging
        #[arg(long, default_value_t = 16)]
        neighbors: usize,
        /// TPS smoothing parameter
        #[arg(long, default_value_t = 0.0)]
        smoothing: f64,
        /// Holdout fraction (ignored when --folds is given)
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,
        /// Use k-fold cross-validation instead of a single holdout
        #[arg(long)]
        folds: Option<usize>,
        /// Partition seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interpolate onto a regular grid, written as ESRI ASCII
    Grid {
        /// Input point file
        input: PathBuf,
        /// Output .asc file
        output: PathBuf,
        /// Interpolation method
        #[arg(long, value_enum, default_value = "idw")]
        method: Method,
        /// IDW power exponent
        #[arg(long, default_value_t = 2.0)]
        power: f64,
        /// Neighbor cap for IDW and kriging
        #[arg(long, default_value_t = 16)]
        neighbors: usize,
        /// TPS smoothing parameter
        #[arg(long, default_value_t = 0.0)]
        smoothing: f64,
        /// Output rows
        #[arg(long, default_value_t = 100)]
        rows: usize,
        /// Output columns
        #[arg(long, default_value_t = 100)]
        cols: usize,
        /// Cell size; derived from the sample extent when omitted
        #[arg(long)]
        cell_size: Option<f64>,
    },
    /// Empirical variogram and best-fit model
    Variogram {
        /// Input point file
        input: PathBuf,
        /// Number of lag bins
        #[arg(long, default_value_t = 15)]
        lags: usize,
        /// Maximum lag distance (half the max pairwise distance if omitted)
        #[arg(long)]
        max_lag: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Idw,
    Tps,
    Kriging,
}

fn build_strategy(method: Method, power: f64, neighbors: usize, smoothing: f64) -> FitStrategy {
    match method {
        Method::Idw => FitStrategy::Idw(IdwParams {
            power,
            max_neighbors: neighbors,
        }),
        Method::Tps => FitStrategy::Tps(TpsParams { smoothing }),
        Method::Kriging => FitStrategy::OrdinaryKriging(KrigingParams {
            max_neighbors: neighbors,
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info { input } => cmd_info(&input),
        Commands::Validate {
            input,
            method,
            power,
            neighbors,
            smoothing,
            holdout,
            folds,
            seed,
            json,
        } => cmd_validate(
            &input,
            build_strategy(method, power, neighbors, smoothing),
            holdout,
            folds,
            seed,
            json,
        ),
        Commands::Grid {
            input,
            output,
            method,
            power,
            neighbors,
            smoothing,
            rows,
            cols,
            cell_size,
        } => cmd_grid(
            &input,
            &output,
            build_strategy(method, power, neighbors, smoothing),
            rows,
            cols,
            cell_size,
        ),
        Commands::Variogram { input, lags, max_lag } => cmd_variogram(&input, lags, max_lag),
    }
}

fn load_samples(input: &PathBuf) -> Result<SampleSet> {
    let samples =
        read_points(input).with_context(|| format!("reading {}", input.display()))?;
    if samples.is_empty() {
        bail!("{} contains no samples", input.display());
    }
    debug!(
        n = samples.len(),
        dim = samples.dim(),
        "loaded sample set"
    );
    Ok(samples)
}

// ─── Commands ───────────────────────────────────────────────────────────

fn cmd_info(input: &PathBuf) -> Result<()> {
    let samples = load_samples(input)?;

    println!("File:        {}", input.display());
    println!("Samples:     {}", samples.len());
    println!("Dimensions:  {}", samples.dim());

    for d in 0..samples.dim() {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &samples {
            lo = lo.min(p.coords[d]);
            hi = hi.max(p.coords[d]);
        }
        let label = match d {
            0 => "x".to_string(),
            1 => "y".to_string(),
            _ => format!("c{d}"),
        };
        println!("Extent {label}:    [{lo}, {hi}]");
    }

    let (mut lo, mut hi, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
    for v in samples.values() {
        lo = lo.min(v);
        hi = hi.max(v);
        sum += v;
    }
    println!("Values:      [{lo}, {hi}], mean {:.4}", sum / samples.len() as f64);

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    strategy: FitStrategy,
    holdout: f64,
    folds: Option<usize>,
    seed: u64,
    json: bool,
) -> Result<()> {
    let samples = load_samples(input)?;
    let start = Instant::now();

    let report = match folds {
        Some(k) => {
            info!(method = strategy.name(), k, seed, "k-fold cross-validation");
            cross_validate(&strategy, &samples, k, seed)?
        }
        None => {
            info!(
                method = strategy.name(),
                holdout, seed, "holdout validation"
            );
            let (train, test) = split(&samples, holdout, seed)?;
            evaluate(|t| strategy.fit(t), &train, &test)?
        }
    };

    info!(elapsed = ?start.elapsed(), "validation finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Method:   {}", strategy.name());
        println!("n_test:   {}", report.n_test);
        println!("R²:       {:.4}", report.r_squared);
        println!("RMSE:     {:.4}", report.rmse);
        println!("MAE:      {:.4}", report.mae);
    }

    Ok(())
}

fn cmd_grid(
    input: &PathBuf,
    output: &PathBuf,
    strategy: FitStrategy,
    rows: usize,
    cols: usize,
    cell_size: Option<f64>,
) -> Result<()> {
    let samples = load_samples(input)?;
    if samples.dim() != 2 {
        bail!(
            "grid interpolation needs 2-D samples, this file has {} dimensions",
            samples.dim()
        );
    }

    // Sample extent drives the grid when no cell size is given
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &samples {
        x_min = x_min.min(p.coords[0]);
        x_max = x_max.max(p.coords[0]);
        y_min = y_min.min(p.coords[1]);
        y_max = y_max.max(p.coords[1]);
    }

    let cell = match cell_size {
        Some(c) => c,
        None => ((x_max - x_min) / cols as f64).max((y_max - y_min) / rows as f64),
    };
    let grid = GridSpec::new(x_min, y_min, cell, rows, cols)?;

    info!(
        method = strategy.name(),
        rows, cols, cell, "interpolating surface"
    );

    let start = Instant::now();
    let model = strategy.fit(&samples)?;

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")?);
    bar.set_message(format!("{} × {} cells", rows, cols));
    bar.enable_steady_tick(Duration::from_millis(100));

    let surface = predict_surface(&model, &grid)?;

    bar.finish_and_clear();

    std::fs::write(output, to_ascii_grid(&surface, &grid))
        .with_context(|| format!("writing {}", output.display()))?;

    info!(elapsed = ?start.elapsed(), "wrote {}", output.display());
    Ok(())
}

fn cmd_variogram(input: &PathBuf, lags: usize, max_lag: Option<f64>) -> Result<()> {
    let samples = load_samples(input)?;

    let emp = empirical_variogram(
        &samples,
        VariogramParams {
            n_lags: lags,
            max_lag,
        },
    )?;

    println!("{:>12} {:>14} {:>8}", "lag", "semivariance", "pairs");
    for ((lag, sv), pairs) in emp.lags.iter().zip(&emp.semivariance).zip(&emp.pair_counts) {
        if sv.is_nan() {
            println!("{lag:>12.3} {:>14} {pairs:>8}", "-");
        } else {
            println!("{lag:>12.3} {sv:>14.4} {pairs:>8}");
        }
    }

    match fit_best_variogram(&emp) {
        Ok(fitted) => {
            println!();
            println!("Best fit: {:?}", fitted.model);
            println!("  nugget: {:.4}", fitted.nugget);
            println!("  sill:   {:.4}", fitted.sill);
            println!("  range:  {:.4}", fitted.range);
            println!("  rss:    {:.4}", fitted.rss);
        }
        Err(e) => info!("no variogram model could be fitted: {e}"),
    }

    Ok(())
}
