//! u-gendesign command-line tool.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use u_gendesign::design::ComponentKind;
use u_gendesign::material::Material;
use u_gendesign::optimize::{self, MaterialRow, RunRequest, RunSpec, RunSummary};

#[derive(Parser)]
#[command(name = "u-gendesign")]
#[command(about = "Evolutionary mass minimization of engine components")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one optimization and write its summary as JSON
    Run {
        #[command(flatten)]
        request: RequestArgs,

        /// Where to write the summary (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the full run spec for a component preset
    Preset { component: ComponentKind },

    /// Run the same request under several seeds
    Sweep {
        #[command(flatten)]
        request: RequestArgs,

        /// Comma-separated seeds
        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<u64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank catalogue materials for one component
    Compare {
        #[command(flatten)]
        request: RequestArgs,

        /// Comma-separated catalogue names (300m, 4340, cgi-450, a356, 7075)
        #[arg(long, value_delimiter = ',', required = true)]
        materials: Vec<String>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Run spec JSON file
    #[arg(short, long, conflicts_with = "component")]
    spec: Option<PathBuf>,

    /// Use the preset for this component instead of a spec file
    #[arg(short, long)]
    component: Option<ComponentKind>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    population: Option<usize>,

    #[arg(long)]
    generations: Option<usize>,

    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Evaluate candidates on the calling thread only
    #[arg(long)]
    sequential: bool,
}

impl RequestArgs {
    fn load(&self) -> Result<RunRequest> {
        let spec = match (&self.spec, self.component) {
            (Some(path), _) => read_spec(path)?,
            (None, Some(component)) => RunSpec {
                component,
                model: None,
                bounds: Vec::new(),
                material: None,
                load_case: None,
                config: Default::default(),
                seeds: Vec::new(),
            },
            (None, None) => bail!("either --spec or --component is required"),
        };

        let mut request = spec.into_request().context("invalid run spec")?;
        let config = &mut request.config;
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(n) = self.population {
            config.population_size = n;
        }
        if let Some(n) = self.generations {
            config.max_generations = n;
        }
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = Some(ms);
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(request)
    }
}

fn read_spec(path: &Path) -> Result<RunSpec> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn catalogue(name: &str) -> Result<Material> {
    Ok(match name {
        "300m" => Material::steel_300m(),
        "4340" => Material::steel_4340(),
        "cgi-450" => Material::cgi_450(),
        "a356" => Material::aluminum_a356_t6(),
        "7075" => Material::aluminum_7075_t6(),
        other => bail!("unknown material `{other}`"),
    })
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn report_outcome(summary: &RunSummary) {
    if summary.feasible {
        info!(
            mass_kg = summary.best_mass_kg,
            feasible_count = summary.feasible_count,
            "feasible design found"
        );
    } else {
        let violated: Vec<&str> = summary
            .constraints
            .iter()
            .filter(|row| row.violation > 0.0)
            .map(|row| row.constraint.as_str())
            .collect();
        warn!(
            total_violation = summary.total_violation,
            ?violated,
            "no feasible design found"
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run { request, output } => {
            let request = request.load()?;
            let result = optimize::run(&request).context("run rejected")?;
            let summary = result.summary();
            report_outcome(&summary);
            emit(&summary.to_json_pretty()?, output.as_deref())?;
        }
        Command::Preset { component } => {
            let spec = RunSpec::template(component);
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        Command::Sweep {
            request,
            seeds,
            output,
        } => {
            let request = request.load()?;
            let report = optimize::run_seeds(&request, &seeds).context("sweep rejected")?;
            let best = report.best().summary();
            report_outcome(&best);
            info!(
                best_seed = best.seed,
                feasible_runs = report.feasible_runs(),
                "sweep finished"
            );
            let summaries: Vec<RunSummary> = report.runs.iter().map(|r| r.summary()).collect();
            emit(
                &serde_json::to_string_pretty(&summaries)?,
                output.as_deref(),
            )?;
        }
        Command::Compare { request, materials } => {
            let request = request.load()?;
            let materials = materials
                .iter()
                .map(|name| catalogue(name))
                .collect::<Result<Vec<_>>>()?;
            let rankings =
                optimize::compare_materials(&request, materials).context("comparison rejected")?;
            let rows: Vec<MaterialRow> = rankings.iter().map(|r| r.row()).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
