use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use sunburst::hierarchy::HierarchyNode;
use sunburst::{
    Dataset, JsonFileProvider, SvgScene, WheelConfig, build_wheel, count_leaves, load_dataset,
};

#[derive(Parser, Debug)]
#[command(name = "sunburst", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render the wheel for a data file as SVG
    Render {
        /// JSON file with `colors` and `labels`
        data: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Outer radius of the wheel (canvas is twice this wide)
        #[arg(long)]
        outer: Option<f64>,

        #[arg(long)]
        middle: Option<f64>,

        #[arg(long)]
        inner: Option<f64>,
    },
    /// Print leaf counts and angular spans per category
    Stats {
        data: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data,
            output,
            outer,
            middle,
            inner,
        } => {
            let defaults = WheelConfig::default();
            let config = WheelConfig {
                outer_radius: outer.unwrap_or(defaults.outer_radius),
                middle_radius: middle.unwrap_or(defaults.middle_radius),
                inner_radius: inner.unwrap_or(defaults.inner_radius),
                ..defaults
            };
            render(data, output, &config).await
        }
        Commands::Stats { data } => stats(data).await,
    }
}

async fn render(
    data: PathBuf,
    output: Option<PathBuf>,
    config: &WheelConfig,
) -> anyhow::Result<()> {
    config.validate()?;

    let dataset = read_dataset(&data).await?;
    let mut scene = SvgScene::new(config.outer_radius);
    let wheel = build_wheel(&dataset, config, &mut scene);
    log::info!(
        "Rendered {} sectors from {}",
        wheel.sectors.len(),
        data.display()
    );

    let svg = scene.to_svg();
    match output {
        Some(path) => fs_err::write(path, svg)?,
        None => writeln!(std::io::stdout(), "{}", svg)?,
    }
    Ok(())
}

/// Goes through the logging load boundary; the CLI then exits non-zero.
async fn read_dataset(path: &Path) -> anyhow::Result<Dataset> {
    match load_dataset(&JsonFileProvider::new(path)).await {
        Some(dataset) => Ok(dataset),
        None => anyhow::bail!("Could not load wheel data from {}", path.display()),
    }
}

async fn stats(data: PathBuf) -> anyhow::Result<()> {
    let dataset = read_dataset(&data).await?;
    let total = count_leaves(&dataset.labels);
    let mut out = std::io::stdout().lock();

    writeln!(out, "{} leaves", total)?;
    if let HierarchyNode::Interior(categories) = &dataset.labels {
        for (label, node) in categories {
            let leaves = count_leaves(node);
            let degrees = if total == 0 {
                0.0
            } else {
                leaves as f64 * 360.0 / total as f64
            };
            writeln!(out, "{:<24} {:>5} {:>8.2}°", label.as_str(), leaves, degrees)?;
        }
    }
    Ok(())
}
