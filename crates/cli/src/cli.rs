use std::path::PathBuf;

/// Choropleth renderer
#[derive(clap::Parser, Debug)]
#[command(name = "choromap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render a colored map to an SVG snapshot
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// State boundaries (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub states: PathBuf,

    /// County boundaries (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub counties: PathBuf,

    /// Metric records, e.g. [{"GeoFIPS": "01001", "2020": 45912}, ...]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub metrics: PathBuf,

    /// Map configuration (JSON); defaults apply when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Reference year column; overrides the configured label year
    #[arg(long)]
    pub year: Option<String>,

    /// Drill into this state before rendering
    #[arg(long, value_name = "STATE_ID")]
    pub drill: Option<String>,

    /// Output SVG file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}
