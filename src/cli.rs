use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Reference map CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "countrymap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one country's reference map
    Plot(PlotArgs),
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    /// ISO 3166-1 alpha-3 code of the target country, e.g. USA, CHE
    pub iso: String,

    /// Directory holding the input datasets
    #[arg(long, value_hint = ValueHint::DirPath, default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory for rendered figures
    #[arg(short, long, value_hint = ValueHint::DirPath, default_value = "maps")]
    pub out: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Margin fraction added around the target country extent
    #[arg(long, default_value_t = crate::frame::DEFAULT_BUFFER)]
    pub buffer: f64,

    /// Country outlines dropped before reprojection (they fail conversion to
    /// the mercator working CRS)
    #[arg(long = "exclude-iso", value_name = "ISO", default_values_t = [String::from("RUS"), String::from("FJI")])]
    pub exclude_iso: Vec<String>,

    /// Per-country values CSV (iso_name,value) for the thematic data layer
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Ascending class breaks for the data layer, comma separated
    #[arg(long, value_delimiter = ',', requires = "data")]
    pub breaks: Vec<f64>,

    /// Legend title for the data layer
    #[arg(long, default_value = "Value")]
    pub legend_title: String,

    /// Unit suffix appended to each legend bound, e.g. "%"
    #[arg(long, default_value = "")]
    pub units: String,
}
