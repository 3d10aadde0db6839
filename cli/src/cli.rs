use std::path::PathBuf;

/// ZCTA / energy plant map dashboard, headless
#[derive(clap::Parser, Debug)]
#[command(name = "zctamap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Highlight the ZCTA matching a ZIP code or address and list its plants
    Lookup(LookupArgs),

    /// Count plants per ZCTA
    Summary(SummaryArgs),
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// ZCTA boundary GeoJSON (URL or path), overrides the config
    #[arg(long)]
    pub boundaries: Option<String>,

    /// Energy plant GeoJSON (URL or path), overrides the config
    #[arg(long)]
    pub plants: Option<String>,

    /// JSON config file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// ZIP code or free-text address containing one
    pub query: String,

    /// Expand the details of the n-th listed plant (0-based)
    #[arg(long)]
    pub details: Option<usize>,

    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Include ZCTAs without any plants
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub sources: SourceArgs,
}
