use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Browse forecast charts by product, date, forecast hour and pressure level.
#[derive(Debug, Parser)]
#[command(name = "meteoviz", version)]
pub struct Cli {
    /// RON configuration file; defaults apply when it does not exist.
    #[arg(long, default_value = "meteoviz.ron")]
    pub config: PathBuf,

    /// Directory downloaded images are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Where log output goes. Terminal output shares the screen with the UI.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
}
