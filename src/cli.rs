use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::theme::DEFAULT_THEME;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct OracleCli {
    /// Skip the boot sequence
    #[arg(short = 'b', long)]
    pub no_boot: bool,

    /// Enable debug commands
    #[arg(short, long)]
    pub debug: bool,

    /// Directory holding player saves
    #[arg(long, default_value = "saves")]
    pub saves_dir: PathBuf,

    /// Colour theme to render output with
    #[arg(long, default_value = DEFAULT_THEME)]
    pub theme: String,

    /// JSON list of extra themes
    #[arg(long)]
    pub themes_file: Option<PathBuf>,

    /// Print without colours or text styles
    #[arg(long)]
    pub plain: bool,

    /// Most verbose log level written to stderr
    #[arg(long, default_value_t = Level::WARN)]
    pub log_level: Level,
}
