use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Launch a web server showing du-diff reports.
///
/// Snapshots are looked up as `<DIRECTORY>/<location>/du-YYYY-MM-DD.gz` and
/// served at `/<location>/<date1>..<date2>[.txt]`.
#[derive(Debug, Parser)]
#[command(name = "dudiff", version, about)]
pub struct Cli {
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Accept non-localhost connections
    #[arg(long)]
    pub public: bool,

    /// Directory with one sub-directory of snapshots per location
    #[arg(value_name = "DIRECTORY", env = "DIRECTORY")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    /// Command line values take precedence over every configuration layer.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if self.public {
            cfg.server.host = "0.0.0.0".to_string();
        }
        if let Some(dir) = &self.directory {
            cfg.reports.directory = dir.clone();
        }
    }
}
