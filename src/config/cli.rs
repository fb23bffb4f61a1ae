use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "tender-scout")]
#[command(about = "Discovers public procurement opportunities from Ethiopian tender sources")]
pub struct CliConfig {
    /// Path to TOML configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "tender-scout.toml")]
    pub config: String,

    /// Extraction API key, overrides [extraction].api_key
    #[arg(long, env = "OXYLABS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one on-demand scan and print the response JSON (nothing is stored)
    Scan {
        #[arg(long, default_value = "")]
        sector: String,

        #[arg(long)]
        location: Option<String>,
    },
    /// Run the daily multi-sector scan loop
    Schedule {
        /// Run a full scan immediately before waiting for the daily trigger
        #[arg(long)]
        run_now: bool,
    },
    /// Print every stored opportunity as a JSON array
    List,
}
