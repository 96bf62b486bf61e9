pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "careers")]
#[command(about = "CareerBuilder CLI - run and seed the careers page API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve,

    #[command(about = "Seed job postings into a running server")]
    SeedJobs {
        #[arg(long, help = "Path to a JSON file containing an array of jobs")]
        file: std::path::PathBuf,

        #[arg(
            long,
            default_value = "http://127.0.0.1:5000",
            help = "Base URL of the running server"
        )]
        server: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => crate::server::serve().await,
        Commands::SeedJobs { file, server } => commands::seed::seed_jobs(&file, &server).await,
    }
}
