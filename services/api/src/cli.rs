use crate::commands::{run_extract, run_match, ExtractArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scholar_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scholarship Matcher",
    about = "Extract student profiles and rank scholarships from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Extract a structured profile from a transcript and print it as JSON
    Extract(ExtractArgs),
    /// Extract a profile and rank it against a scholarship catalog
    Match(MatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Extract(args) => run_extract(args),
        Command::Match(args) => run_match(args),
    }
}
