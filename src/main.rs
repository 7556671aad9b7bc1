use clap::Parser;
use jportal_cli::cli::Cli;
use jportal_cli::core::user_friendly_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli.execute().await {
        user_friendly_error(&err).display();
        std::process::exit(1);
    }
}
