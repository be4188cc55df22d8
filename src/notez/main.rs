use colored::Colorize;

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}
