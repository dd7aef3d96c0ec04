use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = transit_relay::cli::Cli::parse();
    if let Err(e) = transit_relay::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
