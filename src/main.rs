use clap::Parser;

use unused_amis::cli::{self, Args};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(err) = cli::run(args).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
