use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;
use std::io::Write;

use crate::{
    config::Config,
    finder::{self, FinderError},
    inventory::Inventory,
    report::{OutputFormat, Report},
    services::ec2,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// only report images whose name matches this pattern; plain text matches
    /// anywhere in the name, `*` and `?` make it a glob over the whole name
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// the region to look in, defaults to the aws region chain and then us-west-2
    #[arg(short, long)]
    pub region: Option<String>,

    /// instances launched within this many days count as using their image
    #[arg(short, long, default_value_t = 90, allow_negative_numbers = true)]
    pub age: i64,

    /// image owners to look at, `all` to look at every image visible to the account
    #[arg(long = "owner", default_value = "self")]
    pub owners: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// also list the reservations and instances that were found
    #[arg(long)]
    pub show_instances: bool,

    /// attempts per aws call, 1 disables retries
    #[arg(long, default_value_t = 1)]
    pub max_attempts: u32,
}

pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new(&args)?;
    log_startup(&config);

    let (sdk_config, retries) = config.sdk_config().await?;
    let region = sdk_config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_default();
    info!("Region: {}", region);

    let client = ec2::Client::new(&sdk_config, retries);

    let mut stdout = std::io::stdout().lock();
    find_unused(&client, &config, region, Utc::now(), &mut stdout).await?;
    stdout.flush()?;

    Ok(())
}

// Both listings complete before anything is written to out.
pub async fn find_unused(
    inventory: &dyn Inventory,
    config: &Config,
    region: String,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let age_days = i64::from(config.age_days());
    let cutoff = finder::cutoff(now, age_days).map_err(FinderError::from)?;

    let instances = finder::enumerate_instances(inventory, age_days, now).await?;
    let images = finder::enumerate_images(inventory, config.pattern(), config.owners()).await?;
    let unused = finder::unused_images(&instances, &images, config.pattern());

    info!("{} of {} images are unused", unused.len(), images.len());

    let report = Report {
        region,
        cutoff: finder::format_cutoff(cutoff),
        instances: &instances,
        unused_images: unused,
    };
    report.write(out, config.output(), config.show_instances())?;

    Ok(())
}

fn log_startup(config: &Config) {
    info!(
        "Starting up: {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    info!("Pattern: {}", config.pattern());
    info!("Age: {} days", config.age_days());
    if config.owners().is_empty() {
        info!("Owners: all");
    } else {
        info!("Owners: {}", config.owners().join(", "));
    }
}
