use std::{
    collections::{HashMap, HashSet},
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{info, warn};

use crate::{
    config::ConfigError,
    filter::{self, build_filters},
    inventory::{Image, Instance, Inventory},
    pattern::NamePattern,
    services::ec2::EnumerationError,
};

#[derive(Debug)]
pub enum FinderError {
    Config(ConfigError),
    Enumeration(EnumerationError),
}

impl Error for FinderError {}
impl Display for FinderError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Config(e) => write!(f, "{}", e),
            Self::Enumeration(e) => write!(f, "{}", e),
        }
    }
}

impl From<ConfigError> for FinderError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<EnumerationError> for FinderError {
    fn from(err: EnumerationError) -> Self {
        Self::Enumeration(err)
    }
}

pub fn cutoff(now: DateTime<Utc>, age_days: i64) -> Result<DateTime<Utc>, ConfigError> {
    if age_days < 0 {
        return Err(ConfigError::NegativeAge(age_days));
    }

    Duration::try_days(age_days)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or(ConfigError::AgeOutOfRange(age_days))
}

// launch-time filter values use second precision with a Z suffix
pub fn format_cutoff(cutoff: DateTime<Utc>) -> String {
    cutoff.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lists every instance launched at or after `now - age_days`.
pub async fn enumerate_instances(
    inventory: &dyn Inventory,
    age_days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Instance>, FinderError> {
    let cutoff = cutoff(now, age_days)?;

    let filters = build_filters(&HashMap::from([(
        filter::LAUNCH_TIME.to_string(),
        format_cutoff(cutoff),
    )]));

    // the check below can only drop instances, never recover ones the filter excluded
    warn!(
        "sending {}={}; which instances count as in use depends on how the service applies this filter",
        filter::LAUNCH_TIME,
        format_cutoff(cutoff)
    );

    let mut instances = inventory.list_instances(filters).await?;
    instances.retain(|i| i.launch_time.map_or(true, |t| t >= cutoff));

    info!(
        "found {} instances launched since {}",
        instances.len(),
        format_cutoff(cutoff)
    );

    Ok(instances)
}

/// Lists every image whose name matches `pattern`, restricted to `owners`
/// when any are given.
pub async fn enumerate_images(
    inventory: &dyn Inventory,
    pattern: &NamePattern,
    owners: &[String],
) -> Result<Vec<Image>, FinderError> {
    let filters = build_filters(&HashMap::from([(
        filter::NAME.to_string(),
        pattern.server_filter(),
    )]));

    let images = inventory.list_images(filters, owners).await?;

    info!("found {} images matching {}", images.len(), pattern);

    Ok(images)
}

/// Images matching `pattern` that no instance was launched from, in
/// enumeration order.
///
/// The used set is built from the complete instance list before any image is
/// looked at.
pub fn unused_images<'a>(
    instances: &[Instance],
    images: &'a [Image],
    pattern: &NamePattern,
) -> Vec<&'a Image> {
    let used: HashSet<&str> = instances.iter().map(|i| i.image_id.as_str()).collect();

    images
        .iter()
        .filter(|image| !used.contains(image.image_id.as_str()) && pattern.matches(&image.name))
        .collect()
}
