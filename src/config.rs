use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use aws_config::{retry::RetryConfig, SdkConfig};

use crate::{cli::Args, pattern::NamePattern, report::OutputFormat, util};

// passing this as an owner lifts the owner restriction on image lookups
const ALL_OWNERS: &str = "all";

#[derive(Debug)]
pub enum ConfigError {
    NegativeAge(i64),
    AgeOutOfRange(i64),
    MissingRegion,
    InvalidPattern(String),
}

impl Error for ConfigError {}
impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::NegativeAge(age) => write!(f, "ConfigError: age must not be negative, got {}", age),
            Self::AgeOutOfRange(age) => write!(f, "ConfigError: age {} is out of range", age),
            Self::MissingRegion => write!(f, "ConfigError: no aws region could be resolved"),
            Self::InvalidPattern(e) => write!(f, "ConfigError: invalid pattern: {}", e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    region: Option<String>,
    age_days: u32,
    pattern: NamePattern,
    owners: Vec<String>,
    output: OutputFormat,
    show_instances: bool,
    max_attempts: u32,
}

impl Config {
    pub fn new(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self {
            region: region(args),
            age_days: age_days(args)?,
            pattern: NamePattern::parse(&args.pattern)
                .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?,
            owners: owners(args),
            output: args.output,
            show_instances: args.show_instances,
            max_attempts: args.max_attempts,
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn age_days(&self) -> u32 {
        self.age_days
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn show_instances(&self) -> bool {
        self.show_instances
    }

    /// Resolves the region once, before any api call is made. Credentials are
    /// resolved lazily by the sdk, failures surface from the first call.
    pub async fn sdk_config(&self) -> Result<(SdkConfig, RetryConfig), ConfigError> {
        let (config, retries) = util::aws_config_with_region(self.region(), self.max_attempts).await;

        if config.region().is_none() {
            return Err(ConfigError::MissingRegion);
        }

        Ok((config, retries))
    }
}

fn region(args: &Args) -> Option<String> {
    args.region
        .as_ref()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

fn age_days(args: &Args) -> Result<u32, ConfigError> {
    if args.age < 0 {
        return Err(ConfigError::NegativeAge(args.age));
    }

    u32::try_from(args.age).map_err(|_| ConfigError::AgeOutOfRange(args.age))
}

fn owners(args: &Args) -> Vec<String> {
    if args.owners.iter().any(|o| o == ALL_OWNERS) {
        return Vec::new();
    }

    args.owners.clone()
}
