use std::time::Duration;

use aws_config::{
    meta::region::RegionProviderChain,
    retry::{RetryConfig, RetryMode},
    BehaviorVersion, SdkConfig,
};
use aws_sdk_ec2::config::Region;

pub const FALLBACK_REGION: &str = "us-west-2";

// aws_config_with_region loads aws configurations for use with aws clients, the
// region argument wins over the environment and profile chain
pub async fn aws_config_with_region(
    region: Option<&str>,
    max_attempts: u32,
) -> (SdkConfig, RetryConfig) {
    let region_provider = RegionProviderChain::first_try(region.map(|r| Region::new(r.to_string())))
        .or_default_provider()
        .or_else(Region::new(FALLBACK_REGION));

    (
        aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await,
        retry_config(max_attempts),
    )
}

pub fn retry_config(max_attempts: u32) -> RetryConfig {
    if max_attempts <= 1 {
        return RetryConfig::disabled();
    }

    RetryConfig::standard()
        .with_initial_backoff(Duration::new(2, 0))
        .with_retry_mode(RetryMode::Adaptive)
        .with_max_attempts(max_attempts)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_single_attempt_disables_retries() {
        assert_eq!(retry_config(1).max_attempts(), 1);
        assert_eq!(retry_config(0).max_attempts(), 1);
    }

    #[test]
    fn test_retries_are_adaptive() {
        let config = retry_config(5);
        assert_eq!(config.max_attempts(), 5);
        assert_eq!(config.mode(), RetryMode::Adaptive);
    }
}
