use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::ec2::EnumerationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub instance_id: String,
    pub image_id: String,
    pub launch_time: Option<DateTime<Utc>>,
    pub reservation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub image_id: String,
    pub name: String,
    pub creation_date: Option<String>,
}

/// The two listing calls the finder needs from the compute inventory.
///
/// Implementations return every page of results; callers never see a partial
/// listing.
#[async_trait]
pub trait Inventory: Send + Sync {
    async fn list_instances(&self, filters: Vec<Filter>) -> Result<Vec<Instance>, EnumerationError>;

    async fn list_images(
        &self,
        filters: Vec<Filter>,
        owners: &[String],
    ) -> Result<Vec<Image>, EnumerationError>;
}
