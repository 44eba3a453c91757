use async_trait::async_trait;
use aws_config::{retry::RetryConfig, SdkConfig};
use aws_sdk_ec2::{
    error::{DisplayErrorContext, SdkError},
    operation::{describe_images::DescribeImagesError, describe_instances::DescribeInstancesError},
    types::{self, Filter, Reservation},
};
use chrono::{DateTime, Utc};
use log::debug;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use crate::inventory::{Image, Instance, Inventory};

#[derive(Debug)]
pub enum EnumerationError {
    DescribeInstances(SdkError<DescribeInstancesError>),
    DescribeImages(SdkError<DescribeImagesError>),
}

impl Error for EnumerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DescribeInstances(e) => Some(e),
            Self::DescribeImages(e) => Some(e),
        }
    }
}

impl Display for EnumerationError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::DescribeInstances(e) => {
                write!(f, "DescribeInstances failed: {}", DisplayErrorContext(e))
            }
            Self::DescribeImages(e) => {
                write!(f, "DescribeImages failed: {}", DisplayErrorContext(e))
            }
        }
    }
}

impl From<SdkError<DescribeInstancesError>> for EnumerationError {
    fn from(err: SdkError<DescribeInstancesError>) -> Self {
        Self::DescribeInstances(err)
    }
}

impl From<SdkError<DescribeImagesError>> for EnumerationError {
    fn from(err: SdkError<DescribeImagesError>) -> Self {
        Self::DescribeImages(err)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    client: aws_sdk_ec2::Client,
}

impl Client {
    pub fn new(config: &SdkConfig, retries: RetryConfig) -> Self {
        let client_config = aws_sdk_ec2::config::Builder::from(config)
            .retry_config(retries)
            .build();
        let client = aws_sdk_ec2::Client::from_conf(client_config);

        Self { client }
    }
}

#[async_trait]
impl Inventory for Client {
    async fn list_instances(&self, filters: Vec<Filter>) -> Result<Vec<Instance>, EnumerationError> {
        let reservations = self
            .client
            .describe_instances()
            .set_filters(Some(filters))
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await?;

        debug!("describe instances returned {} reservations", reservations.len());

        Ok(reservations.iter().flat_map(instances).collect())
    }

    async fn list_images(
        &self,
        filters: Vec<Filter>,
        owners: &[String],
    ) -> Result<Vec<Image>, EnumerationError> {
        let owners = if owners.is_empty() {
            None
        } else {
            Some(owners.to_vec())
        };

        let images = self
            .client
            .describe_images()
            .set_filters(Some(filters))
            .set_owners(owners)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await?;

        debug!("describe images returned {} images", images.len());

        Ok(images.iter().filter_map(image).collect())
    }
}

// instances without an id or an image id cannot reference an ami, skip them
fn instances(reservation: &Reservation) -> Vec<Instance> {
    reservation
        .instances()
        .iter()
        .filter_map(|i| {
            Some(Instance {
                instance_id: i.instance_id()?.to_string(),
                image_id: i.image_id()?.to_string(),
                launch_time: i
                    .launch_time()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
                reservation_id: reservation.reservation_id().map(|r| r.to_string()),
            })
        })
        .collect()
}

fn image(image: &types::Image) -> Option<Image> {
    Some(Image {
        image_id: image.image_id()?.to_string(),
        name: image.name().unwrap_or_default().to_string(),
        creation_date: image.creation_date().map(|d| d.to_string()),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_sdk_ec2::primitives::DateTime as SmithyDateTime;

    #[test]
    fn test_instances_from_reservation() {
        let reservation = Reservation::builder()
            .reservation_id("r-1")
            .instances(
                types::Instance::builder()
                    .instance_id("i-1")
                    .image_id("ami-1")
                    .launch_time(SmithyDateTime::from_secs(1_672_531_200))
                    .build(),
            )
            .instances(types::Instance::builder().instance_id("i-2").build())
            .build();

        let instances = instances(&reservation);

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].instance_id, "i-1");
        assert_eq!(instances[0].image_id, "ami-1");
        assert_eq!(instances[0].reservation_id.as_deref(), Some("r-1"));
        assert_eq!(
            instances[0].launch_time.map(|t| t.to_rfc3339()),
            Some("2023-01-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_image_without_id_is_skipped() {
        let nameless = types::Image::builder().image_id("ami-1").build();
        let idless = types::Image::builder().name("web-base").build();

        assert_eq!(
            image(&nameless),
            Some(Image {
                image_id: "ami-1".to_string(),
                name: String::new(),
                creation_date: None,
            })
        );
        assert_eq!(image(&idless), None);
    }
}
