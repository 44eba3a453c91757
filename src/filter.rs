use std::collections::HashMap;

use aws_sdk_ec2::types::Filter;

pub const LAUNCH_TIME: &str = "launch-time";
pub const NAME: &str = "name";

// build_filters turns an attribute map into ec2 filters. Entries with an empty
// value are dropped and the rest are sorted by name, so the same map always
// produces the same request.
pub fn build_filters(attributes: &HashMap<String, String>) -> Vec<Filter> {
    let mut names: Vec<&String> = attributes
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| name)
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| new_filter(name, &attributes[name]))
        .collect()
}

fn new_filter(name: &str, value: &str) -> Filter {
    Filter::builder().name(name).values(value).build()
}
