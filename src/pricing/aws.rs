//! AWS-backed [`PricingProvider`] using the Pricing and EC2 SDKs.
//!
//! List prices come from the Pricing API's `GetProducts` (which is only
//! served out of `us-east-1` regardless of the region being priced);
//! spot quotes come from EC2 `DescribeSpotPriceHistory` in the target
//! region. Price-list documents are JSON blobs parsed defensively:
//! a record that cannot be read is skipped, never fatal to the batch.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_pricing::types::{Filter, FilterType};
use chrono::{DateTime, Utc};

use super::PricingProvider;
use crate::domain::{InstancePricing, OperatingSystem, SpotQuote, region_name};
use crate::error::ApiError;

/// Pricing gateway backed by the AWS Pricing and EC2 APIs.
#[derive(Debug)]
pub struct AwsPricingProvider {
    pricing: aws_sdk_pricing::Client,
    shared_config: SdkConfig,
}

impl AwsPricingProvider {
    /// Builds a provider from the ambient AWS credentials/config chain.
    pub async fn from_env() -> Self {
        let shared_config = aws_config::load_from_env().await;
        let pricing_config = aws_sdk_pricing::config::Builder::from(&shared_config)
            .region(aws_sdk_pricing::config::Region::new("us-east-1"))
            .build();
        Self {
            pricing: aws_sdk_pricing::Client::from_conf(pricing_config),
            shared_config,
        }
    }

    /// EC2 client pinned to the region being quoted.
    fn ec2_client(&self, region: &str) -> aws_sdk_ec2::Client {
        let config = aws_sdk_ec2::config::Builder::from(&self.shared_config)
            .region(aws_sdk_ec2::config::Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(config)
    }
}

fn term_match(field: &str, value: &str) -> Result<Filter, ApiError> {
    Filter::builder()
        .r#type(FilterType::TermMatch)
        .field(field)
        .value(value)
        .build()
        .map_err(|e| ApiError::Internal(format!("invalid pricing filter: {e}")))
}

#[async_trait]
impl PricingProvider for AwsPricingProvider {
    async fn fetch_list_prices(
        &self,
        region: &str,
        os: OperatingSystem,
    ) -> Result<Vec<InstancePricing>, ApiError> {
        let location = region_name(region).ok_or(ApiError::InvalidRegion)?;

        let response = self
            .pricing
            .get_products()
            .service_code("AmazonEC2")
            .filters(term_match("location", location)?)
            .filters(term_match("operatingSystem", os.pricing_api_name())?)
            .filters(term_match("tenancy", "Shared")?)
            .filters(term_match("capacitystatus", "Used")?)
            .max_results(100)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let instances: Vec<InstancePricing> = response
            .price_list()
            .iter()
            .filter_map(|doc| parse_price_list_document(doc, os))
            .collect();

        tracing::debug!(region, %os, count = instances.len(), "fetched list prices");
        Ok(instances)
    }

    async fn fetch_spot_prices(
        &self,
        region: &str,
        os: OperatingSystem,
    ) -> Result<HashMap<String, SpotQuote>, ApiError> {
        let response = self
            .ec2_client(region)
            .describe_spot_price_history()
            .product_descriptions(os.spot_product_description())
            .start_time(aws_sdk_ec2::primitives::DateTime::from(SystemTime::now()))
            .max_results(100)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let mut quotes: HashMap<String, SpotQuote> = HashMap::new();
        for entry in response.spot_price_history() {
            let Some(instance_type) = entry.instance_type() else {
                continue;
            };
            let Some(price) = entry.spot_price().and_then(|p| p.parse::<f64>().ok()) else {
                continue;
            };
            let Some(timestamp) = entry
                .timestamp()
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.secs(), ts.subsec_nanos()))
            else {
                continue;
            };

            // Keep only the most recent quote per instance type.
            let quote = SpotQuote { price, timestamp };
            quotes
                .entry(instance_type.as_str().to_string())
                .and_modify(|existing| {
                    if timestamp > existing.timestamp {
                        *existing = quote;
                    }
                })
                .or_insert(quote);
        }

        tracing::debug!(region, %os, count = quotes.len(), "fetched spot quotes");
        Ok(quotes)
    }
}

/// Parses one price-list JSON document into a pricing row.
///
/// Returns `None` for records that are not EC2 instances or are missing
/// an instance type; other missing attributes degrade to defaults.
fn parse_price_list_document(doc: &str, os: OperatingSystem) -> Option<InstancePricing> {
    let value: serde_json::Value = serde_json::from_str(doc).ok()?;

    // Attributes live under `product` in current documents; some older
    // dumps put them at the top level.
    let attributes = value
        .get("product")
        .and_then(|p| p.get("attributes"))
        .or_else(|| value.get("attributes"))?;

    if attributes.get("servicecode").and_then(|v| v.as_str()) != Some("AmazonEC2") {
        return None;
    }

    let instance_type = attributes
        .get("instanceType")
        .and_then(|v| v.as_str())?
        .to_string();

    let vcpu = attributes
        .get("vcpu")
        .and_then(|v| v.as_str())
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);

    let memory_gib = attributes
        .get("memory")
        .and_then(|v| v.as_str())
        .and_then(|m| m.trim_end_matches(" GiB").trim().parse::<f64>().ok())
        .unwrap_or(0.0);

    let network_performance = attributes
        .get("networkPerformance")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let terms = value.get("terms");
    let on_demand = terms
        .and_then(|t| t.get("OnDemand"))
        .and_then(first_dimension_price);
    let reserved = terms
        .and_then(|t| t.get("Reserved"))
        .and_then(reserved_one_year_no_upfront);

    Some(InstancePricing {
        instance_type,
        vcpu,
        memory_gib,
        network_performance,
        os,
        on_demand,
        reserved,
        spot: None,
        spot_last_updated: None,
    })
}

/// First price dimension's USD rate within a term map.
fn first_dimension_price(term_map: &serde_json::Value) -> Option<f64> {
    let term = term_map.as_object()?.values().next()?;
    dimension_price(term)
}

/// USD rate of a single term's first price dimension.
fn dimension_price(term: &serde_json::Value) -> Option<f64> {
    term.get("priceDimensions")?
        .as_object()?
        .values()
        .next()?
        .get("pricePerUnit")?
        .get("USD")?
        .as_str()?
        .parse::<f64>()
        .ok()
}

/// Picks the first Reserved term matching 1yr / No Upfront, in
/// encounter order.
fn reserved_one_year_no_upfront(reserved_map: &serde_json::Value) -> Option<f64> {
    reserved_map.as_object()?.values().find_map(|term| {
        let attrs = term.get("termAttributes")?;
        let lease = attrs.get("LeaseContractLength").and_then(|v| v.as_str());
        let purchase = attrs.get("PurchaseOption").and_then(|v| v.as_str());
        if lease == Some("1yr") && purchase == Some("No Upfront") {
            dimension_price(term)
        } else {
            None
        }
    })
}
