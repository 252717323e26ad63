//! Upstream call descriptors for engine data sources.
//!
//! Nothing here talks to the network: descriptors are handed to the engine, which performs the
//! calls later.

use crate::config::{GraphqlDataSourceConfig, QueryParam, RestDataSourceConfig};
use crate::error::{AdapterError, Result};
use crate::headers::{HeaderSet, WireHeaders, merge_headers, to_wire_headers};
use crate::subscription::{
    EngineTransportProtocol, SubscriptionTransportKind, select_subscription_protocol,
};
use serde::Serialize;

/// A REST call the engine performs to resolve fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestCallDescriptor {
    pub url: String,
    pub method: String,
    /// Request body, already encoded.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<WireHeaders>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryParam>,
}

/// Fetch settings for a GraphQL upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlFetchConfig {
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<WireHeaders>,
}

/// Subscription settings for a GraphQL upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphqlSubscriptionConfig {
    pub url: String,
    pub use_sse: bool,
    pub protocol: EngineTransportProtocol,
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a serde_json::Value>,
}

/// Turn a GraphQL operation template into a REST call that posts it.
///
/// # Errors
///
/// Returns [`AdapterError::MissingOperation`] if the template has no operation, or
/// [`AdapterError::Serialization`] if the request payload cannot be encoded.
pub fn generate_rest_data_source(config: &GraphqlDataSourceConfig) -> Result<RestCallDescriptor> {
    if !config.has_operation {
        return Err(AdapterError::MissingOperation);
    }

    let request = GraphqlRequest {
        query: &config.operation,
        variables: config.variables.as_ref(),
    };
    let body = serde_json::to_string(&request).map_err(AdapterError::Serialization)?;

    Ok(RestCallDescriptor {
        url: config.url.clone(),
        method: config.method.clone(),
        body,
        header: to_wire_headers(&config.headers),
        query: Vec::new(),
    })
}

/// REST descriptor for a plain REST data source; its own headers win over `global_headers`.
#[must_use]
pub fn rest_call_from_rest_config(
    config: &RestDataSourceConfig,
    global_headers: &HeaderSet,
) -> RestCallDescriptor {
    let headers = merge_headers([&config.headers, global_headers]);
    RestCallDescriptor {
        url: config.url.clone(),
        method: config.method.clone(),
        body: config.body.clone(),
        header: to_wire_headers(&headers),
        query: config.query.clone(),
    }
}

#[must_use]
pub fn graphql_fetch(url: &str, method: &str, headers: &HeaderSet) -> GraphqlFetchConfig {
    GraphqlFetchConfig {
        url: url.to_string(),
        method: method.to_string(),
        header: to_wire_headers(headers),
    }
}

/// Subscriptions go to the same URL as queries; SSE replaces the WebSocket transport entirely.
#[must_use]
pub fn graphql_subscription(
    url: &str,
    kind: SubscriptionTransportKind,
) -> GraphqlSubscriptionConfig {
    GraphqlSubscriptionConfig {
        url: url.to_string(),
        use_sse: kind == SubscriptionTransportKind::Sse,
        protocol: select_subscription_protocol(kind),
    }
}
