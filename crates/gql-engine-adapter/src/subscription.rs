//! Subscription transport selection.
//!
//! API definitions name the transport a subscription should use upstream. The engine needs two
//! views of that choice: the WebSocket sub-protocol to negotiate, and its own four-way
//! subscription type (which is the only one that can express SSE).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription transport as written in an API definition.
///
/// Unrecognized values (including `null` and non-strings) deserialize to
/// [`SubscriptionTransportKind::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum SubscriptionTransportKind {
    Ws,
    TransportWs,
    Sse,
    #[default]
    Unspecified,
}

impl SubscriptionTransportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ws => "graphql-ws",
            Self::TransportWs => "graphql-transport-ws",
            Self::Sse => "sse",
            Self::Unspecified => "",
        }
    }
}

impl From<&str> for SubscriptionTransportKind {
    fn from(value: &str) -> Self {
        match value {
            "graphql-ws" => Self::Ws,
            "graphql-transport-ws" => Self::TransportWs,
            "sse" => Self::Sse,
            _ => Self::Unspecified,
        }
    }
}

impl From<String> for SubscriptionTransportKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<serde_json::Value> for SubscriptionTransportKind {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map_or(Self::Unspecified, Self::from)
    }
}

impl From<SubscriptionTransportKind> for String {
    fn from(value: SubscriptionTransportKind) -> Self {
        value.as_str().to_string()
    }
}

/// WebSocket sub-protocol identifiers understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineTransportProtocol {
    #[serde(rename = "graphql-ws")]
    GraphqlWs,
    #[serde(rename = "graphql-transport-ws")]
    GraphqlTransportWs,
}

impl EngineTransportProtocol {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GraphqlWs => "graphql-ws",
            Self::GraphqlTransportWs => "graphql-transport-ws",
        }
    }
}

impl fmt::Display for EngineTransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's own subscription type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineSubscriptionType {
    Unknown,
    GraphqlWs,
    GraphqlTransportWs,
    Sse,
}

/// WebSocket sub-protocol for a transport; only `TransportWs` selects `graphql-transport-ws`.
#[must_use]
pub fn select_subscription_protocol(kind: SubscriptionTransportKind) -> EngineTransportProtocol {
    match kind {
        SubscriptionTransportKind::TransportWs => EngineTransportProtocol::GraphqlTransportWs,
        SubscriptionTransportKind::Ws
        | SubscriptionTransportKind::Sse
        | SubscriptionTransportKind::Unspecified => EngineTransportProtocol::GraphqlWs,
    }
}

#[must_use]
pub fn select_subscription_type(kind: SubscriptionTransportKind) -> EngineSubscriptionType {
    match kind {
        SubscriptionTransportKind::Ws => EngineSubscriptionType::GraphqlWs,
        SubscriptionTransportKind::TransportWs => EngineSubscriptionType::GraphqlTransportWs,
        SubscriptionTransportKind::Sse => EngineSubscriptionType::Sse,
        SubscriptionTransportKind::Unspecified => EngineSubscriptionType::Unknown,
    }
}
