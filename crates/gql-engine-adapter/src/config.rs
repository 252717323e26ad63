//! API definition model (GraphQL section) as persisted by the gateway.

use crate::error::Result;
use crate::headers::{HeaderSet, canonical_header_key};
use crate::subscription::SubscriptionTransportKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One exposed GraphQL API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiDefinition {
    pub name: String,

    /// Upstream URL used by proxy-only and subgraph APIs.
    #[serde(default)]
    pub target_url: String,

    pub graphql: GraphqlConfig,
}

impl ApiDefinition {
    /// Load a definition from disk. `.json` files are parsed as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not a valid YAML definition.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not a valid JSON definition.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphqlConfig {
    #[serde(default)]
    pub execution_mode: ExecutionMode,

    /// Schema SDL exposed to clients.
    pub schema: String,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    /// Forward operations to a single upstream GraphQL server.
    #[default]
    ProxyOnly,
    /// Resolve fields through configured data sources (universal data graph).
    ExecutionEngine,
    /// Proxy-only API that also serves as a federation subgraph.
    Subgraph,
    /// Federation gateway over several subgraphs.
    Supergraph,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Headers injected for upstream authentication.
    #[serde(default)]
    pub auth_headers: HeaderSet,

    /// Headers added to every upstream request; these win over `auth_headers` on conflict.
    #[serde(default)]
    pub request_headers: HeaderSet,

    #[serde(default)]
    pub subscription_type: SubscriptionTransportKind,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineSection {
    #[serde(default)]
    pub data_sources: Vec<DataSource>,

    /// Headers applied to every data source, below the data source's own headers.
    #[serde(default)]
    pub global_headers: Vec<GlobalHeader>,
}

impl EngineSection {
    /// Global headers as a header set keyed by canonical name; later duplicates (in any casing)
    /// do not override earlier entries.
    #[must_use]
    pub fn global_header_set(&self) -> HeaderSet {
        let mut out = HeaderSet::new();
        for header in &self.global_headers {
            out.entry(canonical_header_key(&header.key))
                .or_insert_with(|| header.value.clone());
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DataSourceKind {
    #[serde(rename = "REST")]
    Rest,
    #[serde(rename = "GraphQL")]
    Graphql,
}

/// A configured upstream; `config` is decoded according to `kind`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataSource {
    pub kind: DataSourceKind,
    pub name: String,
    #[serde(default)]
    pub root_fields: Vec<TypeFields>,
    #[serde(default)]
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeFields {
    #[serde(rename = "type")]
    pub type_name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestDataSourceConfig {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: HeaderSet,
    #[serde(default)]
    pub query: Vec<QueryParam>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

/// An upstream GraphQL server, optionally with a fixed operation to send.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphqlDataSourceConfig {
    pub url: String,
    #[serde(default = "default_graphql_method")]
    pub method: String,
    #[serde(default)]
    pub headers: HeaderSet,
    #[serde(default)]
    pub subscription_type: SubscriptionTransportKind,
    #[serde(default)]
    pub has_operation: bool,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

fn default_graphql_method() -> String {
    "POST".to_string()
}

#[cfg(test)]
mod tests {
    use super::{ApiDefinition, DataSourceKind, ExecutionMode, GraphqlDataSourceConfig};
    use crate::headers::{HeaderSet, merge_headers};
    use crate::subscription::SubscriptionTransportKind;
    use serde_json::json;

    #[test]
    fn yaml_definition_parses_with_defaults() {
        let def = ApiDefinition::from_yaml_str(
            r"
name: countries
target_url: https://countries.example/graphql
graphql:
  schema: 'type Query { ping: String }'
",
        )
        .expect("valid yaml");

        assert_eq!(def.graphql.execution_mode, ExecutionMode::ProxyOnly);
        assert!(def.graphql.proxy.request_headers.is_empty());
        assert_eq!(
            def.graphql.proxy.subscription_type,
            SubscriptionTransportKind::Unspecified
        );
        assert!(def.graphql.engine.data_sources.is_empty());
    }

    #[test]
    fn data_source_kinds_use_gateway_names() {
        let def = ApiDefinition::from_json_str(
            &json!({
                "name": "udg",
                "graphql": {
                    "execution_mode": "executionEngine",
                    "schema": "type Query { a: Int }",
                    "engine": {
                        "data_sources": [
                            {"kind": "REST", "name": "a", "config": {}},
                            {"kind": "GraphQL", "name": "b", "config": {}}
                        ]
                    }
                }
            })
            .to_string(),
        )
        .expect("valid json");

        let kinds: Vec<_> = def
            .graphql
            .engine
            .data_sources
            .iter()
            .map(|ds| ds.kind)
            .collect();
        assert_eq!(kinds, vec![DataSourceKind::Rest, DataSourceKind::Graphql]);
    }

    #[test]
    fn unknown_execution_mode_is_rejected() {
        let err = ApiDefinition::from_yaml_str(
            r"
name: x
graphql:
  execution_mode: teleport
  schema: 'type Query { a: Int }'
",
        );
        assert!(err.is_err());
    }

    #[test]
    fn graphql_source_defaults_to_post_without_operation() {
        let cfg: GraphqlDataSourceConfig =
            serde_json::from_value(json!({"url": "https://up.example/graphql"}))
                .expect("valid config");
        assert_eq!(cfg.method, "POST");
        assert!(!cfg.has_operation);
        assert!(cfg.variables.is_none());
    }

    #[test]
    fn first_global_header_wins() {
        let def = ApiDefinition::from_yaml_str(
            r"
name: x
graphql:
  schema: 'type Query { a: Int }'
  engine:
    global_headers:
      - key: X-Env
        value: prod
      - key: X-Env
        value: dev
",
        )
        .expect("valid yaml");
        let globals = def.graphql.engine.global_header_set();
        assert_eq!(globals.get("X-Env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn first_global_header_wins_across_casings() {
        let def = ApiDefinition::from_yaml_str(
            r"
name: x
graphql:
  schema: 'type Query { a: Int }'
  engine:
    global_headers:
      - key: x-env
        value: first
      - key: X-Env
        value: second
",
        )
        .expect("valid yaml");
        let globals = def.graphql.engine.global_header_set();
        assert_eq!(globals.len(), 1);
        assert_eq!(globals.get("X-Env").map(String::as_str), Some("first"));

        let merged = merge_headers([&HeaderSet::new(), &globals]);
        assert_eq!(merged.get("X-Env").map(String::as_str), Some("first"));
    }

    #[test]
    fn null_subscription_type_loads_as_unspecified() {
        let def = ApiDefinition::from_json_str(
            &json!({
                "name": "x",
                "target_url": "https://up.example/graphql",
                "graphql": {
                    "schema": "type Query { a: Int }",
                    "proxy": {"subscription_type": null}
                }
            })
            .to_string(),
        )
        .expect("null transport is accepted");
        assert_eq!(
            def.graphql.proxy.subscription_type,
            SubscriptionTransportKind::Unspecified
        );

        let cfg: GraphqlDataSourceConfig = serde_json::from_value(
            json!({"url": "https://up.example/graphql", "subscription_type": null}),
        )
        .expect("null transport is accepted");
        assert_eq!(cfg.subscription_type, SubscriptionTransportKind::Unspecified);
    }
}
