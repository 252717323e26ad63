//! Whole-definition adapter: API definition in, engine configuration out.

use crate::config::{
    ApiDefinition, DataSource, DataSourceKind, ExecutionMode, GraphqlDataSourceConfig,
    RestDataSourceConfig, TypeFields,
};
use crate::datasource::{
    GraphqlFetchConfig, GraphqlSubscriptionConfig, RestCallDescriptor, generate_rest_data_source,
    graphql_fetch, graphql_subscription, rest_call_from_rest_config,
};
use crate::error::{AdapterError, Result};
use crate::headers::{HeaderSet, merge_headers};
use crate::schema::{NormalizedSchema, normalize};
use crate::subscription::{EngineSubscriptionType, select_subscription_type};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Everything the execution engine needs to serve one API.
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    pub execution_mode: ExecutionMode,
    pub schema: NormalizedSchema,
    pub subscription_type: EngineSubscriptionType,
    pub data_sources: Vec<EngineDataSource>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum EngineDataSource {
    #[serde(rename = "REST")]
    Rest {
        name: String,
        root_fields: Vec<TypeFields>,
        fetch: RestCallDescriptor,
    },
    #[serde(rename = "GraphQL")]
    Graphql {
        name: String,
        root_fields: Vec<TypeFields>,
        fetch: GraphqlFetchConfig,
        subscription: GraphqlSubscriptionConfig,
    },
}

impl EngineDataSource {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Rest { name, .. } | Self::Graphql { name, .. } => name,
        }
    }

    #[must_use]
    pub fn root_fields(&self) -> &[TypeFields] {
        match self {
            Self::Rest { root_fields, .. } | Self::Graphql { root_fields, .. } => root_fields,
        }
    }
}

pub struct EngineAdapter<'a> {
    definition: &'a ApiDefinition,
}

impl<'a> EngineAdapter<'a> {
    #[must_use]
    pub fn new(definition: &'a ApiDefinition) -> Self {
        Self { definition }
    }

    /// Build the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid, the execution mode is unsupported, or a data
    /// source cannot be turned into an upstream descriptor.
    pub fn build(&self) -> Result<EngineConfig> {
        let graphql = &self.definition.graphql;
        let schema = normalize(&graphql.schema)?;

        let data_sources = match graphql.execution_mode {
            ExecutionMode::ProxyOnly | ExecutionMode::Subgraph => {
                vec![self.proxy_data_source(&schema)?]
            }
            ExecutionMode::ExecutionEngine => self.engine_data_sources(&schema)?,
            ExecutionMode::Supergraph => {
                return Err(AdapterError::Config(format!(
                    "execution mode 'supergraph' is not supported (API '{}')",
                    self.definition.name
                )));
            }
        };

        tracing::info!(
            api = %self.definition.name,
            mode = ?graphql.execution_mode,
            data_sources = data_sources.len(),
            "engine configuration built"
        );

        Ok(EngineConfig {
            execution_mode: graphql.execution_mode,
            schema,
            subscription_type: select_subscription_type(graphql.proxy.subscription_type),
            data_sources,
        })
    }

    fn proxy_data_source(&self, schema: &NormalizedSchema) -> Result<EngineDataSource> {
        let url = self.definition.target_url.trim();
        if url.is_empty() {
            return Err(AdapterError::Config(format!(
                "API '{}' proxies GraphQL but has no target_url",
                self.definition.name
            )));
        }

        let proxy = &self.definition.graphql.proxy;
        let headers = merge_headers([&proxy.request_headers, &proxy.auth_headers]);

        Ok(EngineDataSource::Graphql {
            name: self.definition.name.clone(),
            root_fields: schema.root_fields(),
            fetch: graphql_fetch(url, "POST", &headers),
            subscription: graphql_subscription(url, proxy.subscription_type),
        })
    }

    fn engine_data_sources(&self, schema: &NormalizedSchema) -> Result<Vec<EngineDataSource>> {
        let engine = &self.definition.graphql.engine;
        let global_headers = engine.global_header_set();

        let mut names: HashSet<&str> = HashSet::new();
        let mut out = Vec::with_capacity(engine.data_sources.len());
        for ds in &engine.data_sources {
            if !names.insert(ds.name.as_str()) {
                return Err(AdapterError::Config(format!(
                    "Duplicate data source name '{}' in API '{}'",
                    ds.name, self.definition.name
                )));
            }
            warn_unknown_root_types(ds, schema);
            out.push(build_engine_data_source(ds, &global_headers)?);
        }
        Ok(out)
    }
}

fn build_engine_data_source(ds: &DataSource, global_headers: &HeaderSet) -> Result<EngineDataSource> {
    let name = ds.name.clone();
    let root_fields = ds.root_fields.clone();

    match ds.kind {
        DataSourceKind::Rest => {
            let cfg: RestDataSourceConfig = decode_config(ds)?;
            tracing::debug!(data_source = %ds.name, url = %cfg.url, "REST data source");
            Ok(EngineDataSource::Rest {
                name,
                root_fields,
                fetch: rest_call_from_rest_config(&cfg, global_headers),
            })
        }
        DataSourceKind::Graphql => {
            let mut cfg: GraphqlDataSourceConfig = decode_config(ds)?;
            cfg.headers = merge_headers([&cfg.headers, global_headers]);

            if cfg.has_operation {
                tracing::debug!(data_source = %ds.name, url = %cfg.url, "GraphQL operation as REST data source");
                return Ok(EngineDataSource::Rest {
                    name,
                    root_fields,
                    fetch: generate_rest_data_source(&cfg)?,
                });
            }

            tracing::debug!(data_source = %ds.name, url = %cfg.url, "GraphQL data source");
            Ok(EngineDataSource::Graphql {
                name,
                root_fields,
                fetch: graphql_fetch(&cfg.url, &cfg.method, &cfg.headers),
                subscription: graphql_subscription(&cfg.url, cfg.subscription_type),
            })
        }
    }
}

fn decode_config<T: DeserializeOwned>(ds: &DataSource) -> Result<T> {
    serde_json::from_value(ds.config.clone()).map_err(|e| {
        AdapterError::Config(format!("Invalid config for data source '{}': {e}", ds.name))
    })
}

fn warn_unknown_root_types(ds: &DataSource, schema: &NormalizedSchema) {
    for root in &ds.root_fields {
        if !schema.has_type(&root.type_name) {
            tracing::warn!(
                data_source = %ds.name,
                type_name = %root.type_name,
                "root field type not found in schema"
            );
        }
    }
}
