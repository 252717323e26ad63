use anyhow::Context as _;
use serde_json::{Value, json};
use tempfile::tempdir;
use unrelated_gql_engine_adapter::config::ApiDefinition;
use unrelated_gql_engine_adapter::engine::EngineDataSource;
use unrelated_gql_engine_adapter::subscription::EngineSubscriptionType;
use unrelated_gql_engine_adapter::{AdapterError, EngineAdapter};
use unrelated_test_support::{
    LIBRARY_SCHEMA, execution_engine_definition_yaml, proxy_only_definition_yaml,
    write_definition,
};

#[test]
fn proxy_only_yaml_file_builds_engine_config() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let path = write_definition(dir.path(), "library.yaml", &proxy_only_definition_yaml("sse"))?;

    let def = ApiDefinition::from_path(&path).context("load definition")?;
    let cfg = EngineAdapter::new(&def).build().context("build engine config")?;

    assert_eq!(cfg.subscription_type, EngineSubscriptionType::Sse);
    assert_eq!(cfg.schema.query_type(), Some("Query"));
    assert_eq!(cfg.schema.mutation_type(), Some("Mutation"));

    let EngineDataSource::Graphql {
        fetch,
        subscription,
        root_fields,
        ..
    } = &cfg.data_sources[0]
    else {
        anyhow::bail!("expected a GraphQL data source");
    };
    assert_eq!(fetch.url, "https://library.example/graphql");
    assert!(subscription.use_sse);

    let header = fetch.header.as_ref().context("headers present")?;
    assert_eq!(header.get("Authorization"), Some("Bearer upstream-token"));
    assert_eq!(header.get("X-Gateway"), Some("unrelated"));

    let types: Vec<&str> = root_fields.iter().map(|r| r.type_name.as_str()).collect();
    assert_eq!(types, vec!["Query", "Mutation", "Subscription"]);
    Ok(())
}

#[test]
fn json_definition_file_is_read_as_json() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let definition = json!({
        "name": "library",
        "target_url": "https://library.example/graphql",
        "graphql": {"schema": LIBRARY_SCHEMA}
    });
    let path = write_definition(dir.path(), "library.json", &definition.to_string())?;

    let def = ApiDefinition::from_path(&path).context("load definition")?;
    assert_eq!(def.name, "library");
    Ok(())
}

#[test]
fn execution_engine_definition_serializes_for_the_engine() -> anyhow::Result<()> {
    let def = ApiDefinition::from_yaml_str(&execution_engine_definition_yaml())
        .context("parse definition")?;
    let cfg = EngineAdapter::new(&def).build().context("build engine config")?;
    let out = serde_json::to_value(&cfg).context("serialize engine config")?;

    assert_eq!(out["execution_mode"], json!("executionEngine"));
    assert_eq!(out["subscription_type"], json!("unknown"));
    assert!(
        out["schema"]
            .as_str()
            .is_some_and(|sdl| sdl.contains("type Book"))
    );

    let sources = out["data_sources"]
        .as_array()
        .context("data_sources array")?;
    assert_eq!(sources.len(), 3);

    assert_eq!(sources[0]["kind"], json!("REST"));
    assert_eq!(sources[0]["fetch"]["query"][0]["name"], json!("limit"));
    assert_eq!(sources[0]["fetch"]["header"]["X-Tenant"], json!(["acme"]));

    // Operation template became a REST call that posts the operation.
    assert_eq!(sources[1]["kind"], json!("REST"));
    let body: Value = serde_json::from_str(
        sources[1]["fetch"]["body"]
            .as_str()
            .context("body is a string")?,
    )
    .context("body is json")?;
    assert!(
        body["query"]
            .as_str()
            .is_some_and(|q| q.starts_with("mutation"))
    );
    assert_eq!(body["variables"]["title"], json!("{{.arguments.title}}"));

    assert_eq!(sources[2]["kind"], json!("GraphQL"));
    assert_eq!(
        sources[2]["subscription"]["protocol"],
        json!("graphql-transport-ws")
    );
    assert_eq!(sources[2]["fetch"]["method"], json!("POST"));
    Ok(())
}

#[test]
fn invalid_schema_in_definition_is_reported_as_validation_error() -> anyhow::Result<()> {
    let yaml = proxy_only_definition_yaml("graphql-ws").replace("[Book!]!", "[Novel!]!");
    let def = ApiDefinition::from_yaml_str(&yaml).context("parse definition")?;

    let err = EngineAdapter::new(&def)
        .build()
        .expect_err("unknown type must fail");
    assert!(matches!(err, AdapterError::SchemaValidation { .. }));
    Ok(())
}
