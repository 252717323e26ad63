use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// A small schema with all three root operation types.
pub const LIBRARY_SCHEMA: &str = r"type Query {
  books: [Book!]!
  book(id: ID!): Book
}

type Mutation {
  addBook(title: String!): Book
}

type Subscription {
  bookAdded: Book
}

type Book {
  id: ID!
  title: String!
}
";

/// Proxy-only definition (YAML) fronting a single upstream.
#[must_use]
pub fn proxy_only_definition_yaml(subscription_type: &str) -> String {
    format!(
        r"name: library
target_url: https://library.example/graphql
graphql:
  execution_mode: proxyOnly
  schema: |
{schema}
  proxy:
    subscription_type: {subscription_type}
    auth_headers:
      Authorization: Bearer upstream-token
    request_headers:
      X-Gateway: unrelated
",
        schema = indent(LIBRARY_SCHEMA, 4),
    )
}

/// Execution-engine definition (YAML) with one source of each supported shape.
#[must_use]
pub fn execution_engine_definition_yaml() -> String {
    format!(
        r#"name: library-udg
graphql:
  execution_mode: executionEngine
  schema: |
{schema}
  engine:
    global_headers:
      - key: X-Tenant
        value: acme
    data_sources:
      - kind: REST
        name: books
        root_fields:
          - type: Query
            fields: [books, book]
        config:
          url: https://books.example/books
          method: GET
          query:
            - name: limit
              value: "50"
      - kind: GraphQL
        name: add-book
        root_fields:
          - type: Mutation
            fields: [addBook]
        config:
          url: https://books.example/graphql
          method: POST
          has_operation: true
          operation: "mutation($title: String!) {{ addBook(title: $title) {{ id }} }}"
          variables:
            title: "{{{{.arguments.title}}}}"
      - kind: GraphQL
        name: book-events
        root_fields:
          - type: Subscription
            fields: [bookAdded]
        config:
          url: https://events.example/graphql
          subscription_type: graphql-transport-ws
"#,
        schema = indent(LIBRARY_SCHEMA, 4),
    )
}

/// Write `contents` to `dir/file_name` and return the path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_definition(dir: &Path, file_name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
