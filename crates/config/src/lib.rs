//! Loading `.graphqlrc` files that describe where to download a schema from.
//!
//! ```yaml
//! schema:
//!   url: https://api.example.com/graphql
//!   timeout: 30
//! output: schema.graphql
//! ```

mod config;
mod error;
mod loader;

pub use config::{GraphQLConfig, IntrospectionSchemaConfig, ProjectConfig, SchemaConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
