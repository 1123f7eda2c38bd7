//! GraphQL introspection fetching and schema export.
//!
//! This crate fetches a GraphQL schema from a remote endpoint via
//! introspection and saves it as Schema Definition Language (SDL) or JSON.
//!
//! The work is a straight pipeline, and every stage is public so callers can
//! stop at any point:
//!
//! 1. [`IntrospectionClient::introspect`] posts the query and parses the body
//! 2. [`validate_response`] rejects responses carrying GraphQL errors
//! 3. a [`SchemaCodec`] ([`SdlPrinter`] or [`JsonPrinter`]) encodes the payload
//! 4. [`save_schema`] writes the text out
//!
//! # Examples
//!
//! ## One-step introspection to SDL
//!
//! ```no_run
//! use graphql_introspect::introspect_url_to_sdl;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sdl = introspect_url_to_sdl("https://api.example.com/graphql").await?;
//!     println!("{}", sdl);
//!     Ok(())
//! }
//! ```
//!
//! ## Download to a file
//!
//! ```no_run
//! use graphql_introspect::{download_schema, IntrospectionClient, QueryDetail, SdlPrinter};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IntrospectionClient::new().with_timeout(Duration::from_secs(60));
//!     let bytes = download_schema(
//!         &client,
//!         "https://api.example.com/graphql",
//!         QueryDetail::Full,
//!         &SdlPrinter,
//!         Path::new("schema.graphql"),
//!     )
//!     .await?;
//!     println!("wrote {bytes} bytes");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod query;
mod sdl;
mod types;
mod validate;
mod writer;

pub use client::IntrospectionClient;
pub use error::{IntrospectionError, Result, Stage};
pub use query::{QueryDetail, INTROSPECTION_QUERY, MINIMAL_INTROSPECTION_QUERY};
pub use sdl::{introspection_to_sdl, JsonPrinter, SchemaCodec, SdlPrinter};
pub use types::*;
pub use validate::validate_response;
pub use writer::save_schema;

use std::path::Path;

/// Fetches the schema at `url` and encodes it with `codec`.
///
/// Runs fetch, validation and encoding; nothing is written.
#[tracing::instrument(skip(client, codec), fields(codec = codec.name()))]
pub async fn fetch_schema(
    client: &IntrospectionClient,
    url: &str,
    detail: QueryDetail,
    codec: &dyn SchemaCodec,
) -> Result<String> {
    tracing::info!("Starting introspection");
    let result = client.introspect(url, detail).await?;
    let data = validate_response(result)?;
    tracing::debug!("Encoding schema");
    let text = codec.encode(&data)?;
    tracing::info!(length = text.len(), "Schema encoded");
    Ok(text)
}

/// Fetches the schema at `url`, encodes it and writes it to `path`.
///
/// `path` is only opened once every earlier stage has succeeded, so a failed
/// run leaves an existing file untouched. Returns the number of bytes written.
#[tracing::instrument(skip(client, codec), fields(path = %path.display()))]
pub async fn download_schema(
    client: &IntrospectionClient,
    url: &str,
    detail: QueryDetail,
    codec: &dyn SchemaCodec,
    path: &Path,
) -> Result<usize> {
    let text = fetch_schema(client, url, detail, codec).await?;
    save_schema(&text, path)?;
    Ok(text.len())
}

/// Introspects a GraphQL endpoint and converts the result to SDL.
///
/// Uses a default [`IntrospectionClient`], the full query and [`SdlPrinter`].
///
/// # Examples
///
/// ```no_run
/// # use graphql_introspect::introspect_url_to_sdl;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sdl = introspect_url_to_sdl("https://api.example.com/graphql").await?;
/// println!("{}", sdl);
/// # Ok(())
/// # }
/// ```
pub async fn introspect_url_to_sdl(url: &str) -> Result<String> {
    fetch_schema(&IntrospectionClient::new(), url, QueryDetail::Full, &SdlPrinter).await
}
