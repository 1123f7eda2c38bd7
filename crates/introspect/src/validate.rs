//! Top-level checks on an introspection response.

use crate::{IntrospectionError, IntrospectionResult, Result, SchemaData};

/// Accepts a response only when it carries no errors and a `__schema` object.
///
/// A non-empty `errors` list fails with [`IntrospectionError::Schema`] even
/// if `data` is also present; `data` is never looked at in that case.
#[tracing::instrument(skip(result))]
pub fn validate_response(result: IntrospectionResult) -> Result<SchemaData> {
    if let Some(errors) = result.errors.filter(|errors| !errors.is_empty()) {
        tracing::error!(count = errors.len(), "Server reported errors");
        return Err(IntrospectionError::Schema(errors));
    }

    let data = match result.data {
        Some(data) if !data.is_null() => data,
        _ => {
            return Err(IntrospectionError::Invalid(
                "response contains no data".to_string(),
            ))
        }
    };

    if !data.get("__schema").is_some_and(serde_json::Value::is_object) {
        return Err(IntrospectionError::Invalid(
            "data does not contain a __schema object".to_string(),
        ));
    }

    tracing::debug!("Response validated");
    Ok(SchemaData(data))
}
