//! Schema codecs: turning a validated introspection payload into text.
//!
//! The pipeline only knows the [`SchemaCodec`] trait. [`SdlPrinter`] decodes
//! the payload into the typed model from [`crate::types`] and prints SDL;
//! [`JsonPrinter`] writes the payload back out as pretty JSON.

use crate::types::{
    IntrospectionData, IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
    IntrospectionInputValue, IntrospectionSchema, IntrospectionType, IntrospectionTypeRef,
};
use crate::{IntrospectionError, Result, SchemaData};

/// Built-in directives that are implied by every schema.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy"];

/// Reason servers report when `@deprecated` was used without one.
const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

const INDENT: &str = "  ";

/// Converts a validated introspection payload into the text that gets saved.
pub trait SchemaCodec: Send + Sync {
    /// Format name shown to users, e.g. `SDL`.
    fn name(&self) -> &'static str;

    /// Encodes the payload.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError::Model`] if the payload does not have the
    /// shape the codec needs.
    fn encode(&self, data: &SchemaData) -> Result<String>;
}

/// Prints the schema as SDL.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdlPrinter;

impl SchemaCodec for SdlPrinter {
    fn name(&self) -> &'static str {
        "SDL"
    }

    fn encode(&self, data: &SchemaData) -> Result<String> {
        let typed = data.to_typed()?;
        Ok(introspection_to_sdl(&typed))
    }
}

/// Writes the `{"__schema": ...}` payload as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPrinter;

impl SchemaCodec for JsonPrinter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn encode(&self, data: &SchemaData) -> Result<String> {
        let mut json = serde_json::to_string_pretty(data.as_json())
            .map_err(|e| IntrospectionError::Model(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

/// Converts a typed introspection payload to SDL.
///
/// - Built-in scalars, `__` types and built-in directives are left out
/// - A `schema { ... }` block is only written when a root type is not named
///   `Query`, `Mutation` or `Subscription`
/// - Types, fields, arguments and enum values keep the server's order
/// - Definitions are separated by a blank line; non-empty output ends with a
///   newline
///
/// # Examples
///
/// ```
/// # use graphql_introspect::{introspection_to_sdl, IntrospectionData};
/// let data: IntrospectionData = serde_json::from_value(serde_json::json!({
///     "__schema": {
///         "queryType": { "name": "Query" },
///         "types": [{
///             "kind": "OBJECT",
///             "name": "Query",
///             "fields": [{ "name": "ping", "type": { "kind": "SCALAR", "name": "String" } }]
///         }]
///     }
/// }))?;
/// assert_eq!(introspection_to_sdl(&data), "type Query {\n  ping: String\n}\n");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
#[tracing::instrument(skip(introspection), fields(
    types = introspection.schema.types.len(),
    directives = introspection.schema.directives.len()
))]
pub fn introspection_to_sdl(introspection: &IntrospectionData) -> String {
    tracing::debug!("Converting introspection to SDL");
    let schema = &introspection.schema;
    let mut blocks = Vec::new();

    if let Some(block) = schema_definition(schema) {
        blocks.push(block);
    }

    for directive in &schema.directives {
        if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
            continue;
        }
        if directive.locations.is_empty() {
            tracing::warn!(directive = %directive.name, "Skipping directive without locations");
            continue;
        }
        blocks.push(directive_definition(directive));
    }

    let directives_written = blocks.len();
    for type_def in schema.types.iter().filter(|t| !t.is_builtin()) {
        blocks.push(type_definition(type_def));
    }

    tracing::debug!(
        directives_written,
        types_written = blocks.len() - directives_written,
        "SDL generation complete"
    );

    if blocks.is_empty() {
        return String::new();
    }
    let mut sdl = blocks.join("\n\n");
    sdl.push('\n');
    sdl
}

fn schema_definition(schema: &IntrospectionSchema) -> Option<String> {
    let roots = [
        ("query", schema.query_type.as_ref(), "Query"),
        ("mutation", schema.mutation_type.as_ref(), "Mutation"),
        ("subscription", schema.subscription_type.as_ref(), "Subscription"),
    ];

    let conventional = roots
        .iter()
        .all(|(_, root, default)| root.is_none_or(|r| r.name == *default));
    if conventional {
        return None;
    }

    let mut out = String::from("schema {\n");
    for (operation, root, _) in roots {
        if let Some(root) = root {
            out.push_str(&format!("{INDENT}{operation}: {}\n", root.name));
        }
    }
    out.push('}');
    Some(out)
}

fn directive_definition(directive: &IntrospectionDirective) -> String {
    let mut out = String::new();
    write_description(&mut out, directive.description.as_deref(), 0);
    out.push_str("directive @");
    out.push_str(&directive.name);
    write_arguments(&mut out, &directive.args, 0);
    out.push_str(" on ");
    out.push_str(&directive.locations.join(" | "));
    out
}

fn type_definition(type_def: &IntrospectionType) -> String {
    let mut out = String::new();
    write_description(&mut out, type_def.description(), 0);

    match type_def {
        IntrospectionType::Scalar(t) => {
            out.push_str("scalar ");
            out.push_str(&t.name);
        }
        IntrospectionType::Object(t) => {
            out.push_str("type ");
            out.push_str(&t.name);
            write_implements(&mut out, &t.interfaces);
            write_fields(&mut out, &t.fields);
        }
        IntrospectionType::Interface(t) => {
            out.push_str("interface ");
            out.push_str(&t.name);
            write_implements(&mut out, &t.interfaces);
            write_fields(&mut out, &t.fields);
        }
        IntrospectionType::Union(t) => {
            out.push_str("union ");
            out.push_str(&t.name);
            if !t.possible_types.is_empty() {
                out.push_str(" = ");
                out.push_str(&join_names(&t.possible_types, " | "));
            }
        }
        IntrospectionType::Enum(t) => {
            out.push_str("enum ");
            out.push_str(&t.name);
            if !t.enum_values.is_empty() {
                out.push_str(" {\n");
                for value in &t.enum_values {
                    write_enum_value(&mut out, value);
                }
                out.push('}');
            }
        }
        IntrospectionType::InputObject(t) => {
            out.push_str("input ");
            out.push_str(&t.name);
            if !t.input_fields.is_empty() {
                out.push_str(" {\n");
                for field in &t.input_fields {
                    write_description(&mut out, field.description.as_deref(), 1);
                    out.push_str(INDENT);
                    out.push_str(&input_value(field));
                    out.push('\n');
                }
                out.push('}');
            }
        }
    }

    out
}

fn write_implements(out: &mut String, interfaces: &[IntrospectionTypeRef]) {
    if !interfaces.is_empty() {
        out.push_str(" implements ");
        out.push_str(&join_names(interfaces, " & "));
    }
}

fn write_fields(out: &mut String, fields: &[IntrospectionField]) {
    if fields.is_empty() {
        return;
    }
    out.push_str(" {\n");
    for field in fields {
        write_description(out, field.description.as_deref(), 1);
        out.push_str(INDENT);
        out.push_str(&field.name);
        write_arguments(out, &field.args, 1);
        out.push_str(": ");
        out.push_str(&field.type_ref.to_type_string());
        write_deprecation(out, field.is_deprecated, field.deprecation_reason.as_deref());
        out.push('\n');
    }
    out.push('}');
}

fn write_enum_value(out: &mut String, value: &IntrospectionEnumValue) {
    write_description(out, value.description.as_deref(), 1);
    out.push_str(INDENT);
    out.push_str(&value.name);
    write_deprecation(out, value.is_deprecated, value.deprecation_reason.as_deref());
    out.push('\n');
}

/// Arguments go on one line unless one of them has a description.
fn write_arguments(out: &mut String, args: &[IntrospectionInputValue], depth: usize) {
    if args.is_empty() {
        return;
    }

    if args.iter().all(|arg| arg.description.is_none()) {
        let inline: Vec<String> = args.iter().map(input_value).collect();
        out.push('(');
        out.push_str(&inline.join(", "));
        out.push(')');
        return;
    }

    out.push_str("(\n");
    for arg in args {
        write_description(out, arg.description.as_deref(), depth + 1);
        out.push_str(&INDENT.repeat(depth + 1));
        out.push_str(&input_value(arg));
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
    out.push(')');
}

fn input_value(value: &IntrospectionInputValue) -> String {
    let mut out = format!("{}: {}", value.name, value.type_ref.to_type_string());
    if let Some(default) = &value.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    out
}

fn write_deprecation(out: &mut String, is_deprecated: bool, reason: Option<&str>) {
    if !is_deprecated {
        return;
    }
    match reason {
        Some(reason) if reason != DEFAULT_DEPRECATION_REASON => {
            out.push_str(" @deprecated(reason: \"");
            out.push_str(&escape_string(reason));
            out.push_str("\")");
        }
        _ => out.push_str(" @deprecated"),
    }
}

fn write_description(out: &mut String, description: Option<&str>, depth: usize) {
    let Some(desc) = description.filter(|d| !d.is_empty()) else {
        return;
    };
    let indent = INDENT.repeat(depth);

    if desc.contains('\n') {
        out.push_str(&indent);
        out.push_str("\"\"\"\n");
        for line in desc.lines() {
            if !line.is_empty() {
                out.push_str(&indent);
                out.push_str(&line.replace("\"\"\"", "\\\"\"\""));
            }
            out.push('\n');
        }
        out.push_str(&indent);
        out.push_str("\"\"\"\n");
    } else {
        out.push_str(&indent);
        out.push('"');
        out.push_str(&escape_string(desc));
        out.push_str("\"\n");
    }
}

fn join_names(refs: &[IntrospectionTypeRef], separator: &str) -> String {
    refs.iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntrospectionTypeRefFull, TypeKind};
    use serde_json::json;

    fn sdl(schema: serde_json::Value) -> String {
        let data: IntrospectionData = serde_json::from_value(json!({ "__schema": schema })).unwrap();
        introspection_to_sdl(&data)
    }

    fn named(kind: &str, name: &str) -> serde_json::Value {
        json!({ "kind": kind, "name": name })
    }

    fn non_null(inner: serde_json::Value) -> serde_json::Value {
        json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
    }

    #[test]
    fn test_type_ref_to_string() {
        let type_ref = IntrospectionTypeRefFull {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(IntrospectionTypeRefFull {
                kind: TypeKind::List,
                name: None,
                of_type: Some(Box::new(IntrospectionTypeRefFull {
                    kind: TypeKind::Scalar,
                    name: Some("String".to_string()),
                    of_type: None,
                })),
            })),
        };
        assert_eq!(type_ref.to_type_string(), "[String]!");
    }

    #[test]
    fn test_ping_query() {
        let output = sdl(json!({
            "queryType": { "name": "Query" },
            "types": [{
                "kind": "OBJECT",
                "name": "Query",
                "fields": [{
                    "name": "ping",
                    "args": [],
                    "type": { "kind": "SCALAR", "name": "String" },
                    "isDeprecated": false
                }],
                "inputFields": null,
                "interfaces": [],
                "enumValues": null,
                "possibleTypes": null
            }]
        }));
        assert_eq!(output, "type Query {\n  ping: String\n}\n");
    }

    #[test]
    fn test_builtins_are_skipped() {
        let output = sdl(json!({
            "queryType": { "name": "Query" },
            "types": [
                named("SCALAR", "String"),
                named("SCALAR", "Boolean"),
                { "kind": "OBJECT", "name": "__Schema", "fields": [] },
                named("SCALAR", "DateTime")
            ],
            "directives": [
                { "name": "include", "locations": ["FIELD"], "args": [] },
                { "name": "deprecated", "locations": ["FIELD_DEFINITION"], "args": [] }
            ]
        }));
        assert_eq!(output, "scalar DateTime\n");
    }

    #[test]
    fn test_schema_definition_for_custom_roots() {
        let output = sdl(json!({
            "queryType": { "name": "Root" },
            "mutationType": { "name": "Mutation" },
            "subscriptionType": null,
            "types": []
        }));
        assert_eq!(output, "schema {\n  query: Root\n  mutation: Mutation\n}\n");

        let output = sdl(json!({
            "queryType": { "name": "Query" },
            "mutationType": { "name": "Mutation" },
            "types": []
        }));
        assert_eq!(output, "");
    }

    #[test]
    fn test_object_with_interfaces_args_and_deprecation() {
        let output = sdl(json!({
            "types": [{
                "kind": "OBJECT",
                "name": "User",
                "description": "A registered user",
                "interfaces": [named("INTERFACE", "Node"), named("INTERFACE", "Entity")],
                "fields": [
                    {
                        "name": "id",
                        "args": [],
                        "type": non_null(named("SCALAR", "ID")),
                        "isDeprecated": false
                    },
                    {
                        "name": "posts",
                        "args": [
                            { "name": "first", "type": named("SCALAR", "Int"), "defaultValue": "10" },
                            { "name": "after", "type": named("SCALAR", "String"), "defaultValue": null }
                        ],
                        "type": non_null(json!({ "kind": "LIST", "name": null, "ofType": non_null(named("OBJECT", "Post")) })),
                        "isDeprecated": false
                    },
                    {
                        "name": "login",
                        "args": [],
                        "type": named("SCALAR", "String"),
                        "isDeprecated": true,
                        "deprecationReason": "Use `handle`"
                    },
                    {
                        "name": "legacy",
                        "args": [],
                        "type": named("SCALAR", "String"),
                        "isDeprecated": true,
                        "deprecationReason": "No longer supported"
                    }
                ]
            }]
        }));

        assert_eq!(
            output,
            "\"A registered user\"\n\
             type User implements Node & Entity {\n  \
               id: ID!\n  \
               posts(first: Int = 10, after: String): [Post!]!\n  \
               login: String @deprecated(reason: \"Use `handle`\")\n  \
               legacy: String @deprecated\n\
             }\n"
        );
    }

    #[test]
    fn test_described_arguments_go_on_separate_lines() {
        let output = sdl(json!({
            "types": [{
                "kind": "OBJECT",
                "name": "Query",
                "fields": [{
                    "name": "user",
                    "args": [
                        { "name": "id", "description": "Global id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "locale", "type": named("SCALAR", "String"), "defaultValue": "\"en\"" }
                    ],
                    "type": named("OBJECT", "User")
                }]
            }]
        }));

        assert_eq!(
            output,
            "type Query {\n  \
               user(\n    \
                 \"Global id\"\n    \
                 id: ID!\n    \
                 locale: String = \"en\"\n  \
               ): User\n\
             }\n"
        );
    }

    #[test]
    fn test_enum_union_input_and_directive() {
        let output = sdl(json!({
            "types": [
                {
                    "kind": "ENUM",
                    "name": "Role",
                    "enumValues": [
                        { "name": "ADMIN", "isDeprecated": false },
                        { "name": "GUEST", "description": "Read only", "isDeprecated": true, "deprecationReason": null }
                    ]
                },
                {
                    "kind": "UNION",
                    "name": "SearchResult",
                    "possibleTypes": [named("OBJECT", "User"), named("OBJECT", "Post")]
                },
                {
                    "kind": "INPUT_OBJECT",
                    "name": "PostFilter",
                    "inputFields": [
                        { "name": "tags", "type": json!({ "kind": "LIST", "name": null, "ofType": named("SCALAR", "String") }) },
                        { "name": "limit", "type": named("SCALAR", "Int"), "defaultValue": "20" }
                    ]
                }
            ],
            "directives": [{
                "name": "cacheControl",
                "locations": ["FIELD_DEFINITION", "OBJECT"],
                "args": [{ "name": "maxAge", "type": named("SCALAR", "Int") }]
            }]
        }));

        assert_eq!(
            output,
            "directive @cacheControl(maxAge: Int) on FIELD_DEFINITION | OBJECT\n\
             \n\
             enum Role {\n  \
               ADMIN\n  \
               \"Read only\"\n  \
               GUEST @deprecated\n\
             }\n\
             \n\
             union SearchResult = User | Post\n\
             \n\
             input PostFilter {\n  \
               tags: [String]\n  \
               limit: Int = 20\n\
             }\n"
        );
    }

    #[test]
    fn test_members_missing_under_minimal_detail() {
        let output = sdl(json!({
            "types": [
                { "kind": "ENUM", "name": "Role", "fields": null },
                { "kind": "INPUT_OBJECT", "name": "Filter", "fields": null },
                { "kind": "UNION", "name": "Result", "fields": null },
                { "kind": "OBJECT", "name": "Empty", "fields": [] }
            ]
        }));
        assert_eq!(
            output,
            "enum Role\n\ninput Filter\n\nunion Result\n\ntype Empty\n"
        );
    }

    #[test]
    fn test_multiline_description_uses_block_string() {
        let output = sdl(json!({
            "types": [{
                "kind": "OBJECT",
                "name": "Query",
                "fields": [{
                    "name": "node",
                    "description": "Fetches an object.\n\nSee \"\"\"docs\"\"\".",
                    "type": named("INTERFACE", "Node")
                }]
            }]
        }));
        assert_eq!(
            output,
            "type Query {\n  \
               \"\"\"\n  \
               Fetches an object.\n\
               \n  \
               See \\\"\"\"docs\\\"\"\".\n  \
               \"\"\"\n  \
               node: Node\n\
             }\n"
        );
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("hello"), "hello");
        assert_eq!(escape_string("hello \"world\""), "hello \\\"world\\\"");
        assert_eq!(escape_string("hello\nworld"), "hello\\nworld");
        assert_eq!(
            escape_string("C:\\path\\to\\file"),
            "C:\\\\path\\\\to\\\\file"
        );
    }

    #[test]
    fn test_json_printer_round_trips_payload() {
        let payload = json!({ "__schema": { "types": [] } });
        let text = JsonPrinter.encode(&SchemaData(payload.clone())).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), payload);
        assert_eq!(JsonPrinter.name(), "JSON");
    }

    #[test]
    fn test_sdl_printer_rejects_malformed_payload() {
        let payload = json!({ "__schema": { "types": [{ "kind": "OBJECT" }] } });
        let err = SdlPrinter.encode(&SchemaData(payload)).unwrap_err();
        assert!(matches!(err, IntrospectionError::Model(_)));
    }
}
