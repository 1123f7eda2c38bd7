//! GraphQL introspection query documents.

use std::fmt;
use std::str::FromStr;

/// Standard GraphQL introspection query.
///
/// This query fetches the complete schema information including:
/// - Query, mutation, and subscription root types
/// - All type definitions with their fields and arguments
/// - Directive definitions
/// - Deprecation information
///
/// The `TypeRef` fragment unwraps type references 8 levels deep (the outer
/// reference plus 7 `ofType` levels), enough for wrappers like `[[[String!]!]!]`.
pub const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type {
    ...TypeRef
  }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// Reduced introspection query: type names, kinds and field types only.
///
/// Uses the same `TypeRef` depth as [`INTROSPECTION_QUERY`] so wrapped types
/// print identically under both documents.
pub const MINIMAL_INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    types {
      kind
      name
      fields {
        name
        type {
          ...TypeRef
        }
      }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// How much of the schema the introspection query asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryDetail {
    /// Descriptions, arguments, interfaces, enum values, input fields,
    /// possible types, directives and deprecations.
    #[default]
    Full,
    /// Type names, kinds and field types.
    Minimal,
}

impl QueryDetail {
    /// The query document for this detail level.
    #[must_use]
    pub const fn query(self) -> &'static str {
        match self {
            Self::Full => INTROSPECTION_QUERY,
            Self::Minimal => MINIMAL_INTROSPECTION_QUERY,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for QueryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryDetail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!(
                "unknown introspection detail '{other}', expected 'full' or 'minimal'"
            )),
        }
    }
}
