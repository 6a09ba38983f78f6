use serde_json::Value as JsonValue;

/// A single conversion to apply to a media item.
///
/// `Simple` uses the conversion name as the output path segment and honours
/// the caller's check-before-write default. `Parameterized` names an explicit
/// output segment and carries positional arguments for the transform; since
/// the name alone no longer identifies the result, it is always re-rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionRequest {
    Simple {
        name: String,
    },
    Parameterized {
        name: String,
        output_segment: String,
        args: Vec<JsonValue>,
    },
}

impl ConversionRequest {
    pub fn simple(name: impl Into<String>) -> Self {
        ConversionRequest::Simple { name: name.into() }
    }

    pub fn parameterized(
        name: impl Into<String>,
        output_segment: impl Into<String>,
        args: Vec<JsonValue>,
    ) -> Self {
        ConversionRequest::Parameterized {
            name: name.into(),
            output_segment: output_segment.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ConversionRequest::Simple { name } => name,
            ConversionRequest::Parameterized { name, .. } => name,
        }
    }

    /// Resolve to the normalized shape the executor processes.
    pub fn normalize(&self, default_only_if_missing: bool) -> ConversionSpec {
        match self {
            ConversionRequest::Simple { name } => ConversionSpec {
                name: name.clone(),
                output_segment: name.clone(),
                args: Vec::new(),
                only_if_missing: default_only_if_missing,
            },
            ConversionRequest::Parameterized {
                name,
                output_segment,
                args,
            } => ConversionSpec {
                name: name.clone(),
                output_segment: output_segment.clone(),
                args: args.clone(),
                only_if_missing: false,
            },
        }
    }
}

impl From<&str> for ConversionRequest {
    fn from(name: &str) -> Self {
        ConversionRequest::simple(name)
    }
}

impl From<String> for ConversionRequest {
    fn from(name: String) -> Self {
        ConversionRequest::simple(name)
    }
}

/// Normalized conversion request: the common shape both variants resolve to
/// before any processing happens.
#[derive(Debug, Clone)]
pub struct ConversionSpec {
    pub name: String,
    pub output_segment: String,
    pub args: Vec<JsonValue>,
    pub only_if_missing: bool,
}
