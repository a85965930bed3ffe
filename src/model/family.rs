//! Model families and identifier classification.

use std::fmt;

/// Language model families sharing one request/response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ModelFamily {
    /// Anthropic messages API (`anthropic.*`).
    Anthropic,
    /// Amazon Nova converse-style API (`amazon.nova*`).
    Nova,
}

impl ModelFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelFamily::Anthropic => "anthropic",
            ModelFamily::Nova => "nova",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regional qualifiers that may precede a vendor prefix (`us.anthropic...`).
pub const REGION_PREFIXES: [&str; 7] = ["us", "eu", "apac", "us-gov", "global", "jp", "au"];

/// Strip a leading regional qualifier, if any.
///
/// `"us.amazon.nova-pro-v1:0"` and `"amazon.nova-pro-v1:0"` both become
/// `"amazon.nova-pro-v1:0"`.
pub fn strip_region(model_id: &str) -> &str {
    match model_id.split_once('.') {
        Some((head, rest)) if !rest.is_empty() && REGION_PREFIXES.contains(&head) => rest,
        _ => model_id,
    }
}
