//! Model dispatch: routes identifiers to family adapters.

pub mod adapter;
pub mod anthropic;
pub mod error;
pub mod family;
pub mod nova;
pub mod prompt;
pub mod registry;

pub use adapter::{InvocationParams, ModelAdapter};
pub use anthropic::AnthropicAdapter;
pub use error::DispatchError;
pub use family::{ModelFamily, strip_region};
pub use nova::NovaAdapter;
pub use prompt::build_prompt;
pub use registry::ModelRegistry;
