//! Provider registry and fallback resolution.
//!
//! - [`ProviderRegistry`]: the set of configured providers, unique by id
//! - [`RateResolver`]: an ordered chain over the registry with sequential fallback

mod provider_registry;
mod resolver;

pub use provider_registry::ProviderRegistry;
pub use resolver::{RateResolver, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_PROVIDER_ORDER};
