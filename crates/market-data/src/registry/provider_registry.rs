//! Registry of the rate providers available to the resolver.

use std::borrow::Cow;
use std::sync::Arc;

use crate::errors::MarketDataError;
use crate::models::ProviderId;
use crate::provider::RateProvider;

/// Providers keyed by their identifier, in registration order.
///
/// Built once at startup and read-only afterwards. Identifiers are unique;
/// the registry itself implies no priority, the resolver's order does.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<(ProviderId, Arc<dyn RateProvider>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider under its own [`RateProvider::id`].
    ///
    /// Fails with [`MarketDataError::DuplicateProvider`] if the id is taken.
    pub fn register(&mut self, provider: Arc<dyn RateProvider>) -> Result<(), MarketDataError> {
        let id = provider.id();
        if self.get(id).is_some() {
            return Err(MarketDataError::DuplicateProvider(id.to_string()));
        }
        self.providers.push((Cow::Borrowed(id), provider));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, provider: Arc<dyn RateProvider>) -> Result<Self, MarketDataError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn RateProvider>> {
        self.providers
            .iter()
            .find(|(provider_id, _)| provider_id == id)
            .map(|(_, provider)| Arc::clone(provider))
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|(id, _)| &**id).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}
