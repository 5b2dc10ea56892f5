//! One descriptor per resource type.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::rest::{ResourceDescriptor, ResourceDescriptorBuilder};

/// Registry of resource types, keyed by singular name.
///
/// Registration happens once at startup; afterwards descriptors are only
/// looked up. Registering a name twice keeps the first declaration.
///
/// ```rust
/// use std::sync::Arc;
/// use tiny_client::{ClientConfig, ResourceDescriptor, ResourceRegistry};
///
/// let config = Arc::new(ClientConfig::builder().build().unwrap());
/// let mut registry = ResourceRegistry::new(config);
///
/// let post = registry.register(ResourceDescriptor::builder("Post").path("posts"));
/// let again = registry.register(ResourceDescriptor::builder("Post").path("articles"));
///
/// assert_eq!(again.path(), "posts");
/// assert!(Arc::ptr_eq(&post, &again));
/// ```
#[derive(Debug)]
pub struct ResourceRegistry {
    config: Arc<ClientConfig>,
    descriptors: HashMap<String, Arc<ResourceDescriptor>>,
}

// Verify ResourceRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceRegistry>();
};

impl ResourceRegistry {
    /// Creates an empty registry whose types share `config`.
    #[must_use]
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            config,
            descriptors: HashMap::new(),
        }
    }

    /// Returns the shared configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    /// Builds and stores a resource type, or returns the one already stored
    /// under the same name.
    pub fn register(&mut self, builder: ResourceDescriptorBuilder) -> Arc<ResourceDescriptor> {
        let descriptor = builder.build(&self.config);
        if let Some(existing) = self.descriptors.get(descriptor.name()) {
            tracing::debug!(resource = %descriptor.name(), "resource already registered, ignoring");
            return Arc::clone(existing);
        }

        self.descriptors
            .insert(descriptor.name().to_string(), Arc::clone(&descriptor));
        descriptor
    }

    /// Returns the type registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceDescriptor>> {
        self.descriptors.get(name)
    }

    /// Returns `true` if a type is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ResourceRegistry {
        ResourceRegistry::new(Arc::new(ClientConfig::builder().build().unwrap()))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = registry();
        assert!(registry.is_empty());

        registry.register(ResourceDescriptor::builder("Post").fields(["id"]));
        registry.register(ResourceDescriptor::builder("api::Comment"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("post"));
        assert!(registry.contains("comment"));
        assert_eq!(registry.get("post").unwrap().fields(), ["id"]);
        assert!(registry.get("tag").is_none());
    }

    #[test]
    fn test_second_registration_is_ignored() {
        let mut registry = registry();
        let first = registry.register(ResourceDescriptor::builder("Post").fields(["id"]));
        let second = registry.register(ResourceDescriptor::builder("Post").fields(["id", "name"]));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.fields(), ["id"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registered_types_share_config() {
        let mut registry = registry();
        let post = registry.register(ResourceDescriptor::builder("Post"));
        assert!(Arc::ptr_eq(post.config(), registry.config()));
    }
}
