//! Component registry system for extensible architecture.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Errors that can occur in the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Component not found
    #[error("Component {0} not found")]
    NotFound(String),

    /// Component already exists
    #[error("Component {0} already exists")]
    AlreadyExists(String),

    /// Type mismatch
    #[error("Type mismatch for component {0}")]
    TypeMismatch(String),
}

/// Component registry for dependency injection and service location
#[derive(Debug)]
pub struct Registry {
    /// Map of component names to trait objects
    components: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,

    /// Type mapping for better error messages
    type_map: RwLock<HashMap<String, TypeId>>,
}

/// Registry builder for fluent configuration
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl Registry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
            type_map: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry builder
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            registry: Self::new(),
        }
    }

    /// Register a component with the given name
    pub fn register<T>(&self, name: impl Into<String>, component: T) -> Result<(), RegistryError>
    where
        T: 'static + Send + Sync,
    {
        let name = name.into();
        let type_id = TypeId::of::<T>();

        {
            let mut components = self.components.write();
            if components.contains_key(&name) {
                return Err(RegistryError::AlreadyExists(name));
            }
            components.insert(name.clone(), Arc::new(component));
        }

        {
            let mut type_map = self.type_map.write();
            type_map.insert(name, type_id);
        }

        Ok(())
    }

    /// Get a component by name and type
    pub fn get<T>(&self, name: &str) -> Result<Arc<T>, RegistryError>
    where
        T: 'static + Send + Sync,
    {
        let component = {
            let components = self.components.read();
            components
                .get(name)
                .ok_or_else(|| RegistryError::NotFound(name.to_string()))?
                .clone()
        }; // Lock is dropped here

        component
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch(name.to_string()))
    }

    /// Check if a component exists
    pub fn contains(&self, name: &str) -> bool {
        self.components.read().contains_key(name)
    }

    /// Get all registered component names
    pub fn component_names(&self) -> Vec<String> {
        self.components.read().keys().cloned().collect()
    }

    /// Remove a component
    pub fn remove(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        {
            let mut type_map = self.type_map.write();
            type_map.remove(name);
        } // Drop type_map lock early

        let mut components = self.components.write();
        components.remove(name)
    }

    /// Clear all components
    pub fn clear(&self) {
        self.components.write().clear();
        self.type_map.write().clear();
    }

    /// Get component count
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}

impl RegistryBuilder {
    /// Register a component
    pub fn register<T>(self, name: impl Into<String>, component: T) -> Result<Self, RegistryError>
    where
        T: 'static + Send + Sync,
    {
        self.registry.register(name, component)?;
        Ok(self)
    }

    /// Build the final registry
    pub fn build(self) -> Registry {
        self.registry
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience trait for components that can register themselves
pub trait Component: 'static + Send + Sync {
    /// Component name
    fn name(&self) -> &'static str;

    /// Register this component in the registry
    fn register_in(self, registry: &Registry) -> Result<(), RegistryError>
    where
        Self: Sized,
    {
        registry.register(self.name(), self)
    }
}

/// Macro for easier component registration
#[macro_export]
macro_rules! register_component {
    ($registry:expr, $name:expr, $component:expr) => {
        $registry.register($name, $component)
    };
    ($registry:expr, $($name:expr => $component:expr),+ $(,)?) => {
        {
            $(
                $registry.register($name, $component)?;
            )+
            Ok::<(), $crate::registry::RegistryError>(())
        }
    };
}
