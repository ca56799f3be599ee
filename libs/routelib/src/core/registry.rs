use crate::core::descriptors::ActionDescriptor;
use crate::core::error::{Result, RouterError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Implemented by statically-registered providers of action descriptors.
pub trait ActionProvider: Sync {
    fn descriptor(&self) -> ActionDescriptor;
}

inventory::collect!(&'static dyn ActionProvider);

/// Register an action descriptor at link time.
///
/// The expression is evaluated lazily when the global registry is first
/// built, so it may call constructor functions freely.
#[macro_export]
macro_rules! register_action {
    ($descriptor:expr) => {
        const _: () = {
            struct __ActionProvider;

            impl $crate::ActionProvider for __ActionProvider {
                fn descriptor(&self) -> $crate::ActionDescriptor {
                    $descriptor
                }
            }

            $crate::inventory::submit! {
                &__ActionProvider as &dyn $crate::ActionProvider
            }
        };
    };
}

#[derive(Clone)]
pub struct ActionRegistration {
    pub descriptor: ActionDescriptor,
}

impl ActionRegistration {
    pub fn new(descriptor: ActionDescriptor) -> Self {
        Self { descriptor }
    }
}

/// Name-keyed store of action descriptors.
pub struct ActionRegistry {
    actions: HashMap<String, ActionRegistration>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    pub fn register(&mut self, descriptor: ActionDescriptor) -> Result<()> {
        let name = descriptor.name.clone();

        if self.actions.contains_key(&name) {
            return Err(RouterError::Configuration(format!(
                "Action '{}' is already registered",
                name
            )));
        }

        self.actions.insert(name, ActionRegistration::new(descriptor));

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionRegistration> {
        self.actions.get(name)
    }

    pub fn list(&self) -> Vec<ActionDescriptor> {
        self.actions
            .values()
            .map(|reg| reg.descriptor.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.actions.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: OnceLock<Arc<Mutex<ActionRegistry>>> = OnceLock::new();

/// The process-wide action registry, populated on first access from every
/// [`register_action!`] submission linked into the binary.
pub fn global_registry() -> Arc<Mutex<ActionRegistry>> {
    GLOBAL_REGISTRY
        .get_or_init(|| {
            let mut registry = ActionRegistry::new();

            for provider in inventory::iter::<&dyn ActionProvider> {
                let descriptor = provider.descriptor();
                let name = descriptor.name.clone();

                if let Err(e) = registry.register(descriptor) {
                    tracing::warn!("Failed to auto-register action '{}': {}", name, e);
                }
            }

            tracing::info!("Auto-registered {} action descriptors", registry.len());

            Arc::new(Mutex::new(registry))
        })
        .clone()
}

pub fn register_action(descriptor: ActionDescriptor) -> Result<()> {
    global_registry().lock().register(descriptor)
}

/// Clone of the named action's descriptor, if registered.
pub fn lookup_action(name: &str) -> Option<ActionDescriptor> {
    global_registry()
        .lock()
        .get(name)
        .map(|reg| reg.descriptor.clone())
}

pub fn list_actions() -> Vec<ActionDescriptor> {
    global_registry().lock().list()
}

pub fn is_action_registered(name: &str) -> bool {
    global_registry().lock().contains(name)
}

pub fn unregister_action(name: &str) -> bool {
    global_registry().lock().unregister(name)
}
