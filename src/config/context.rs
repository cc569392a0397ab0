use super::application::Application;
use super::entity::Entity;
use crate::error::{GeneratorError, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Read-only view handed to every predicate, rename function, and template.
///
/// Application-level writing carries only the application record; entity
/// writing derives a second context with [`GenerationContext::with_entity`].
/// Neither is mutated once built.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    application: Arc<Application>,
    entity: Option<Arc<Entity>>,
}

impl GenerationContext {
    pub fn new(application: Arc<Application>) -> Self {
        Self {
            application,
            entity: None,
        }
    }

    /// Context for writing one entity's files.
    pub fn with_entity(&self, entity: Arc<Entity>) -> Self {
        Self {
            application: Arc::clone(&self.application),
            entity: Some(entity),
        }
    }

    pub fn app(&self) -> &Application {
        &self.application
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_deref()
    }

    /// JSON object passed to the template engine.
    ///
    /// Application keys come first; entity keys are layered on top and the
    /// entity record is also reachable as `entity`.
    pub fn render_value(&self) -> Result<Value> {
        let to_value = |value: Result<Value, serde_json::Error>| {
            value.map_err(|source| GeneratorError::Json {
                path: PathBuf::from("<generation context>"),
                source,
            })
        };
        let mut root = to_value(serde_json::to_value(self.application.as_ref()))?;
        if let Some(entity) = &self.entity {
            let entity_value = to_value(serde_json::to_value(entity.as_ref()))?;
            if let (Some(root_map), Value::Object(entity_map)) =
                (root.as_object_mut(), &entity_value)
            {
                for (key, value) in entity_map {
                    root_map.insert(key.clone(), value.clone());
                }
                root_map.insert("entity".to_string(), entity_value.clone());
            }
        }
        Ok(root)
    }
}
