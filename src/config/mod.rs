//! # Configuration Module
//!
//! Everything a predicate can look at: the answers persisted in `.yo-rc.json`,
//! the flags derived from them, and (while entity files are written) the
//! active entity record.
//!
//! The record is built in phases, each producing a new value:
//!
//! ```text
//! .yo-rc.json ──load──▶ ApplicationConfig ──compose──▶ ApplicationConfig
//!                                                     ──prepare──▶ Application
//!                                                                   │
//!                        GenerationContext::new(Arc<Application>) ◀─┘
//!                        GenerationContext::with_entity(Arc<Entity>)
//! ```
//!
//! Once built, nothing mutates the context while files are materialized.

mod application;
mod context;
mod entity;
mod options;
mod settings;
mod validate;

pub use application::{
    build_application, Application, ApplicationConfig, DerivedFlags, YoRc, DOCKER_DIR,
    SERVER_MAIN_RES_DIR, SERVER_MAIN_SRC_DIR, SERVER_TEST_RES_DIR, SERVER_TEST_SRC_DIR,
    YO_RC_FILE, YO_RC_NAMESPACE,
};
pub use context::GenerationContext;
pub use entity::{
    load_entities, Entity, EntityDefinition, FieldDefinition, RelationshipDefinition,
    ENTITIES_DIR, FIELD_TYPES, RELATIONSHIP_TYPES, RESERVED_TABLE_NAMES,
};
pub use options::{
    ApplicationType, AuthenticationType, BuildTool, CacheProvider, DatabaseEngine, DatabaseType,
    Dto, MessageBroker, Pagination, SearchEngine, ServiceDiscoveryType, ServiceKind, Websocket,
};
pub use settings::{GeneratorSettings, GENERATOR_VERSION};
pub use validate::{
    has_errors, print_issues, validate_all, validate_application, validate_entity,
    IssueSeverity, ValidationIssue, STALE_OPTIONS,
};
