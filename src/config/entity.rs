use super::application::Application;
use super::options::{Dto, Pagination, ServiceKind};
use crate::error::{GeneratorError, Result};
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding one JSON record per entity.
pub const ENTITIES_DIR: &str = ".jhipster";

/// Field types accepted without a `fieldValues` list.
pub const FIELD_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "Float",
    "Double",
    "BigDecimal",
    "LocalDate",
    "Instant",
    "ZonedDateTime",
    "Duration",
    "UUID",
    "Boolean",
    "byte[]",
    "ByteBuffer",
    "TextBlob",
    "Blob",
    "AnyBlob",
    "ImageBlob",
];

pub const RELATIONSHIP_TYPES: &[&str] = &["one-to-one", "one-to-many", "many-to-one", "many-to-many"];

/// Table names that collide with SQL keywords or framework tables.
pub const RESERVED_TABLE_NAMES: &[&str] = &[
    "authority",
    "check",
    "comment",
    "date",
    "desc",
    "end",
    "from",
    "group",
    "index",
    "key",
    "limit",
    "offset",
    "order",
    "role",
    "select",
    "session",
    "table",
    "time",
    "timestamp",
    "user",
    "value",
    "where",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_name: String,
    pub field_type: String,
    /// Comma-separated enum constants; makes `field_type` an enum name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    #[serde(default)]
    pub field_validate_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDefinition {
    pub relationship_type: Option<String>,
    pub other_entity_name: Option<String>,
    pub relationship_name: Option<String>,
}

/// Entity record as stored in `.jhipster/<Name>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
    pub changelog_date: Option<String>,
    pub entity_table_name: Option<String>,
    #[serde(default)]
    pub dto: Dto,
    #[serde(default)]
    pub service: ServiceKind,
    #[serde(default)]
    pub pagination: Pagination,
    /// Dotted sub-package below `<packageName>`, e.g. `billing.invoice`
    pub entity_package: Option<String>,
}

impl EntityDefinition {
    pub fn table_name(&self) -> String {
        self.entity_table_name
            .clone()
            .unwrap_or_else(|| self.name.to_snake_case())
    }

    pub fn is_reserved_table_name(&self) -> bool {
        RESERVED_TABLE_NAMES.contains(&self.table_name().to_lowercase().as_str())
    }
}

/// Load every `.jhipster/*.json` record, sorted by file name.
pub fn load_entities(project_dir: &Path) -> Result<Vec<EntityDefinition>> {
    let dir = project_dir.join(ENTITIES_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
            GeneratorError::io(path, std::io::Error::other(e.to_string()))
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("json")
        {
            paths.push(entry.into_path());
        }
    }

    let mut entities = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e))?;
        let definition: EntityDefinition =
            serde_json::from_str(&contents).map_err(|e| GeneratorError::Config {
                message: format!("{}: {e}", path.display()),
                hint: Some("fix the entity JSON or regenerate it from JDL".to_string()),
            })?;
        entities.push(definition);
    }
    Ok(entities)
}

/// Entity record with derived naming, ready for predicates and templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub entity_class: String,
    pub entity_instance: String,
    pub entity_file_name: String,
    pub entity_table_name: String,
    /// Dotted lowercase sub-package, empty when the entity lives in `domain` directly
    pub entity_package: String,
    /// `billing/invoice/`, or empty
    pub entity_package_folder: String,
    pub changelog_date: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub relationships: Vec<RelationshipDefinition>,
    pub dto_mapstruct: bool,
    pub service_class: bool,
    pub service_impl: bool,
    pub pagination: bool,
    pub infinite_scroll: bool,
    pub fields_contain_date: bool,
    pub fields_contain_blob: bool,
    pub fields_contain_big_decimal: bool,
    pub fields_contain_uuid: bool,
    pub fields_contain_enum: bool,
}

impl Entity {
    pub fn prepare(definition: &EntityDefinition, application: &Application) -> Result<Entity> {
        if definition.name.trim().is_empty() {
            return Err(GeneratorError::config("entity record without a name"));
        }
        let prefix = application.jhi_prefix();
        let entity_table_name = if application.derived.database_type_sql
            && definition.is_reserved_table_name()
        {
            if prefix.is_empty() {
                return Err(reserved_table_error(definition));
            }
            format!("{prefix}_{}", definition.table_name())
        } else {
            definition.table_name()
        };

        let entity_package = definition
            .entity_package
            .as_deref()
            .map(|p| p.trim().to_lowercase())
            .unwrap_or_default();
        let entity_package_folder = if entity_package.is_empty() {
            String::new()
        } else {
            format!("{}/", entity_package.replace('.', "/"))
        };
        let has_type = |types: &[&str]| {
            definition
                .fields
                .iter()
                .any(|f| f.field_values.is_none() && types.contains(&f.field_type.as_str()))
        };

        Ok(Entity {
            name: definition.name.clone(),
            entity_class: definition.name.to_upper_camel_case(),
            entity_instance: definition.name.to_lower_camel_case(),
            entity_file_name: definition.name.to_kebab_case(),
            entity_table_name,
            entity_package,
            entity_package_folder,
            changelog_date: definition.changelog_date.clone(),
            fields: definition.fields.clone(),
            relationships: definition.relationships.clone(),
            dto_mapstruct: definition.dto == Dto::Mapstruct,
            service_class: definition.service == ServiceKind::ServiceClass,
            service_impl: definition.service == ServiceKind::ServiceImpl,
            pagination: definition.pagination == Pagination::Pagination,
            infinite_scroll: definition.pagination == Pagination::InfiniteScroll,
            fields_contain_date: has_type(&["LocalDate", "Instant", "ZonedDateTime", "Duration"]),
            fields_contain_blob: has_type(&["byte[]", "ByteBuffer", "TextBlob", "Blob", "AnyBlob", "ImageBlob"]),
            fields_contain_big_decimal: has_type(&["BigDecimal"]),
            fields_contain_uuid: has_type(&["UUID"]),
            fields_contain_enum: definition.fields.iter().any(|f| f.field_values.is_some()),
        })
    }
}

impl Entity {
    /// True when a relationship puts a foreign key on this entity's table.
    pub fn has_owner_side(&self) -> bool {
        self.relationships.iter().any(|r| {
            matches!(
                r.relationship_type.as_deref(),
                Some("many-to-one" | "many-to-many" | "one-to-one")
            )
        })
    }

    /// Liquibase changelog name without extension, e.g. `20240101000000_added_entity_Order`.
    pub fn changelog_name(&self, kind: &str) -> Option<String> {
        self.changelog_date
            .as_ref()
            .map(|date| format!("{date}_{kind}_{}", self.entity_class))
    }
}

pub(crate) fn reserved_table_error(definition: &EntityDefinition) -> GeneratorError {
    GeneratorError::config_with_hint(
        format!(
            "table name `{}` of entity `{}` is a reserved keyword and no jhiPrefix is configured",
            definition.table_name(),
            definition.name
        ),
        "specify a different table name in the entity JSON",
    )
}
