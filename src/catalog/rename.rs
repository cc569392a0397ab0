use crate::config::GenerationContext;
use crate::error::{GeneratorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading `_name_/` directory used to group templates on the source side only.
static GROUPING_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^_[A-Za-z0-9][A-Za-z0-9_]*_/").expect("grouping segment regex should be valid")
});

const JAVA_PACKAGE_SEGMENT: &str = "package/";

const APPLICATION_PLACEHOLDERS: &[&str] = &["_package_", "_baseName_"];
const ENTITY_PLACEHOLDERS: &[&str] = &[
    "_entityClass_",
    "_entityInstance_",
    "_entityFileName_",
    "_entityPackage_",
    "_changelogDate_",
];

fn is_placeholder(segment: &str) -> bool {
    APPLICATION_PLACEHOLDERS.contains(&segment) || ENTITY_PLACEHOLDERS.contains(&segment)
}

/// Replace `_placeholder_` tokens with values from the context.
///
/// `_entityPackage_/` collapses to nothing when the entity has no
/// sub-package. Entity placeholders outside an entity context are an error.
pub fn substitute_placeholders(ctx: &GenerationContext, path: &str) -> Result<String> {
    let app = ctx.app();
    let mut out = path
        .replace("_package_", &app.derived.package_folder)
        .replace("_baseName_", &app.config.base_name);

    for placeholder in ENTITY_PLACEHOLDERS {
        if !out.contains(placeholder) {
            continue;
        }
        let entity = ctx.entity().ok_or_else(|| GeneratorError::UnresolvedPlaceholder {
            template: path.to_string(),
            placeholder: (*placeholder).to_string(),
            requires: "an entity context",
        })?;
        out = match *placeholder {
            "_entityClass_" => out.replace(placeholder, &entity.entity_class),
            "_entityInstance_" => out.replace(placeholder, &entity.entity_instance),
            "_entityFileName_" => out.replace(placeholder, &entity.entity_file_name),
            "_entityPackage_" => out
                .replace("_entityPackage_/", &entity.entity_package_folder)
                .replace(placeholder, &entity.entity_package.replace('.', "/")),
            _ => {
                let date = entity.changelog_date.as_deref().ok_or_else(|| {
                    GeneratorError::UnresolvedPlaceholder {
                        template: path.to_string(),
                        placeholder: (*placeholder).to_string(),
                        requires: "a changelogDate on the entity",
                    }
                })?;
                out.replace(placeholder, date)
            }
        };
    }
    Ok(out)
}

/// Default destination when no rename function applies.
///
/// Strips one leading `_name_/` grouping directory (unless it is itself a
/// placeholder), then substitutes placeholders.
pub fn convention_destination(ctx: &GenerationContext, relative: &str) -> Result<String> {
    let stripped = match GROUPING_SEGMENT.find(relative) {
        Some(m) if !is_placeholder(m.as_str().trim_end_matches('/')) => &relative[m.end()..],
        _ => relative,
    };
    substitute_placeholders(ctx, stripped)
}

/// `package/config/X.java` → `com/mycompany/myapp/config/X.java`.
///
/// Paired with a descriptor rooted at the main or test Java source directory.
pub fn move_to_java_package_dir(ctx: &GenerationContext, relative: &str) -> Result<String> {
    let rest = strip_package_segment(relative)?;
    let folder = &ctx.app().derived.package_folder;
    substitute_placeholders(ctx, &format!("{folder}/{rest}"))
}

/// Like [`move_to_java_package_dir`], with the entity's sub-package inserted
/// after the application package.
pub fn move_to_java_entity_package_dir(ctx: &GenerationContext, relative: &str) -> Result<String> {
    let entity = ctx.entity().ok_or_else(|| GeneratorError::Rename {
        template: relative.to_string(),
        reason: "entity package requested outside an entity context".to_string(),
    })?;
    let rest = strip_package_segment(relative)?;
    let folder = &ctx.app().derived.package_folder;
    substitute_placeholders(
        ctx,
        &format!("{folder}/{}{rest}", entity.entity_package_folder),
    )
}

fn strip_package_segment(relative: &str) -> Result<&str> {
    relative
        .strip_prefix(JAVA_PACKAGE_SEGMENT)
        .ok_or_else(|| GeneratorError::Rename {
            template: relative.to_string(),
            reason: format!("expected a path starting with `{JAVA_PACKAGE_SEGMENT}`"),
        })
}
