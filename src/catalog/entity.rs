use super::server::main_resources;
use super::{
    move_to_java_entity_package_dir, rename, Catalog, FileDescriptor, TemplateEntry, TemplateSpec,
};
use crate::config::{Entity, GenerationContext, SERVER_MAIN_SRC_DIR, SERVER_TEST_SRC_DIR};

fn entity_java<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates)
        .under(SERVER_MAIN_SRC_DIR)
        .rename_with(rename(move_to_java_entity_package_dir))
}

fn entity_test_java<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates)
        .under(SERVER_TEST_SRC_DIR)
        .rename_with(rename(move_to_java_entity_package_dir))
}

fn entity(ctx: &GenerationContext, f: impl Fn(&Entity) -> bool) -> bool {
    ctx.entity().is_some_and(f)
}

/// Files written once per entity, under a context built with
/// [`GenerationContext::with_entity`].
pub fn entity_catalog() -> Catalog {
    Catalog::new()
        .section(
            "dbChangelog",
            vec![
                main_resources([TemplateSpec::new("config/liquibase/changelog/added_entity.xml")
                    .destination("config/liquibase/changelog/_changelogDate__added_entity__entityClass_.xml")
                    .write_once()])
                .when(|ctx| ctx.app().derived.database_type_sql),
                main_resources([TemplateSpec::new(
                    "config/liquibase/changelog/added_entity_constraints.xml",
                )
                .destination(
                    "config/liquibase/changelog/_changelogDate__added_entity_constraints__entityClass_.xml",
                )
                .write_once()])
                .when(|ctx| {
                    ctx.app().derived.database_type_sql && entity(ctx, Entity::has_owner_side)
                }),
            ],
        )
        .section(
            "serverJavaDomain",
            vec![entity_java(["package/domain/_entityClass_.java"])],
        )
        .section(
            "serverJavaRepository",
            vec![entity_java(["package/repository/_entityClass_Repository.java"])
                .when(|ctx| !ctx.app().derived.database_type_no)],
        )
        .section(
            "serverJavaService",
            vec![
                entity_java(["package/service/_entityClass_Service.java"])
                    .when(|ctx| entity(ctx, |e| e.service_class || e.service_impl)),
                entity_java(["package/service/impl/_entityClass_ServiceImpl.java"])
                    .when(|ctx| entity(ctx, |e| e.service_impl)),
                entity_java([
                    "package/service/dto/_entityClass_DTO.java",
                    "package/service/mapper/_entityClass_Mapper.java",
                ])
                .when(|ctx| entity(ctx, |e| e.dto_mapstruct)),
            ],
        )
        .section(
            "serverJavaWeb",
            vec![entity_java(["package/web/rest/_entityClass_Resource.java"])],
        )
        .section(
            "serverTestFw",
            vec![
                entity_test_java([
                    "package/domain/_entityClass_Test.java",
                    "package/web/rest/_entityClass_ResourceIT.java",
                ]),
                entity_test_java(["package/service/dto/_entityClass_DTOTest.java"])
                    .when(|ctx| entity(ctx, |e| e.dto_mapstruct)),
            ],
        )
}
