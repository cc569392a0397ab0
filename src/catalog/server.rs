//! Server-side feature areas.
//!
//! Each function returns one feature area's catalog. Database and
//! authentication areas are gated as a whole in [`server_catalog`]; the
//! descriptors inside only test what varies within the area.

use super::{
    move_to_java_package_dir, predicate, rename, Catalog, FileDescriptor, TemplateEntry,
    TemplateSpec,
};
use crate::config::{
    SERVER_MAIN_RES_DIR, SERVER_MAIN_SRC_DIR, SERVER_TEST_RES_DIR, SERVER_TEST_SRC_DIR,
};

/// Templates below `src/main/java/package/`, written into the application package.
pub(super) fn main_java<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates)
        .under(SERVER_MAIN_SRC_DIR)
        .rename_with(rename(move_to_java_package_dir))
}

/// Templates below `src/test/java/package/`.
pub(super) fn test_java<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates)
        .under(SERVER_TEST_SRC_DIR)
        .rename_with(rename(move_to_java_package_dir))
}

pub(super) fn main_resources<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates).under(SERVER_MAIN_RES_DIR)
}

pub(super) fn test_resources<I, T>(templates: I) -> FileDescriptor
where
    I: IntoIterator<Item = T>,
    T: Into<TemplateEntry>,
{
    FileDescriptor::new(templates).under(SERVER_TEST_RES_DIR)
}

/// Files every server application gets.
pub fn base_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![
                main_resources([
                    "config/application.yml",
                    "config/application-dev.yml",
                    "config/application-prod.yml",
                    "logback-spring.xml",
                    "i18n/messages.properties",
                ]),
                main_resources([TemplateSpec::new("banner.txt").no_ejs()]),
                main_resources(["config/application-tls.yml"]).when(|ctx| !ctx.app().config.reactive),
                main_resources(["config/bootstrap.yml", "config/bootstrap-prod.yml"])
                    .when(|ctx| ctx.app().derived.service_discovery_any),
            ],
        )
        .section(
            "serverJavaApp",
            vec![
                main_java([TemplateSpec::new("package/Application.java").rename_to(rename(
                    |ctx, _| {
                        let derived = &ctx.app().derived;
                        Ok(format!("{}/{}.java", derived.package_folder, derived.main_class))
                    },
                ))]),
                main_java(["package/ApplicationWebXml.java", "package/GeneratedByJHipster.java"]),
            ],
        )
        .section(
            "serverJavaConfig",
            vec![
                main_java([
                    "package/config/ApplicationProperties.java",
                    "package/config/AsyncConfiguration.java",
                    "package/config/Constants.java",
                    "package/config/JacksonConfiguration.java",
                    "package/config/LoggingAspectConfiguration.java",
                    "package/config/LoggingConfiguration.java",
                    "package/config/WebConfigurer.java",
                ]),
                main_java(["package/config/DateTimeFormatConfiguration.java"])
                    .when(|ctx| !ctx.app().config.reactive),
                main_java(["package/config/ReactorConfiguration.java"])
                    .when(|ctx| ctx.app().config.reactive),
                main_java(["package/config/OpenApiConfiguration.java"])
                    .when(|ctx| ctx.app().config.enable_swagger_codegen),
            ],
        )
        .section(
            "serverJavaSecurity",
            vec![main_java([
                "package/config/SecurityConfiguration.java",
                "package/security/AuthoritiesConstants.java",
                "package/security/SecurityUtils.java",
            ])],
        )
        .section(
            "serverJavaWebError",
            vec![main_java([
                "package/web/rest/errors/BadRequestAlertException.java",
                "package/web/rest/errors/ErrorConstants.java",
                "package/web/rest/errors/ExceptionTranslator.java",
                "package/web/rest/errors/FieldErrorVM.java",
            ])],
        )
        .section(
            "serverJavaWeb",
            vec![
                main_java(["package/web/rest/ClientForwardController.java"])
                    .when(|ctx| !ctx.app().config.skip_client),
                main_java(["package/web/filter/ModifyServersOpenApiFilter.java"])
                    .when(|ctx| ctx.app().derived.application_type_gateway),
            ],
        )
        .section(
            "serverJavaWebsocket",
            vec![main_java([
                "package/config/WebsocketConfiguration.java",
                "package/config/WebsocketSecurityConfiguration.java",
                "package/web/websocket/ActivityService.java",
                "package/web/websocket/dto/ActivityDTO.java",
            ])
            .when(|ctx| ctx.app().derived.websocket_spring)],
        )
        .section(
            "serverTestFw",
            vec![
                test_java([
                    "package/IntegrationTest.java",
                    "package/TechnicalStructureTest.java",
                    "package/web/rest/TestUtil.java",
                    "package/web/rest/errors/ExceptionTranslatorIT.java",
                ]),
                test_resources(["config/application.yml", "logback.xml"]),
                test_java(["package/config/WebConfigurerTest.java"])
                    .when(|ctx| !ctx.app().config.reactive),
            ],
        )
}

/// Relational persistence through Liquibase. Gated on `databaseTypeSql`.
pub fn sql_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![
                main_resources(["config/liquibase/master.xml"]),
                main_resources([TemplateSpec::new(
                    "config/liquibase/changelog/initial_schema.xml",
                )
                .destination("config/liquibase/changelog/00000000000000_initial_schema.xml")
                .write_once()]),
            ],
        )
        .section(
            "serverJavaConfig",
            vec![
                main_java(["package/config/DatabaseConfiguration.java"]),
                main_java(["package/config/LiquibaseConfiguration.java"])
                    .when(|ctx| !ctx.app().config.reactive),
            ],
        )
        .section(
            "serverTestFw",
            vec![
                test_java([
                    "package/config/EmbeddedSQL.java",
                    "package/config/SqlTestContainer.java",
                    "package/config/SqlTestContainersSpringContextCustomizerFactory.java",
                ]),
                test_java(["package/config/PostgreSqlTestContainer.java"])
                    .when(|ctx| ctx.app().derived.prod_database_type_postgresql),
                test_java(["package/config/MysqlTestContainer.java"])
                    .when(|ctx| ctx.app().derived.prod_database_type_mysql),
                test_java(["package/config/MariadbTestContainer.java"])
                    .when(|ctx| ctx.app().derived.prod_database_type_mariadb),
                test_java(["package/config/MsSqlTestContainer.java"])
                    .when(|ctx| ctx.app().derived.prod_database_type_mssql),
                test_resources(["testcontainers.properties"]),
            ],
        )
}

/// Gated on `databaseTypeMongodb`.
pub fn mongodb_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverJavaConfig",
            vec![main_java([
                "package/config/DatabaseConfiguration.java",
                "package/config/dbmigrations/InitialSetupMigration.java",
            ])],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/config/EmbeddedMongo.java",
                "package/config/MongoDbTestContainer.java",
                "package/config/MongoDbTestContainersSpringContextCustomizerFactory.java",
            ])],
        )
}

/// Gated on `databaseTypeCouchbase`.
pub fn couchbase_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![main_resources([
                TemplateSpec::new("config/couchmove/changelog/V0__create_indexes.n1ql").no_ejs(),
                TemplateSpec::new("config/couchmove/changelog/V0.1__initial_setup/ROLE_ADMIN.json")
                    .no_ejs(),
                TemplateSpec::new("config/couchmove/changelog/V0.1__initial_setup/ROLE_USER.json")
                    .no_ejs(),
            ])],
        )
        .section(
            "serverJavaConfig",
            vec![main_java([
                "package/config/DatabaseConfiguration.java",
                "package/repository/JHipsterCouchbaseRepository.java",
            ])],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/config/CouchbaseTestContainer.java",
                "package/config/EmbeddedCouchbase.java",
            ])],
        )
}

/// Gated on `databaseTypeNeo4j`.
pub fn neo4j_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![main_resources([
                "config/neo4j/migrations/user__admin.json",
                "config/neo4j/migrations/user__user.json",
            ])
            .when(|ctx| ctx.app().derived.generate_user_management)],
        )
        .section(
            "serverJavaConfig",
            vec![main_java(["package/config/DatabaseConfiguration.java"])],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/config/EmbeddedNeo4j.java",
                "package/config/Neo4jTestContainer.java",
            ])],
        )
}

/// Gated on `databaseTypeCassandra`.
pub fn cassandra_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![main_resources([
                "config/cql/create-keyspace-prod.cql",
                "config/cql/create-keyspace.cql",
                "config/cql/drop-keyspace.cql",
                "config/cql/changelog/README.md",
            ])],
        )
        .section(
            "serverJavaConfig",
            vec![main_java(["package/config/DatabaseConfiguration.java"])],
        )
        .section(
            "serverTestFw",
            vec![
                test_java([
                    "package/config/CassandraKeyspaceIT.java",
                    "package/config/CassandraTestContainer.java",
                    "package/config/EmbeddedCassandra.java",
                ]),
                test_resources(["config/cassandra-random-port.yml"]),
            ],
        )
}

/// Stateless token authentication. Gated on `authenticationTypeJwt`.
pub fn jwt_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverJavaAuthConfig",
            vec![main_java([
                "package/security/jwt/JWTFilter.java",
                "package/security/jwt/JWTConfigurer.java",
                "package/security/jwt/TokenProvider.java",
            ])],
        )
        .section(
            "serverJavaWeb",
            vec![main_java(["package/web/rest/UserJWTController.java"])
                .when(|ctx| !ctx.app().derived.application_type_microservice)],
        )
        .section(
            "serverTestFw",
            vec![
                test_java([
                    "package/security/jwt/JWTFilterTest.java",
                    "package/security/jwt/TokenProviderTest.java",
                    "package/security/jwt/TokenProviderSecurityMetersTests.java",
                ]),
                test_java(["package/web/rest/UserJWTControllerIT.java"]).when(|ctx| {
                    !ctx.app().derived.application_type_microservice
                        && ctx.app().derived.generate_user_management
                }),
            ],
        )
}

/// Delegated login through an identity provider. Gated on `authenticationTypeOauth2`.
pub fn oauth2_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![main_resources(["config/application-oauth2.yml"])],
        )
        .section(
            "serverJavaAuthConfig",
            vec![main_java([
                "package/security/oauth2/AudienceValidator.java",
                "package/security/oauth2/JwtGrantedAuthorityConverter.java",
                "package/security/oauth2/OAuthIdpTokenResponseDTO.java",
            ])],
        )
        .section(
            "serverJavaWeb",
            vec![main_java([
                "package/web/rest/AuthInfoResource.java",
                "package/web/rest/LogoutResource.java",
            ])
            .when(|ctx| !ctx.app().derived.application_type_microservice)],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/security/oauth2/AudienceValidatorTest.java",
                "package/test/util/OAuth2TestUtil.java",
            ])],
        )
}

/// Server-side sessions with remember-me. Gated on `authenticationTypeSession`.
pub fn session_catalog() -> Catalog {
    Catalog::new().section(
        "serverJavaAuthConfig",
        vec![
            main_java(["package/security/PersistentTokenRememberMeServices.java"])
                .when(|ctx| !ctx.app().derived.database_type_no),
            main_java([
                "package/domain/PersistentToken.java",
                "package/repository/PersistentTokenRepository.java",
            ])
            .when(|ctx| ctx.app().derived.generate_user_management),
        ],
    )
}

/// Built-in user and authority management. Gated on `generateUserManagement`.
pub fn user_management_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverResource",
            vec![
                main_resources([
                    "templates/mail/activationEmail.html",
                    "templates/mail/creationEmail.html",
                    "templates/mail/passwordResetEmail.html",
                ]),
                main_resources([
                    TemplateSpec::new("config/liquibase/data/user.csv").no_ejs(),
                    TemplateSpec::new("config/liquibase/data/authority.csv").no_ejs(),
                    TemplateSpec::new("config/liquibase/data/user_authority.csv").no_ejs(),
                ])
                .when(|ctx| ctx.app().derived.database_type_sql),
            ],
        )
        .section(
            "serverJavaUserManagement",
            vec![
                main_java([
                    "package/domain/Authority.java",
                    "package/domain/User.java",
                    "package/repository/AuthorityRepository.java",
                    "package/repository/UserRepository.java",
                    "package/service/MailService.java",
                    "package/service/UserService.java",
                    "package/service/dto/AdminUserDTO.java",
                    "package/service/dto/UserDTO.java",
                    "package/service/mapper/UserMapper.java",
                    "package/web/rest/AccountResource.java",
                    "package/web/rest/UserResource.java",
                    "package/web/rest/PublicUserResource.java",
                ]),
                main_java(["package/security/DomainUserDetailsService.java"])
                    .when(|ctx| !ctx.app().derived.authentication_type_oauth2),
            ],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/service/UserServiceIT.java",
                "package/web/rest/AccountResourceIT.java",
                "package/web/rest/UserResourceIT.java",
            ])],
        )
}

/// Gated on `cacheProviderAny`.
pub fn cache_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverJavaConfig",
            vec![
                main_java(["package/config/CacheConfiguration.java"]),
                main_java(["package/config/CacheFactoryConfiguration.java"]).when(|ctx| {
                    ctx.app().derived.cache_provider_memcached || ctx.app().derived.cache_provider_redis
                }),
            ],
        )
        .section(
            "serverTestFw",
            vec![
                test_java(["package/config/EmbeddedRedis.java", "package/config/RedisTestContainer.java"])
                    .when(|ctx| ctx.app().derived.cache_provider_redis),
                test_java(["package/config/HazelcastTestConfiguration.java"])
                    .when(|ctx| ctx.app().derived.cache_provider_hazelcast),
            ],
        )
}

/// Gated on `messageBrokerKafka`.
pub fn kafka_catalog() -> Catalog {
    Catalog::new()
        .section(
            "serverJavaConfig",
            vec![main_java(["package/config/KafkaConfiguration.java"])],
        )
        .section(
            "serverJavaWeb",
            vec![main_java([TemplateSpec::new("package/web/rest/KafkaResource.java").rename_to(
                rename(|ctx, _| {
                    let derived = &ctx.app().derived;
                    let main_class = derived.main_class.as_str();
                    let prefix = main_class.strip_suffix("App").unwrap_or(main_class);
                    Ok(format!("{}/web/rest/{prefix}KafkaResource.java", derived.package_folder))
                }),
            )])],
        )
        .section(
            "serverTestFw",
            vec![test_java([
                "package/config/EmbeddedKafka.java",
                "package/config/KafkaTestContainer.java",
            ])],
        )
}

/// Every application-level server area, gated and merged in registration order.
pub fn server_catalog() -> Catalog {
    Catalog::merge(&[
        base_catalog(),
        sql_catalog().gate(predicate(|ctx| ctx.app().derived.database_type_sql)),
        mongodb_catalog().gate(predicate(|ctx| ctx.app().derived.database_type_mongodb)),
        couchbase_catalog().gate(predicate(|ctx| ctx.app().derived.database_type_couchbase)),
        neo4j_catalog().gate(predicate(|ctx| ctx.app().derived.database_type_neo4j)),
        cassandra_catalog().gate(predicate(|ctx| ctx.app().derived.database_type_cassandra)),
        jwt_catalog().gate(predicate(|ctx| ctx.app().derived.authentication_type_jwt)),
        oauth2_catalog().gate(predicate(|ctx| ctx.app().derived.authentication_type_oauth2)),
        session_catalog().gate(predicate(|ctx| ctx.app().derived.authentication_type_session)),
        user_management_catalog()
            .gate(predicate(|ctx| ctx.app().derived.generate_user_management)),
        cache_catalog().gate(predicate(|ctx| ctx.app().derived.cache_provider_any)),
        kafka_catalog().gate(predicate(|ctx| ctx.app().derived.message_broker_kafka)),
    ])
}
