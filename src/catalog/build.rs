use super::{predicate, Catalog, FileDescriptor, TemplateSpec};
use crate::config::DOCKER_DIR;

fn maven_catalog() -> Catalog {
    Catalog::new().section(
        "serverBuild",
        vec![
            FileDescriptor::new(["pom.xml"]),
            FileDescriptor::new([
                TemplateSpec::new("mvnw").copy(),
                TemplateSpec::new("mvnw.cmd").copy(),
                TemplateSpec::new(".mvn/jvm.config").copy(),
                TemplateSpec::new(".mvn/wrapper/maven-wrapper.jar").copy(),
                TemplateSpec::new(".mvn/wrapper/maven-wrapper.properties").copy(),
            ]),
        ],
    )
}

fn gradle_catalog() -> Catalog {
    Catalog::new().section(
        "serverBuild",
        vec![
            FileDescriptor::new([
                "build.gradle",
                "settings.gradle",
                "gradle.properties",
                "gradle/docker.gradle",
                "gradle/profile_dev.gradle",
                "gradle/profile_prod.gradle",
                "gradle/sonar.gradle",
                "gradle/war.gradle",
                "gradle/zipkin.gradle",
            ]),
            FileDescriptor::new([
                TemplateSpec::new("gradlew").copy(),
                TemplateSpec::new("gradlew.bat").copy(),
                TemplateSpec::new("gradle/wrapper/gradle-wrapper.jar").copy(),
                TemplateSpec::new("gradle/wrapper/gradle-wrapper.properties").copy(),
            ]),
        ],
    )
}

fn docker(templates: &[&str]) -> FileDescriptor {
    FileDescriptor::new(templates.iter().copied()).under(DOCKER_DIR)
}

fn docker_catalog() -> Catalog {
    Catalog::new().section(
        "dockerCompose",
        vec![
            docker(&["app.yml", "jhipster-control-center.yml", "monitoring.yml", "sonar.yml"]),
            docker(&["postgresql.yml"]).when(|ctx| ctx.app().derived.prod_database_type_postgresql),
            docker(&["mysql.yml", "config/mysql/my.cnf"])
                .when(|ctx| ctx.app().derived.prod_database_type_mysql),
            docker(&["mariadb.yml", "config/mariadb/my.cnf"])
                .when(|ctx| ctx.app().derived.prod_database_type_mariadb),
            docker(&["mssql.yml"]).when(|ctx| ctx.app().derived.prod_database_type_mssql),
            docker(&["oracle.yml"]).when(|ctx| ctx.app().derived.prod_database_type_oracle),
            docker(&["mongodb.yml", "mongodb-cluster.yml"])
                .when(|ctx| ctx.app().derived.database_type_mongodb),
            docker(&["couchbase.yml", "couchbase-cluster.yml"])
                .when(|ctx| ctx.app().derived.database_type_couchbase),
            docker(&["cassandra.yml", "cassandra-cluster.yml", "cassandra-migration.yml"])
                .when(|ctx| ctx.app().derived.database_type_cassandra),
            docker(&["neo4j.yml"]).when(|ctx| ctx.app().derived.database_type_neo4j),
            docker(&["elasticsearch.yml"])
                .when(|ctx| ctx.app().derived.search_engine_elasticsearch),
            docker(&["kafka.yml"]).when(|ctx| ctx.app().derived.message_broker_kafka),
            docker(&["pulsar.yml"]).when(|ctx| ctx.app().derived.message_broker_pulsar),
            docker(&["redis.yml", "redis-cluster.yml"])
                .when(|ctx| ctx.app().derived.cache_provider_redis),
            docker(&["memcached.yml"]).when(|ctx| ctx.app().derived.cache_provider_memcached),
            docker(&["jhipster-registry.yml", "central-server-config/application.yml"])
                .when(|ctx| ctx.app().derived.service_discovery_eureka),
            docker(&["consul.yml", "central-server-config/application.yml"])
                .when(|ctx| ctx.app().derived.service_discovery_consul),
            docker(&["keycloak.yml", "realm-config/jhipster-realm.json"])
                .when(|ctx| ctx.app().derived.authentication_type_oauth2),
        ],
    )
}

fn project_catalog() -> Catalog {
    Catalog::new().section(
        "global",
        vec![
            FileDescriptor::new(["README.md", "sonar-project.properties"]),
            FileDescriptor::new([
                TemplateSpec::new("gitignore").destination(".gitignore"),
                TemplateSpec::new("gitattributes").destination(".gitattributes").no_ejs(),
                TemplateSpec::new("editorconfig").destination(".editorconfig").no_ejs(),
            ]),
        ],
    )
}

/// Project root, build tool, and Docker Compose files.
pub fn build_catalog() -> Catalog {
    Catalog::merge(&[
        project_catalog(),
        maven_catalog().gate(predicate(|ctx| ctx.app().derived.build_tool_maven)),
        gradle_catalog().gate(predicate(|ctx| ctx.app().derived.build_tool_gradle)),
        docker_catalog(),
    ])
}
