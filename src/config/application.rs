use super::options::{
    ApplicationType, AuthenticationType, BuildTool, CacheProvider, DatabaseEngine, DatabaseType,
    MessageBroker, SearchEngine, ServiceDiscoveryType, Websocket,
};
use crate::error::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the persisted answers of a generated project.
pub const YO_RC_FILE: &str = ".yo-rc.json";
/// Namespace of the generator's options inside `.yo-rc.json`.
pub const YO_RC_NAMESPACE: &str = "generator-jhipster";

pub const SERVER_MAIN_SRC_DIR: &str = "src/main/java/";
pub const SERVER_MAIN_RES_DIR: &str = "src/main/resources/";
pub const SERVER_TEST_SRC_DIR: &str = "src/test/java/";
pub const SERVER_TEST_RES_DIR: &str = "src/test/resources/";
pub const DOCKER_DIR: &str = "src/main/docker/";

/// Answers as stored in (or prompted for) `.yo-rc.json`.
///
/// Options this loader does not know are kept in `extra` so they survive a
/// round trip and can be reported as stale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationConfig {
    pub base_name: String,
    pub package_name: String,
    pub application_type: ApplicationType,
    pub database_type: DatabaseType,
    pub dev_database_type: Option<DatabaseEngine>,
    pub prod_database_type: Option<DatabaseEngine>,
    pub cache_provider: CacheProvider,
    pub enable_hibernate_cache: bool,
    pub search_engine: SearchEngine,
    pub message_broker: MessageBroker,
    pub service_discovery_type: ServiceDiscoveryType,
    pub websocket: Websocket,
    pub build_tool: BuildTool,
    pub authentication_type: AuthenticationType,
    pub reactive: bool,
    pub enable_swagger_codegen: bool,
    pub skip_user_management: bool,
    pub skip_client: bool,
    pub jhi_prefix: Option<String>,
    pub server_port: Option<u16>,
    /// Generator version that produced the tree on disk
    pub jhipster_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationConfig {
    /// Parse the generator namespace of a `.yo-rc.json` document.
    pub fn from_yo_rc(document: &Value, origin: &Path) -> Result<Self> {
        let namespace = document.get(YO_RC_NAMESPACE).ok_or_else(|| {
            GeneratorError::config_with_hint(
                format!("{} has no `{YO_RC_NAMESPACE}` section", origin.display()),
                "regenerate the configuration or add the section by hand",
            )
        })?;
        serde_json::from_value(namespace.clone()).map_err(|e| GeneratorError::Config {
            message: format!("{}: {e}", origin.display()),
            hint: None,
        })
    }

    /// Composing phase: fill defaults and reject contradictory answers.
    ///
    /// Returns a new value; the input answers are left as they were read.
    pub fn compose(&self) -> Result<ApplicationConfig> {
        let mut composed = self.clone();
        if composed.base_name.is_empty() {
            composed.base_name = "jhipster".to_string();
        }
        if composed.package_name.is_empty() {
            composed.package_name = "com.mycompany.myapp".to_string();
        }
        if composed.jhi_prefix.is_none() {
            composed.jhi_prefix = Some("jhi".to_string());
        }

        let (dev_default, prod_default) = default_engines(composed.database_type);
        let dev = composed.dev_database_type.unwrap_or(dev_default);
        let prod = composed.prod_database_type.unwrap_or(prod_default);
        if !engine_matches(composed.database_type, prod) {
            return Err(GeneratorError::config_with_hint(
                format!(
                    "prodDatabaseType `{prod}` does not match databaseType `{}`",
                    composed.database_type
                ),
                format!("use `{prod_default}` or change databaseType"),
            ));
        }
        if !engine_matches(composed.database_type, dev) && !(dev.is_h2() && prod.is_sql()) {
            return Err(GeneratorError::config_with_hint(
                format!(
                    "devDatabaseType `{dev}` does not match databaseType `{}`",
                    composed.database_type
                ),
                format!("use `{dev_default}` or change databaseType"),
            ));
        }
        composed.dev_database_type = Some(dev);
        composed.prod_database_type = Some(prod);

        if composed.reactive && composed.authentication_type == AuthenticationType::Session {
            return Err(GeneratorError::config_with_hint(
                "session authentication is not available for reactive applications",
                "use `jwt` or `oauth2` as authenticationType",
            ));
        }
        if composed.authentication_type == AuthenticationType::Oauth2 {
            // Users live in the identity provider.
            composed.skip_user_management = true;
        }
        if composed.database_type != DatabaseType::Sql || composed.cache_provider == CacheProvider::No
        {
            composed.enable_hibernate_cache = false;
        }
        Ok(composed)
    }
}

fn default_engines(database_type: DatabaseType) -> (DatabaseEngine, DatabaseEngine) {
    match database_type {
        DatabaseType::Sql => (DatabaseEngine::H2Disk, DatabaseEngine::Postgresql),
        DatabaseType::Mongodb => (DatabaseEngine::Mongodb, DatabaseEngine::Mongodb),
        DatabaseType::Cassandra => (DatabaseEngine::Cassandra, DatabaseEngine::Cassandra),
        DatabaseType::Couchbase => (DatabaseEngine::Couchbase, DatabaseEngine::Couchbase),
        DatabaseType::Neo4j => (DatabaseEngine::Neo4j, DatabaseEngine::Neo4j),
        DatabaseType::No => (DatabaseEngine::No, DatabaseEngine::No),
    }
}

fn engine_matches(database_type: DatabaseType, engine: DatabaseEngine) -> bool {
    match database_type {
        DatabaseType::Sql => engine.is_sql(),
        DatabaseType::Mongodb => engine == DatabaseEngine::Mongodb,
        DatabaseType::Cassandra => engine == DatabaseEngine::Cassandra,
        DatabaseType::Couchbase => engine == DatabaseEngine::Couchbase,
        DatabaseType::Neo4j => engine == DatabaseEngine::Neo4j,
        DatabaseType::No => engine == DatabaseEngine::No,
    }
}

/// Convenience flags computed once from the composed answers.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub database_type_sql: bool,
    pub database_type_mongodb: bool,
    pub database_type_cassandra: bool,
    pub database_type_couchbase: bool,
    pub database_type_neo4j: bool,
    pub database_type_no: bool,
    pub dev_database_type_h2_any: bool,
    pub prod_database_type_postgresql: bool,
    pub prod_database_type_mysql: bool,
    pub prod_database_type_mariadb: bool,
    pub prod_database_type_oracle: bool,
    pub prod_database_type_mssql: bool,
    pub authentication_type_jwt: bool,
    pub authentication_type_oauth2: bool,
    pub authentication_type_session: bool,
    pub cache_provider_no: bool,
    pub cache_provider_any: bool,
    pub cache_provider_ehcache: bool,
    pub cache_provider_caffeine: bool,
    pub cache_provider_hazelcast: bool,
    pub cache_provider_infinispan: bool,
    pub cache_provider_memcached: bool,
    pub cache_provider_redis: bool,
    pub build_tool_maven: bool,
    pub build_tool_gradle: bool,
    pub message_broker_kafka: bool,
    pub message_broker_pulsar: bool,
    pub search_engine_elasticsearch: bool,
    pub search_engine_couchbase: bool,
    pub service_discovery_eureka: bool,
    pub service_discovery_consul: bool,
    pub service_discovery_any: bool,
    pub websocket_spring: bool,
    pub application_type_monolith: bool,
    pub application_type_gateway: bool,
    pub application_type_microservice: bool,
    pub generate_user_management: bool,
    /// `com/mycompany/myapp`
    pub package_folder: String,
    /// `src/main/java/com/mycompany/myapp/`
    pub java_dir: String,
    /// `src/test/java/com/mycompany/myapp/`
    pub test_dir: String,
    pub main_resource_dir: String,
    pub test_resource_dir: String,
    pub docker_dir: String,
    /// PascalCase form of `baseName`, used for class names
    pub main_class: String,
}

/// Prepared application record: composed answers plus derived flags.
///
/// Built once per run and shared read-only with every predicate.
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    #[serde(flatten)]
    pub config: ApplicationConfig,
    #[serde(flatten)]
    pub derived: DerivedFlags,
}

impl Application {
    /// Preparing phase: derive flags and the directory layout.
    pub fn prepare(config: ApplicationConfig) -> Result<Application> {
        use heck::ToUpperCamelCase;

        if !is_valid_package_name(&config.package_name) {
            return Err(GeneratorError::config_with_hint(
                format!("invalid packageName `{}`", config.package_name),
                "use a lowercase dotted Java package such as `com.mycompany.myapp`",
            ));
        }
        let dev = config.dev_database_type.unwrap_or_default();
        let prod = config.prod_database_type.unwrap_or_default();
        let package_folder = config.package_name.replace('.', "/");
        let cache = config.cache_provider;

        let derived = DerivedFlags {
            database_type_sql: config.database_type == DatabaseType::Sql,
            database_type_mongodb: config.database_type == DatabaseType::Mongodb,
            database_type_cassandra: config.database_type == DatabaseType::Cassandra,
            database_type_couchbase: config.database_type == DatabaseType::Couchbase,
            database_type_neo4j: config.database_type == DatabaseType::Neo4j,
            database_type_no: config.database_type == DatabaseType::No,
            dev_database_type_h2_any: dev.is_h2(),
            prod_database_type_postgresql: prod == DatabaseEngine::Postgresql,
            prod_database_type_mysql: prod == DatabaseEngine::Mysql,
            prod_database_type_mariadb: prod == DatabaseEngine::Mariadb,
            prod_database_type_oracle: prod == DatabaseEngine::Oracle,
            prod_database_type_mssql: prod == DatabaseEngine::Mssql,
            authentication_type_jwt: config.authentication_type == AuthenticationType::Jwt,
            authentication_type_oauth2: config.authentication_type == AuthenticationType::Oauth2,
            authentication_type_session: config.authentication_type
                == AuthenticationType::Session,
            cache_provider_no: cache == CacheProvider::No,
            cache_provider_any: cache != CacheProvider::No,
            cache_provider_ehcache: cache == CacheProvider::Ehcache,
            cache_provider_caffeine: cache == CacheProvider::Caffeine,
            cache_provider_hazelcast: cache == CacheProvider::Hazelcast,
            cache_provider_infinispan: cache == CacheProvider::Infinispan,
            cache_provider_memcached: cache == CacheProvider::Memcached,
            cache_provider_redis: cache == CacheProvider::Redis,
            build_tool_maven: config.build_tool == BuildTool::Maven,
            build_tool_gradle: config.build_tool == BuildTool::Gradle,
            message_broker_kafka: config.message_broker == MessageBroker::Kafka,
            message_broker_pulsar: config.message_broker == MessageBroker::Pulsar,
            search_engine_elasticsearch: config.search_engine == SearchEngine::Elasticsearch,
            search_engine_couchbase: config.search_engine == SearchEngine::Couchbase,
            service_discovery_eureka: config.service_discovery_type
                == ServiceDiscoveryType::Eureka,
            service_discovery_consul: config.service_discovery_type
                == ServiceDiscoveryType::Consul,
            service_discovery_any: config.service_discovery_type != ServiceDiscoveryType::No,
            websocket_spring: config.websocket == Websocket::SpringWebsocket,
            application_type_monolith: config.application_type == ApplicationType::Monolith,
            application_type_gateway: config.application_type == ApplicationType::Gateway,
            application_type_microservice: config.application_type
                == ApplicationType::Microservice,
            generate_user_management: !config.skip_user_management
                && config.database_type != DatabaseType::No,
            java_dir: format!("{SERVER_MAIN_SRC_DIR}{package_folder}/"),
            test_dir: format!("{SERVER_TEST_SRC_DIR}{package_folder}/"),
            package_folder,
            main_resource_dir: SERVER_MAIN_RES_DIR.to_string(),
            test_resource_dir: SERVER_TEST_RES_DIR.to_string(),
            docker_dir: DOCKER_DIR.to_string(),
            main_class: format!("{}App", config.base_name.to_upper_camel_case()),
        };
        Ok(Application { config, derived })
    }

    pub fn jhi_prefix(&self) -> &str {
        self.config.jhi_prefix.as_deref().unwrap_or_default()
    }
}

pub(crate) fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        })
}

/// Build the prepared application from raw answers (compose, then prepare).
pub fn build_application(config: &ApplicationConfig) -> Result<Application> {
    Application::prepare(config.compose()?)
}

/// Raw `.yo-rc.json` document together with where it was read from.
#[derive(Debug, Clone)]
pub struct YoRc {
    pub path: PathBuf,
    pub document: Value,
}

impl YoRc {
    /// Read `.yo-rc.json` from a project directory.
    pub fn load(project_dir: &Path) -> Result<YoRc> {
        let path = project_dir.join(YO_RC_FILE);
        if !path.exists() {
            return Err(GeneratorError::config_with_hint(
                format!("no {YO_RC_FILE} found in {}", project_dir.display()),
                "run from a generated project directory or pass --dir",
            ));
        }
        let contents = fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e))?;
        let document = serde_json::from_str(&contents).map_err(|source| GeneratorError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(YoRc { path, document })
    }

    pub fn config(&self) -> Result<ApplicationConfig> {
        ApplicationConfig::from_yo_rc(&self.document, &self.path)
    }

    /// Record the generator version that produced the tree.
    ///
    /// Only the version field is touched; every other key is written back as read.
    pub fn persist_version(&mut self, version: &str) -> Result<()> {
        let namespace = self
            .document
            .as_object_mut()
            .and_then(|root| root.get_mut(YO_RC_NAMESPACE))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                GeneratorError::config(format!(
                    "{} has no `{YO_RC_NAMESPACE}` section",
                    self.path.display()
                ))
            })?;
        namespace.insert(
            "jhipsterVersion".to_string(),
            Value::String(version.to_string()),
        );
        let mut rendered =
            serde_json::to_string_pretty(&self.document).map_err(|source| GeneratorError::Json {
                path: self.path.clone(),
                source,
            })?;
        rendered.push('\n');
        fs::write(&self.path, rendered).map_err(|e| GeneratorError::io(&self.path, e))
    }
}
