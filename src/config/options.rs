//! Enumerated configuration options.
//!
//! Each option deserializes from the lowercase value stored in `.yo-rc.json`.
//! Older projects persisted `false` where the current loader writes `"no"`,
//! so options that have a `No` variant accept both spellings.

use crate::error::{GeneratorError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Text(String),
    Flag(bool),
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, key = $key:literal, default = $default:ident, false_as = $false_as:expr,
        { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Option name as it appears in `.yo-rc.json`
            pub const OPTION: &'static str = $key;
            /// Every legal value, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = GeneratorError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(GeneratorError::config_with_hint(
                        format!("unrecognized value `{other}` for `{}`", $key),
                        format!("legal values are: {}", Self::VALUES.join(", ")),
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let false_as: Option<$name> = $false_as;
                match RawOption::deserialize(deserializer)? {
                    RawOption::Text(text) => text.parse().map_err(serde::de::Error::custom),
                    RawOption::Flag(false) => false_as.ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "`{}` cannot be `false`; legal values are: {}",
                            $key,
                            Self::VALUES.join(", ")
                        ))
                    }),
                    RawOption::Flag(true) => Err(serde::de::Error::custom(format!(
                        "`{}` must be one of: {}",
                        $key,
                        Self::VALUES.join(", ")
                    ))),
                }
            }
        }
    };
}

option_enum! {
    ApplicationType, key = "applicationType", default = Monolith, false_as = None,
    {
        Monolith => "monolith",
        Gateway => "gateway",
        Microservice => "microservice",
    }
}

option_enum! {
    DatabaseType, key = "databaseType", default = Sql, false_as = Some(DatabaseType::No),
    {
        Sql => "sql",
        Mongodb => "mongodb",
        Cassandra => "cassandra",
        Couchbase => "couchbase",
        Neo4j => "neo4j",
        No => "no",
    }
}

option_enum! {
    /// Concrete engine used for `devDatabaseType` and `prodDatabaseType`.
    DatabaseEngine, key = "prodDatabaseType", default = Postgresql, false_as = Some(DatabaseEngine::No),
    {
        Postgresql => "postgresql",
        Mysql => "mysql",
        Mariadb => "mariadb",
        Oracle => "oracle",
        Mssql => "mssql",
        H2Disk => "h2Disk",
        H2Memory => "h2Memory",
        Mongodb => "mongodb",
        Cassandra => "cassandra",
        Couchbase => "couchbase",
        Neo4j => "neo4j",
        No => "no",
    }
}

impl DatabaseEngine {
    pub fn is_sql(self) -> bool {
        matches!(
            self,
            DatabaseEngine::Postgresql
                | DatabaseEngine::Mysql
                | DatabaseEngine::Mariadb
                | DatabaseEngine::Oracle
                | DatabaseEngine::Mssql
                | DatabaseEngine::H2Disk
                | DatabaseEngine::H2Memory
        )
    }

    pub fn is_h2(self) -> bool {
        matches!(self, DatabaseEngine::H2Disk | DatabaseEngine::H2Memory)
    }
}

option_enum! {
    CacheProvider, key = "cacheProvider", default = No, false_as = Some(CacheProvider::No),
    {
        Ehcache => "ehcache",
        Caffeine => "caffeine",
        Hazelcast => "hazelcast",
        Infinispan => "infinispan",
        Memcached => "memcached",
        Redis => "redis",
        No => "no",
    }
}

option_enum! {
    SearchEngine, key = "searchEngine", default = No, false_as = Some(SearchEngine::No),
    {
        Elasticsearch => "elasticsearch",
        Couchbase => "couchbase",
        No => "no",
    }
}

option_enum! {
    MessageBroker, key = "messageBroker", default = No, false_as = Some(MessageBroker::No),
    {
        Kafka => "kafka",
        Pulsar => "pulsar",
        No => "no",
    }
}

option_enum! {
    ServiceDiscoveryType, key = "serviceDiscoveryType", default = No, false_as = Some(ServiceDiscoveryType::No),
    {
        Eureka => "eureka",
        Consul => "consul",
        No => "no",
    }
}

option_enum! {
    Websocket, key = "websocket", default = No, false_as = Some(Websocket::No),
    {
        SpringWebsocket => "spring-websocket",
        No => "no",
    }
}

option_enum! {
    BuildTool, key = "buildTool", default = Maven, false_as = None,
    {
        Maven => "maven",
        Gradle => "gradle",
    }
}

option_enum! {
    AuthenticationType, key = "authenticationType", default = Jwt, false_as = None,
    {
        Jwt => "jwt",
        Oauth2 => "oauth2",
        Session => "session",
    }
}

option_enum! {
    Dto, key = "dto", default = No, false_as = Some(Dto::No),
    {
        Mapstruct => "mapstruct",
        No => "no",
    }
}

option_enum! {
    ServiceKind, key = "service", default = No, false_as = Some(ServiceKind::No),
    {
        ServiceClass => "serviceClass",
        ServiceImpl => "serviceImpl",
        No => "no",
    }
}

option_enum! {
    Pagination, key = "pagination", default = No, false_as = Some(Pagination::No),
    {
        Pagination => "pagination",
        InfiniteScroll => "infinite-scroll",
        No => "no",
    }
}
