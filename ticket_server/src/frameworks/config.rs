use crate::domain::email::AllowedDomain;
use crate::interface_adapters::clients::GOOGLE_USERINFO_URL;
use crate::interface_adapters::stores::TableName;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io};
use url::Url;

// Runtime/server configuration, read once at startup.

pub const DEFAULT_ALLOWED_DOMAIN: &str = "goa.bits-pilani.ac.in";
pub const DEFAULT_HTTP_PORT: u16 = 8888;

const CONFIG_PATH_VAR: &str = "TICKET_SERVER_CONFIG";
const HOST_VAR: &str = "TICKET_SERVER_HOST";
const PORT_VAR: &str = "TICKET_SERVER_PORT";
const ALLOWED_DOMAIN_VAR: &str = "ALLOWED_EMAIL_DOMAIN";
const USERINFO_URL_VAR: &str = "GOOGLE_USERINFO_URL";
const RECORD_STORE_VAR: &str = "RECORD_STORE";
const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
const SUPABASE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const STUDENTS_TABLE_VAR: &str = "STUDENTS_TABLE";

// Optional TOML file; every key can be overridden by its environment variable.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_domain: Option<String>,
    pub google_userinfo_url: Option<String>,
    pub record_store: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub database_url: Option<String>,
    pub students_table: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub allowed_domain: AllowedDomain,
    pub google_userinfo_url: Url,
    pub record_store: RecordStoreConfig,
}

#[derive(Clone)]
pub enum RecordStoreConfig {
    Supabase {
        project_url: Url,
        service_role_key: String,
        table: TableName,
    },
    Postgres {
        database_url: String,
        table: TableName,
    },
}

// Credentials never reach the logs.
impl fmt::Debug for RecordStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStoreConfig::Supabase {
                project_url, table, ..
            } => f
                .debug_struct("Supabase")
                .field("project_url", &project_url.as_str())
                .field("service_role_key", &"<redacted>")
                .field("table", table)
                .finish(),
            RecordStoreConfig::Postgres { table, .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .field("table", table)
                .finish(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    ReadFile { path: PathBuf, source: io::Error },
    ParseFile { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has an invalid value: {value:?}"),
            ConfigError::ReadFile { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            ConfigError::ParseFile { path, source } => {
                write!(f, "failed to parse config file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    // Load from the optional TOML file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => FileConfig::read(Path::new(path.trim()))?,
            _ => FileConfig::default(),
        };

        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Blank environment values count as unset.
        let lookup = |key: &str, fallback: Option<String>| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .or(fallback)
        };

        let host = match lookup(HOST_VAR, file.host) {
            Some(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                key: HOST_VAR,
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match env(PORT_VAR).filter(|value| !value.trim().is_empty()) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: PORT_VAR,
                value,
            })?,
            None => file.port.unwrap_or(DEFAULT_HTTP_PORT),
        };

        let allowed_domain = lookup(ALLOWED_DOMAIN_VAR, file.allowed_domain)
            .unwrap_or_else(|| DEFAULT_ALLOWED_DOMAIN.to_string());
        let allowed_domain =
            AllowedDomain::new(&allowed_domain).ok_or(ConfigError::Invalid {
                key: ALLOWED_DOMAIN_VAR,
                value: allowed_domain,
            })?;

        let google_userinfo_url = parse_url(
            USERINFO_URL_VAR,
            lookup(USERINFO_URL_VAR, file.google_userinfo_url)
                .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string()),
        )?;

        let table = lookup(STUDENTS_TABLE_VAR, file.students_table)
            .map(|value| {
                TableName::parse(&value).ok_or(ConfigError::Invalid {
                    key: STUDENTS_TABLE_VAR,
                    value,
                })
            })
            .transpose()?
            .unwrap_or_default();

        let backend = lookup(RECORD_STORE_VAR, file.record_store)
            .unwrap_or_else(|| "supabase".to_string());
        let record_store = match backend.to_ascii_lowercase().as_str() {
            "supabase" => {
                let project_url = lookup(SUPABASE_URL_VAR, file.supabase_url)
                    .ok_or(ConfigError::Missing(SUPABASE_URL_VAR))?;
                RecordStoreConfig::Supabase {
                    project_url: parse_url(SUPABASE_URL_VAR, project_url)?,
                    service_role_key: lookup(SUPABASE_KEY_VAR, file.supabase_service_role_key)
                        .ok_or(ConfigError::Missing(SUPABASE_KEY_VAR))?,
                    table,
                }
            }
            "postgres" => RecordStoreConfig::Postgres {
                database_url: lookup(DATABASE_URL_VAR, file.database_url)
                    .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?,
                table,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: RECORD_STORE_VAR,
                    value: backend,
                });
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            allowed_domain,
            google_userinfo_url,
            record_store,
        })
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_url(key: &'static str, value: String) -> Result<Url, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
