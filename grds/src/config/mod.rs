use crate::error::{GrdsError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection parameters for the MySQL server being introspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u32,
    pub username: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    pub collation: Option<String>,
    /// Upper bound on establishing a single connection, in seconds.
    pub timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: "127.0.0.1".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: String::new(),
            charset: "utf8mb4".to_string(),
            collation: None,
            timeout_secs: 10,
        }
    }
}

impl DbConfig {
    pub fn new(
        host: impl Into<String>,
        port: u32,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        DbConfig {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            database: database.into(),
            ..DbConfig::default()
        }
    }

    /// Check that the parameters are usable before any connection is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(GrdsError::Config("host is required".into()));
        }
        if self.port == 0 || self.port > 65535 {
            return Err(GrdsError::Config(format!("invalid port: {}", self.port)));
        }
        if self.username.is_empty() {
            return Err(GrdsError::Config("username is required".into()));
        }
        if self.database.is_empty() {
            return Err(GrdsError::Config("database is required".into()));
        }
        if self.charset.is_empty() {
            return Err(GrdsError::Config("charset must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `user@host:port/database`, without the password.
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }

    /// Session statement applied right after connecting.
    pub fn session_init(&self) -> String {
        match &self.collation {
            Some(collation) if !collation.is_empty() => {
                format!("SET NAMES {} COLLATE {}", self.charset, collation)
            }
            _ => format!("SET NAMES {}", self.charset),
        }
    }

    /// Build driver options. Call [`DbConfig::validate`] first.
    pub fn to_opts(&self) -> mysql_async::Opts {
        mysql_async::OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port as u16)
            .user(Some(self.username.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .init(vec![self.session_init()])
            .into()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u32) -> Self {
        self.port = port;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
