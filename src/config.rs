//! Process configuration read from the environment (after `.env` is loaded).

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind { Sqlite, Memory }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Builds the config from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR `{bind_addr}` is not a socket address"))?;
        let store = match lookup("TODO_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("sqlite") => StoreKind::Sqlite,
            Some("memory") => StoreKind::Memory,
            Some(other) => bail!("TODO_STORE must be `sqlite` or `memory`, got `{other}`"),
        };
        Ok(Self { database_url, bind_addr, store })
    }
}
