#[macro_use]
extern crate lazy_static;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;

use error::Result;

lazy_static! {
    pub static ref CONFIG: Arc<RwLock<Config>> = Arc::new(RwLock::new(Config::default()));
}

const CONF_FILE: &'static str = "config/conf.toml";
const LOG_FILE: &'static str = "config/log.yml";
const STORAGE_DIR: &'static str = "storage";

#[derive(Deserialize, Default, Debug, Clone)]
pub struct Config {
    addr: String,
    storage_dir: Option<String>,
    // 本地校验 session token 用的密钥, 不配置时走 /api/auth/session
    session_secret: Option<String>,
    session_cookie: Option<String>,
}

impl Config {
    pub fn server_addr(&self) -> String {
        self.addr.clone()
    }

    pub fn storage_dir(&self, home: &Path) -> PathBuf {
        match self.storage_dir {
            Some(ref dir) => home.join(dir),
            None => home.join(STORAGE_DIR),
        }
    }

    pub fn session_secret(&self) -> Option<String> {
        self.session_secret.clone()
    }

    pub fn session_cookie(&self) -> String {
        self.session_cookie.clone().unwrap_or_default()
    }
}

/// Reads `config/conf.toml` under `home` and makes it the global config.
pub async fn init_config(home: &Path) -> Result<Config> {
    let conf_file = home.join(CONF_FILE);
    let config: Config = toml::from_slice(tokio::fs::read(&conf_file).await?.as_slice())?;
    Url::parse(config.addr.as_str())?;
    {
        let mut guard = CONFIG.write().await;
        *guard = config.clone();
    }
    info!("config loaded from {}", conf_file.display());
    Ok(config)
}

pub fn init_logging(home: &Path) -> Result<()> {
    let log_yaml = home.join(LOG_FILE);
    log4rs::init_file(log_yaml, Default::default())?;
    Ok(())
}
