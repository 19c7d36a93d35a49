use std::env;

use crate::error::Error;

/// Runtime settings, read from the environment with local-dev defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        let host = env::var("HOST").unwrap_or_else(|_| String::from("127.0.0.1"));
        let port = env::var("PORT")
            .unwrap_or_else(|_| String::from("8080"))
            .parse()?;
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| String::from("./static"));
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| String::from("*"))
            .split(',')
            .map(|origin| origin.trim().to_owned())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            host,
            port,
            static_dir,
            allowed_origins,
        })
    }
}
