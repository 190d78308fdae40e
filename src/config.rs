//! Credential loading.
//!
//! Values come from the process environment after an optional `.env` file has been
//! merged into it. Resolution itself goes through a lookup closure so it can be
//! exercised without touching the real environment.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

const REDDIT_HINT: &str = "Create a Reddit 'script' app at https://www.reddit.com/prefs/apps,\n\
     then set REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, and REDDIT_USER_AGENT in a .env file.";

const X_HINT: &str = "Provide it via --bearer-token or TWITTER_BEARER_TOKEN in .env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}.\n{hint}")]
    MissingVar { name: &'static str, hint: &'static str },

    #[error("Missing X bearer token. {0}")]
    MissingBearerToken(&'static str),

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenv::Error,
    },
}

/// Merge a `.env` file into the environment. An explicit path must exist;
/// the default `./.env` is optional.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(p) => {
            dotenv::from_path(p).map_err(|source| ConfigError::EnvFile {
                path: p.display().to_string(),
                source,
            })?;
            debug!("Loaded env file - path={}", p.display());
        }
        None => {
            if let Ok(p) = dotenv::dotenv() {
                debug!("Loaded env file - path={}", p.display());
            }
        }
    }
    Ok(())
}

pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required<F>(lookup: &F, name: &'static str, hint: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar { name, hint }),
    }
}

#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RedditCredentials {
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            client_id: required(&lookup, "REDDIT_CLIENT_ID", REDDIT_HINT)?,
            client_secret: required(&lookup, "REDDIT_CLIENT_SECRET", REDDIT_HINT)?,
            user_agent: required(&lookup, "REDDIT_USER_AGENT", REDDIT_HINT)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(env_lookup)
    }
}

#[derive(Clone)]
pub struct XCredentials {
    pub bearer_token: String,
}

impl std::fmt::Debug for XCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XCredentials")
            .field("bearer_token", &"***")
            .finish()
    }
}

impl XCredentials {
    /// A non-empty `override_token` wins over `TWITTER_BEARER_TOKEN`.
    pub fn resolve<F>(override_token: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = override_token
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .or_else(|| lookup("TWITTER_BEARER_TOKEN").filter(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingBearerToken(X_HINT))?;
        Ok(Self {
            bearer_token: token,
        })
    }

    pub fn from_env(override_token: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve(override_token, env_lookup)
    }
}
