//! Runtime configuration: flags with environment fallbacks.

use std::path::PathBuf;

use clap::Args;
use staffdir_app::SessionStore;
use staffdir_fetch::ServiceCredentials;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://backend.jotish.in/backend_dev";

#[derive(Args, Debug)]
pub struct Config {
    /// Base URL of the roster API.
    #[arg(long, env = "STAFFDIR_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Service account used for the table endpoint (not your login).
    #[arg(long, env = "STAFFDIR_API_USERNAME", default_value = "", hide_env_values = true, global = true)]
    pub api_username: String,

    #[arg(long, env = "STAFFDIR_API_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    pub api_password: String,

    /// Directory holding the persisted session flag.
    #[arg(long, env = "STAFFDIR_STATE_DIR", default_value = ".staffdir", global = true)]
    pub state_dir: PathBuf,

    /// Re-run a view this many times after a network failure.
    #[arg(long, env = "STAFFDIR_RETRIES", default_value_t = 0, global = true)]
    pub retries: u32,
}

impl Config {
    pub fn service_credentials(&self) -> ServiceCredentials {
        if self.api_username.is_empty() || self.api_password.is_empty() {
            warn!("service credentials not set, the table endpoint will likely reject requests");
        }
        ServiceCredentials {
            username: self.api_username.clone(),
            password: self.api_password.clone(),
        }
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::in_dir(&self.state_dir)
    }
}
