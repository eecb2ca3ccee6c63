//! Configuration system for dockhand.
//!
//! This module provides the configuration structures and CLI definitions for
//! the dockhand transport. Layers are merged with `ortho_config`: CLI flags
//! override environment variables, which override configuration files, which
//! override defaults.
//!
//! The configuration file is expected at `~/.config/dockhand/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! socket = "tcp://build-host:2376"
//! username = "kitchen"
//!
//! [tls]
//! verify = true
//! cacert = "/home/user/.docker/ca.pem"
//! cert = "/home/user/.docker/cert.pem"
//! key = "/home/user/.docker/key.pem"
//!
//! [exec]
//! privileged = true
//! working_dir = "/app"
//! env_variables = ["http_proxy=http://proxy:3128"]
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, ExecArgs, LoginArgs, TargetArgs, UploadArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{ExecConfig, TlsConfig, TransportConfig};
