//! Configuration data types for dockhand.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

/// TLS settings for a remote daemon.
///
/// Certificate paths are passed through to the CLI as given, even when
/// `enabled` and `verify` are both off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Use TLS (`--tls`).
    pub enabled: bool,

    /// Use TLS and verify the daemon (`--tlsverify`).
    pub verify: bool,

    /// CA certificate path.
    pub cacert: Option<Utf8PathBuf>,

    /// Client certificate path.
    pub cert: Option<Utf8PathBuf>,

    /// Client key path.
    pub key: Option<Utf8PathBuf>,
}

/// Flags applied to every `docker exec` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Keep stdin open.
    pub interactive: bool,

    /// Run privileged.
    pub privileged: bool,

    /// Allocate a pseudo-terminal.
    pub tty: bool,

    /// Run in the background.
    pub detach: bool,

    /// Working directory inside the container.
    pub working_dir: Option<String>,

    /// `NAME=VALUE` entries, passed in order.
    pub env_variables: Vec<String>,
}

/// Root transport configuration.
///
/// Loaded from configuration files, environment variables, and command-line
/// arguments. The precedence order (lowest to highest) is: defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Unset `socket`, `username`, and `temp_dir` values are resolved per host
/// by [`crate::engine::Transport`].
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKHAND_CONFIG_PATH` environment variable
/// 2. `.dockhand.toml` in the current working directory
/// 3. `.dockhand.toml` in the home directory
/// 4. `~/.config/dockhand/config.toml` (XDG default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKHAND",
    post_merge_hook,
    discovery(
        app_name = "dockhand",
        env_var = "DOCKHAND_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockhand.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct TransportConfig {
    /// Docker CLI executable name or path.
    pub binary: Option<String>,

    /// Daemon endpoint URL.
    pub socket: Option<String>,

    /// User to run commands as inside the container.
    pub username: Option<String>,

    /// Scratch directory inside the container.
    pub temp_dir: Option<String>,

    /// TLS configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub tls: TlsConfig,

    /// Exec flag configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub exec: ExecConfig,
}

impl PostMergeHook for TransportConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // An empty string in any layer means "use the host default".
        for value in [
            &mut self.binary,
            &mut self.socket,
            &mut self.username,
            &mut self.temp_dir,
            &mut self.exec.working_dir,
        ] {
            if value.as_deref().is_some_and(str::is_empty) {
                *value = None;
            }
        }
        for path in [
            &mut self.tls.cacert,
            &mut self.tls.cert,
            &mut self.tls.key,
        ] {
            if path.as_ref().is_some_and(|inner| inner.as_str().is_empty()) {
                *path = None;
            }
        }
        self.exec.env_variables.retain(|entry| !entry.is_empty());
        Ok(())
    }
}
