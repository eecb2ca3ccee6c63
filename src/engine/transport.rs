//! Transport factory.
//!
//! Resolves host-dependent defaults, merges per-session state into the loaded
//! configuration, and opens one [`Connection`] per session.

use std::sync::Arc;

use tracing::{debug, warn};

use super::endpoint::{DaemonEndpoint, HostOs, SocketResolver};
use super::{
    Connection, ConnectionOptions, DEFAULT_BINARY, DEFAULT_USERNAME, ProcessRunner, UNIX_TEMP_DIR,
    WINDOWS_TEMP_DIR,
};
use crate::config::TransportConfig;
use crate::error::{ConfigError, Result};

/// Call-time state for one session.
///
/// The container id is only known once the container has been created by the
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Target container identifier.
    pub container_id: String,
    /// Platform name of the container image.
    pub platform: String,
}

impl SessionState {
    /// Create session state for `container_id` on `platform`.
    #[must_use]
    pub fn new(container_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            platform: platform.into(),
        }
    }
}

/// Builds connections from configuration.
pub struct Transport<'a, E: mockable::Env> {
    config: &'a TransportConfig,
    host_os: HostOs,
    resolver: SocketResolver<'a, E>,
    endpoint: DaemonEndpoint,
}

impl<'a, E: mockable::Env> Transport<'a, E> {
    /// Create a transport for the current host.
    ///
    /// `endpoint` is shared with any verifier that needs to reach the same
    /// daemon.
    #[must_use]
    pub fn new(config: &'a TransportConfig, env: &'a E, endpoint: DaemonEndpoint) -> Self {
        Self {
            config,
            host_os: HostOs::current(),
            resolver: SocketResolver::new(env),
            endpoint,
        }
    }

    /// Override the host OS used for defaulting.
    #[must_use]
    pub const fn with_host_os(mut self, host_os: HostOs) -> Self {
        self.host_os = host_os;
        self
    }

    /// Socket from configuration, `DOCKER_HOST`, or the host default.
    #[must_use]
    pub fn resolved_socket(&self) -> String {
        self.resolver
            .resolve(self.config.socket.as_deref(), self.host_os)
    }

    /// Temp directory from configuration or the host default.
    #[must_use]
    pub fn resolved_temp_dir(&self) -> String {
        non_empty(self.config.temp_dir.as_deref()).map_or_else(
            || {
                String::from(if self.host_os.is_windows() {
                    WINDOWS_TEMP_DIR
                } else {
                    UNIX_TEMP_DIR
                })
            },
            String::from,
        )
    }

    /// Username from configuration, or the host default.
    ///
    /// Windows hosts have no default user, so no `-u` flag is added.
    #[must_use]
    pub fn resolved_username(&self) -> Option<String> {
        non_empty(self.config.username.as_deref())
            .map(String::from)
            .or_else(|| (!self.host_os.is_windows()).then(|| String::from(DEFAULT_USERNAME)))
    }

    /// CLI binary from configuration or `docker`.
    #[must_use]
    pub fn resolved_binary(&self) -> String {
        String::from(non_empty(self.config.binary.as_deref()).unwrap_or(DEFAULT_BINARY))
    }

    /// Merge `state` into the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when the container id is empty.
    pub fn connection_options(&self, state: &SessionState) -> Result<ConnectionOptions> {
        if state.container_id.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("container_id"),
            }
            .into());
        }

        let tls = &self.config.tls;
        let exec = &self.config.exec;
        let mut options = ConnectionOptions::new(&state.container_id, &state.platform);
        options.binary = self.resolved_binary();
        options.socket = Some(self.resolved_socket());
        options.tls = tls.enabled;
        options.tls_verify = tls.verify;
        options.tls_cacert.clone_from(&tls.cacert);
        options.tls_cert.clone_from(&tls.cert);
        options.tls_key.clone_from(&tls.key);
        options.interactive = exec.interactive;
        options.privileged = exec.privileged;
        options.tty = exec.tty;
        options.detach = exec.detach;
        options.working_dir.clone_from(&exec.working_dir);
        options.env_variables.clone_from(&exec.env_variables);
        options.username = self.resolved_username();
        options.temp_dir = self.resolved_temp_dir();
        Ok(options)
    }

    /// Open a connection for `state`, publishing the daemon endpoint.
    ///
    /// The endpoint published is `DOCKER_HOST` when set, otherwise the
    /// resolved socket.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when the container id is empty.
    pub fn connection<R: ProcessRunner>(
        &self,
        state: &SessionState,
        runner: Arc<R>,
    ) -> Result<Connection<R>> {
        let options = self.connection_options(state)?;
        self.publish_endpoint(options.socket.as_deref());
        debug!(
            "opening connection to container {} (platform: {})",
            options.container_id, options.platform
        );
        Ok(Connection::new(options, runner))
    }

    /// Shared endpoint handed to this transport.
    #[must_use]
    pub const fn endpoint(&self) -> &DaemonEndpoint {
        &self.endpoint
    }

    fn publish_endpoint(&self, socket: Option<&str>) {
        let Some(value) = self
            .resolver
            .docker_host()
            .or_else(|| non_empty(socket).map(String::from))
        else {
            return;
        };

        if self.endpoint.publish(value.as_str()) {
            debug!("published daemon endpoint {value}");
        } else if self.endpoint.get() != Some(value.as_str()) {
            warn!(
                "daemon endpoint already set to {}; ignoring {value}",
                self.endpoint.get().unwrap_or_default()
            );
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|inner| !inner.is_empty())
}
