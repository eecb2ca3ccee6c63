//! Daemon endpoint resolution and sharing.
//!
//! [`SocketResolver`] reads `DOCKER_HOST` through an injectable environment.
//! [`DaemonEndpoint`] is the explicit, shared endpoint value handed to both
//! the transport and any verification collaborator, so they agree on the
//! daemon without mutating the process environment. [`EngineConnector`] turns
//! an endpoint string into a Bollard client for inspection sessions.

use std::sync::{Arc, OnceLock};

use bollard::Docker;

use crate::error::{ContainerError, DockhandError};

/// Environment variable naming the daemon host.
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Connection timeout in seconds for Docker API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Operating system of the machine running dockhand.
///
/// Defaults depend on the host, not on the container platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// A Windows host.
    Windows,
    /// Any other host.
    Unix,
}

impl HostOs {
    /// Return the host OS dockhand was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Whether this is a Windows host.
    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Return the default daemon socket for this host.
    ///
    /// `npipe:////./pipe/docker_engine` on Windows,
    /// `unix:///var/run/docker.sock` elsewhere.
    #[must_use]
    pub const fn default_socket(self) -> &'static str {
        match self {
            Self::Windows => "npipe:////./pipe/docker_engine",
            Self::Unix => "unix:///var/run/docker.sock",
        }
    }
}

/// Resolves the daemon endpoint from environment variables.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use dockhand::engine::SocketResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = SocketResolver::new(&env);
///
/// if let Some(socket) = resolver.docker_host() {
///     println!("Found socket: {}", socket);
/// }
/// ```
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Return `DOCKER_HOST` when it is set to a non-empty value.
    #[must_use]
    pub fn docker_host(&self) -> Option<String> {
        self.env
            .string(DOCKER_HOST_ENV)
            .filter(|value| !value.is_empty())
    }

    /// Resolve the socket: configured value, then `DOCKER_HOST`, then the
    /// host default.
    #[must_use]
    pub fn resolve(&self, configured: Option<&str>, host_os: HostOs) -> String {
        configured
            .filter(|socket| !socket.is_empty())
            .map(String::from)
            .or_else(|| self.docker_host())
            .unwrap_or_else(|| String::from(host_os.default_socket()))
    }
}

/// Shared daemon endpoint for one orchestration run.
///
/// Clones share the same slot. The first publication wins and later ones are
/// ignored, so concurrent transports agree on one endpoint.
#[derive(Debug, Clone, Default)]
pub struct DaemonEndpoint {
    slot: Arc<OnceLock<String>>,
}

impl DaemonEndpoint {
    /// Create an empty endpoint slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an endpoint slot that already holds `socket`.
    #[must_use]
    pub fn with_socket(socket: impl Into<String>) -> Self {
        let endpoint = Self::new();
        endpoint.publish(socket);
        endpoint
    }

    /// Publish `socket` if no endpoint has been published yet.
    ///
    /// Returns `true` when this call set the value.
    pub fn publish(&self, socket: impl Into<String>) -> bool {
        self.slot.set(socket.into()).is_ok()
    }

    /// Return the published endpoint, if any.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.slot.get().map(String::as_str)
    }
}

/// Creates Bollard clients for daemon endpoints.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the daemon at `socket`.
    ///
    /// `unix://` and `npipe://` endpoints use the local socket transport;
    /// `tcp://` (rewritten to `http://`), `http://` and `https://` use HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` for any other scheme or if
    /// the client cannot be created.
    pub fn connect(socket: &str) -> Result<Docker, DockhandError> {
        let client = if socket.starts_with("unix://") || socket.starts_with("npipe://") {
            Docker::connect_with_socket(
                socket,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            )
        } else if let Some(address) = socket.strip_prefix("tcp://") {
            Docker::connect_with_http(
                &format!("http://{address}"),
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            )
        } else if socket.starts_with("http://") || socket.starts_with("https://") {
            Docker::connect_with_http(
                socket,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            )
        } else {
            return Err(connection_failed(format!("unsupported daemon endpoint '{socket}'")));
        };

        client.map_err(|e| connection_failed(e.to_string()))
    }

    /// Connect to the published endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` if nothing has been
    /// published yet or the client cannot be created.
    pub fn connect_endpoint(endpoint: &DaemonEndpoint) -> Result<Docker, DockhandError> {
        let socket = endpoint
            .get()
            .ok_or_else(|| connection_failed("no daemon endpoint has been published"))?;
        Self::connect(socket)
    }
}

fn connection_failed(message: impl Into<String>) -> DockhandError {
    DockhandError::from(ContainerError::ConnectionFailed {
        message: message.into(),
    })
}
