//! Per-session connection options.

use camino::Utf8PathBuf;

use crate::error::{ConfigError, Result};

/// Options for one container session.
///
/// Built once by [`crate::engine::Transport`] from merged configuration and
/// session state, then treated as read-only for the lifetime of a
/// [`crate::engine::Connection`]. Empty optional strings are treated the same
/// as absent values by the command builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// CLI executable name or path.
    pub binary: String,
    /// Daemon endpoint passed with `-H`.
    pub socket: Option<String>,
    /// Enable TLS (`--tls`).
    pub tls: bool,
    /// Verify the daemon certificate (`--tlsverify`).
    pub tls_verify: bool,
    /// CA certificate path (`--tlscacert=`).
    pub tls_cacert: Option<Utf8PathBuf>,
    /// Client certificate path (`--tlscert=`).
    pub tls_cert: Option<Utf8PathBuf>,
    /// Client key path (`--tlskey=`).
    pub tls_key: Option<Utf8PathBuf>,
    /// Keep stdin open (`-i`).
    pub interactive: bool,
    /// Run the exec process privileged (`--privileged`).
    pub privileged: bool,
    /// Allocate a pseudo-terminal (`-t`).
    pub tty: bool,
    /// Working directory inside the container (`-w`).
    pub working_dir: Option<String>,
    /// User inside the container (`-u`).
    pub username: Option<String>,
    /// Ordered `NAME=VALUE` entries passed with `-e`.
    pub env_variables: Vec<String>,
    /// Target container identifier.
    pub container_id: String,
    /// Target platform name, for example `ubuntu-22.04` or `windows-2022`.
    pub platform: String,
    /// Run the exec process in the background (`-d`).
    pub detach: bool,
    /// Scratch directory inside the container.
    pub temp_dir: String,
}

impl ConnectionOptions {
    /// Create options for `container_id` on `platform` with every optional
    /// flag unset and the `docker` binary.
    #[must_use]
    pub fn new(container_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            binary: String::from(super::DEFAULT_BINARY),
            socket: None,
            tls: false,
            tls_verify: false,
            tls_cacert: None,
            tls_cert: None,
            tls_key: None,
            interactive: false,
            privileged: false,
            tty: false,
            working_dir: None,
            username: None,
            env_variables: Vec::new(),
            container_id: container_id.into(),
            platform: platform.into(),
            detach: false,
            temp_dir: String::from(super::UNIX_TEMP_DIR),
        }
    }

    /// Copy of these options prepared for an interactive login shell.
    ///
    /// Forces `interactive` and `tty` on, `detach` off, and clears the
    /// username. `self` is left untouched.
    #[must_use]
    pub fn for_login(&self) -> Self {
        Self {
            interactive: true,
            tty: true,
            detach: false,
            username: None,
            ..self.clone()
        }
    }

    /// Report TLS material configured while TLS is disabled.
    ///
    /// The command builder never calls this; contradictory TLS settings are
    /// passed through to the CLI unchanged. Callers that prefer to fail early
    /// can validate explicitly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first TLS path that is
    /// set while both `tls` and `tls_verify` are off.
    pub fn validate_tls(&self) -> Result<()> {
        if self.tls || self.tls_verify {
            return Ok(());
        }

        let configured = [
            ("tls_cacert", &self.tls_cacert),
            ("tls_cert", &self.tls_cert),
            ("tls_key", &self.tls_key),
        ]
        .into_iter()
        .find_map(|(field, value)| {
            value
                .as_ref()
                .filter(|path| !path.as_str().is_empty())
                .map(|_| field)
        });

        match configured {
            Some(field) => Err(ConfigError::InvalidValue {
                field: String::from(field),
                reason: String::from("TLS material is set but TLS is disabled"),
            }
            .into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::ConnectionOptions;

    #[fixture]
    fn options() -> ConnectionOptions {
        let mut options = ConnectionOptions::new("abc123", "ubuntu-22.04");
        options.username = Some(String::from("kitchen"));
        options.detach = true;
        options
    }

    #[rstest]
    fn for_login_forces_interactive_session_flags(options: ConnectionOptions) {
        let login = options.for_login();

        assert!(login.interactive);
        assert!(login.tty);
        assert!(!login.detach);
        assert!(login.username.is_none());
    }

    #[rstest]
    fn for_login_leaves_original_untouched(options: ConnectionOptions) {
        let before = options.clone();
        let _login = options.for_login();
        assert_eq!(options, before);
    }

    #[rstest]
    fn validate_tls_accepts_disabled_tls_without_material(options: ConnectionOptions) {
        assert!(options.validate_tls().is_ok());
    }

    #[rstest]
    fn validate_tls_rejects_key_without_tls(mut options: ConnectionOptions) {
        options.tls_key = Some("/certs/key.pem".into());
        let error = options.validate_tls().expect_err("key without TLS should fail");
        assert!(error.to_string().contains("tls_key"));
    }

    #[rstest]
    fn validate_tls_accepts_material_with_tls_verify(mut options: ConnectionOptions) {
        options.tls_verify = true;
        options.tls_cacert = Some("/certs/ca.pem".into());
        assert!(options.validate_tls().is_ok());
    }
}
