//! Container environment variable expansion for remote paths.
//!
//! Remote paths may reference variables that only exist inside the container,
//! such as `$env:TEMP` on Windows or `$HOME` on Linux. They are expanded by
//! reading the container's environment before the path is handed to
//! `docker cp` or `docker exec`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{ContainerPlatform, exec_failed, run_exec};
use crate::engine::{CommandMode, ConnectionOptions, POWERSHELL_COMMAND, ProcessRunner};
use crate::error::DockhandError;

const POWERSHELL_PREFIX: &str = "$env:";
const ENVIRONMENT_DUMP_SCRIPT: &str =
    "[System.Environment]::GetEnvironmentVariables() | ConvertTo-Json";

/// A variable reference found in a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EnvReference<'a> {
    /// `$env:NAME`, terminated by `\` or end of string.
    PowerShell(&'a str),
    /// `$NAME`, terminated by `/` or end of string.
    Posix(&'a str),
}

impl EnvReference<'_> {
    fn name(&self) -> &str {
        match self {
            Self::PowerShell(name) | Self::Posix(name) => name,
        }
    }

    fn token(&self) -> String {
        match self {
            Self::PowerShell(name) => format!("{POWERSHELL_PREFIX}{name}"),
            Self::Posix(name) => format!("${name}"),
        }
    }
}

/// Find the first variable reference in `path`.
pub(super) fn find_reference(path: &str) -> Option<EnvReference<'_>> {
    if let Some((_, rest)) = path.split_once(POWERSHELL_PREFIX) {
        let name = rest.split('\\').next().unwrap_or_default();
        return Some(EnvReference::PowerShell(name));
    }

    let (_, rest) = path.split_once('$')?;
    let name = rest.split('/').next().unwrap_or_default();
    Some(EnvReference::Posix(name))
}

/// Variables read from inside a container.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct ContainerEnvironment {
    vars: HashMap<String, String>,
    case_insensitive: bool,
}

impl ContainerEnvironment {
    /// Parse `printenv` output.
    pub(super) fn from_printenv(stdout: &str) -> Self {
        let vars = stdout
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (String::from(key), String::from(value)))
            .collect();
        Self {
            vars,
            case_insensitive: false,
        }
    }

    /// Parse the JSON object printed by `ConvertTo-Json`.
    ///
    /// Windows variable names are case-insensitive.
    pub(super) fn from_powershell_json(stdout: &str) -> Result<Self, serde_json::Error> {
        let parsed: HashMap<String, Value> = serde_json::from_str(stdout.trim())?;
        let vars = parsed
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.to_ascii_uppercase(), text)
            })
            .collect();
        Ok(Self {
            vars,
            case_insensitive: true,
        })
    }

    /// Look up `name`, returning an empty string when it is unset.
    pub(super) fn value(&self, name: &str) -> &str {
        let key = if self.case_insensitive {
            name.to_ascii_uppercase()
        } else {
            String::from(name)
        };
        self.vars.get(&key).map_or("", |value| value.trim())
    }

    /// Replace `reference` in `path` with its value.
    pub(super) fn expand(&self, path: &str, reference: EnvReference<'_>) -> String {
        path.replace(&reference.token(), self.value(reference.name()))
    }
}

/// Expand the first container variable referenced by `path`.
///
/// Paths without a reference are returned unchanged without touching the
/// container.
pub(super) async fn expand_remote_path<R: ProcessRunner>(
    runner: &R,
    options: &ConnectionOptions,
    platform: ContainerPlatform,
    path: &str,
) -> Result<String, DockhandError> {
    let Some(reference) = find_reference(path) else {
        return Ok(String::from(path));
    };

    let environment = read_environment(runner, options, platform).await?;
    let expanded = environment.expand(path, reference);
    debug!("expanded remote path {path} to {expanded}");
    Ok(expanded)
}

async fn read_environment<R: ProcessRunner>(
    runner: &R,
    options: &ConnectionOptions,
    platform: ContainerPlatform,
) -> Result<ContainerEnvironment, DockhandError> {
    match platform {
        ContainerPlatform::Windows => {
            let output = run_exec(
                runner,
                options,
                CommandMode::Interpreted {
                    interpreter: POWERSHELL_COMMAND,
                    script: ENVIRONMENT_DUMP_SCRIPT,
                },
            )
            .await?;
            ContainerEnvironment::from_powershell_json(output.stdout()).map_err(|error| {
                exec_failed(
                    options,
                    format!("failed to parse container environment: {error}"),
                )
            })
        }
        ContainerPlatform::Linux => {
            let output = run_exec(runner, options, CommandMode::Execute("printenv")).await?;
            Ok(ContainerEnvironment::from_printenv(output.stdout()))
        }
    }
}
