//! Docker CLI command construction.
//!
//! Builds the ordered token list for `docker exec` and `docker cp`
//! invocations from [`ConnectionOptions`]. Tokens are never shell-escaped and
//! flag/value pairs such as `-w /app` are kept together as a single token, so
//! the order produced here is the order seen by the CLI.
//!
//! [`CommandLine::argv`] turns the tokens into process arguments without a
//! host shell: only the leading flag/value pairs are split, and everything
//! from the first operand on is passed through literally.

use std::fmt;

use camino::Utf8Path;
use tracing::debug;

use super::ConnectionOptions;

/// Login shell appended in [`CommandMode::Login`].
const LOGIN_SHELL: &[&str] = &["/bin/bash", "-login", "-i"];

/// POSIX shell used to interpret commands inside Linux containers.
pub const POSIX_SHELL: &[&str] = &["sh", "-c"];

/// PowerShell taking an inline script.
pub const POWERSHELL_COMMAND: &[&str] =
    &["powershell", "-ExecutionPolicy", "Bypass", "-NoLogo", "-Command"];

/// PowerShell running a script file.
pub const POWERSHELL_FILE: &[&str] =
    &["powershell", "-ExecutionPolicy", "Bypass", "-NoLogo", "-File"];

/// What the exec invocation should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode<'a> {
    /// Run the given command string, unsplit.
    Execute(&'a str),
    /// Hand `script` to `interpreter` as its final argument.
    ///
    /// Each interpreter word is its own token; the script stays one token.
    Interpreted {
        /// Interpreter program and leading arguments.
        interpreter: &'a [&'a str],
        /// Script text or script path, passed unsplit.
        script: &'a str,
    },
    /// Start an interactive login shell.
    Login,
}

/// An ordered CLI invocation.
///
/// The first token is always the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Wrap an already ordered token list.
    #[must_use]
    pub const fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Return every token, binary first.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Return the binary token.
    #[must_use]
    pub fn program(&self) -> &str {
        self.tokens.first().map_or("", String::as_str)
    }

    /// Return every token after the binary.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// Process arguments following the program.
    ///
    /// Leading option tokens that pair a flag with a value (`-u kitchen`) are
    /// split at the first space. Option parsing stops at the first operand
    /// after the subcommand (the container id for `exec`, the local path for
    /// `cp`); that operand and everything after it are passed unchanged.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args().len());
        let mut subcommand_seen = false;
        let mut operands = false;

        for token in self.args() {
            if operands {
                argv.push(token.clone());
            } else if token.starts_with('-') {
                argv.extend(split_option(token));
            } else if subcommand_seen {
                operands = true;
                argv.push(token.clone());
            } else {
                subcommand_seen = true;
                argv.push(token.clone());
            }
        }

        argv
    }

    /// Render the invocation as one POSIX shell line, quoting every argument
    /// that needs it.
    #[must_use]
    pub fn shell_line(&self) -> String {
        let mut words = vec![String::from(self.program())];
        words.extend(self.argv());
        shell_words::join(words)
    }

    /// Consume the command line, returning its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Build a `docker exec` invocation.
///
/// Optional fields that are absent or empty are omitted. No validation of
/// flag combinations is performed.
#[must_use]
pub fn build_command(options: &ConnectionOptions, mode: CommandMode<'_>) -> CommandLine {
    let mut tokens = docker_prefix(options);
    let exec = exec_tokens(options, mode);
    debug!("build_exec_command: {}", exec.join(" "));
    tokens.extend(exec);
    CommandLine::from_tokens(tokens)
}

/// Build a `docker cp` invocation copying `local` to `remote` in the
/// session's container.
#[must_use]
pub fn build_copy_command(options: &ConnectionOptions, local: &str, remote: &str) -> CommandLine {
    let mut tokens = docker_prefix(options);
    tokens.push(String::from("cp"));
    tokens.push(String::from(local));
    tokens.push(format!("{}:{remote}", options.container_id));
    CommandLine::from_tokens(tokens)
}

fn docker_prefix(options: &ConnectionOptions) -> Vec<String> {
    let mut tokens = vec![options.binary.clone()];

    if let Some(socket) = non_empty(options.socket.as_deref()) {
        tokens.push(format!("-H {socket}"));
    }
    if options.tls {
        tokens.push(String::from("--tls"));
    }
    if options.tls_verify {
        tokens.push(String::from("--tlsverify"));
    }
    if let Some(path) = non_empty(options.tls_cacert.as_deref().map(Utf8Path::as_str)) {
        tokens.push(format!("--tlscacert={path}"));
    }
    if let Some(path) = non_empty(options.tls_cert.as_deref().map(Utf8Path::as_str)) {
        tokens.push(format!("--tlscert={path}"));
    }
    if let Some(path) = non_empty(options.tls_key.as_deref().map(Utf8Path::as_str)) {
        tokens.push(format!("--tlskey={path}"));
    }

    debug!("docker_command: {}", tokens.join(" "));
    tokens
}

fn exec_tokens(options: &ConnectionOptions, mode: CommandMode<'_>) -> Vec<String> {
    let mut tokens = vec![String::from("exec")];

    if options.detach {
        tokens.push(String::from("-d"));
    }
    tokens.extend(options.env_variables.iter().map(|var| format!("-e {var}")));
    if options.privileged {
        tokens.push(String::from("--privileged"));
    }
    if options.tty {
        tokens.push(String::from("-t"));
    }
    if options.interactive {
        tokens.push(String::from("-i"));
    }
    if let Some(user) = non_empty(options.username.as_deref()) {
        tokens.push(format!("-u {user}"));
    }
    if let Some(dir) = non_empty(options.working_dir.as_deref()) {
        tokens.push(format!("-w {dir}"));
    }
    tokens.push(options.container_id.clone());

    match mode {
        CommandMode::Execute(command) => tokens.push(String::from(command)),
        CommandMode::Interpreted {
            interpreter,
            script,
        } => {
            tokens.extend(interpreter.iter().map(|part| String::from(*part)));
            tokens.push(String::from(script));
        }
        CommandMode::Login => tokens.extend(LOGIN_SHELL.iter().map(|part| String::from(*part))),
    }

    tokens
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|inner| !inner.is_empty())
}

/// Split `-u kitchen` into `-u` and `kitchen`.
///
/// `--flag=value` tokens are never split, even when the value has spaces.
fn split_option(token: &str) -> Vec<String> {
    match token.split_once(' ') {
        Some((flag, value)) if !flag.contains('=') => vec![String::from(flag), String::from(value)],
        _ => vec![String::from(token)],
    }
}
