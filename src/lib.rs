//! Docker CLI transport for test orchestration.
//!
//! `dockhand` lets a test orchestrator run commands and copy files inside a
//! running container, either through the local Docker daemon socket or a
//! remote TCP/TLS endpoint. Every operation is a Docker CLI invocation built
//! from a per-session [`engine::ConnectionOptions`] snapshot, with separate
//! behaviour for Linux and Windows containers.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Command building, container variants, connections, and the transport factory
//! - [`error`]: Semantic error types for the application

pub mod config;
pub mod engine;
pub mod error;
