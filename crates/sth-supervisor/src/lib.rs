//! # STH Supervisor
//!
//! Drives one external test process per node through its full lifecycle:
//! deploy, start, readiness, liveness, clean or forced stop, and reset.
//!
//! The supervisor is a single parameterized type: the streams test variants
//! (smoke-test driver, job runner, shutdown-deadlock, broker compatibility)
//! differ only in process class and argument list, so they are modeled as
//! [`ProcessSpec`] presets rather than a type hierarchy.
//!
//! All node effects go through the `sth-remote` shell channel; the cluster
//! under test is reached only through [`BootstrapProvider`].

pub mod command;
pub mod config;
pub mod supervisor;


pub use command::{render_log_config, start_cmd};
pub use config::{LogManifestEntry, ProcessSpec, RuntimePaths, SupervisorConfig};
pub use supervisor::{BootstrapProvider, StaticBootstrap, StreamsSupervisor};
