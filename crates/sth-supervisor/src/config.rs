//! Supervisor configuration: runtime paths, process specs, timeouts.
//!
//! Every path is derived once from the persistent root and is identical on
//! all nodes. The values live on the supervisor instance rather than as
//! process-wide globals so independent test runs can coexist.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default persistent root on every node.
pub const DEFAULT_PERSISTENT_ROOT: &str = "/mnt/streams";

/// Literal the launched process writes to stdout once initialization
/// completes.
pub const STARTUP_MARKER: &str = "StreamsTest instance started";

/// Default window for the startup marker to appear.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Default per-pid window for clean-shutdown exit.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Default harness-level wait for a process group to finish on its own.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(360);

const SMOKE_TEST_CLASS: &str = "org.apache.kafka.streams.tests.StreamsSmokeTest";
const BROKER_COMPAT_CLASS: &str = "org.apache.kafka.streams.tests.BrokerCompatibilityTest";

/// Fixed per-node file layout under the persistent root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimePaths {
    pub root: PathBuf,
    /// Normal log4j logs via a file appender; stdout and stderr are
    /// captured separately.
    pub log_file: PathBuf,
    pub stdout_file: PathBuf,
    pub stderr_file: PathBuf,
    pub log_config_file: PathBuf,
    pub pid_file: PathBuf,
}

impl RuntimePaths {
    /// Derive the fixed layout under `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            log_file: root.join("streams.log"),
            stdout_file: root.join("streams.stdout"),
            stderr_file: root.join("streams.stderr"),
            log_config_file: root.join("tools-log4j.properties"),
            pid_file: root.join("streams.pid"),
            root,
        }
    }

    /// Files an external log collector should fetch from each node.
    pub fn log_manifest(&self) -> Vec<LogManifestEntry> {
        vec![
            LogManifestEntry {
                name: "streams_log",
                path: self.log_file.clone(),
                collect_default: true,
            },
            LogManifestEntry {
                name: "streams_stdout",
                path: self.stdout_file.clone(),
                collect_default: true,
            },
            LogManifestEntry {
                name: "streams_stderr",
                path: self.stderr_file.clone(),
                collect_default: true,
            },
        ]
    }
}

impl Default for RuntimePaths {
    fn default() -> Self {
        Self::under(DEFAULT_PERSISTENT_ROOT)
    }
}

/// One entry of the per-node log manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogManifestEntry {
    pub name: &'static str,
    pub path: PathBuf,
    pub collect_default: bool,
}

/// What to launch: logical class name plus positional arguments.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub class_name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new(class_name: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            class_name: class_name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Smoke-test driver: generates load and verifies results.
    pub fn smoke_test_driver() -> Self {
        Self::new(SMOKE_TEST_CLASS, ["run"])
    }

    /// Smoke-test job runner: processes the generated load.
    pub fn smoke_test_job_runner() -> Self {
        Self::new(SMOKE_TEST_CLASS, ["process"])
    }

    /// Shutdown-deadlock regression scenario.
    pub fn shutdown_deadlock() -> Self {
        Self::new(SMOKE_TEST_CLASS, ["close-deadlock-test"])
    }

    /// Broker compatibility probe.
    pub fn broker_compatibility() -> Self {
        Self::new(BROKER_COMPAT_CLASS, ["dummy"])
    }
}

/// Per-supervisor configuration, set once at construction.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub paths: RuntimePaths,
    /// Launcher script that runs the named class with the supplied
    /// arguments (the harness's `kafka-run-class.sh` equivalent).
    pub launcher: String,
    /// Log level for the rendered log configuration.
    pub log_level: String,
    pub startup_marker: String,
    pub startup_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub poll_interval: Duration,
}

impl SupervisorConfig {
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.paths = RuntimePaths::under(root.as_ref());
        self
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            paths: RuntimePaths::default(),
            launcher: String::new(),
            log_level: "DEBUG".to_string(),
            startup_marker: STARTUP_MARKER.to_string(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            poll_interval: Duration::from_millis(200),
        }
    }
}
