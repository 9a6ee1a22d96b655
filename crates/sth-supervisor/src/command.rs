//! Start-command construction and log-config rendering.
//!
//! The launch is a single composite shell line: export the log-config
//! environment variable, background the launcher with the injected
//! bootstrap/state-dir arguments, append stdout and stderr to their fixed
//! files, and capture the shell-reported pid into the pid file through file
//! descriptor 3.

use crate::config::{ProcessSpec, RuntimePaths, SupervisorConfig};

/// Build the composite start command for one node.
pub fn start_cmd(config: &SupervisorConfig, spec: &ProcessSpec, bootstrap_servers: &str) -> String {
    let paths = &config.paths;
    let user_args = spec.args.join(" ");

    format!(
        "( export KAFKA_LOG4J_OPTS=\"-Dlog4j.configuration=file:{log_config}\"; \
INCLUDE_TEST_JARS=true {launcher} {class} {bootstrap} {state_dir} {user_args} \
& echo $! >&3 ) 1>> {stdout} 2>> {stderr} 3> {pid_file}",
        log_config = paths.log_config_file.display(),
        launcher = config.launcher,
        class = spec.class_name,
        bootstrap = bootstrap_servers,
        state_dir = paths.root.display(),
        user_args = user_args,
        stdout = paths.stdout_file.display(),
        stderr = paths.stderr_file.display(),
        pid_file = paths.pid_file.display(),
    )
}

/// Render the log configuration written to the node before launch.
///
/// Template rendering proper is an external concern; this is the minimal
/// built-in rendering of the tools config with the combined log file wired
/// into a file appender.
pub fn render_log_config(paths: &RuntimePaths, log_level: &str) -> String {
    format!(
        "log4j.rootLogger={level}, FILE\n\
\n\
log4j.appender.FILE=org.apache.log4j.FileAppender\n\
log4j.appender.FILE.File={log_file}\n\
log4j.appender.FILE.ImmediateFlush=true\n\
log4j.appender.FILE.append=true\n\
log4j.appender.FILE.layout=org.apache.log4j.PatternLayout\n\
log4j.appender.FILE.layout.conversionPattern=[%d] %p %m (%c)%n\n",
        level = log_level,
        log_file = paths.log_file.display(),
    )
}
