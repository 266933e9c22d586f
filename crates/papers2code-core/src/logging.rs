//! Log output for the CLI, kept out of the way of the loading spinner

use indicatif::MultiProgress;

const RESET: &str = "\x1b[0m";

/// Fixed-width level tag and its terminal color.
fn level_tag(level: log::Level) -> (&'static str, &'static str) {
    match level {
        log::Level::Error => ("ERROR", "\x1b[31m"),
        log::Level::Warn => ("WARN ", "\x1b[33m"),
        log::Level::Info => ("INFO ", "\x1b[32m"),
        log::Level::Debug => ("DEBUG", "\x1b[36m"),
        log::Level::Trace => ("TRACE", "\x1b[35m"),
    }
}

/// Module name for our own crates (`papers2code_client::fetcher` -> `fetcher`),
/// crate name for dependencies (`hyper_util::client` -> `hyper_util`).
fn short_target(target: &str) -> &str {
    let root = target.split("::").next().unwrap_or(target);
    if root.starts_with("papers2code") {
        target.rsplit("::").next().unwrap_or(root)
    } else {
        root
    }
}

/// One log line: `[LEVEL module] message`.
fn render(record: &log::Record, color: bool) -> String {
    let (tag, ansi) = level_tag(record.level());
    let target = short_target(record.target());
    if color {
        format!("[{ansi}{tag}{RESET} {target}] {}", record.args())
    } else {
        format!("[{tag} {target}] {}", record.args())
    }
}

/// Prints records above the `MultiProgress` bars instead of through them.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.matches(record) {
            let line = render(record, true);
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn default_level(quiet: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Install the global logger. `RUST_LOG` wins over `quiet`/`debug`.
///
/// Pass `multi` on a terminal so spinners survive log output. Calling this
/// twice keeps the first logger.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(default_level(quiet, debug));

    let Some(multi) = multi else {
        let result = env_logger::Builder::from_env(env)
            .format(|buf, record| writeln!(buf, "{}", render(record, false)))
            .try_init();
        if let Err(e) = result {
            eprintln!("logger already initialized: {e}");
        }
        return;
    };

    let logger = env_logger::Builder::from_env(env).build();
    let max_level = logger.filter();
    match log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone()))) {
        Ok(()) => log::set_max_level(max_level),
        Err(e) => eprintln!("logger already initialized: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_flags() {
        assert_eq!(default_level(false, false), "info");
        assert_eq!(default_level(true, false), "warn");
        assert_eq!(default_level(true, true), "debug");
    }

    #[test]
    fn targets_are_shortened() {
        assert_eq!(short_target("papers2code_client::fetcher"), "fetcher");
        assert_eq!(short_target("papers2code"), "papers2code");
        assert_eq!(short_target("hyper_util::client::legacy"), "hyper_util");
        assert_eq!(short_target("reqwest"), "reqwest");
    }

    fn fetcher_line(color: bool) -> String {
        render(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("papers2code_client::fetcher")
                .args(format_args!("Fetching page {}", 2))
                .build(),
            color,
        )
    }

    #[test]
    fn plain_and_colored_lines() {
        assert_eq!(fetcher_line(false), "[DEBUG fetcher] Fetching page 2");

        let colored = fetcher_line(true);
        assert!(colored.starts_with("[\x1b[36mDEBUG\x1b[0m fetcher]"));
        assert!(colored.ends_with("Fetching page 2"));
    }
}
