// file: src/utils/logging.rs
// description: tracing subscriber setup and colored cli output helpers
// reference: https://docs.rs/tracing-subscriber

use colored::*;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn fallback_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO }
}

/// Installs the global subscriber. Directives in `RUST_LOG` replace the
/// fallback level entirely; unparsable ones are skipped.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(fallback_level(verbose).into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    colored::control::set_override(colored_output);
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}
