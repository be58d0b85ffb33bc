//! Logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 4] = ["taxo", "taxo_model", "taxo_ontology", "taxo_compiler"];

/// The default filter directive: `info` for the taxo crates, or `debug`
/// when `verbose`; `warn` for everything else.
#[must_use]
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directive = String::from("warn");
    for name in CRATES {
        directive.push_str(&format!(",{name}={level}"));
    }
    directive
}

/// Installs a compact stderr subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_every_crate() {
        assert_eq!(
            default_directive(false),
            "warn,taxo=info,taxo_model=info,taxo_ontology=info,taxo_compiler=info"
        );
        assert!(default_directive(true).contains("taxo_compiler=debug"));
    }
}
