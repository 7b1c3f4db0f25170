//! CLI output formatting.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::config::PiConfig;
use crate::error::PiResult;

/// Summarise the effective parameters, one per line.
#[must_use]
pub fn format_config_summary(config: &PiConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Radius:          {}", config.radius());
    let _ = writeln!(out, "  Pebble offset:   {}", config.offset());
    let _ = writeln!(
        out,
        "  Throws:          {} configured, {} thrown",
        config.trial_count(),
        config.effective_trials()
    );
    let _ = writeln!(out, "  Report every:    {}", config.report_interval());
    let _ = writeln!(
        out,
        "  Visualization:   {}",
        if config.enable_visualization() {
            format!(
                "on (redraw every {}, hold {}s)",
                config.render_interval(),
                config.visualization.hold_secs
            )
        } else {
            "off".to_string()
        }
    );
    let _ = writeln!(
        out,
        "  Seed:            {}",
        config
            .seed()
            .map_or_else(|| "from entropy".to_string(), |s| s.to_string())
    );
    out
}

/// Write the run banner.
///
/// # Errors
///
/// Returns error if `out` fails, e.g. a closed pipe.
pub fn write_banner<W: Write>(out: &mut W, config: &PiConfig, seed: u64) -> io::Result<()> {
    writeln!(
        out,
        "pebble-pi {} - throwing pebbles at a circle",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(
        out,
        "radius {}, offset {}, {} throws, seed {seed}\n",
        config.radius(),
        config.offset(),
        config.effective_trials()
    )?;
    out.flush()
}

/// Print the default configuration as YAML.
///
/// # Errors
///
/// Returns error if serialization or writing to stdout fails.
pub fn print_defaults() -> PiResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", PiConfig::default().to_yaml()?)?;
    stdout.flush()?;
    Ok(())
}
