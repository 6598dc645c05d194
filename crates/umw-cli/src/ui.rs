//! Terminal preferences detected once per run and read by the table renderer.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

/// Narrower terminals fall back to unconstrained column widths.
const MIN_TERM_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let prefs = detect(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    );
    let _ = UI_PREFS.set(prefs);
}

/// Preferences from `init`, or plain output when it never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}

fn detect(flags: &GlobalFlags, is_tty: bool, no_color: bool, columns: Option<&str>) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = table
        && match flags.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_tty && !flags.quiet && !no_color,
        };
    let term_width = columns
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width >= MIN_TERM_WIDTH);
    UiPrefs {
        table_color,
        term_width,
    }
}
