//! # Output Styling
//!
//! Decides whether CLI output is colored and renders the few styled pieces
//! the commands print: vendor kinds and status markers.
//!
//! Color is controlled by `--color=auto|always|never`. In `auto` mode it is
//! turned off by `NO_COLOR` (any value), `CLICOLOR=0`, `TERM=dumb`, or a
//! stdout that is not a color-capable terminal; `CLICOLOR_FORCE=1` turns it
//! back on for non-terminals.

use std::env;

use clap::ValueEnum;
use console::style;

use crate::project::ProjectKind;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => detect_color_support(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Render a vendor kind, colored when enabled.
    pub fn kind(&self, kind: ProjectKind) -> String {
        let label = kind.to_string();
        if !self.use_color {
            return label;
        }
        match kind {
            ProjectKind::Git => style(label).cyan().to_string(),
            ProjectKind::Plain => style(label).yellow().to_string(),
        }
    }

    /// Marker printed before a completed action.
    pub fn done(&self) -> String {
        if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "[OK]".to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

fn detect_color_support() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}
