//! File input/output.

pub mod text;
pub mod utils;
pub mod vti;

use indicatif::{ProgressBar, ProgressStyle};

/// Floating-point precision of field data read from and written to file.
#[allow(non_camel_case_types)]
pub type fdt = f64;

/// How much non-critical information to print.
#[derive(Clone)]
pub enum Verbosity {
    /// Print nothing.
    Quiet,
    /// Print status messages.
    Messages,
    /// Print status messages and show progress bars with the given style.
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Whether progress bars should be shown.
    pub fn show_progress(&self) -> bool {
        matches!(self, Self::Progress(_))
    }

    /// Creates a progress bar for the given number of items, hidden unless
    /// progress should be shown.
    pub fn create_progress_bar(&self, size: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => ProgressBar::new(size as u64).with_style(style.clone()),
            _ => ProgressBar::hidden(),
        }
    }
}

/// Whether existing files may be replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverwriteMode {
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_verbosity_implies_messages() {
        let progress = Verbosity::Progress(ProgressStyle::default_bar());
        assert!(progress.clone().print_messages());
        assert!(progress.show_progress());
        assert!(Verbosity::Messages.print_messages());
        assert!(!Verbosity::Messages.show_progress());
        assert!(!Verbosity::Quiet.print_messages());
        assert!(Verbosity::Quiet.create_progress_bar(10).is_hidden());
    }
}
