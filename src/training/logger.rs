//! Stage logging for pipeline runs.

/// How much progress output a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output.
    Silent,
    /// One line per pipeline stage.
    #[default]
    Info,
    /// Stage lines plus per-partition details.
    Debug,
}

/// Writes stage progress to stderr, gated by [`Verbosity`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineLogger {
    verbosity: Verbosity,
}

impl PipelineLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Log at `Info` level.
    pub fn info(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[shiftval] {}", message.as_ref());
        }
    }

    /// Log at `Debug` level.
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[shiftval] {}", message.as_ref());
        }
    }
}
