//! Error and result types for module and script generation.

use std::fmt;

/// The standard result type for a generation pass.
pub type GenResult<T> = Result<T, GenError>;

/// The generation stage that was running when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Drawing and rendering the HDL module.
    ModuleSynthesis,
    /// Building the verification scripts for a module.
    ScriptSynthesis,
    /// Writing one of the output files.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ModuleSynthesis => "module synthesis",
            Stage::ScriptSynthesis => "script synthesis",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// What went wrong, independent of which module was being generated.
#[derive(Debug, thiserror::Error)]
pub enum GenErrorKind {
    /// A random pick was requested from an empty variable pool.
    #[error("variable pool is empty")]
    EmptyPool,

    /// A state machine ended up with no state encodings.
    #[error("state set is empty")]
    EmptyStateSet,

    /// A random pick was requested from an empty candidate list.
    #[error("no candidates to choose {0} from")]
    EmptyChoice(&'static str),

    /// A generator knob would make a draw impossible, e.g. an inverted range.
    #[error("unusable generator setting: {0}")]
    InvalidSetting(&'static str),

    /// A verification script was requested with an unusable setting.
    #[error("invalid script setting: {0}")]
    InvalidScript(&'static str),

    /// An output file could not be created or written.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl GenErrorKind {
    /// Attaches the module index and stage to this error.
    pub fn at(self, index: usize, stage: Stage) -> GenError {
        GenError {
            index,
            stage,
            kind: self,
        }
    }
}

/// A generation failure, identifying the module index and the stage.
#[derive(Debug, thiserror::Error)]
#[error("uut_{index:05}: {stage} failed: {kind}")]
pub struct GenError {
    /// Index of the module being generated.
    pub index: usize,
    /// Stage that failed.
    pub stage: Stage,
    /// Underlying cause.
    #[source]
    pub kind: GenErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_module_and_stage() {
        let err = GenErrorKind::EmptyPool.at(7, Stage::ModuleSynthesis);
        assert_eq!(
            format!("{err}"),
            "uut_00007: module synthesis failed: variable pool is empty"
        );
    }

    #[test]
    fn display_empty_choice() {
        let err = GenErrorKind::EmptyChoice("next state").at(12, Stage::ModuleSynthesis);
        assert_eq!(
            format!("{err}"),
            "uut_00012: module synthesis failed: no candidates to choose next state from"
        );
    }

    #[test]
    fn display_invalid_setting() {
        let err = GenErrorKind::InvalidSetting("comb.temps is empty").at(0, Stage::ModuleSynthesis);
        assert_eq!(
            format!("{err}"),
            "uut_00000: module synthesis failed: unusable generator setting: comb.temps is empty"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = GenErrorKind::from(io_err).at(3, Stage::Write);
        assert_eq!(err.stage, Stage::Write);
        assert!(format!("{err}").starts_with("uut_00003: write failed:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::ScriptSynthesis.to_string(), "script synthesis");
        assert_eq!(Stage::Write.to_string(), "write");
    }
}
