//! Yosys equivalence-check scripts for generated modules.
//!
//! Every generated module gets two scripts. Both read the same source twice,
//! once as `gate` and once as `gold`, build a miter between the copies and
//! ask `sat` to prove the miter's `trigger` output is always 0. The `pp`
//! variant runs `techmap -map +/adff2dff.v; opt;;` first, so the proof checks
//! that the flip-flop mapping preserved behavior.
//!
//! The command flags are consumed verbatim by the checking flow and must not
//! drift.

#![warn(missing_docs)]

use std::fmt;

use eqgen_common::GenErrorKind;

/// The flip-flop mapping pass inserted by the `pp` variant.
pub const TECHMAP_LINE: &str = "techmap -map +/adff2dff.v; opt;;";

/// The miter construction line, shared by both variants.
pub const MITER_LINE: &str =
    "miter -equiv -flatten -ignore_gold_x -make_outputs -make_outcmp gold gate miter";

/// Which reset input is pulsed in the first cycle of a sequential proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetSignal {
    /// `gold_rst`: the derived reset output of a dual-reset module.
    Gold,
    /// `in_rst`: the shared reset input of a single-reset module.
    Input,
}

impl ResetSignal {
    /// Returns the miter signal name.
    pub fn name(self) -> &'static str {
        match self {
            ResetSignal::Gold => "gold_rst",
            ResetSignal::Input => "in_rst",
        }
    }
}

/// How `sat` is asked to prove equivalence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SatMode {
    /// A single-step proof for purely combinational modules.
    Combinational,
    /// A bounded proof over `steps` cycles with a reset pulse in cycle 1.
    Sequential {
        /// Number of unrolled cycles.
        steps: u32,
        /// Reset signal driven high in the first cycle.
        reset: ResetSignal,
    },
}

/// One equivalence-check script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationScript {
    module: String,
    source_path: String,
    timeout: u32,
    mode: SatMode,
    techmap: bool,
}

impl VerificationScript {
    /// Returns `true` for the variant that maps flip-flops before mitering.
    pub fn is_techmapped(&self) -> bool {
        self.techmap
    }

    /// Renders the `sat` invocation.
    fn sat_line(&self) -> String {
        match self.mode {
            SatMode::Combinational => format!(
                "sat -verify-no-timeout -timeout {} -prove trigger 0 -show-inputs -show-outputs miter",
                self.timeout
            ),
            SatMode::Sequential { steps, reset } => format!(
                "sat -verify-no-timeout -timeout {} -seq {} -set-at 1 {} 1 -prove trigger 0 -prove-skip 1 -show-inputs -show-outputs miter",
                self.timeout,
                steps,
                reset.name()
            ),
        }
    }
}

impl fmt::Display for VerificationScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rename {} gate", self.module)?;
        writeln!(f, "read_verilog {}", self.source_path)?;
        writeln!(f, "rename {} gold", self.module)?;
        writeln!(f, "hierarchy; proc;;")?;
        if self.techmap {
            writeln!(f, "{TECHMAP_LINE}")?;
        }
        writeln!(f, "{MITER_LINE}")?;
        writeln!(f, "{}", self.sat_line())
    }
}

/// The plain and technology-mapped scripts for one module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptPair {
    /// The script checked into `uut_<idx>.ys`.
    pub plain: VerificationScript,
    /// The script checked into `uut_<idx>_pp.ys`.
    pub pp: VerificationScript,
}

impl ScriptPair {
    /// Builds both scripts for `module`, whose source is read from `source_path`.
    pub fn build(
        module: &str,
        source_path: &str,
        timeout: u32,
        mode: SatMode,
    ) -> Result<Self, GenErrorKind> {
        if module.is_empty() {
            return Err(GenErrorKind::InvalidScript("empty module name"));
        }
        if source_path.is_empty() {
            return Err(GenErrorKind::InvalidScript("empty source path"));
        }
        if timeout == 0 {
            return Err(GenErrorKind::InvalidScript("zero sat timeout"));
        }
        if let SatMode::Sequential { steps: 0, .. } = mode {
            return Err(GenErrorKind::InvalidScript("zero unrolled cycles"));
        }

        let plain = VerificationScript {
            module: module.to_string(),
            source_path: source_path.to_string(),
            timeout,
            mode,
            techmap: false,
        };
        let pp = VerificationScript {
            techmap: true,
            ..plain.clone()
        };
        Ok(Self { plain, pp })
    }
}

/// Joins a script-side source directory and file name with `/`.
///
/// Scripts are interpreted by yosys, so the separator is fixed regardless of
/// the host platform.
pub fn script_source_path(source_dir: &str, file_name: &str) -> String {
    if source_dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", source_dir.trim_end_matches('/'), file_name)
    }
}
