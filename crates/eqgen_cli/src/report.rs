//! Run reports printed after a generation pass.

use serde::Serialize;

use crate::pipeline::ModuleFiles;
use crate::{GlobalArgs, ReportFormat};

/// Dimensions drawn for one module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleShape {
    /// A combinational module.
    Combinational {
        /// Declared input ports.
        inputs: u32,
        /// Declared output ports.
        outputs: u32,
        /// Intermediate wires.
        temps: u32,
    },
    /// A state-machine module.
    Fsm {
        /// Whether the module uses `rst1`/`rst2`.
        dual_reset: bool,
        /// Width of the state register.
        state_bits: u32,
        /// Number of distinct states.
        states: usize,
    },
}

/// One generated module and its files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    /// Module index.
    pub index: usize,
    /// Module name, `uut_<idx>`.
    pub name: String,
    /// Written files.
    pub files: ModuleFiles,
    /// Drawn dimensions.
    pub shape: ModuleShape,
}

/// Summary of one generator run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// `comb` or `fsm`.
    pub generator: &'static str,
    /// Seed the run started from.
    pub seed: u64,
    /// Generated modules, in index order.
    pub modules: Vec<ModuleRecord>,
}

impl RunReport {
    /// Renders the human-readable report, one line per module.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for m in &self.modules {
            let detail = match m.shape {
                ModuleShape::Combinational {
                    inputs,
                    outputs,
                    temps,
                } => format!("{inputs} inputs, {outputs} outputs, {temps} temps"),
                ModuleShape::Fsm {
                    dual_reset,
                    state_bits,
                    states,
                } => format!(
                    "{} reset, {state_bits}-bit state, {states} states",
                    if dual_reset { "dual" } else { "single" }
                ),
            };
            out.push_str(&format!("{}  {detail}\n", m.name));
        }
        out.push_str(&format!(
            "{} {} modules generated (seed {})\n",
            self.modules.len(),
            self.generator,
            self.seed
        ));
        out
    }

    /// Prints the report to stdout in the requested format.
    ///
    /// JSON is always printed; the text form is suppressed by `--quiet`.
    pub fn print(
        &self,
        format: ReportFormat,
        global: &GlobalArgs,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match format {
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            ReportFormat::Text if !global.quiet => print!("{}", self.render_text()),
            ReportFormat::Text => {}
        }
        Ok(())
    }
}
