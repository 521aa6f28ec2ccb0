//! Module assembly and rendering.

use std::fmt;

use eqgen_common::{module_name, GenErrorKind, GenResult, GenRng, Stage, VarPool};
use eqgen_config::CombConfig;
use rand::Rng;

use crate::term::{random_term, Term};
use crate::wire::TempWire;

/// The drawn dimensions of a combinational module.
///
/// `inputs` and `outputs` count the ports beyond the first one, so a module
/// declares `inputs + 1` inputs (`i0..=i<inputs>`) and `outputs + 1`
/// outputs (`o0..=o<outputs>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombShape {
    /// Highest input index.
    pub inputs: u32,
    /// Highest output index.
    pub outputs: u32,
    /// Number of intermediate wires.
    pub temps: u32,
}

impl CombShape {
    /// Draws a shape within the configured bounds.
    pub fn random(rng: &mut GenRng, cfg: &CombConfig) -> Self {
        let ports = cfg.port_range();
        let inputs = rng.gen_range(ports.min..=ports.max);
        let outputs = rng.gen_range(ports.min..=ports.max);
        let temps = rng.gen_range(cfg.temps.min..=cfg.temps.max);
        Self {
            inputs,
            outputs,
            temps,
        }
    }
}

/// A generated combinational module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombModule {
    name: String,
    shape: CombShape,
    temps: Vec<TempWire>,
    assigns: Vec<Term>,
}

impl CombModule {
    /// Returns the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the drawn dimensions.
    pub fn shape(&self) -> CombShape {
        self.shape
    }

    /// Returns the input port names in declaration order.
    pub fn input_names(&self) -> Vec<String> {
        (0..=self.shape.inputs).map(|i| format!("i{i}")).collect()
    }

    /// Returns the output port names in declaration order.
    pub fn output_names(&self) -> Vec<String> {
        (0..=self.shape.outputs).map(|i| format!("o{i}")).collect()
    }

    /// Returns the intermediate wires in declaration order.
    pub fn temps(&self) -> &[TempWire] {
        &self.temps
    }

    /// Returns the output driving terms, `o0` first.
    pub fn assigns(&self) -> &[Term] {
        &self.assigns
    }
}

impl fmt::Display for CombModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {}(", self.name)?;
        let inputs = self.input_names().into_iter().map(|n| format!("input {n}"));
        let outputs = self.output_names().into_iter().map(|n| format!("output {n}"));
        let ports: Vec<String> = inputs.chain(outputs).collect();
        writeln!(f, "{});", ports.join(", "))?;
        for wire in &self.temps {
            writeln!(f, "  {wire}")?;
        }
        for (i, term) in self.assigns.iter().enumerate() {
            writeln!(f, "  assign o{i} = {term};")?;
        }
        writeln!(f, "endmodule")
    }
}

/// Draws a shape and generates module number `index`.
pub fn generate(rng: &mut GenRng, index: usize, cfg: &CombConfig) -> GenResult<CombModule> {
    check_config(cfg).map_err(|kind| kind.at(index, Stage::ModuleSynthesis))?;
    let shape = CombShape::random(rng, cfg);
    generate_with_shape(rng, index, shape, cfg)
}

/// Generates module number `index` with fixed dimensions.
pub fn generate_with_shape(
    rng: &mut GenRng,
    index: usize,
    shape: CombShape,
    cfg: &CombConfig,
) -> GenResult<CombModule> {
    let name = module_name(index);
    log::debug!(
        "{name}: {} inputs, {} outputs, {} temps",
        shape.inputs + 1,
        shape.outputs + 1,
        shape.temps
    );
    check_config(cfg)
        .and_then(|()| build(rng, name, shape, cfg))
        .map_err(|kind| kind.at(index, Stage::ModuleSynthesis))
}

/// Rejects settings under which a draw would be impossible.
///
/// Every range must be non-empty, and concatenations, clauses and terms need
/// at least one element to render as Verilog.
fn check_config(cfg: &CombConfig) -> Result<(), GenErrorKind> {
    let ranges = [
        (cfg.port_range(), 0, "comb port range (min_ports to pins / 2) is empty"),
        (cfg.temps, 0, "comb.temps is empty"),
        (cfg.concat_width, 1, "comb.concat_width must be non-empty and at least 1"),
        (cfg.literals, 1, "comb.literals must be non-empty and at least 1"),
        (cfg.clauses, 1, "comb.clauses must be non-empty and at least 1"),
    ];
    for (range, floor, what) in ranges {
        if !range.is_valid() || range.min < floor {
            return Err(GenErrorKind::InvalidSetting(what));
        }
    }
    Ok(())
}

fn build(
    rng: &mut GenRng,
    name: String,
    shape: CombShape,
    cfg: &CombConfig,
) -> Result<CombModule, GenErrorKind> {
    let mut pool: VarPool = (0..=shape.inputs).map(|i| format!("i{i}")).collect();

    let mut temps = Vec::with_capacity(shape.temps as usize);
    for i in 0..shape.temps as usize {
        let wire = TempWire::random(rng, i, &pool, cfg)?;
        for var in wire.pool_names() {
            pool.push(var);
        }
        temps.push(wire);
    }

    let assigns = (0..=shape.outputs)
        .map(|_| random_term(rng, &pool, cfg))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CombModule {
        name,
        shape,
        temps,
        assigns,
    })
}
