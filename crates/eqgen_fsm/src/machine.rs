//! State-machine assembly and rendering.

use std::fmt;

use eqgen_common::{coin, module_name, pick, GenErrorKind, GenResult, GenRng, Stage, VarPool};
use eqgen_config::FsmConfig;
use rand::Rng;

use crate::expr::{max_value, random_expr, Expr};
use crate::signal::{Direction, Signal, SIGNAL_NAMES};

/// How the module is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetTopology {
    /// A single `rst` input.
    Single,
    /// Inputs `rst1` and `rst2`, with `rst = rst1 || rst2` exposed as an output.
    ///
    /// `rst1` gates the reset branch; `rst2` reloads the registers after the
    /// `case`, overriding any transition taken in the same cycle.
    Dual,
}

impl ResetTopology {
    /// Draws a topology with a fair coin.
    pub fn random(rng: &mut GenRng) -> Self {
        if coin(rng) {
            ResetTopology::Dual
        } else {
            ResetTopology::Single
        }
    }

    /// Returns `true` for [`ResetTopology::Dual`].
    pub fn is_dual(self) -> bool {
        self == ResetTopology::Dual
    }
}

/// Synthesis hint attached to the state register. Cosmetic only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateEncoding {
    /// No attribute.
    Unannotated,
    /// `(* fsm_encoding = "one-hot" *)`
    OneHot,
    /// `(* fsm_encoding = "binary" *)`
    Binary,
}

impl StateEncoding {
    const ALL: [StateEncoding; 3] = [
        StateEncoding::Unannotated,
        StateEncoding::OneHot,
        StateEncoding::Binary,
    ];

    /// Returns the attribute prefix, with a trailing space, or an empty string.
    pub fn attribute(self) -> &'static str {
        match self {
            StateEncoding::Unannotated => "",
            StateEncoding::OneHot => "(* fsm_encoding = \"one-hot\" *) ",
            StateEncoding::Binary => "(* fsm_encoding = \"binary\" *) ",
        }
    }
}

/// Relational operator of a transition guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl GuardOp {
    const ALL: [GuardOp; 4] = [GuardOp::Lt, GuardOp::Le, GuardOp::Ge, GuardOp::Gt];

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            GuardOp::Lt => "<",
            GuardOp::Le => "<=",
            GuardOp::Ge => ">=",
            GuardOp::Gt => ">",
        }
    }
}

/// A guarded transition `if ((lhs) op (rhs)) state <= target;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guard {
    /// Left comparison operand.
    pub lhs: Expr,
    /// Comparison operator.
    pub op: GuardOp,
    /// Right comparison operand.
    pub rhs: Expr,
    /// State entered when the guard holds.
    pub target: u64,
}

/// One arm of the state `case`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseArm {
    /// State value selecting this arm.
    pub state: u64,
    /// Next values of `x`, `y`, `z`, in that order.
    pub updates: [Expr; 3],
    /// Transitions, each to a distinct target state.
    pub guards: Vec<Guard>,
}

/// Register loads performed by the reset branch.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ResetLoads {
    values: [u64; 3],
    state: u64,
}

/// A generated state-machine module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsmModule {
    name: String,
    topology: ResetTopology,
    signals: Vec<Signal>,
    state_bits: u32,
    encoding: StateEncoding,
    states: Vec<u64>,
    reset: ResetLoads,
    arms: Vec<CaseArm>,
    rst2_state: Option<u64>,
}

impl FsmModule {
    /// Returns the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reset topology.
    pub fn topology(&self) -> ResetTopology {
        self.topology
    }

    /// Returns the six data signals in port order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Returns the width of the state register.
    pub fn state_bits(&self) -> u32 {
        self.state_bits
    }

    /// Returns the state register's encoding hint.
    pub fn encoding(&self) -> StateEncoding {
        self.encoding
    }

    /// Returns the distinct state values, in draw order.
    pub fn states(&self) -> &[u64] {
        &self.states
    }

    /// Returns the `case` arms, one per state.
    pub fn arms(&self) -> &[CaseArm] {
        &self.arms
    }

    /// Returns the state loaded by the reset branch.
    pub fn reset_state(&self) -> u64 {
        self.reset.state
    }

    /// Returns the state loaded by the secondary `rst2` branch, if any.
    pub fn rst2_state(&self) -> Option<u64> {
        self.rst2_state
    }

    /// Returns the port list in header order.
    pub fn port_names(&self) -> Vec<String> {
        let resets: &[&str] = match self.topology {
            ResetTopology::Single => &["clk", "rst"],
            ResetTopology::Dual => &["clk", "rst1", "rst2", "rst"],
        };
        let mut ports: Vec<String> = resets.iter().map(|p| p.to_string()).collect();
        for signal in &self.signals {
            ports.extend(signal.bit_names());
        }
        ports
    }

    fn signals_in(&self, direction: Direction) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.direction == direction)
    }
}

impl fmt::Display for FsmModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {}({});", self.name, self.port_names().join(", "))?;
        match self.topology {
            ResetTopology::Dual => {
                writeln!(f, "  input clk, rst1, rst2;")?;
                writeln!(f, "  output rst;")?;
                writeln!(f, "  assign rst = rst1 || rst2;")?;
            }
            ResetTopology::Single => writeln!(f, "  input clk, rst;")?,
        }

        for s in self.signals_in(Direction::Output) {
            writeln!(f, "  {} {};", s.vector_decl(), s.name)?;
        }
        for s in self.signals_in(Direction::Input) {
            for bit in s.bit_names() {
                writeln!(f, "  input {bit};")?;
            }
        }
        for s in self.signals_in(Direction::Output) {
            for (i, bit) in s.bit_names().iter().enumerate() {
                writeln!(f, "  output {bit} = {}[{i}];", s.name)?;
            }
        }
        for s in self.signals_in(Direction::Input) {
            writeln!(f, "  {} {} = {};", s.vector_decl(), s.name, s.concat())?;
        }
        writeln!(
            f,
            "  {}reg [{}:0] state;",
            self.encoding.attribute(),
            self.state_bits - 1
        )?;

        let reset = match self.topology {
            ResetTopology::Single => "rst",
            ResetTopology::Dual => "rst1",
        };
        writeln!(f, "  always @(posedge clk) begin")?;
        writeln!(f, "    if ({reset}) begin")?;
        for (reg, value) in ["x", "y", "z"].iter().zip(self.reset.values) {
            writeln!(f, "      {reg} <= {value};")?;
        }
        writeln!(f, "      state <= {};", self.reset.state)?;
        writeln!(f, "    end else begin")?;
        writeln!(f, "      case (state)")?;
        for arm in &self.arms {
            writeln!(f, "        {}: begin", arm.state)?;
            for (reg, expr) in ["x", "y", "z"].iter().zip(&arm.updates) {
                writeln!(f, "            {reg} <= {expr};")?;
            }
            for g in &arm.guards {
                writeln!(
                    f,
                    "            if (({}) {} ({})) state <= {};",
                    g.lhs,
                    g.op.symbol(),
                    g.rhs,
                    g.target
                )?;
            }
            writeln!(f, "          end")?;
        }
        writeln!(f, "      endcase")?;
        if let Some(state) = self.rst2_state {
            writeln!(f, "      if (rst2) begin")?;
            writeln!(f, "        x <= a;")?;
            writeln!(f, "        y <= b;")?;
            writeln!(f, "        z <= c;")?;
            writeln!(f, "        state <= {state};")?;
            writeln!(f, "      end")?;
        }
        writeln!(f, "    end")?;
        writeln!(f, "  end")?;
        writeln!(f, "endmodule")
    }
}

/// Draws a reset topology and generates module number `index`.
pub fn generate(rng: &mut GenRng, index: usize, cfg: &FsmConfig) -> GenResult<FsmModule> {
    let topology = ResetTopology::random(rng);
    generate_with_topology(rng, index, topology, cfg)
}

/// Generates module number `index` with a fixed reset topology.
pub fn generate_with_topology(
    rng: &mut GenRng,
    index: usize,
    topology: ResetTopology,
    cfg: &FsmConfig,
) -> GenResult<FsmModule> {
    let module = check_config(cfg)
        .and_then(|()| build(rng, module_name(index), topology, cfg))
        .map_err(|kind| kind.at(index, Stage::ModuleSynthesis))?;
    log::debug!(
        "{}: {:?} reset, {}-bit state, {} states",
        module.name,
        module.topology,
        module.state_bits,
        module.states.len()
    );
    Ok(module)
}

/// Widest state register, constant or reset value that can be drawn.
const MAX_VALUE_BITS: u32 = 32;

/// Rejects settings under which a draw would be impossible.
fn check_config(cfg: &FsmConfig) -> Result<(), GenErrorKind> {
    if !cfg.signal_msb.is_valid() {
        return Err(GenErrorKind::InvalidSetting("fsm.signal_msb is empty"));
    }
    if !cfg.state_draws.is_valid() {
        return Err(GenErrorKind::InvalidSetting("fsm.state_draws is empty"));
    }
    let widths = [
        (cfg.state_bits, "fsm.state_bits must lie within [1, 32]"),
        (cfg.const_bits, "fsm.const_bits must lie within [1, 32]"),
    ];
    for (range, what) in widths {
        if !range.is_valid() || range.min == 0 || range.max > MAX_VALUE_BITS {
            return Err(GenErrorKind::InvalidSetting(what));
        }
    }
    if !(1..=MAX_VALUE_BITS).contains(&cfg.reset_value_bits) {
        return Err(GenErrorKind::InvalidSetting(
            "fsm.reset_value_bits must lie within [1, 32]",
        ));
    }
    Ok(())
}

fn build(
    rng: &mut GenRng,
    name: String,
    topology: ResetTopology,
    cfg: &FsmConfig,
) -> Result<FsmModule, GenErrorKind> {
    let msbs: Vec<u32> = SIGNAL_NAMES
        .iter()
        .map(|_| rng.gen_range(cfg.signal_msb.min..=cfg.signal_msb.max))
        .collect();
    // Register signedness is drawn before wire signedness.
    let mut signed = [false; 6];
    for s in signed.iter_mut().skip(3) {
        *s = coin(rng);
    }
    for s in signed.iter_mut().take(3) {
        *s = coin(rng);
    }
    let signals: Vec<Signal> = SIGNAL_NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| Signal {
            name,
            msb: msbs[i],
            signed: signed[i],
            direction: if i < 3 {
                Direction::Input
            } else {
                Direction::Output
            },
        })
        .collect();

    let state_bits = rng.gen_range(cfg.state_bits.min..=cfg.state_bits.max);
    let encoding = *pick(rng, &StateEncoding::ALL, "state encoding")?;
    let states = random_states(rng, state_bits, cfg)?;

    let reset_max = max_value(cfg.reset_value_bits);
    let values = [
        rng.gen_range(0..=reset_max),
        rng.gen_range(0..=reset_max),
        rng.gen_range(0..=reset_max),
    ];
    let reset = ResetLoads {
        values,
        state: *pick(rng, &states, "reset state")?,
    };

    let vars: VarPool = SIGNAL_NAMES.into_iter().collect();
    let arms = states
        .iter()
        .map(|&state| random_arm(rng, state, &states, &vars, cfg))
        .collect::<Result<Vec<_>, _>>()?;

    let rst2_state = match topology {
        ResetTopology::Dual => Some(*pick(rng, &states, "rst2 state")?),
        ResetTopology::Single => None,
    };

    Ok(FsmModule {
        name,
        topology,
        signals,
        state_bits,
        encoding,
        states,
        reset,
        arms,
        rst2_state,
    })
}

/// Draws state values, discarding duplicates.
fn random_states(
    rng: &mut GenRng,
    state_bits: u32,
    cfg: &FsmConfig,
) -> Result<Vec<u64>, GenErrorKind> {
    let draws = rng.gen_range(cfg.state_draws.min..=cfg.state_draws.max);
    let mut states = Vec::with_capacity(draws as usize);
    for _ in 0..draws {
        let n = rng.gen_range(0..=max_value(state_bits));
        if !states.contains(&n) {
            states.push(n);
        }
    }
    if states.is_empty() {
        return Err(GenErrorKind::EmptyStateSet);
    }
    Ok(states)
}

fn random_arm(
    rng: &mut GenRng,
    state: u64,
    states: &[u64],
    vars: &VarPool,
    cfg: &FsmConfig,
) -> Result<CaseArm, GenErrorKind> {
    let updates = [
        random_expr(rng, vars, cfg)?,
        random_expr(rng, vars, cfg)?,
        random_expr(rng, vars, cfg)?,
    ];

    let n_guards = rng.gen_range(0..=states.len());
    let mut candidates = states.to_vec();
    let mut guards = Vec::with_capacity(n_guards);
    for _ in 0..n_guards {
        if candidates.is_empty() {
            return Err(GenErrorKind::EmptyChoice("next state"));
        }
        let target = candidates.remove(rng.gen_range(0..candidates.len()));
        let lhs = random_expr(rng, vars, cfg)?;
        let op = *pick(rng, &GuardOp::ALL, "guard operator")?;
        let rhs = random_expr(rng, vars, cfg)?;
        guards.push(Guard {
            lhs,
            op,
            rhs,
            target,
        });
    }

    Ok(CaseArm {
        state,
        updates,
        guards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqgen_common::seeded;

    #[test]
    fn states_distinct_and_in_range() {
        let cfg = FsmConfig::default();
        let mut rng = seeded(2);
        for bits in [1, 5, 16] {
            for _ in 0..50 {
                let states = random_states(&mut rng, bits, &cfg).unwrap();
                assert!(!states.is_empty());
                assert!(states.len() <= 9);
                for (i, s) in states.iter().enumerate() {
                    assert!(*s <= max_value(bits));
                    assert!(!states[i + 1..].contains(s));
                }
            }
        }
    }

    #[test]
    fn one_bit_state_collapses_duplicates() {
        let cfg = FsmConfig {
            state_draws: eqgen_config::CountRange::exactly(9),
            ..FsmConfig::default()
        };
        let mut rng = seeded(4);
        let states = random_states(&mut rng, 1, &cfg).unwrap();
        assert!(states.len() <= 2);
    }

    #[test]
    fn zero_draws_is_empty_state_set() {
        let cfg = FsmConfig {
            state_draws: eqgen_config::CountRange::exactly(0),
            ..FsmConfig::default()
        };
        let mut rng = seeded(4);
        let err = random_states(&mut rng, 5, &cfg).unwrap_err();
        assert!(matches!(err, GenErrorKind::EmptyStateSet));
    }

    #[test]
    fn guards_target_distinct_states() {
        let cfg = FsmConfig::default();
        let vars: VarPool = SIGNAL_NAMES.into_iter().collect();
        let states = [3, 9, 12, 30];
        let mut rng = seeded(6);
        for _ in 0..200 {
            let arm = random_arm(&mut rng, 3, &states, &vars, &cfg).unwrap();
            assert!(arm.guards.len() <= states.len());
            let mut targets: Vec<u64> = arm.guards.iter().map(|g| g.target).collect();
            targets.sort_unstable();
            targets.dedup();
            assert_eq!(targets.len(), arm.guards.len());
            assert!(targets.iter().all(|t| states.contains(t)));
        }
    }

    #[test]
    fn encoding_attributes() {
        assert_eq!(StateEncoding::Unannotated.attribute(), "");
        assert_eq!(
            StateEncoding::OneHot.attribute(),
            "(* fsm_encoding = \"one-hot\" *) "
        );
        assert_eq!(
            StateEncoding::Binary.attribute(),
            "(* fsm_encoding = \"binary\" *) "
        );
    }

    #[test]
    fn zero_bit_state_register_is_an_error() {
        let cfg = FsmConfig {
            state_bits: eqgen_config::CountRange::exactly(0),
            ..FsmConfig::default()
        };
        let mut rng = seeded(1);
        let err = generate_with_topology(&mut rng, 3, ResetTopology::Single, &cfg).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.stage, Stage::ModuleSynthesis);
        assert!(matches!(err.kind, GenErrorKind::InvalidSetting(_)));
        assert!(format!("{err}").contains("fsm.state_bits"));
    }

    #[test]
    fn inverted_signal_range_is_an_error() {
        let cfg = FsmConfig {
            signal_msb: eqgen_config::CountRange::new(12, 0),
            ..FsmConfig::default()
        };
        let mut rng = seeded(1);
        let err = generate(&mut rng, 0, &cfg).unwrap_err();
        assert_eq!(err.index, 0);
        assert!(format!("{err}").contains("fsm.signal_msb"));
    }

    #[test]
    fn oversized_constants_are_an_error() {
        let cfg = FsmConfig {
            const_bits: eqgen_config::CountRange::new(1, 64),
            ..FsmConfig::default()
        };
        let mut rng = seeded(1);
        let err = generate_with_topology(&mut rng, 1, ResetTopology::Dual, &cfg).unwrap_err();
        assert!(format!("{err}").contains("fsm.const_bits"));
    }

    #[test]
    fn dual_topology_ports_and_branch() {
        let cfg = FsmConfig::default();
        let mut rng = seeded(10);
        let module = generate_with_topology(&mut rng, 4, ResetTopology::Dual, &cfg).unwrap();
        let ports = module.port_names();
        assert_eq!(&ports[..4], ["clk", "rst1", "rst2", "rst"]);
        let text = module.to_string();
        assert!(text.contains("  assign rst = rst1 || rst2;\n"));
        assert!(text.contains("    if (rst1) begin\n"));
        assert!(text.contains("      if (rst2) begin\n"));
        // The rst2 override follows the case statement.
        assert!(text.find("endcase").unwrap() < text.find("if (rst2)").unwrap());
        assert!(module.states().contains(&module.rst2_state().unwrap()));
    }
}
