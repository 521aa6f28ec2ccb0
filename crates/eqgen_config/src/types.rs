//! Configuration types deserialized from `eqgen.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level generator configuration parsed from `eqgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    /// Run-wide settings (seed, module count, directories).
    #[serde(default)]
    pub generate: GenerateConfig,
    /// Combinational generator knobs.
    #[serde(default)]
    pub comb: CombConfig,
    /// State-machine generator knobs.
    #[serde(default)]
    pub fsm: FsmConfig,
    /// Verification script knobs.
    #[serde(default)]
    pub script: ScriptConfig,
}

/// Run-wide settings shared by both generators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Seed for the pseudorandom stream.
    pub seed: u64,
    /// Number of modules generated per run.
    pub count: usize,
    /// Directory the module and script files are written to.
    pub output_dir: String,
    /// Directory prefix used by `read_verilog` inside the scripts.
    pub source_dir: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            count: 25,
            output_dir: "temp".to_string(),
            source_dir: "temp".to_string(),
        }
    }
}

/// Knobs for the combinational generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombConfig {
    /// Total pin budget; input and output counts are each drawn up to half of it.
    pub pins: u32,
    /// Lower bound for the drawn input and output counts.
    pub min_ports: u32,
    /// Number of intermediate wires.
    pub temps: CountRange,
    /// Chance that an intermediate wire is an arithmetic concatenation.
    pub arith_probability: f64,
    /// Chance that an intermediate wire is a relational concatenation.
    pub compare_probability: f64,
    /// Width of each concatenation operand.
    pub concat_width: CountRange,
    /// Literals per clause of a term.
    pub literals: CountRange,
    /// Clauses per term.
    pub clauses: CountRange,
}

impl Default for CombConfig {
    fn default() -> Self {
        Self {
            pins: 96,
            min_ports: 3,
            temps: CountRange::new(3, 50),
            arith_probability: 0.05,
            compare_probability: 0.05,
            concat_width: CountRange::new(3, 16),
            literals: CountRange::new(4, 9),
            clauses: CountRange::new(3, 5),
        }
    }
}

impl CombConfig {
    /// Returns the inclusive range the input and output counts are drawn from.
    pub fn port_range(&self) -> CountRange {
        CountRange::new(self.min_ports, self.pins / 2)
    }
}

/// Knobs for the state-machine generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Most significant bit index of each data signal (width is msb + 1).
    pub signal_msb: CountRange,
    /// Width of the state register.
    pub state_bits: CountRange,
    /// Number of state values drawn before duplicates are discarded.
    pub state_draws: CountRange,
    /// Width of sized constants inside expressions.
    pub const_bits: CountRange,
    /// Width of the random values loaded on reset.
    pub reset_value_bits: u32,
    /// Nesting depth past which expressions stop growing unary nodes.
    pub max_expr_depth: u32,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            signal_msb: CountRange::new(0, 12),
            state_bits: CountRange::new(5, 16),
            state_draws: CountRange::new(2, 9),
            const_bits: CountRange::new(1, 10),
            reset_value_bits: 31,
            max_expr_depth: 12,
        }
    }
}

/// Knobs for the verification scripts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// SAT solver timeout passed to `sat -timeout`.
    pub timeout: u32,
    /// Number of cycles unrolled for sequential designs.
    pub seq_steps: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            timeout: 20,
            seq_steps: 5,
        }
    }
}

/// An inclusive `[min, max]` range of counts.
///
/// Written in TOML either as a two-element array (`temps = [3, 50]`) or as a
/// single integer that fixes both bounds (`temps = 8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound.
    pub max: u32,
}

impl CountRange {
    /// Creates a range from its bounds.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Creates a range that only contains `value`.
    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Returns `true` if `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Returns `true` if `value` lies within the range.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl<'de> Deserialize<'de> for CountRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RangeVisitor;

        impl<'de> Visitor<'de> for RangeVisitor {
            type Value = CountRange;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("an integer or a [min, max] pair")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let v = u32::try_from(v).map_err(|_| E::custom("count out of range"))?;
                Ok(CountRange::exactly(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let v = u32::try_from(v).map_err(|_| E::custom("count out of range"))?;
                Ok(CountRange::exactly(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let min = seq
                    .next_element::<u32>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let max = seq
                    .next_element::<u32>()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if seq.next_element::<u32>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(CountRange::new(min, max))
            }
        }

        deserializer.deserialize_any(RangeVisitor)
    }
}
