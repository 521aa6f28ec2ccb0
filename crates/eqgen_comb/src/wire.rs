//! Intermediate wires.

use std::fmt;

use eqgen_common::{pick, GenErrorKind, GenRng, VarPool};
use eqgen_config::CombConfig;
use rand::Rng;

use crate::term::{random_term, Term};

/// An arithmetic operator combining two concatenations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
}

impl ArithOp {
    const ALL: [ArithOp; 2] = [ArithOp::Add, ArithOp::Sub];

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
        }
    }
}

/// A relational operator comparing two concatenations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Neq,
}

impl CompareOp {
    const ALL: [CompareOp; 6] = [
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
        CompareOp::Eq,
        CompareOp::Neq,
    ];

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
        }
    }
}

/// A bit concatenation `{a, b, ...}`, most significant bit first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Concat(pub Vec<String>);

impl Concat {
    fn random(rng: &mut GenRng, pool: &VarPool, width: usize) -> Result<Self, GenErrorKind> {
        pool.choose_many(rng, width).map(Concat)
    }
}

impl fmt::Display for Concat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}

/// An intermediate wire `t<index>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TempWire {
    /// A `width`-bit sum or difference of two concatenations.
    Arith {
        /// Position in the module's wire list.
        index: usize,
        /// Bit width of the wire and of both operands.
        width: usize,
        /// Left operand.
        lhs: Concat,
        /// Operator.
        op: ArithOp,
        /// Right operand.
        rhs: Concat,
    },
    /// A single-bit comparison of two concatenations.
    Compare {
        /// Position in the module's wire list.
        index: usize,
        /// Left operand.
        lhs: Concat,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        rhs: Concat,
    },
    /// A single-bit sum-of-products term.
    Logic {
        /// Position in the module's wire list.
        index: usize,
        /// Driving term.
        term: Term,
    },
}

impl TempWire {
    /// Returns the wire's declared name.
    pub fn name(&self) -> String {
        format!("t{}", self.index())
    }

    /// Returns the position of this wire in the module.
    pub fn index(&self) -> usize {
        match self {
            TempWire::Arith { index, .. }
            | TempWire::Compare { index, .. }
            | TempWire::Logic { index, .. } => *index,
        }
    }

    /// Returns the names this wire contributes to the variable pool.
    ///
    /// Arithmetic wires contribute each of their bits, `t<i>[0]` upward;
    /// single-bit wires contribute their own name.
    pub fn pool_names(&self) -> Vec<String> {
        match self {
            TempWire::Arith { index, width, .. } => {
                (0..*width).map(|j| format!("t{index}[{j}]")).collect()
            }
            _ => vec![self.name()],
        }
    }

    /// Iterates over every pool variable the wire's driver reads.
    pub fn operands(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            TempWire::Arith { lhs, rhs, .. } | TempWire::Compare { lhs, rhs, .. } => {
                Box::new(lhs.0.iter().chain(&rhs.0).map(String::as_str))
            }
            TempWire::Logic { term, .. } => Box::new(term.vars()),
        }
    }

    /// Draws intermediate wire number `index` over the current `pool`.
    pub(crate) fn random(
        rng: &mut GenRng,
        index: usize,
        pool: &VarPool,
        cfg: &CombConfig,
    ) -> Result<Self, GenErrorKind> {
        let p: f64 = rng.gen();
        if p < cfg.arith_probability {
            let width = rng.gen_range(cfg.concat_width.min..=cfg.concat_width.max) as usize;
            let lhs = Concat::random(rng, pool, width)?;
            let rhs = Concat::random(rng, pool, width)?;
            let op = *pick(rng, &ArithOp::ALL, "arithmetic operator")?;
            Ok(TempWire::Arith {
                index,
                width,
                lhs,
                op,
                rhs,
            })
        } else if p < cfg.arith_probability + cfg.compare_probability {
            let width = rng.gen_range(cfg.concat_width.min..=cfg.concat_width.max) as usize;
            let lhs = Concat::random(rng, pool, width)?;
            let rhs = Concat::random(rng, pool, width)?;
            let op = *pick(rng, &CompareOp::ALL, "relational operator")?;
            Ok(TempWire::Compare { index, lhs, op, rhs })
        } else {
            let term = random_term(rng, pool, cfg)?;
            Ok(TempWire::Logic { index, term })
        }
    }
}

impl fmt::Display for TempWire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempWire::Arith {
                index,
                width,
                lhs,
                op,
                rhs,
            } => write!(
                f,
                "wire [{}:0] t{index} = {lhs} {} {rhs};",
                width - 1,
                op.symbol()
            ),
            TempWire::Compare { index, lhs, op, rhs } => {
                write!(f, "wire t{index} = {lhs} {} {rhs};", op.symbol())
            }
            TempWire::Logic { index, term } => write!(f, "wire t{index} = {term};"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqgen_common::seeded;

    fn concat(vars: &[&str]) -> Concat {
        Concat(vars.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn arith_render_and_pool_bits() {
        let wire = TempWire::Arith {
            index: 4,
            width: 3,
            lhs: concat(&["i0", "i1", "i0"]),
            op: ArithOp::Sub,
            rhs: concat(&["i2", "t1", "i2"]),
        };
        assert_eq!(
            wire.to_string(),
            "wire [2:0] t4 = {i0, i1, i0} - {i2, t1, i2};"
        );
        assert_eq!(wire.pool_names(), vec!["t4[0]", "t4[1]", "t4[2]"]);
        assert_eq!(wire.operands().count(), 6);
    }

    #[test]
    fn compare_render() {
        let wire = TempWire::Compare {
            index: 2,
            lhs: concat(&["i0", "i1", "i2"]),
            op: CompareOp::Ge,
            rhs: concat(&["i2", "i1", "i0"]),
        };
        assert_eq!(wire.to_string(), "wire t2 = {i0, i1, i2} >= {i2, i1, i0};");
        assert_eq!(wire.pool_names(), vec!["t2"]);
    }

    #[test]
    fn forced_arith_probability() {
        let cfg = CombConfig {
            arith_probability: 1.0,
            compare_probability: 0.0,
            ..CombConfig::default()
        };
        let pool: VarPool = ["i0", "i1"].into_iter().collect();
        let mut rng = seeded(8);
        let wire = TempWire::random(&mut rng, 0, &pool, &cfg).unwrap();
        match wire {
            TempWire::Arith { width, lhs, rhs, .. } => {
                assert!((3..=16).contains(&width));
                assert_eq!(lhs.0.len(), width);
                assert_eq!(rhs.0.len(), width);
            }
            other => panic!("expected arithmetic wire, got {other:?}"),
        }
    }

    #[test]
    fn forced_compare_probability() {
        let cfg = CombConfig {
            arith_probability: 0.0,
            compare_probability: 1.0,
            ..CombConfig::default()
        };
        let pool: VarPool = ["i0"].into_iter().collect();
        let mut rng = seeded(8);
        let wire = TempWire::random(&mut rng, 5, &pool, &cfg).unwrap();
        assert!(matches!(wire, TempWire::Compare { index: 5, .. }));
        assert_eq!(wire.name(), "t5");
    }

    #[test]
    fn default_is_mostly_logic() {
        let cfg = CombConfig::default();
        let pool: VarPool = ["i0", "i1", "i2"].into_iter().collect();
        let mut rng = seeded(21);
        let logic = (0..200)
            .filter(|&i| {
                matches!(
                    TempWire::random(&mut rng, i, &pool, &cfg).unwrap(),
                    TempWire::Logic { .. }
                )
            })
            .count();
        assert!(logic > 150, "only {logic} of 200 wires were logic terms");
    }
}
