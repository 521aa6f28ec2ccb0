//! Sum-of-products terms.

use std::fmt;

use eqgen_common::{coin, GenErrorKind, GenRng, VarPool};
use eqgen_config::CombConfig;
use rand::Rng;

/// A possibly negated reference to a pool variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    /// The referenced signal, e.g. `i3` or `t5[2]`.
    pub var: String,
    /// Whether the literal is complemented with `~`.
    pub negated: bool,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.var)
        } else {
            f.write_str(&self.var)
        }
    }
}

/// A disjunction of conjunction clauses.
///
/// Every clause ranges over the same drawn variables, in the same order;
/// clauses differ only in which literals are negated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    clauses: Vec<Vec<Literal>>,
}

impl Term {
    /// Returns the clauses of this term.
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Iterates over every variable referenced by the term.
    pub fn vars(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().flatten().map(|lit| lit.var.as_str())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str("(")?;
            for (j, lit) in clause.iter().enumerate() {
                if j > 0 {
                    f.write_str(" & ")?;
                }
                write!(f, "{lit}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Draws a random sum-of-products term over `pool`.
pub fn random_term(
    rng: &mut GenRng,
    pool: &VarPool,
    cfg: &CombConfig,
) -> Result<Term, GenErrorKind> {
    let n_literals = rng.gen_range(cfg.literals.min..=cfg.literals.max) as usize;
    let vars = pool.choose_many(rng, n_literals)?;
    let n_clauses = rng.gen_range(cfg.clauses.min..=cfg.clauses.max) as usize;

    let clauses = (0..n_clauses)
        .map(|_| {
            vars.iter()
                .map(|var| Literal {
                    var: var.clone(),
                    negated: coin(rng),
                })
                .collect()
        })
        .collect();
    Ok(Term { clauses })
}
