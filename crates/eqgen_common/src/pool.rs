//! The variable pool that generated expressions draw their operands from.

use crate::error::GenErrorKind;
use crate::rng::GenRng;
use rand::Rng;

/// An ordered, growing list of signal names.
///
/// Names are appended as signals are declared, so a name is always defined
/// in the emitted text before any expression drawn afterwards can reference
/// it. Duplicates are allowed; drawing the same name twice models fan-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarPool {
    vars: Vec<String>,
}

impl VarPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a signal name.
    pub fn push(&mut self, name: impl Into<String>) {
        self.vars.push(name.into());
    }

    /// Returns the number of names in the pool.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if the pool holds no names.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns the names in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.vars
    }

    /// Draws one name uniformly at random.
    pub fn choose(&self, rng: &mut GenRng) -> Result<&str, GenErrorKind> {
        if self.vars.is_empty() {
            return Err(GenErrorKind::EmptyPool);
        }
        Ok(self.vars[rng.gen_range(0..self.vars.len())].as_str())
    }

    /// Draws `n` names uniformly at random, with repetition.
    pub fn choose_many(&self, rng: &mut GenRng, n: usize) -> Result<Vec<String>, GenErrorKind> {
        (0..n)
            .map(|_| self.choose(rng).map(str::to_string))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for VarPool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn empty_pool_errors() {
        let pool = VarPool::new();
        let mut rng = seeded(1);
        assert!(matches!(pool.choose(&mut rng), Err(GenErrorKind::EmptyPool)));
    }

    #[test]
    fn choose_stays_in_pool() {
        let pool: VarPool = ["i0", "i1", "i2"].into_iter().collect();
        let mut rng = seeded(5);
        for _ in 0..100 {
            let v = pool.choose(&mut rng).unwrap();
            assert!(pool.as_slice().iter().any(|p| p == v));
        }
    }

    #[test]
    fn choose_many_allows_repetition() {
        let pool: VarPool = ["only"].into_iter().collect();
        let mut rng = seeded(2);
        let picked = pool.choose_many(&mut rng, 4).unwrap();
        assert_eq!(picked, vec!["only"; 4]);
    }

    #[test]
    fn push_preserves_order() {
        let mut pool = VarPool::new();
        pool.push("a");
        pool.push("t0[1]");
        pool.push("a");
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.as_slice(), ["a", "t0[1]", "a"]);
    }
}
