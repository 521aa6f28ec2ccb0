//! The six bit-expanded data signals.

/// Data signal names in port order: three inputs then three outputs.
pub const SIGNAL_NAMES: [&str; 6] = ["a", "b", "c", "x", "y", "z"];

/// Port direction of a data signal's individual bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Bits are inputs; the vector is a `wire` assembled from them.
    Input,
    /// Bits are outputs; the vector is a `reg` they are sliced from.
    Output,
}

/// A data signal declared both as a vector and as individual bit ports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    /// Vector name; bit ports are named `<name><bit>`.
    pub name: &'static str,
    /// Index of the most significant bit.
    pub msb: u32,
    /// Whether the vector is declared `signed`.
    pub signed: bool,
    /// Direction of the bit ports.
    pub direction: Direction,
}

impl Signal {
    /// Returns the vector width.
    pub fn width(&self) -> u32 {
        self.msb + 1
    }

    /// Returns the bit port names, least significant first.
    pub fn bit_names(&self) -> Vec<String> {
        (0..=self.msb).map(|i| format!("{}{i}", self.name)).collect()
    }

    /// Renders the vector declaration keyword and range, e.g. `wire signed [3:0]`.
    pub(crate) fn vector_decl(&self) -> String {
        let kind = match self.direction {
            Direction::Input => "wire",
            Direction::Output => "reg",
        };
        let sign = if self.signed { " signed" } else { "" };
        format!("{kind}{sign} [{}:0]", self.msb)
    }

    /// Renders the reassembling concatenation, most significant bit first.
    pub fn concat(&self) -> String {
        let bits: Vec<String> = (0..=self.msb)
            .rev()
            .map(|i| format!("{}{i}", self.name))
            .collect();
        format!("{{{}}}", bits.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_names_ascending() {
        let s = Signal {
            name: "b",
            msb: 2,
            signed: false,
            direction: Direction::Input,
        };
        assert_eq!(s.width(), 3);
        assert_eq!(s.bit_names(), vec!["b0", "b1", "b2"]);
    }

    #[test]
    fn concat_msb_first() {
        let s = Signal {
            name: "a",
            msb: 3,
            signed: true,
            direction: Direction::Input,
        };
        assert_eq!(s.concat(), "{a3,a2,a1,a0}");
        assert_eq!(s.vector_decl(), "wire signed [3:0]");
    }

    #[test]
    fn single_bit_signal() {
        let s = Signal {
            name: "x",
            msb: 0,
            signed: false,
            direction: Direction::Output,
        };
        assert_eq!(s.concat(), "{x0}");
        assert_eq!(s.vector_decl(), "reg [0:0]");
    }
}
