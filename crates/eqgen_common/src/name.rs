//! The `uut_<index>` naming scheme.
//!
//! Module names, source files and script files all derive from the module
//! index, zero-padded to five digits.

/// Returns the module name for `index`, e.g. `uut_00042`.
pub fn module_name(index: usize) -> String {
    format!("uut_{index:05}")
}

/// Returns the HDL source file name for `index`, e.g. `uut_00042.v`.
pub fn source_file_name(index: usize) -> String {
    format!("{}.v", module_name(index))
}

/// Returns the plain verification script file name, e.g. `uut_00042.ys`.
pub fn script_file_name(index: usize) -> String {
    format!("{}.ys", module_name(index))
}

/// Returns the technology-mapped script file name, e.g. `uut_00042_pp.ys`.
pub fn pp_script_file_name(index: usize) -> String {
    format!("{}_pp.ys", module_name(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_to_five_digits() {
        assert_eq!(module_name(0), "uut_00000");
        assert_eq!(module_name(24), "uut_00024");
        assert_eq!(module_name(12345), "uut_12345");
    }

    #[test]
    fn file_names() {
        assert_eq!(source_file_name(3), "uut_00003.v");
        assert_eq!(script_file_name(3), "uut_00003.ys");
        assert_eq!(pp_script_file_name(3), "uut_00003_pp.ys");
    }
}
