//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{CountRange, GeneratorConfig};
use std::path::Path;

/// Conventional name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "eqgen.toml";

/// Widest state register or constant the generators will emit.
const MAX_VALUE_BITS: u32 = 32;

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `eqgen.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<GeneratorConfig, ConfigError> {
    let config: GeneratorConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that ranges are well formed and that no draw can come up empty.
pub fn validate_config(config: &GeneratorConfig) -> Result<(), ConfigError> {
    let gen = &config.generate;
    if gen.count == 0 {
        return Err(invalid("generate.count must be at least 1"));
    }
    if gen.output_dir.is_empty() {
        return Err(invalid("generate.output_dir must not be empty"));
    }

    let comb = &config.comb;
    if comb.min_ports == 0 {
        return Err(invalid("comb.min_ports must be at least 1"));
    }
    if comb.pins / 2 < comb.min_ports {
        return Err(invalid(&format!(
            "comb.pins ({}) leaves fewer than {} ports per side",
            comb.pins, comb.min_ports
        )));
    }
    check_range("comb.temps", comb.temps, 0)?;
    check_range("comb.concat_width", comb.concat_width, 1)?;
    check_range("comb.literals", comb.literals, 1)?;
    check_range("comb.clauses", comb.clauses, 1)?;
    for (name, p) in [
        ("comb.arith_probability", comb.arith_probability),
        ("comb.compare_probability", comb.compare_probability),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(&format!("{name} must lie in [0, 1]")));
        }
    }
    if comb.arith_probability + comb.compare_probability > 1.0 {
        return Err(invalid(
            "comb.arith_probability + comb.compare_probability exceeds 1",
        ));
    }

    let fsm = &config.fsm;
    check_range("fsm.signal_msb", fsm.signal_msb, 0)?;
    check_range("fsm.state_bits", fsm.state_bits, 1)?;
    check_range("fsm.state_draws", fsm.state_draws, 1)?;
    check_range("fsm.const_bits", fsm.const_bits, 1)?;
    if fsm.state_bits.max > MAX_VALUE_BITS {
        return Err(invalid(&format!(
            "fsm.state_bits may not exceed {MAX_VALUE_BITS}"
        )));
    }
    if fsm.const_bits.max > MAX_VALUE_BITS {
        return Err(invalid(&format!(
            "fsm.const_bits may not exceed {MAX_VALUE_BITS}"
        )));
    }
    if !(1..=MAX_VALUE_BITS).contains(&fsm.reset_value_bits) {
        return Err(invalid(&format!(
            "fsm.reset_value_bits must lie in [1, {MAX_VALUE_BITS}]"
        )));
    }

    let script = &config.script;
    if script.timeout == 0 {
        return Err(invalid("script.timeout must be at least 1"));
    }
    if script.seq_steps == 0 {
        return Err(invalid("script.seq_steps must be at least 1"));
    }
    Ok(())
}

/// Checks `min <= max` and `min >= floor`.
fn check_range(name: &str, range: CountRange, floor: u32) -> Result<(), ConfigError> {
    if !range.is_valid() {
        return Err(invalid(&format!(
            "{name}: min {} exceeds max {}",
            range.min, range.max
        )));
    }
    if range.min < floor {
        return Err(invalid(&format!("{name} must be at least {floor}")));
    }
    Ok(())
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::ValidationError(msg.to_string())
}
