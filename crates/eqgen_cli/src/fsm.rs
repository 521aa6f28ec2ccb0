//! `eqgen fsm` — state-machine fixture generation.

use std::path::Path;

use eqgen_common::{module_name, seeded, source_file_name, GenResult, Stage};
use eqgen_config::GeneratorConfig;
use eqgen_fsm::{FsmModule, ResetTopology};
use eqgen_yosys::{script_source_path, ResetSignal, SatMode, ScriptPair};

use crate::pipeline::{self, ModuleFiles};
use crate::report::{ModuleRecord, ModuleShape, RunReport};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `eqgen fsm` command.
///
/// Returns exit code 0 on success.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::resolve_config(args, global)?;
    let out_dir = Path::new(&config.generate.output_dir);
    pipeline::prepare_output_dir(out_dir)?;

    if !global.quiet {
        eprintln!(
            "  Generating {} state-machine modules in {}",
            config.generate.count,
            out_dir.display()
        );
    }

    let report = generate(&config, out_dir, global)?;
    report.print(args.format, global)?;
    Ok(0)
}

/// Returns the `sat` mode for a module: a bounded proof that pulses the
/// module's externally visible reset in the first cycle.
fn sat_mode(module: &FsmModule, steps: u32) -> SatMode {
    let reset = match module.topology() {
        ResetTopology::Dual => ResetSignal::Gold,
        ResetTopology::Single => ResetSignal::Input,
    };
    SatMode::Sequential { steps, reset }
}

/// Generates every module of the run into `out_dir`.
pub fn generate(
    config: &GeneratorConfig,
    out_dir: &Path,
    global: &GlobalArgs,
) -> GenResult<RunReport> {
    let mut rng = seeded(config.generate.seed);
    let mut modules = Vec::with_capacity(config.generate.count);

    for index in 0..config.generate.count {
        let module = eqgen_fsm::generate(&mut rng, index, &config.fsm)?;
        let source = pipeline::write_source(out_dir, index, &module.to_string())?;

        let scripts = ScriptPair::build(
            module.name(),
            &script_source_path(&config.generate.source_dir, &source_file_name(index)),
            config.script.timeout,
            sat_mode(&module, config.script.seq_steps),
        )
        .map_err(|kind| kind.at(index, Stage::ScriptSynthesis))?;
        let (script, pp_script) = pipeline::write_scripts(out_dir, index, &scripts)?;

        let files = ModuleFiles {
            source,
            script,
            pp_script,
        };
        pipeline::announce(global, &files);

        modules.push(ModuleRecord {
            index,
            name: module_name(index),
            files,
            shape: ModuleShape::Fsm {
                dual_reset: module.topology().is_dual(),
                state_bits: module.state_bits(),
                states: module.states().len(),
            },
        });
    }

    Ok(RunReport {
        generator: "fsm",
        seed: config.generate.seed,
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    fn config(count: usize) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.generate.count = count;
        config
    }

    #[test]
    fn reset_signal_follows_topology() {
        let dir = tempfile::tempdir().unwrap();
        let report = generate(&config(25), dir.path(), &quiet()).unwrap();
        for record in &report.modules {
            let dual = match record.shape {
                ModuleShape::Fsm { dual_reset, .. } => dual_reset,
                _ => panic!("expected fsm shape"),
            };
            let source = fs::read_to_string(&record.files.source).unwrap();
            assert_eq!(source.contains("rst1"), dual);
            for script in [&record.files.script, &record.files.pp_script] {
                let text = fs::read_to_string(script).unwrap();
                let sat = text.lines().last().unwrap();
                let expected = if dual { "gold_rst" } else { "in_rst" };
                assert!(
                    sat.contains(&format!(" -seq 5 -set-at 1 {expected} 1 ")),
                    "{sat}"
                );
            }
        }
    }

    #[test]
    fn pp_script_differs_by_one_line() {
        let dir = tempfile::tempdir().unwrap();
        generate(&config(3), dir.path(), &quiet()).unwrap();
        for index in 0..3 {
            let plain = fs::read_to_string(dir.path().join(format!("uut_{index:05}.ys"))).unwrap();
            let pp = fs::read_to_string(dir.path().join(format!("uut_{index:05}_pp.ys"))).unwrap();
            assert_eq!(pp.lines().count(), plain.lines().count() + 1);
            let stripped: Vec<&str> = pp
                .lines()
                .filter(|l| *l != eqgen_yosys::TECHMAP_LINE)
                .collect();
            assert_eq!(stripped, plain.lines().collect::<Vec<_>>());
        }
    }

    #[test]
    fn seed_changes_output() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let mut other = config(1);
        other.generate.seed = 2;
        generate(&config(1), a.path(), &quiet()).unwrap();
        generate(&other, b.path(), &quiet()).unwrap();
        assert_ne!(
            fs::read_to_string(a.path().join("uut_00000.v")).unwrap(),
            fs::read_to_string(b.path().join("uut_00000.v")).unwrap()
        );
    }

    #[test]
    fn runs_are_byte_identical() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        generate(&config(3), a.path(), &quiet()).unwrap();
        generate(&config(3), b.path(), &quiet()).unwrap();
        for index in 0..3 {
            let file = format!("uut_{index:05}.v");
            assert_eq!(
                fs::read(a.path().join(&file)).unwrap(),
                fs::read(b.path().join(&file)).unwrap()
            );
        }
    }

    #[test]
    fn zero_timeout_fails_at_script_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(2);
        config.script.timeout = 0;
        let err = generate(&config, dir.path(), &quiet()).unwrap_err();
        assert_eq!(err.stage, Stage::ScriptSynthesis);
        assert_eq!(err.index, 0);
        assert!(format!("{err}").starts_with("uut_00000: script synthesis failed:"));
        assert!(!dir.path().join("uut_00000.ys").exists());
    }
}
