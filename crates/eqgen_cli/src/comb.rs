//! `eqgen comb` — combinational fixture generation.

use std::path::Path;

use eqgen_common::{module_name, seeded, source_file_name, GenResult, Stage};
use eqgen_config::GeneratorConfig;
use eqgen_yosys::{script_source_path, SatMode, ScriptPair};

use crate::pipeline::{self, ModuleFiles};
use crate::report::{ModuleRecord, ModuleShape, RunReport};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `eqgen comb` command.
///
/// Returns exit code 0 on success.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::resolve_config(args, global)?;
    let out_dir = Path::new(&config.generate.output_dir);
    pipeline::prepare_output_dir(out_dir)?;

    if !global.quiet {
        eprintln!(
            "  Generating {} combinational modules in {}",
            config.generate.count,
            out_dir.display()
        );
    }

    let report = generate(&config, out_dir, global)?;
    report.print(args.format, global)?;
    Ok(0)
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
        let module = eqgen_comb::generate(&mut rng, index, &config.comb)?;
        let source = pipeline::write_source(out_dir, index, &module.to_string())?;

        let scripts = ScriptPair::build(
            module.name(),
            &script_source_path(&config.generate.source_dir, &source_file_name(index)),
            config.script.timeout,
            SatMode::Combinational,
        )
        .map_err(|kind| kind.at(index, Stage::ScriptSynthesis))?;
        let (script, pp_script) = pipeline::write_scripts(out_dir, index, &scripts)?;

        let files = ModuleFiles {
            source,
            script,
            pp_script,
        };
        pipeline::announce(global, &files);

        let shape = module.shape();
        modules.push(ModuleRecord {
            index,
            name: module_name(index),
            files,
            shape: ModuleShape::Combinational {
                inputs: shape.inputs + 1,
                outputs: shape.outputs + 1,
                temps: shape.temps,
            },
        });
    }

    Ok(RunReport {
        generator: "comb",
        seed: config.generate.seed,
        modules,
    })
}
