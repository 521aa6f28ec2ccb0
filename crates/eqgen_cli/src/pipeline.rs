//! Shared pipeline helpers for the generator commands.
//!
//! Contains configuration resolution (file, then flag overrides), output
//! directory preparation and the scoped file writes each module goes through.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use eqgen_common::{
    pp_script_file_name, script_file_name, source_file_name, GenErrorKind, GenResult, Stage,
};
use eqgen_config::{load_config, validate_config, GeneratorConfig, CONFIG_FILE_NAME};
use eqgen_yosys::ScriptPair;
use serde::Serialize;

use crate::{GenerateArgs, GlobalArgs};

/// Paths of the three files written for one module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleFiles {
    /// The HDL source, `uut_<idx>.v`.
    pub source: PathBuf,
    /// The plain script, `uut_<idx>.ys`.
    pub script: PathBuf,
    /// The technology-mapped script, `uut_<idx>_pp.ys`.
    pub pp_script: PathBuf,
}

/// Resolves the effective configuration.
///
/// `--config` names the file explicitly; otherwise `eqgen.toml` in the
/// current directory is used when present, and the built-in defaults when
/// not. Subcommand flags override the `[generate]` section.
pub fn resolve_config(
    args: &GenerateArgs,
    global: &GlobalArgs,
) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    let mut config = match global.config {
        Some(ref path) => load_config(Path::new(path))?,
        None => {
            let default_path = Path::new(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_config(default_path)?
            } else {
                GeneratorConfig::default()
            }
        }
    };
    apply_overrides(&mut config, args);
    validate_config(&config)?;
    Ok(config)
}

/// Applies subcommand flag overrides to the `[generate]` section.
fn apply_overrides(config: &mut GeneratorConfig, args: &GenerateArgs) {
    if let Some(seed) = args.seed {
        config.generate.seed = seed;
    }
    if let Some(count) = args.count {
        config.generate.count = count;
    }
    if let Some(ref out) = args.out {
        config.generate.output_dir = out.clone();
    }
    if let Some(ref dir) = args.source_dir {
        config.generate.source_dir = dir.clone();
    }
}

/// Creates the output directory if it does not exist yet.
pub fn prepare_output_dir(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create output directory {}: {e}", dir.display()).into())
}

/// Writes `contents` to `path`, closing the file before returning.
pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

/// Writes the HDL source of module `index`.
pub fn write_source(out_dir: &Path, index: usize, text: &str) -> GenResult<PathBuf> {
    let path = out_dir.join(source_file_name(index));
    log::trace!("writing {}", path.display());
    write_file(&path, text).map_err(|e| GenErrorKind::from(e).at(index, Stage::Write))?;
    Ok(path)
}

/// Writes both verification scripts of module `index`, plain first.
pub fn write_scripts(
    out_dir: &Path,
    index: usize,
    scripts: &ScriptPair,
) -> GenResult<(PathBuf, PathBuf)> {
    let plain = out_dir.join(script_file_name(index));
    let pp = out_dir.join(pp_script_file_name(index));
    for (path, script) in [(&plain, &scripts.plain), (&pp, &scripts.pp)] {
        log::trace!("writing {}", path.display());
        write_file(path, &script.to_string())
            .map_err(|e| GenErrorKind::from(e).at(index, Stage::Write))?;
    }
    Ok((plain, pp))
}

/// Returns the status lines for one module: the source path, plus both
/// script paths when `verbose` is set.
pub fn status_lines(files: &ModuleFiles, verbose: bool) -> Vec<String> {
    let paths = if verbose {
        vec![&files.source, &files.script, &files.pp_script]
    } else {
        vec![&files.source]
    };
    paths
        .into_iter()
        .map(|path| format!("     Created {}", path.display()))
        .collect()
}

/// Prints the per-module status lines unless `--quiet` is set.
pub fn announce(global: &GlobalArgs, files: &ModuleFiles) {
    if global.quiet {
        return;
    }
    for line in status_lines(files, global.verbose) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use eqgen_yosys::SatMode;

    fn args() -> GenerateArgs {
        GenerateArgs {
            seed: None,
            count: None,
            out: None,
            source_dir: None,
            format: ReportFormat::Text,
        }
    }

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    #[test]
    fn overrides_replace_generate_section() {
        let mut config = GeneratorConfig::default();
        let args = GenerateArgs {
            seed: Some(9),
            count: Some(2),
            out: Some("out".into()),
            source_dir: Some("src".into()),
            ..args()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.generate.seed, 9);
        assert_eq!(config.generate.count, 2);
        assert_eq!(config.generate.output_dir, "out");
        assert_eq!(config.generate.source_dir, "src");
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[generate]\nseed = 5\ncount = 4\n").unwrap();
        let config =
            resolve_config(&args(), &global(Some(path.to_str().unwrap().to_string()))).unwrap();
        assert_eq!(config.generate.seed, 5);
        assert_eq!(config.generate.count, 4);
    }

    #[test]
    fn zero_count_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "").unwrap();
        let args = GenerateArgs {
            count: Some(0),
            ..args()
        };
        let result = resolve_config(&args, &global(Some(path.to_str().unwrap().to_string())));
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_file_errors() {
        let result = resolve_config(&args(), &global(Some("/nonexistent/eqgen.toml".into())));
        assert!(result.is_err());
    }

    #[test]
    fn write_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        write_file(&path, "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn write_into_missing_dir_reports_index_and_stage() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = write_source(&missing, 6, "module m; endmodule\n").unwrap_err();
        assert_eq!(err.index, 6);
        assert_eq!(err.stage, Stage::Write);
        assert!(format!("{err}").starts_with("uut_00006: write failed:"));
    }

    #[test]
    fn scripts_written_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let scripts =
            ScriptPair::build("uut_00001", "temp/uut_00001.v", 20, SatMode::Combinational)
                .unwrap();
        let (plain, pp) = write_scripts(dir.path(), 1, &scripts).unwrap();
        assert!(plain.ends_with("uut_00001.ys"));
        assert!(pp.ends_with("uut_00001_pp.ys"));
        let pp_text = std::fs::read_to_string(&pp).unwrap();
        assert!(pp_text.contains("techmap -map +/adff2dff.v; opt;;"));
    }

    #[test]
    fn status_line_names_source_path() {
        let files = ModuleFiles {
            source: PathBuf::from("temp/uut_00000.v"),
            script: PathBuf::from("temp/uut_00000.ys"),
            pp_script: PathBuf::from("temp/uut_00000_pp.ys"),
        };
        assert_eq!(
            status_lines(&files, false),
            vec!["     Created temp/uut_00000.v"]
        );
        assert_eq!(
            status_lines(&files, true),
            vec![
                "     Created temp/uut_00000.v",
                "     Created temp/uut_00000.ys",
                "     Created temp/uut_00000_pp.ys",
            ]
        );
    }

    #[test]
    fn prepare_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        prepare_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
