use anyhow::{Context, Result, bail};
use serde::Serialize;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use walkdir::WalkDir;

use jlc_common::Diagnostic;
use jlc_ir::{ClassDecl, ClassPath, IrPrinter, Program};
use jlc_lambda::{DesugarError, DesugarStats, LambdaGroupingPass, LambdaOptions};

use crate::cli::args::CliArgs;
use crate::cli::config::{
    CONFIG_FILE_NAME, LoadedProject, apply_cli_overrides, load_project_config,
    resolve_lambda_options,
};

/// Outcome of one `jlc` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub options: LambdaOptions,
    /// The program after the pass; unchanged when the pass aborted.
    pub program: Program,
    /// `None` when the pass aborted.
    pub stats: Option<DesugarStats>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_read: Vec<PathBuf>,
}

impl RunResult {
    pub fn is_aborted(&self) -> bool {
        self.stats.is_none()
    }

    /// Group classes first, then the rewritten source types.
    pub fn printed_classes(&self) -> String {
        let mut out = String::new();
        for class in self
            .program
            .synthetic_types
            .iter()
            .chain(self.program.types.iter())
        {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&IrPrinter::print_class(class));
        }
        out
    }

    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            options: &self.options,
            stats: self.stats,
            group_classes: self
                .program
                .synthetic_types
                .iter()
                .map(GroupClassSummary::of)
                .collect(),
            diagnostics: &self.diagnostics,
        }
    }
}

/// `--json` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary<'a> {
    pub options: &'a LambdaOptions,
    pub stats: Option<DesugarStats>,
    pub group_classes: Vec<GroupClassSummary<'a>>,
    pub diagnostics: &'a [Diagnostic],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupClassSummary<'a> {
    pub name: &'a str,
    pub interfaces: &'a [String],
    pub fields: Vec<&'a str>,
    pub methods: Vec<&'a str>,
}

impl<'a> GroupClassSummary<'a> {
    fn of(class: &'a ClassDecl) -> Self {
        Self {
            name: &class.name,
            interfaces: &class.interfaces,
            fields: class.fields.iter().map(|f| f.name.as_str()).collect(),
            methods: class.methods.iter().map(|m| m.name.as_str()).collect(),
        }
    }
}

/// Resolve options and inputs, read the program and run the lambda grouping pass.
///
/// Errors are reserved for unusable input (bad config, unreadable files);
/// an aborted pass is reported through [`RunResult::diagnostics`].
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let project = resolve_project(args, cwd)?;

    let mut options =
        resolve_lambda_options(project.as_ref().and_then(|p| p.config.lambda_options.as_ref()))?;
    apply_cli_overrides(&mut options, args)?;

    let inputs: Vec<PathBuf> = if args.inputs.is_empty() {
        project.as_ref().map(LoadedProject::input_paths).unwrap_or_default()
    } else {
        args.inputs.iter().map(|input| cwd.join(input)).collect()
    };
    if inputs.is_empty() {
        bail!("no inputs given and no {CONFIG_FILE_NAME} found in {}", cwd.display());
    }

    let files = collect_input_files(&inputs)?;
    if files.is_empty() {
        bail!("no program files found in the given inputs");
    }
    let mut program = load_program(&files)?;
    let class_path = ClassPath::for_program(&program);
    debug!(
        files = files.len(),
        types = program.types.len(),
        interfaces = class_path.len(),
        "program loaded"
    );

    let pass = LambdaGroupingPass::new(&options, &class_path);
    let (stats, diagnostics) = match pass.run(&mut program) {
        Ok(output) => (Some(output.stats), output.diagnostics),
        Err(DesugarError::Aborted { diagnostics }) => (None, diagnostics),
    };

    Ok(RunResult {
        options,
        program,
        stats,
        diagnostics,
        files_read: files,
    })
}

/// An explicit `--project`, else a `jlc.json` in `cwd` when no inputs were given.
fn resolve_project(args: &CliArgs, cwd: &Path) -> Result<Option<LoadedProject>> {
    if let Some(project) = &args.project {
        return load_project_config(&cwd.join(project)).map(Some);
    }
    let implicit = cwd.join(CONFIG_FILE_NAME);
    if args.inputs.is_empty() && implicit.is_file() {
        return load_project_config(&implicit).map(Some);
    }
    Ok(None)
}

/// Expand directories into the `*.json` program files beneath them, sorted by path.
///
/// Explicit file inputs are kept as given. Project configs found while
/// walking are skipped. A file reached more than once (named twice, or both
/// directly and through its directory) is kept at its first position only.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("input not found: {}", input.display());
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_program_file(path))
            .collect();
        found.sort();
        files.extend(found);
    }

    let mut seen = FxHashSet::default();
    files.retain(|file| {
        let identity = std::fs::canonicalize(file).unwrap_or_else(|_| file.clone());
        seen.insert(identity)
    });
    Ok(files)
}

fn is_program_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path.file_name().is_some_and(|name| name != CONFIG_FILE_NAME)
}

/// Parse every file and merge them into one program.
///
/// A type declared by two files is an error naming both.
pub fn load_program(files: &[PathBuf]) -> Result<Program> {
    let _span = info_span!("load_program", files = files.len()).entered();
    let mut program = Program::default();
    let mut declared_in: FxHashMap<String, &Path> = FxHashMap::default();
    for file in files {
        let source = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read program file {}", file.display()))?;
        let part: Program = serde_json::from_str(&source)
            .with_context(|| format!("failed to parse program file {}", file.display()))?;
        for class in &part.types {
            match declared_in.insert(class.name.clone(), file.as_path()) {
                Some(first) if first == file.as_path() => {
                    bail!("type {} is declared twice in {}", class.name, file.display())
                }
                Some(first) => bail!(
                    "type {} is declared in both {} and {}",
                    class.name,
                    first.display(),
                    file.display()
                ),
                None => {}
            }
        }
        program.extend(part);
    }
    Ok(program)
}
