//! `emit` and `query` commands.
//!
//! Both take their output streams as parameters so tests can capture them;
//! the binary passes stdout and stderr.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsr_common::Diagnostic;
use tsr_host::Program;
use tsr_reflect::{MetadataTable, ScriptRenderer, reflect};
use tsr_runtime::{Reflection, split_qualified_name};

use crate::args::{CliArgs, Command, EmitArgs, QueryArgs};
use crate::config::{OutputFormat, ResolvedConfig, discover_config};

#[derive(Debug)]
pub enum EmitOutcome {
    /// `reflectionEnabled` is off; nothing was read or written.
    Disabled,
    Emitted {
        diagnostics: Vec<Diagnostic>,
        /// `None` when the table went to `out`.
        out_file: Option<PathBuf>,
    },
}

pub fn run(args: &CliArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    match &args.command {
        Command::Emit(emit) => run_emit(emit, out, err).map(|_| ()),
        Command::Query(query) => run_query(query, out),
    }
}

pub fn run_emit(args: &EmitArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<EmitOutcome> {
    let config = discover_config(args.config.as_deref())?;
    let resolved = ResolvedConfig::resolve(config, args.overrides());
    if !resolved.enabled {
        info!("reflection disabled by configuration");
        return Ok(EmitOutcome::Disabled);
    }

    let program = load_program(&args.program)?;
    debug!(
        program = %args.program.display(),
        files = program.files().len(),
        types = program.type_count(),
        "program loaded"
    );
    let output = reflect(&program, program.files(), resolved.options.clone());
    for diagnostic in &output.diagnostics {
        writeln!(err, "{}: {diagnostic}", diagnostic.subject)?;
    }

    let text = render(&output.table, &resolved)?;
    match &resolved.out_file {
        Some(path) => write_output(path, &text)?,
        None => out.write_all(text.as_bytes())?,
    }
    Ok(EmitOutcome::Emitted {
        diagnostics: output.diagnostics,
        out_file: resolved.out_file,
    })
}

fn load_program(path: &Path) -> Result<Program> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read program: {}", path.display()))?;
    Program::from_json(&source)
        .with_context(|| format!("failed to load program: {}", path.display()))
}

fn render(table: &MetadataTable, resolved: &ResolvedConfig) -> Result<String> {
    let text = match resolved.format {
        OutputFormat::Script => ScriptRenderer::new(resolved.new_line).render(table)?,
        OutputFormat::Json => {
            let mut json = table.to_json()?;
            json.push('\n');
            json
        }
    };
    Ok(text)
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Print the record registered as `args.name` in the table's own library.
pub fn run_query(args: &QueryArgs, out: &mut dyn Write) -> Result<()> {
    let source = std::fs::read_to_string(&args.table)
        .with_context(|| format!("failed to read table: {}", args.table.display()))?;
    let mut reflection = Reflection::new();
    let library = reflection
        .load_json(&source)
        .with_context(|| format!("failed to load table: {}", args.table.display()))?;
    let (package, name) = split_qualified_name(&args.name)?;

    let node = if args.interface {
        library.interface_for_name_in(package, name)?.node()
    } else {
        library.class_for_name_in(package, name)?.node()
    };
    serde_json::to_writer_pretty(&mut *out, node)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
