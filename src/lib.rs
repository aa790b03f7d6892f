/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod logging;
pub mod output;
pub mod parser;
pub mod preprocessor;

use anyhow::{Context, Result};
use errors::AssemblyError;
use std::fs;
use std::path::Path;

/// The rendered artifacts of one successfully assembled source.
#[derive(Debug)]
pub struct Artifacts {
    pub expanded: String,
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

/// Why a source failed to assemble. The expanded text is present whenever
/// the macro pass itself was clean, mirroring the on-disk contract where
/// the `.am` file survives even when a later pass rejects the program.
#[derive(Debug)]
pub struct AssemblyFailure {
    pub expanded: Option<String>,
    pub errors: Vec<AssemblyError>,
}

/// Runs the three passes over one source text: macro expansion, the
/// image-building first pass, and the resolving second pass. Any stage
/// that accumulates errors stops the pipeline there.
pub fn assemble(source: &str) -> Result<Artifacts, AssemblyFailure> {
    let (expanded, macros) =
        preprocessor::expand_macros(source).map_err(|errors| AssemblyFailure {
            expanded: None,
            errors,
        })?;

    let (lines, mut errors) = parser::parse_source(&expanded);
    let (mut assembly, first_pass_errors) = assembler::first_pass(&lines, &macros);
    errors.extend(first_pass_errors);
    if !errors.is_empty() {
        return Err(AssemblyFailure {
            expanded: Some(expanded),
            errors,
        });
    }

    assembler::rebase(&mut assembly);

    let errors = assembler::second_pass(&mut assembly);
    if !errors.is_empty() {
        return Err(AssemblyFailure {
            expanded: Some(expanded),
            errors,
        });
    }

    Ok(Artifacts {
        object: output::render_object(&assembly),
        entries: output::render_entries(&assembly),
        externals: output::render_externals(&assembly),
        expanded,
    })
}

/// Assembles `<base>.as` and writes the artifacts next to it. `Ok(true)`
/// means the source assembled cleanly; `Ok(false)` means it was rejected
/// and the diagnostics were reported. I/O trouble is an `Err`.
pub fn assemble_file(base: &Path) -> Result<bool> {
    let source_path = base.with_extension("as");
    let source = fs::read_to_string(&source_path)
        .with_context(|| format!("Failed to read input file: {}", source_path.display()))?;

    match assemble(&source) {
        Ok(artifacts) => {
            write_artifact(base, "am", &artifacts.expanded)?;
            write_artifact(base, "ob", &artifacts.object)?;
            if let Some(entries) = &artifacts.entries {
                write_artifact(base, "ent", entries)?;
            }
            if let Some(externals) = &artifacts.externals {
                write_artifact(base, "ext", externals)?;
            }
            Ok(true)
        }
        Err(failure) => {
            if let Some(expanded) = &failure.expanded {
                write_artifact(base, "am", expanded)?;
            }
            let file_name = source_path.display().to_string();
            for error in &failure.errors {
                logging::report(&file_name, error);
            }
            Ok(false)
        }
    }
}

fn write_artifact(base: &Path, extension: &str, content: &str) -> Result<()> {
    let path = base.with_extension(extension);
    fs::write(&path, content)
        .with_context(|| format!("Failed to create output file: {}", path.display()))
}
