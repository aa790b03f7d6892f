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

pub mod encoder;
pub mod image;
pub mod symbol_table;

use crate::ast::{Directive, MAX_NAME_LENGTH, SourceLine, is_reserved_word, is_valid_name};
use crate::errors::AssemblyError;
use crate::logging;
use crate::preprocessor::macro_table::{MacroTable, is_macro};
use encoder::constants::{LOAD_BASE, MEMORY_SIZE};
use image::{DeferredRef, MemoryImage, Word};
use symbol_table::{SymbolKind, SymbolTable, insert_symbol};

/// One promoted `.entry` symbol, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub name: String,
    pub address: u32,
}

/// One use site of an external symbol, in ascending address order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalUse {
    pub name: String,
    pub address: u32,
}

// Everything one file's assembly accumulates: the symbol table, both
// images, the placeholder slots waiting for pass 2, and the entry and
// external records the output stage renders. Created per file, dropped
// with it.
#[derive(Debug, Default)]
pub struct Assembly {
    pub symbols: SymbolTable,
    pub code: MemoryImage,
    pub data: MemoryImage,
    pub deferred: Vec<DeferredRef>,
    pub entry_declarations: Vec<(String, usize)>,
    pub entries: Vec<EntryRecord>,
    pub external_uses: Vec<ExternalUse>,
}

impl Assembly {
    pub fn new() -> Assembly {
        Assembly::default()
    }
}

/// Pass 1: walk the parsed lines, building the symbol table and encoding
/// both images. Direct-mode operands become placeholder words plus deferred
/// references. Errors are accumulated per line; an erroneous line
/// contributes nothing to the images.
pub fn first_pass(lines: &[SourceLine], macros: &MacroTable) -> (Assembly, Vec<AssemblyError>) {
    let mut assembly = Assembly::new();
    let mut errors = Vec::new();

    for line in lines {
        if let Err(error) = process_line(line, &mut assembly, macros) {
            errors.push(error);
        }
    }

    let total = assembly.code.counter() + assembly.data.counter();
    if total > MEMORY_SIZE {
        errors.push(AssemblyError::SemanticErrorNoLine {
            reason: format!(
                "program needs {} words, exceeding the {}-word memory",
                total, MEMORY_SIZE
            ),
        });
    }

    (assembly, errors)
}

/// Rebase: after a clean pass 1, move every symbol to its final absolute
/// address. Pass 2 fills placeholders with these values.
pub fn rebase(assembly: &mut Assembly) {
    symbol_table::rebase_symbols(&mut assembly.symbols, assembly.code.counter());
}

/// Pass 2: fill every placeholder planted by pass 1, record external uses,
/// and promote `.entry` declarations.
pub fn second_pass(assembly: &mut Assembly) -> Vec<AssemblyError> {
    let mut errors = Vec::new();

    // Deferred references were recorded in IC order, so external uses come
    // out sorted by address.
    let deferred = std::mem::take(&mut assembly.deferred);
    for reference in deferred {
        match symbol_table::get_symbol(&assembly.symbols, &reference.name) {
            None => errors.push(AssemblyError::SemanticError {
                line: reference.line,
                reason: format!(
                    "unresolved symbol \"{}\" used as {} operand",
                    reference.name, reference.role
                ),
            }),
            Some(symbol) if symbol.kind == SymbolKind::External => {
                assembly
                    .code
                    .set(reference.ic_slot, encoder::components::external_word());
                assembly.external_uses.push(ExternalUse {
                    name: reference.name,
                    address: reference.ic_slot + LOAD_BASE,
                });
            }
            Some(symbol) => {
                assembly.code.set(
                    reference.ic_slot,
                    encoder::components::relocatable_word(symbol.value),
                );
            }
        }
    }

    let declarations = std::mem::take(&mut assembly.entry_declarations);
    for (name, line_num) in declarations {
        match symbol_table::promote_to_entry(&mut assembly.symbols, &name, line_num) {
            Ok(Some(address)) => assembly.entries.push(EntryRecord { name, address }),
            Ok(None) => {} // repeated declaration, already recorded
            Err(error) => errors.push(error),
        }
    }

    errors
}

fn process_line(
    line: &SourceLine,
    assembly: &mut Assembly,
    macros: &MacroTable,
) -> Result<(), AssemblyError> {
    if let Some(label) = &line.label {
        match &line.directive {
            Some(Directive::Entry(_)) | Some(Directive::Extern(_)) => {
                logging::warning(
                    line.line_number,
                    format!("label \"{}\" before \".entry\"/\".extern\" is ignored", label),
                );
            }
            _ => {
                check_label_name(label, macros, line.line_number)?;
                let (value, kind) = match &line.directive {
                    Some(Directive::Data(_)) => (assembly.data.counter(), SymbolKind::Data),
                    Some(Directive::String(_)) => (assembly.data.counter(), SymbolKind::Str),
                    // a bare label sticks to the next instruction address
                    _ => (assembly.code.counter(), SymbolKind::Code),
                };
                insert_symbol(&mut assembly.symbols, label, value, kind, line.line_number)?;
            }
        }
    }

    match &line.directive {
        Some(Directive::Data(values)) => {
            for value in values {
                assembly.data.push(encoder::components::data_word(*value));
            }
        }
        Some(Directive::String(text)) => {
            for byte in text.bytes() {
                assembly.data.push(Word::new(byte as u16));
            }
            assembly.data.push(Word::new(0)); // NUL terminator
        }
        Some(Directive::Entry(name)) => {
            assembly
                .entry_declarations
                .push((name.clone(), line.line_number));
        }
        Some(Directive::Extern(name)) => {
            check_label_name(name, macros, line.line_number)?;
            insert_symbol(
                &mut assembly.symbols,
                name,
                0,
                SymbolKind::External,
                line.line_number,
            )?;
        }
        None => {}
    }

    if let Some(instruction) = &line.instruction {
        let encoded = encoder::encode_instruction(instruction, line.line_number)?;
        let base = assembly.code.counter();
        for word in encoded.words {
            assembly.code.push(word);
        }
        for reference in encoded.references {
            assembly.deferred.push(DeferredRef {
                ic_slot: base + reference.word_index as u32,
                name: reference.name,
                role: reference.role,
                line: line.line_number,
            });
        }
    }

    Ok(())
}

// A label or .extern name must look like an identifier and collide with
// nothing: reserved words, registers, mnemonics, or macros.
fn check_label_name(
    name: &str,
    macros: &MacroTable,
    line_num: usize,
) -> Result<(), AssemblyError> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(AssemblyError::SyntaxError {
            line: line_num,
            reason: format!("label \"{}\" exceeds {} characters", name, MAX_NAME_LENGTH),
        });
    }
    if is_reserved_word(name) || !is_valid_name(name) {
        return Err(AssemblyError::SemanticError {
            line: line_num,
            reason: format!("invalid label name: \"{}\"", name),
        });
    }
    if is_macro(macros, name) {
        return Err(AssemblyError::SemanticError {
            line: line_num,
            reason: format!("label \"{}\" is already a macro name", name),
        });
    }
    Ok(())
}

// ------------- unit tests -------------
