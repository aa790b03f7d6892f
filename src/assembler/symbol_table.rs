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

use crate::assembler::encoder::constants::LOAD_BASE;
use crate::errors::AssemblyError;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Code,
    Data,
    Str,
    External,
    Entry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub value: u32,
    pub kind: SymbolKind,
}

// The symbol table stores label names and their values. Before the rebase
// the value is a raw IC or DC offset; afterwards it is a final absolute
// address. Externals stay at 0 throughout.
pub type SymbolTable = HashMap<String, Symbol>;

pub fn insert_symbol(
    symbols: &mut SymbolTable,
    name: &str,
    value: u32,
    kind: SymbolKind,
    line_num: usize,
) -> Result<(), AssemblyError> {
    if let Some(existing) = symbols.get(name) {
        // repeating an identical .extern declaration is harmless
        if kind == SymbolKind::External && existing.kind == SymbolKind::External {
            return Ok(());
        }
        return Err(AssemblyError::SemanticError {
            line: line_num,
            reason: format!("duplicate label definition: \"{}\"", name),
        });
    }

    symbols.insert(name.to_string(), Symbol { value, kind });
    Ok(())
}

pub fn get_symbol<'a>(symbols: &'a SymbolTable, name: &str) -> Option<&'a Symbol> {
    symbols.get(name)
}

/// Promotes an existing code/data/string symbol to an entry. Returns the
/// promoted address, or None when the symbol was already an entry.
pub fn promote_to_entry(
    symbols: &mut SymbolTable,
    name: &str,
    line_num: usize,
) -> Result<Option<u32>, AssemblyError> {
    match symbols.get_mut(name) {
        None => Err(AssemblyError::SemanticError {
            line: line_num,
            reason: format!("unknown \".entry\" target: \"{}\"", name),
        }),
        Some(symbol) if symbol.kind == SymbolKind::External => Err(AssemblyError::SemanticError {
            line: line_num,
            reason: format!("\".entry\" cannot name the external symbol \"{}\"", name),
        }),
        Some(symbol) if symbol.kind == SymbolKind::Entry => Ok(None),
        Some(symbol) => {
            symbol.kind = SymbolKind::Entry;
            Ok(Some(symbol.value))
        }
    }
}

/// Rebases nominal offsets to final absolute addresses: code labels move up
/// by the load base, data and string labels land behind the instruction
/// image.
pub fn rebase_symbols(symbols: &mut SymbolTable, final_ic: u32) {
    for symbol in symbols.values_mut() {
        match symbol.kind {
            SymbolKind::Code => symbol.value += LOAD_BASE,
            SymbolKind::Data | SymbolKind::Str => symbol.value += final_ic + LOAD_BASE,
            SymbolKind::External | SymbolKind::Entry => {}
        }
    }
}

// ------------- unit tests -------------
