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

pub mod macro_table;

use crate::ast::{MAX_NAME_LENGTH, is_reserved_word, is_valid_name};
use crate::errors::AssemblyError;
use macro_table::*;

/// Source lines are at most this many characters, excluding the terminator.
pub const MAX_LINE_LENGTH: usize = 80;

enum MacroState {
    Outside,
    InsideMacro(String),
}

/// Macro expansion pass: replaces macro calls with their bodies and strips
/// definitions and comments. Returns the expanded text together with the
/// macro table, which later stages consult to reject macro names as labels.
pub fn expand_macros(source: &str) -> Result<(String, MacroTable), Vec<AssemblyError>> {
    let mut macros = MacroTable::new();
    let mut expanded = String::new();
    let mut errors: Vec<AssemblyError> = Vec::new();
    let mut state = MacroState::Outside;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;

        if line.len() > MAX_LINE_LENGTH {
            errors.push(AssemblyError::SyntaxError {
                line: line_number,
                reason: format!("line exceeds the limit of {} characters", MAX_LINE_LENGTH),
            });
            continue;
        }

        // comment lines disappear, even inside a macro body
        if line.trim_start().starts_with(';') {
            continue;
        }

        let mut words = line.split_whitespace();
        let first_word = words.next();

        if first_word == Some("endmacr") {
            if words.next().is_some() {
                errors.push(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: "excess text after \"endmacr\"".to_string(),
                });
                continue;
            }
            state = MacroState::Outside;
            continue;
        }

        if first_word == Some("macr") {
            match check_macro_header(words, line_number) {
                Ok(name) => {
                    if is_macro(&macros, &name) {
                        errors.push(AssemblyError::SemanticError {
                            line: line_number,
                            reason: format!("duplicate macro definition: \"{}\"", name),
                        });
                        continue;
                    }
                    register_macro(&mut macros, &name);
                    state = MacroState::InsideMacro(name);
                }
                Err(error) => errors.push(error),
            }
            continue;
        }

        if let MacroState::InsideMacro(name) = &state {
            append_macro_line(&mut macros, name, line);
            continue;
        }

        if let Some(word) = first_word {
            if is_macro(&macros, word) {
                if words.next().is_some() {
                    errors.push(AssemblyError::SyntaxError {
                        line: line_number,
                        reason: format!("excess text after call to macro \"{}\"", word),
                    });
                    continue;
                }
                for body_line in macro_body(&macros, word).unwrap_or_default() {
                    expanded.push_str(body_line);
                    expanded.push('\n');
                }
                continue;
            }
        }

        expanded.push_str(line);
        expanded.push('\n');
    }

    if let MacroState::InsideMacro(name) = state {
        errors.push(AssemblyError::SemanticErrorNoLine {
            reason: format!("macro \"{}\" has no matching \"endmacr\"", name),
        });
    }

    if errors.is_empty() {
        Ok((expanded, macros))
    } else {
        Err(errors)
    }
}

// Validates a "macr <name>" header and extracts the name.
fn check_macro_header<'a>(
    mut rest: impl Iterator<Item = &'a str>,
    line_number: usize,
) -> Result<String, AssemblyError> {
    let Some(name) = rest.next() else {
        return Err(AssemblyError::SyntaxError {
            line: line_number,
            reason: "missing name after \"macr\"".to_string(),
        });
    };

    if rest.next().is_some() {
        return Err(AssemblyError::SyntaxError {
            line: line_number,
            reason: "excess text after macro definition".to_string(),
        });
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(AssemblyError::SemanticError {
            line: line_number,
            reason: format!("macro name \"{}\" exceeds {} characters", name, MAX_NAME_LENGTH),
        });
    }

    if is_reserved_word(name) || !is_valid_name(name) {
        return Err(AssemblyError::SemanticError {
            line: line_number,
            reason: format!("invalid macro name: \"{}\"", name),
        });
    }

    Ok(name.to_string())
}

// ------------- unit tests -------------
