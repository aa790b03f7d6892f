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

use std::collections::HashMap;

// The macro table stores macro names and their bodies, one raw source line
// per entry, in definition order.
pub type MacroTable = HashMap<String, Vec<String>>;

pub fn is_macro(macros: &MacroTable, name: &str) -> bool {
    macros.contains_key(name)
}

pub fn register_macro(macros: &mut MacroTable, name: &str) {
    macros.insert(name.to_string(), Vec::new());
}

pub fn append_macro_line(macros: &mut MacroTable, name: &str, line: &str) {
    // The name was registered when its definition opened.
    if let Some(body) = macros.get_mut(name) {
        body.push(line.to_string());
    }
}

pub fn macro_body<'a>(macros: &'a MacroTable, name: &str) -> Option<&'a [String]> {
    macros.get(name).map(|body| body.as_slice())
}
