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

use crate::assembler::Assembly;
use crate::assembler::encoder::constants::LOAD_BASE;

/// Renders the object file: a header with the instruction and data word
/// counts, then one line per memory word with a 4-digit decimal address and
/// a 5-digit octal word, instruction image first.
pub fn render_object(assembly: &Assembly) -> String {
    let instruction_count = assembly.code.counter();
    let data_count = assembly.data.counter();

    let mut out = format!("{} {}\n", instruction_count, data_count);
    for cell in assembly.code.cells() {
        out.push_str(&format!(
            "{:04} {:05o}\n",
            cell.offset + LOAD_BASE,
            cell.word.bits()
        ));
    }
    for cell in assembly.data.cells() {
        out.push_str(&format!(
            "{:04} {:05o}\n",
            instruction_count + LOAD_BASE + cell.offset,
            cell.word.bits()
        ));
    }
    out
}

/// Renders the entries file, one `name address` line per promoted entry in
/// declaration order. None when the program declares no entries.
pub fn render_entries(assembly: &Assembly) -> Option<String> {
    if assembly.entries.is_empty() {
        return None;
    }
    let mut out = String::new();
    for entry in &assembly.entries {
        out.push_str(&format!("{} {:04}\n", entry.name, entry.address));
    }
    Some(out)
}

/// Renders the externals file, one `name address` line per use of an
/// external symbol, in ascending address order. None when no external is
/// used.
pub fn render_externals(assembly: &Assembly) -> Option<String> {
    if assembly.external_uses.is_empty() {
        return None;
    }
    let mut out = String::new();
    for external_use in &assembly.external_uses {
        out.push_str(&format!("{} {:04}\n", external_use.name, external_use.address));
    }
    Some(out)
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::image::Word;
    use crate::assembler::{EntryRecord, ExternalUse};

    #[test]
    fn test_object_header_and_addresses() {
        let mut assembly = Assembly::new();
        assembly.code.push(Word::new(0o444));
        assembly.code.push(Word::new(0o354));
        assembly.data.push(Word::new(0o7));

        let object = render_object(&assembly);
        assert_eq!(object, "2 1\n0100 00444\n0101 00354\n0102 00007\n");
    }

    #[test]
    fn test_object_counts_match_body() {
        let mut assembly = Assembly::new();
        for i in 0..3 {
            assembly.code.push(Word::new(i));
        }
        let object = render_object(&assembly);
        let mut lines = object.lines();
        assert_eq!(lines.next(), Some("3 0"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_entries_rendering() {
        let mut assembly = Assembly::new();
        assert_eq!(render_entries(&assembly), None);

        assembly.entries.push(EntryRecord {
            name: "MAIN".to_string(),
            address: 100,
        });
        assert_eq!(render_entries(&assembly).unwrap(), "MAIN 0100\n");
    }

    #[test]
    fn test_externals_rendering() {
        let mut assembly = Assembly::new();
        assert_eq!(render_externals(&assembly), None);

        assembly.external_uses.push(ExternalUse {
            name: "XPTR".to_string(),
            address: 101,
        });
        assembly.external_uses.push(ExternalUse {
            name: "XPTR".to_string(),
            address: 104,
        });
        assert_eq!(
            render_externals(&assembly).unwrap(),
            "XPTR 0101\nXPTR 0104\n"
        );
    }
}
