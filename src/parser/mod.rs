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

mod ast_builder;

use crate::ast::SourceLine;
use crate::errors::AssemblyError;
use ast_builder::AstBuilder;
use pest::Parser;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct LineParser;

/// Parses macro-expanded text line by line. A line that fails to parse or
/// build is reported and discarded; every remaining line is still processed,
/// so one bad line yields exactly one diagnostic.
pub fn parse_source(source: &str) -> (Vec<SourceLine>, Vec<AssemblyError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (index, text) in source.lines().enumerate() {
        match parse_line(text, index + 1) {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => {}
            Err(error) => errors.push(error),
        }
    }

    (lines, errors)
}

/// Parses a single physical line. Returns None for blank and comment-only
/// lines.
pub fn parse_line(text: &str, line_number: usize) -> Result<Option<SourceLine>, AssemblyError> {
    let mut pairs =
        LineParser::parse(Rule::line, text).map_err(|error| AssemblyError::SyntaxError {
            line: line_number,
            reason: syntax_reason(&error),
        })?;

    let mut line = SourceLine {
        line_number,
        ..SourceLine::default()
    };

    for pair in pairs.next().unwrap().into_inner() {
        match pair.as_rule() {
            Rule::label_def => {
                line.label = Some(pair.into_inner().next().unwrap().as_str().to_string());
            }
            Rule::statement => {
                let inner = pair.into_inner().next().unwrap();
                match inner.as_rule() {
                    Rule::instruction => {
                        let builder = AstBuilder::new(inner, line_number);
                        line.instruction = Some(builder.build_instruction()?);
                    }
                    Rule::directive => {
                        let inner = inner.into_inner().next().unwrap();
                        let builder = AstBuilder::new(inner, line_number);
                        line.directive = Some(builder.build_directive()?);
                    }
                    _ => unreachable!("Unknown statement rule: {:?}", inner.as_rule()),
                }
            }
            Rule::EOI => {}
            _ => unreachable!("Unknown line rule: {:?}", pair.as_rule()),
        }
    }

    if line.label.is_none() && line.instruction.is_none() && line.directive.is_none() {
        return Ok(None);
    }

    Ok(Some(line))
}

// Condenses a pest error into a one-line reason with the failing column.
fn syntax_reason(error: &pest::error::Error<Rule>) -> String {
    let column = match error.line_col {
        pest::error::LineColLocation::Pos((_, column)) => column,
        pest::error::LineColLocation::Span((_, column), _) => column,
    };
    format!("malformed at column {}: {}", column, error.variant.message())
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn parse_one(text: &str) -> SourceLine {
        parse_line(text, 1).unwrap().unwrap()
    }

    #[test]
    fn test_parse_two_operand_instruction() {
        let line = parse_one("mov r3, r5");
        let instruction = line.instruction.unwrap();
        assert_eq!(instruction.mnemonic, Mnemonic::Mov);
        assert_eq!(instruction.source, Some(Operand::Register(Register::R3)));
        assert_eq!(instruction.target, Some(Operand::Register(Register::R5)));
    }

    #[test]
    fn test_parse_immediate_and_indirect() {
        let line = parse_one("cmp #-7, *r2");
        let instruction = line.instruction.unwrap();
        assert_eq!(instruction.source, Some(Operand::Immediate(-7)));
        assert_eq!(
            instruction.target,
            Some(Operand::RegisterIndirect(Register::R2))
        );
    }

    #[test]
    fn test_parse_labelled_instruction() {
        let line = parse_one("LOOP: jmp END");
        assert_eq!(line.label.as_deref(), Some("LOOP"));
        let instruction = line.instruction.unwrap();
        assert_eq!(instruction.mnemonic, Mnemonic::Jmp);
        assert_eq!(instruction.source, None);
        assert_eq!(instruction.target, Some(Operand::Label("END".to_string())));
    }

    #[test]
    fn test_parse_label_only_line() {
        let line = parse_one("HERE:");
        assert_eq!(line.label.as_deref(), Some("HERE"));
        assert!(line.instruction.is_none());
        assert!(line.directive.is_none());
    }

    #[test]
    fn test_parse_no_operand_instruction() {
        let line = parse_one("stop");
        assert_eq!(line.instruction.unwrap().mnemonic, Mnemonic::Stop);
    }

    #[test]
    fn test_parse_data_directive() {
        let line = parse_one("LIST: .data 7, -3, +5");
        assert_eq!(line.label.as_deref(), Some("LIST"));
        assert_eq!(line.directive, Some(Directive::Data(vec![7, -3, 5])));
    }

    #[test]
    fn test_parse_string_directive() {
        let line = parse_one(".string \"abc\"");
        assert_eq!(line.directive, Some(Directive::String("abc".to_string())));
    }

    #[test]
    fn test_parse_entry_and_extern() {
        assert_eq!(
            parse_one(".entry MAIN").directive,
            Some(Directive::Entry("MAIN".to_string()))
        );
        assert_eq!(
            parse_one(".extern XPTR").directive,
            Some(Directive::Extern("XPTR".to_string()))
        );
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("   \t ", 2).unwrap().is_none());
        assert!(parse_line("; just a comment", 3).unwrap().is_none());
    }

    #[test]
    fn test_trailing_comment() {
        let line = parse_one("inc r1 ; bump the counter");
        assert_eq!(line.instruction.unwrap().mnemonic, Mnemonic::Inc);
    }

    #[test]
    fn test_unknown_mnemonic() {
        let error = parse_line("move r1, r2", 4).unwrap_err();
        assert_eq!(error.line(), Some(4));
        assert!(error.to_string().contains("move"));
    }

    #[test]
    fn test_unknown_directive() {
        let error = parse_line(".word 5", 2).unwrap_err();
        assert!(error.to_string().contains(".word"));
    }

    #[test]
    fn test_wrong_operand_count() {
        assert!(parse_line("mov r1", 1).is_err());
        assert!(parse_line("rts r1", 1).is_err());
        assert!(parse_line("inc r1, r2", 1).is_err());
    }

    #[test]
    fn test_bad_comma_arrangements() {
        assert!(parse_line("mov r1,, r2", 1).is_err());
        assert!(parse_line("mov , r1, r2", 1).is_err());
        assert!(parse_line(".data 1, 2,", 1).is_err());
        assert!(parse_line(".data ,1", 1).is_err());
        assert!(parse_line("mov r1 r2", 1).is_err());
    }

    #[test]
    fn test_immediate_range() {
        assert!(parse_line("prn #2047", 1).is_ok());
        assert!(parse_line("prn #-2048", 1).is_ok());
        assert!(parse_line("prn #2048", 1).is_err());
        assert!(parse_line("prn #-2049", 1).is_err());
    }

    #[test]
    fn test_data_range() {
        assert!(parse_line(".data 32767, -32767", 1).is_ok());
        assert!(parse_line(".data 32768", 1).is_err());
        assert!(parse_line(".data -32768", 1).is_err());
    }

    #[test]
    fn test_bad_register_indirect() {
        // *r8 is not a register; the line must not parse
        assert!(parse_line("jmp *r8", 1).is_err());
    }

    #[test]
    fn test_empty_string_rejected() {
        assert!(parse_line(".string \"\"", 1).is_err());
    }

    #[test]
    fn test_unterminated_string_rejected() {
        assert!(parse_line(".string \"abc", 1).is_err());
    }

    #[test]
    fn test_label_requires_adjacent_colon() {
        assert!(parse_line("LOOP : stop", 1).is_err());
    }

    #[test]
    fn test_register_like_identifiers_are_labels() {
        // r8 and r10 fall outside r0..r7 and read as plain symbols
        let line = parse_one("jmp r8");
        assert_eq!(
            line.instruction.unwrap().target,
            Some(Operand::Label("r8".to_string()))
        );
    }
}
