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

use crate::assembler::encoder::constants::{DATA_MAX, DATA_MIN, IMMEDIATE_MAX, IMMEDIATE_MIN};
use crate::ast::{Directive, Instruction, MAX_NAME_LENGTH, Mnemonic, Operand, Register};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::{Pair, Pairs};

pub struct AstBuilder<'a> {
    line_number: usize,
    rule: Rule,
    pairs: Pairs<'a, Rule>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(pair: Pair<'a, Rule>, line_number: usize) -> Self {
        Self {
            line_number,
            rule: pair.as_rule(),
            pairs: pair.into_inner(),
        }
    }

    // Helper to build an Instruction from a pest instruction Pair
    pub fn build_instruction(mut self) -> Result<Instruction, AssemblyError> {
        let name = self.pairs.next().unwrap().as_str();
        let Some(mnemonic) = Mnemonic::from_name(name) else {
            return Err(AssemblyError::SemanticError {
                line: self.line_number,
                reason: format!("unknown instruction mnemonic: \"{}\"", name),
            });
        };

        let mut operands: Vec<Operand> = Vec::new();
        while let Some(pair) = self.pairs.next() {
            operands.push(self.build_operand(pair)?);
        }

        if operands.len() != mnemonic.operand_count() {
            return Err(AssemblyError::SemanticError {
                line: self.line_number,
                reason: format!(
                    "\"{}\" expects {} operand(s), found {}",
                    mnemonic,
                    mnemonic.operand_count(),
                    operands.len()
                ),
            });
        }

        let target = operands.pop();
        let source = operands.pop();
        Ok(Instruction {
            mnemonic,
            source,
            target,
        })
    }

    pub fn build_directive(self) -> Result<Directive, AssemblyError> {
        match self.rule {
            Rule::data_directive => self.build_data_directive(),
            Rule::string_directive => self.build_string_directive(),
            Rule::entry_directive => self.build_entry_directive(),
            Rule::extern_directive => self.build_extern_directive(),
            Rule::unknown_directive => self.build_unknown_directive(),
            _ => unreachable!("Unknown directive rule: {:?}", self.rule),
        }
    }

    // ------------- operand builders -------------

    fn build_operand(&self, pair: Pair<'a, Rule>) -> Result<Operand, AssemblyError> {
        let inner = pair.into_inner().next().unwrap();
        match inner.as_rule() {
            Rule::immediate => self.build_immediate(inner),
            Rule::register_indirect => {
                let register = build_register(inner.into_inner().next().unwrap());
                Ok(Operand::RegisterIndirect(register))
            }
            Rule::register => Ok(Operand::Register(build_register(inner))),
            Rule::identifier => {
                let name = self.check_identifier(inner)?;
                Ok(Operand::Label(name))
            }
            _ => unreachable!("Unknown operand rule: {:?}", inner.as_rule()),
        }
    }

    fn build_immediate(&self, pair: Pair<'a, Rule>) -> Result<Operand, AssemblyError> {
        let digits = pair.into_inner().next().unwrap().as_str();
        let value: i64 = digits.parse().unwrap_or(i64::MAX);
        if value < IMMEDIATE_MIN as i64 || value > IMMEDIATE_MAX as i64 {
            return Err(AssemblyError::SemanticError {
                line: self.line_number,
                reason: format!(
                    "immediate value {} is outside the range [{}, {}]",
                    digits, IMMEDIATE_MIN, IMMEDIATE_MAX
                ),
            });
        }
        Ok(Operand::Immediate(value as i32))
    }

    fn check_identifier(&self, pair: Pair<'a, Rule>) -> Result<String, AssemblyError> {
        let name = pair.as_str();
        if name.len() > MAX_NAME_LENGTH {
            return Err(AssemblyError::SyntaxError {
                line: self.line_number,
                reason: format!("identifier \"{}\" exceeds {} characters", name, MAX_NAME_LENGTH),
            });
        }
        Ok(name.to_string())
    }

    // ------------- directive builders -------------

    // build a .data directive
    fn build_data_directive(self) -> Result<Directive, AssemblyError> {
        let line_number = self.line_number;
        let mut values: Vec<i32> = Vec::new();

        for pair in self.pairs {
            if pair.as_rule() != Rule::integer {
                continue;
            }
            let digits = pair.as_str();
            let value: i64 = digits.parse().unwrap_or(i64::MAX);
            if value < DATA_MIN as i64 || value > DATA_MAX as i64 {
                return Err(AssemblyError::SemanticError {
                    line: line_number,
                    reason: format!(
                        "\".data\" value {} is outside the range [{}, {}]",
                        digits, DATA_MIN, DATA_MAX
                    ),
                });
            }
            values.push(value as i32);
        }

        Ok(Directive::Data(values))
    }

    // build a .string directive
    fn build_string_directive(self) -> Result<Directive, AssemblyError> {
        let line_number = self.line_number;
        let literal = self
            .pairs
            .into_iter()
            .find(|p| p.as_rule() == Rule::string_literal)
            .unwrap();
        let content = literal.into_inner().next().unwrap().as_str();

        if !content.is_ascii() {
            return Err(AssemblyError::SemanticError {
                line: line_number,
                reason: "\".string\" literal contains a non-ASCII character".to_string(),
            });
        }

        Ok(Directive::String(content.to_string()))
    }

    fn build_entry_directive(mut self) -> Result<Directive, AssemblyError> {
        let name = self.take_identifier()?;
        Ok(Directive::Entry(name))
    }

    fn build_extern_directive(mut self) -> Result<Directive, AssemblyError> {
        let name = self.take_identifier()?;
        Ok(Directive::Extern(name))
    }

    fn build_unknown_directive(mut self) -> Result<Directive, AssemblyError> {
        let name = self
            .pairs
            .next()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
        Err(AssemblyError::SemanticError {
            line: self.line_number,
            reason: format!("unknown directive: \".{}\"", name),
        })
    }

    fn take_identifier(&mut self) -> Result<String, AssemblyError> {
        let pair = self
            .pairs
            .by_ref()
            .find(|p| p.as_rule() == Rule::identifier)
            .unwrap();
        self.check_identifier(pair)
    }
}

// build a register object from a pair
fn build_register(pair: Pair<Rule>) -> Register {
    match Register::from_name(pair.as_str()) {
        Some(register) => register,
        None => unreachable!("Invalid register: {}", pair.as_str()),
    }
}
