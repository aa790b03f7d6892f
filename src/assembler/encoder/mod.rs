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

pub mod components;
pub mod constants;

use crate::assembler::image::Word;
use crate::ast::{Instruction, Operand, OperandRole, Register};
use crate::errors::AssemblyError;

/// A direct-mode operand slot within a freshly encoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReference {
    pub word_index: usize,
    pub name: String,
    pub role: OperandRole,
}

/// Everything pass 1 emits for one instruction: its words in order, plus
/// the placeholder slots that pass 2 must fill.
#[derive(Debug, PartialEq)]
pub struct EncodedInstruction {
    pub words: Vec<Word>,
    pub references: Vec<PendingReference>,
}

/// Number of machine words an instruction occupies: the information word,
/// then one word per operand, except that two register-form operands share
/// a single combined word.
pub fn instruction_size(instruction: &Instruction) -> u32 {
    if combines_registers(instruction) {
        return 2;
    }
    let operands = [&instruction.source, &instruction.target];
    1 + operands.iter().filter(|op| op.is_some()).count() as u32
}

// true iff both operands are register-direct or register-indirect
fn combines_registers(instruction: &Instruction) -> bool {
    match (&instruction.source, &instruction.target) {
        (Some(source), Some(target)) => {
            source.mode().is_register_form() && target.mode().is_register_form()
        }
        _ => false,
    }
}

/// First-pass translation of one instruction. Direct-mode operands become
/// zero placeholders recorded as pending references.
pub fn encode_instruction(
    instruction: &Instruction,
    line_num: usize,
) -> Result<EncodedInstruction, AssemblyError> {
    check_addressing(instruction, line_num)?;

    let mut encoded = EncodedInstruction {
        words: vec![components::information_word(
            instruction.mnemonic.opcode(),
            instruction.source.as_ref().map(|op| op.mode()),
            instruction.target.as_ref().map(|op| op.mode()),
        )],
        references: Vec::new(),
    };

    if combines_registers(instruction) {
        encoded.words.push(components::register_word(
            register_of(instruction.source.as_ref()),
            register_of(instruction.target.as_ref()),
        ));
        return Ok(encoded);
    }

    let operands = [
        (instruction.source.as_ref(), OperandRole::Source),
        (instruction.target.as_ref(), OperandRole::Target),
    ];
    for (operand, role) in operands {
        let Some(operand) = operand else {
            continue;
        };
        match operand {
            Operand::Immediate(value) => {
                encoded.words.push(components::immediate_word(*value));
            }
            Operand::Label(name) => {
                encoded.references.push(PendingReference {
                    word_index: encoded.words.len(),
                    name: name.clone(),
                    role,
                });
                encoded.words.push(Word::new(0));
            }
            Operand::Register(register) | Operand::RegisterIndirect(register) => {
                let word = match role {
                    OperandRole::Source => components::register_word(Some(*register), None),
                    OperandRole::Target => components::register_word(None, Some(*register)),
                };
                encoded.words.push(word);
            }
        }
    }

    Ok(encoded)
}

fn register_of(operand: Option<&Operand>) -> Option<Register> {
    match operand {
        Some(Operand::Register(register)) => Some(*register),
        Some(Operand::RegisterIndirect(register)) => Some(*register),
        _ => None,
    }
}

// Validates both operands against the mnemonic's legal addressing modes.
fn check_addressing(instruction: &Instruction, line_num: usize) -> Result<(), AssemblyError> {
    let mnemonic = instruction.mnemonic;

    if let Some(source) = &instruction.source {
        if !mnemonic.source_modes().contains(&source.mode()) {
            return Err(AssemblyError::SemanticError {
                line: line_num,
                reason: format!(
                    "source operand \"{}\" has an illegal addressing mode for \"{}\"",
                    source, mnemonic
                ),
            });
        }
    }

    if let Some(target) = &instruction.target {
        if !mnemonic.target_modes().contains(&target.mode()) {
            return Err(AssemblyError::SemanticError {
                line: line_num,
                reason: format!(
                    "target operand \"{}\" has an illegal addressing mode for \"{}\"",
                    target, mnemonic
                ),
            });
        }
    }

    Ok(())
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::constants::*;
    use super::*;
    use crate::ast::Mnemonic;

    fn two_op(mnemonic: Mnemonic, source: Operand, target: Operand) -> Instruction {
        Instruction {
            mnemonic,
            source: Some(source),
            target: Some(target),
        }
    }

    fn one_op(mnemonic: Mnemonic, target: Operand) -> Instruction {
        Instruction {
            mnemonic,
            source: None,
            target: Some(target),
        }
    }

    #[test]
    fn test_combined_register_word() {
        // mov r3, r5 occupies two words in total
        let instruction = two_op(
            Mnemonic::Mov,
            Operand::Register(Register::R3),
            Operand::Register(Register::R5),
        );
        assert_eq!(instruction_size(&instruction), 2);

        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(encoded.words.len(), 2);
        assert_eq!(encoded.words[0].bits(), (1 << 10) | (1 << 6) | ARE_ABSOLUTE);
        assert_eq!(encoded.words[1].bits(), (3 << 6) | (5 << 3) | ARE_ABSOLUTE);
        assert!(encoded.references.is_empty());
    }

    #[test]
    fn test_indirect_and_direct_registers_combine() {
        let instruction = two_op(
            Mnemonic::Add,
            Operand::RegisterIndirect(Register::R1),
            Operand::Register(Register::R2),
        );
        assert_eq!(instruction_size(&instruction), 2);
        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(
            encoded.words[1].bits(),
            (1 << 6) | (2 << 3) | ARE_ABSOLUTE
        );
    }

    #[test]
    fn test_immediate_and_register_operands() {
        // mov #1, r0: information word + immediate word + register word
        let instruction = two_op(
            Mnemonic::Mov,
            Operand::Immediate(1),
            Operand::Register(Register::R0),
        );
        assert_eq!(instruction_size(&instruction), 3);

        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(encoded.words[0].bits(), (1 << 7) | (1 << 6) | ARE_ABSOLUTE);
        assert_eq!(encoded.words[1].bits(), (1 << 3) | ARE_ABSOLUTE);
        assert_eq!(encoded.words[2].bits(), ARE_ABSOLUTE);
    }

    #[test]
    fn test_label_operand_plants_placeholder() {
        let instruction = two_op(
            Mnemonic::Mov,
            Operand::Label("LEN".to_string()),
            Operand::Register(Register::R1),
        );
        let encoded = encode_instruction(&instruction, 7).unwrap();
        assert_eq!(encoded.words.len(), 3);
        assert_eq!(encoded.words[1].bits(), 0);
        assert_eq!(
            encoded.references,
            vec![PendingReference {
                word_index: 1,
                name: "LEN".to_string(),
                role: OperandRole::Source,
            }]
        );
    }

    #[test]
    fn test_two_label_operands() {
        let instruction = two_op(
            Mnemonic::Cmp,
            Operand::Label("A".to_string()),
            Operand::Label("B".to_string()),
        );
        assert_eq!(instruction_size(&instruction), 3);
        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(encoded.references.len(), 2);
        assert_eq!(encoded.references[0].word_index, 1);
        assert_eq!(encoded.references[1].word_index, 2);
    }

    #[test]
    fn test_single_operand_is_target() {
        let instruction = one_op(Mnemonic::Clr, Operand::Register(Register::R4));
        assert_eq!(instruction_size(&instruction), 2);
        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(
            encoded.words[0].bits(),
            (5 << OPCODE_SHIFT) | (1 << 6) | ARE_ABSOLUTE
        );
        assert_eq!(encoded.words[1].bits(), (4 << 3) | ARE_ABSOLUTE);
    }

    #[test]
    fn test_no_operand_instructions() {
        let instruction = Instruction {
            mnemonic: Mnemonic::Stop,
            source: None,
            target: None,
        };
        assert_eq!(instruction_size(&instruction), 1);
        let encoded = encode_instruction(&instruction, 1).unwrap();
        assert_eq!(encoded.words[0].bits(), (15 << OPCODE_SHIFT) | ARE_ABSOLUTE);
    }

    #[test]
    fn test_illegal_source_mode() {
        // lea only accepts a direct source
        let instruction = two_op(
            Mnemonic::Lea,
            Operand::Immediate(3),
            Operand::Register(Register::R1),
        );
        assert!(encode_instruction(&instruction, 1).is_err());
    }

    #[test]
    fn test_illegal_target_mode() {
        // mov cannot write to an immediate
        let instruction = two_op(
            Mnemonic::Mov,
            Operand::Register(Register::R1),
            Operand::Immediate(3),
        );
        assert!(encode_instruction(&instruction, 1).is_err());

        // jmp cannot target a bare register
        let instruction = one_op(Mnemonic::Jmp, Operand::Register(Register::R1));
        assert!(encode_instruction(&instruction, 1).is_err());
    }
}
