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

use crate::assembler::encoder::constants::*;
use crate::assembler::image::Word;
use crate::ast::{AddressingMode, Register};

/// First word of every encoded instruction: opcode, one-hot addressing-mode
/// bits for whichever operands exist, ARE = absolute.
pub fn information_word(
    opcode: u16,
    source: Option<AddressingMode>,
    target: Option<AddressingMode>,
) -> Word {
    let mut bits = (opcode << OPCODE_SHIFT) | ARE_ABSOLUTE;
    if let Some(mode) = source {
        bits |= 1 << (mode.number() + SOURCE_MODE_SHIFT);
    }
    if let Some(mode) = target {
        bits |= 1 << (mode.number() + TARGET_MODE_SHIFT);
    }
    Word::new(bits)
}

/// Operand word for a `#value` immediate, two's complement in bits 14-3.
pub fn immediate_word(value: i32) -> Word {
    let field = (value as i16 as u16) & OPERAND_VALUE_MASK;
    Word::new((field << OPERAND_VALUE_SHIFT) | ARE_ABSOLUTE)
}

/// Operand word for a resolved internal label.
pub fn relocatable_word(address: u32) -> Word {
    Word::new(((address as u16) << OPERAND_VALUE_SHIFT) | ARE_RELOCATABLE)
}

/// Operand word for a use of an external symbol: address bits stay zero.
pub fn external_word() -> Word {
    Word::new(ARE_EXTERNAL)
}

/// Register operand word. Covers the combined form when both slots are
/// given and the single-register form otherwise.
pub fn register_word(source: Option<Register>, target: Option<Register>) -> Word {
    let mut bits = ARE_ABSOLUTE;
    if let Some(register) = source {
        bits |= register.number() << SOURCE_REGISTER_SHIFT;
    }
    if let Some(register) = target {
        bits |= register.number() << TARGET_REGISTER_SHIFT;
    }
    Word::new(bits)
}

/// Data word for one `.data` value, 15-bit two's complement.
pub fn data_word(value: i32) -> Word {
    Word::new(value as i16 as u16)
}

// ------------- unit tests -------------
