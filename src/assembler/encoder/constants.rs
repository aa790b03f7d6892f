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

// machine words are 15 bits wide
pub const WORD_MASK: u16 = 0x7FFF;

// ARE bits, the low three bits of every word
pub const ARE_ABSOLUTE: u16 = 0b100;
pub const ARE_RELOCATABLE: u16 = 0b010;
pub const ARE_EXTERNAL: u16 = 0b001;

// information word fields
pub const OPCODE_SHIFT: u16 = 11;
pub const SOURCE_MODE_SHIFT: u16 = 7;
pub const TARGET_MODE_SHIFT: u16 = 3;

// operand word fields
pub const OPERAND_VALUE_SHIFT: u16 = 3;
pub const OPERAND_VALUE_MASK: u16 = 0xFFF;
pub const SOURCE_REGISTER_SHIFT: u16 = 6;
pub const TARGET_REGISTER_SHIFT: u16 = 3;

// immediate operands live in a signed 12-bit field
pub const IMMEDIATE_MIN: i32 = -2048;
pub const IMMEDIATE_MAX: i32 = 2047;

// .data values occupy a full 15-bit word
pub const DATA_MIN: i32 = -32767;
pub const DATA_MAX: i32 = 32767;

/// Address the instruction image is loaded at.
pub const LOAD_BASE: u32 = 100;

/// Machine words available to one program, code and data combined.
pub const MEMORY_SIZE: u32 = 4096;
