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

use std::fmt;

/// Identifiers (labels and macro names) are at most this many characters.
pub const MAX_NAME_LENGTH: usize = 31;

// Words that can never be used as a label or macro name.
pub const RESERVED_WORDS: [&str; 30] = [
    "mov", "cmp", "add", "sub", "lea", "clr", "not", "inc", "dec", "jmp", "bne", "red", "prn",
    "jsr", "rts", "stop", ".data", ".string", ".entry", ".extern", "macr", "endmacr", "r0", "r1",
    "r2", "r3", "r4", "r5", "r6", "r7",
];

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Checks the lexical shape of a label or macro name: leading letter, then
/// letters, digits or underscores, at most MAX_NAME_LENGTH characters.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_NAME_LENGTH && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    pub fn from_name(name: &str) -> Option<Register> {
        match name {
            "r0" => Some(Register::R0),
            "r1" => Some(Register::R1),
            "r2" => Some(Register::R2),
            "r3" => Some(Register::R3),
            "r4" => Some(Register::R4),
            "r5" => Some(Register::R5),
            "r6" => Some(Register::R6),
            "r7" => Some(Register::R7),
            _ => None,
        }
    }

    pub fn number(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.number())
    }
}

/// The four operand addressing modes, numbered as the machine numbers them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate = 0,
    Direct = 1,
    RegisterIndirect = 2,
    RegisterDirect = 3,
}

impl AddressingMode {
    pub fn number(self) -> u16 {
        self as u16
    }

    /// Register-direct and register-indirect operands share the register
    /// operand-word layout.
    pub fn is_register_form(self) -> bool {
        matches!(
            self,
            AddressingMode::RegisterIndirect | AddressingMode::RegisterDirect
        )
    }
}

// Represents all possible forms an argument to an instruction can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Immediate(i32),             // #5
    Label(String),              // my_label
    RegisterIndirect(Register), // *r3
    Register(Register),         // r3
}

impl Operand {
    pub fn mode(&self) -> AddressingMode {
        match self {
            Operand::Immediate(_) => AddressingMode::Immediate,
            Operand::Label(_) => AddressingMode::Direct,
            Operand::RegisterIndirect(_) => AddressingMode::RegisterIndirect,
            Operand::Register(_) => AddressingMode::RegisterDirect,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate(value) => write!(f, "#{}", value),
            Operand::Label(name) => write!(f, "{}", name),
            Operand::RegisterIndirect(reg) => write!(f, "*{}", reg),
            Operand::Register(reg) => write!(f, "{}", reg),
        }
    }
}

/// Which slot of an instruction an operand occupies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandRole {
    Source,
    Target,
}

impl fmt::Display for OperandRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandRole::Source => write!(f, "source"),
            OperandRole::Target => write!(f, "target"),
        }
    }
}

// --- Instructions ---

const ALL_MODES: [AddressingMode; 4] = [
    AddressingMode::Immediate,
    AddressingMode::Direct,
    AddressingMode::RegisterIndirect,
    AddressingMode::RegisterDirect,
];
const NO_IMMEDIATE: [AddressingMode; 3] = [
    AddressingMode::Direct,
    AddressingMode::RegisterIndirect,
    AddressingMode::RegisterDirect,
];
const DIRECT_ONLY: [AddressingMode; 1] = [AddressingMode::Direct];
const JUMP_MODES: [AddressingMode; 2] = [AddressingMode::Direct, AddressingMode::RegisterIndirect];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mnemonic {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Red,
    Prn,
    Jsr,
    Rts,
    Stop,
}

impl Mnemonic {
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        match name {
            "mov" => Some(Mnemonic::Mov),
            "cmp" => Some(Mnemonic::Cmp),
            "add" => Some(Mnemonic::Add),
            "sub" => Some(Mnemonic::Sub),
            "lea" => Some(Mnemonic::Lea),
            "clr" => Some(Mnemonic::Clr),
            "not" => Some(Mnemonic::Not),
            "inc" => Some(Mnemonic::Inc),
            "dec" => Some(Mnemonic::Dec),
            "jmp" => Some(Mnemonic::Jmp),
            "bne" => Some(Mnemonic::Bne),
            "red" => Some(Mnemonic::Red),
            "prn" => Some(Mnemonic::Prn),
            "jsr" => Some(Mnemonic::Jsr),
            "rts" => Some(Mnemonic::Rts),
            "stop" => Some(Mnemonic::Stop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::Cmp => "cmp",
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::Lea => "lea",
            Mnemonic::Clr => "clr",
            Mnemonic::Not => "not",
            Mnemonic::Inc => "inc",
            Mnemonic::Dec => "dec",
            Mnemonic::Jmp => "jmp",
            Mnemonic::Bne => "bne",
            Mnemonic::Red => "red",
            Mnemonic::Prn => "prn",
            Mnemonic::Jsr => "jsr",
            Mnemonic::Rts => "rts",
            Mnemonic::Stop => "stop",
        }
    }

    pub fn opcode(self) -> u16 {
        match self {
            Mnemonic::Mov => 0,
            Mnemonic::Cmp => 1,
            Mnemonic::Add => 2,
            Mnemonic::Sub => 3,
            Mnemonic::Lea => 4,
            Mnemonic::Clr => 5,
            Mnemonic::Not => 6,
            Mnemonic::Inc => 7,
            Mnemonic::Dec => 8,
            Mnemonic::Jmp => 9,
            Mnemonic::Bne => 10,
            Mnemonic::Red => 11,
            Mnemonic::Prn => 12,
            Mnemonic::Jsr => 13,
            Mnemonic::Rts => 14,
            Mnemonic::Stop => 15,
        }
    }

    pub fn operand_count(self) -> usize {
        match self {
            Mnemonic::Mov | Mnemonic::Cmp | Mnemonic::Add | Mnemonic::Sub | Mnemonic::Lea => 2,
            Mnemonic::Rts | Mnemonic::Stop => 0,
            _ => 1,
        }
    }

    /// Legal source addressing modes; empty for instructions without a
    /// source operand.
    pub fn source_modes(self) -> &'static [AddressingMode] {
        match self {
            Mnemonic::Mov | Mnemonic::Cmp | Mnemonic::Add | Mnemonic::Sub => &ALL_MODES,
            Mnemonic::Lea => &DIRECT_ONLY,
            _ => &[],
        }
    }

    /// Legal target addressing modes; empty for operand-less instructions.
    pub fn target_modes(self) -> &'static [AddressingMode] {
        match self {
            Mnemonic::Cmp | Mnemonic::Prn => &ALL_MODES,
            Mnemonic::Jmp | Mnemonic::Bne | Mnemonic::Jsr => &JUMP_MODES,
            Mnemonic::Rts | Mnemonic::Stop => &[],
            _ => &NO_IMMEDIATE,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Enum representing a single instruction: a mnemonic and its operands by
// role. One-operand instructions carry only a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub source: Option<Operand>,
    pub target: Option<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Data(Vec<i32>),   // .data 7, -3, +5
    String(String),   // .string "abc"
    Entry(String),    // .entry MAIN
    Extern(String),   // .extern XPTR
}

// --- Assembly Line Structure ---

// Represents a single line of expanded code, which can have a label, an
// instruction, or a directive.
#[derive(Debug, Clone, Default)]
pub struct SourceLine {
    pub line_number: usize,
    pub label: Option<String>,
    pub instruction: Option<Instruction>,
    pub directive: Option<Directive>,
}

// ------------- unit tests -------------
