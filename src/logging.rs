//! Colored diagnostic reporting for the assembly passes

use crate::errors::AssemblyError;
use colored::Colorize;

/// Reports one accumulated diagnostic against its source file. The error's
/// own rendering carries the pass kind and line number.
pub fn report(file_name: &str, error: &AssemblyError) {
    eprintln!("{} {}: {}", "error:".red().bold(), file_name, error);
}

/// Reports a failure outside any source line, such as unreadable input or
/// an output file that could not be created.
pub fn failure(message: String) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Reports an oddity the assembler recovered from without failing the file.
pub fn warning(line_number: usize, message: String) {
    eprintln!(
        "{} line {}: {}",
        "warning:".yellow().bold(),
        line_number,
        message
    );
}
