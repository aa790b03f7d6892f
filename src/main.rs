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

use asm15::{assemble_file, logging};
use clap::Parser as clap_parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(clap_parser)]
#[clap(version = "0.1.0", about = "Assembler for the 15-bit word machine")]
struct Opts {
    /// Source file base names; <name>.as is assembled to <name>.am/.ob and,
    /// when applicable, <name>.ent/.ext
    #[clap(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let opts: Opts = Opts::parse();
    let mut all_succeeded = true;

    for base in &opts.files {
        match assemble_file(base) {
            Ok(true) => {
                println!(
                    "Successfully assembled {}",
                    base.with_extension("as").display()
                );
            }
            Ok(false) => all_succeeded = false,
            Err(error) => {
                logging::failure(format!("{:#}", error));
                all_succeeded = false;
            }
        }
    }

    if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
