//! Compile a script from a file (or a built-in sample) and print the artifact.
//!
//! `RUST_LOG=machina_compiler=trace cargo run --example compile_script -- script.ts`

use machina_compiler::{compile_with_options, scan_labels, CompileError, CompileOptions};
use std::process::ExitCode;

const SAMPLE: &str = r#"const greeting: string = "hello";

greet: console.log(greeting);

twice: {
    for (const n of [1, 2]) {
        console.log(greeting, n);
    }
}
"#;

fn main() -> ExitCode {
    env_logger::init();

    let (file_name, code) = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(code) => (path, code),
            Err(e) => {
                eprintln!("cannot read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => ("sample.ts".to_string(), SAMPLE.to_string()),
    };

    for lens in scan_labels(&code) {
        println!("// line {}: {} -> {}", lens.line, lens.title, lens.unit_name);
    }

    let options = CompileOptions::default().with_file_name(file_name);
    match compile_with_options(&code, &options) {
        Ok(artifact) => {
            for warning in &artifact.warnings {
                eprintln!("{}", warning);
            }
            print!("{}", artifact.code);
            ExitCode::SUCCESS
        }
        Err(CompileError::Compilation(e)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(CompileError::Emission(e)) => {
            eprintln!("{}: {}", e, e.reason);
            ExitCode::FAILURE
        }
    }
}
