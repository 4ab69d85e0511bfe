// xlang: run or check a program from the command line

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use xlang::diagnostics;
use xlang::error::Error;
use xlang::interpreter::Interpreter;

#[derive(Parser)]
#[command(name = "xlang", version, about = "Validate and run an xlang program")]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Stop after validation
    #[arg(long)]
    check: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,
}

fn execute(source: &str, check: bool) -> Result<(), Error> {
    let program = xlang::compile(source)?;
    info!(
        "validated {} functions, {} typed nodes",
        program.globals.functions.len(),
        program.types.len()
    );
    if check {
        return Ok(());
    }

    Interpreter::new(&program).with_echo(true).run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match execute(&source, cli.check) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let file_name = cli.file.display().to_string();
            eprint!(
                "{}",
                diagnostics::render(&error, &file_name, &source, !cli.no_color)
            );
            ExitCode::from(diagnostics::exit_code(&error))
        }
    }
}
