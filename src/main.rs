use clap::Parser;
use powerpos::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
