use clap::Parser;
use intrascan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
