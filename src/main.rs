#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod assembly;
mod cli;
mod counts;
mod engine;
mod error;
mod output;
mod process;
mod profile;
mod utils;

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli()?;
    match cfg.assembly() {
        Some(input) => {
            let res = process::process(&cfg, input)?;
            output::output_report(&cfg, &res)
        }
        None => {
            warn!("Check your inputs, you have to provide fasta + length_coverage or gfa file");
            Ok(())
        }
    }
}
