use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

mod cli_model;

/// The two alternative ways of describing the assembly
pub enum AssemblyInput {
    Fasta {
        fasta: PathBuf,
        length_coverage: PathBuf,
    },
    Gfa(PathBuf),
}

pub struct Config {
    assembly: Option<AssemblyInput>,
    counts: Option<PathBuf>,
    output: PathBuf,
    report: Option<PathBuf>,
    jellyfish: PathBuf,
    query_per_sequence: PathBuf,
    threads: usize,
    date: DateTime<Local>,
}

impl Config {
    pub fn assembly(&self) -> Option<&AssemblyInput> {
        self.assembly.as_ref()
    }

    /// Pre-computed per sequence counts; if set the counting engine is not run
    pub fn counts(&self) -> Option<&Path> {
        self.counts.as_deref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn report(&self) -> Option<&Path> {
        self.report.as_deref()
    }

    pub fn jellyfish(&self) -> &Path {
        &self.jellyfish
    }

    pub fn query_per_sequence(&self) -> &Path {
        &self.query_per_sequence
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn date(&self) -> &DateTime<Local> {
        &self.date
    }
}

fn get_path(m: &clap::ArgMatches, id: &str) -> Option<PathBuf> {
    m.get_one::<PathBuf>(id).map(|p| p.to_owned())
}

pub fn handle_cli() -> anyhow::Result<Config> {
    let c = cli_model::cli_model();
    let m = c.get_matches();
    super::utils::init_log(&m);

    let assembly = if let Some(gfa) = get_path(&m, "assembly_gfa") {
        Some(AssemblyInput::Gfa(gfa))
    } else {
        match (
            get_path(&m, "assembly_fasta"),
            get_path(&m, "assembly_length_coverage"),
        ) {
            (Some(fasta), Some(length_coverage)) => Some(AssemblyInput::Fasta {
                fasta,
                length_coverage,
            }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "Fasta input requires both --assembly-fasta and --assembly-length-coverage"
                ))
            }
        }
    };

    let threads = m
        .get_one::<u64>("threads")
        .map(|x| *x as usize)
        .expect("Missing default argument");

    let output = get_path(&m, "output").expect("Missing default argument");
    let jellyfish = get_path(&m, "jellyfish").expect("Missing default argument");
    let query_per_sequence = get_path(&m, "query_per_sequence").expect("Missing default argument");

    Ok(Config {
        assembly,
        counts: get_path(&m, "counts"),
        output,
        report: get_path(&m, "report"),
        jellyfish,
        query_per_sequence,
        threads,
        date: Local::now(),
    })
}
