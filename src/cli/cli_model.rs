use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command};

use crate::utils::LogLevel;

pub(super) fn cli_model() -> Command {
    command!()
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("info")
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .action(ArgAction::SetTrue)
                .long("quiet")
                .conflicts_with("loglevel")
                .help("Silence all output"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .visible_alias("mpthreads")
                .value_parser(value_parser!(u64).range(1..))
                .value_name("INT")
                .default_value("4")
                .help("Set number of threads used to build the jellyfish k-mer database"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .default_value("gkp_output.tsv")
                .help("Set output file name"),
        )
        .arg(
            Arg::new("report")
                .short('r')
                .long("report")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("Write a JSON run report"),
        )
        .arg(
            Arg::new("counts")
                .short('c')
                .long("counts")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("Use existing query_per_sequence output instead of running jellyfish"),
        )
        .arg(
            Arg::new("jellyfish")
                .long("jellyfish")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("jellyfish")
                .help("Set jellyfish command"),
        )
        .arg(
            Arg::new("query_per_sequence")
                .long("query-per-sequence")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("query_per_sequence")
                .help("Set query_per_sequence command"),
        )
        .arg(
            Arg::new("assembly_gfa")
                .long("assembly-gfa")
                .alias("assembly_gfa")
                .value_parser(value_parser!(PathBuf))
                .value_name("GFA")
                .conflicts_with_all(["assembly_fasta", "assembly_length_coverage"])
                .help("Input assembly GFA file"),
        )
        .arg(
            Arg::new("assembly_fasta")
                .long("assembly-fasta")
                .alias("assembly_fasta")
                .value_parser(value_parser!(PathBuf))
                .value_name("FASTA")
                .requires("assembly_length_coverage")
                .help("Input assembly FASTA file"),
        )
        .arg(
            Arg::new("assembly_length_coverage")
                .long("assembly-length-coverage")
                .alias("assembly_length_coverage")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .requires("assembly_fasta")
                .help("Input assembly length and coverage file"),
        )
}
