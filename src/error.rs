use std::{io, process::ExitStatus};

use thiserror::Error;

/// Problems with the external k-mer counting engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("The {program} command is not found in the environment")]
    NotFound {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("The {program} command is not accessible ({status})")]
    NotUsable { program: String, status: ExitStatus },
    #[error("{stage} failed ({status}): {stderr}")]
    Failed {
        stage: &'static str,
        status: ExitStatus,
        stderr: String,
    },
}

/// Inconsistencies between the assembly sequences and their length/coverage annotations
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Fasta and length_coverage file do not have the same number of contigs ({fasta} vs {table})")]
    ContigCountMismatch { fasta: usize, table: usize },
    #[error("Sequence {contig} does not have the same length in fasta ({fasta}) and length_coverage ({table}) files")]
    LengthMismatch {
        contig: String,
        fasta: u64,
        table: u64,
    },
    #[error("Sequence {0} has no entry in the length_coverage file")]
    MissingContig(String),
    #[error("Contig {0} is present more than once")]
    DuplicateContig(String),
    #[error("Segment {contig} is missing the {tag} tag")]
    MissingTag { contig: String, tag: &'static str },
    #[error("Malformed record at line {line}: {reason}")]
    BadRecord { line: usize, reason: String },
}

/// Failures while turning the per sequence count stream into profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("No coverage value found for contig {0}")]
    MissingCoverage(String),
    #[error("Contig {0} has no k-mer counts within the profile intervals")]
    EmptyProfile(String),
    #[error("Contig {0} appears more than once in the count stream")]
    DuplicateContig(String),
    #[error("Count data at line {0} precedes any contig marker")]
    DataBeforeMarker(usize),
    #[error("Bad count value '{token}' at line {line}")]
    BadCount { line: usize, token: String },
    #[error("Missing contig name at line {0}")]
    EmptyName(usize),
}
