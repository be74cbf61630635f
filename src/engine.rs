use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use anyhow::Context;

use crate::{error::EngineError, utils::with_suffix};

pub const KMER_LENGTH: usize = 21;
const HASH_SIZE: usize = 10_000_000;

/// Wrapper around the jellyfish k-mer counter and its query_per_sequence companion
pub struct Jellyfish {
    jellyfish: PathBuf,
    query: PathBuf,
    threads: usize,
}

fn spawn_error(program: &Path, e: io::Error) -> EngineError {
    EngineError::NotFound {
        program: program.display().to_string(),
        source: e,
    }
}

fn check_output(stage: &'static str, out: Output) -> Result<(), EngineError> {
    if out.status.success() {
        Ok(())
    } else {
        Err(EngineError::Failed {
            stage,
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
        })
    }
}

impl Jellyfish {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(jellyfish: P, query: Q, threads: usize) -> Self {
        Self {
            jellyfish: jellyfish.as_ref().to_owned(),
            query: query.as_ref().to_owned(),
            threads,
        }
    }

    /// Verify that both programs can be run.  `jellyfish -h` may exit with 0 or 1
    /// depending on the version.
    pub fn check(&self) -> Result<(), EngineError> {
        let out = Command::new(&self.jellyfish)
            .arg("-h")
            .output()
            .map_err(|e| spawn_error(&self.jellyfish, e))?;
        match out.status.code() {
            Some(0) | Some(1) => info!("The {} command is accessible", self.jellyfish.display()),
            _ => {
                return Err(EngineError::NotUsable {
                    program: self.jellyfish.display().to_string(),
                    status: out.status,
                })
            }
        }

        // query_per_sequence has no help option; it just needs to exist
        Command::new(&self.query)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| spawn_error(&self.query, e))?;
        info!("The {} command is accessible", self.query.display());
        Ok(())
    }

    /// Build the k-mer database for fasta, returning its path (`<fasta>.jf`)
    pub fn count(&self, fasta: &Path) -> anyhow::Result<PathBuf> {
        let db = with_suffix(fasta, ".jf");
        info!("Generating k-mer database...this can take some time");
        let mut cmd = Command::new(&self.jellyfish);
        cmd.arg("count")
            .arg("-s")
            .arg(HASH_SIZE.to_string())
            .arg("-m")
            .arg(KMER_LENGTH.to_string())
            .arg("-C")
            .arg("-t")
            .arg(self.threads.to_string())
            .arg("-o")
            .arg(&db)
            .arg(fasta);
        debug!("Running {:?}", cmd);
        let out = cmd.output().map_err(|e| spawn_error(&self.jellyfish, e))?;
        check_output("jellyfish count", out)?;
        info!("Database generated");
        Ok(db)
    }

    /// Query the database for each sequence in fasta, writing the per position
    /// counts to `<fasta>.gps_out` and returning that path
    pub fn query(&self, fasta: &Path, db: &Path) -> anyhow::Result<PathBuf> {
        let counts = with_suffix(fasta, ".gps_out");
        info!("Producing k-mer counts...this can take some time");
        let f = File::create(&counts)
            .with_context(|| format!("Could not open {} for output", counts.display()))?;
        let mut cmd = Command::new(&self.query);
        cmd.arg(db).arg(fasta).stdout(Stdio::from(f));
        debug!("Running {:?}", cmd);
        let res = cmd
            .output()
            .map_err(|e| spawn_error(&self.query, e))
            .and_then(|out| check_output("query_per_sequence", out));
        if let Err(e) = res {
            // No count file should be left that could be read as a complete one
            if let Err(e) = fs::remove_file(&counts) {
                warn!("Could not remove partial output {}: {}", counts.display(), e)
            }
            return Err(e.into());
        }
        info!("K-mer counts produced");
        Ok(counts)
    }
}
