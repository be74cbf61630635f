use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;
use serde::Serialize;

use crate::{
    assembly::{self, ContigTable},
    cli::{AssemblyInput, Config},
    counts::CountReader,
    engine::Jellyfish,
    output::ProfileWriter,
    profile::{build_profile, BucketTotals},
};

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    contigs: usize,
    positions: u64,
    unclassified: u64,
    bucket_totals: [u64; crate::profile::N_BUCKETS],
}

impl RunSummary {
    pub fn contigs(&self) -> usize {
        self.contigs
    }

    pub fn positions(&self) -> u64 {
        self.positions
    }

    pub fn unclassified(&self) -> u64 {
        self.unclassified
    }

    fn add(&mut self, positions: usize, totals: &BucketTotals) {
        self.contigs += 1;
        self.positions += positions as u64;
        self.unclassified += positions as u64 - totals.total();
        for (p, q) in self.bucket_totals.iter_mut().zip(totals.counts().iter()) {
            *p += q
        }
    }
}

/// Turn a per sequence count stream into profile lines, one contig at a time
pub fn profile_stream<R: BufRead, W: Write>(
    rdr: R,
    contigs: &ContigTable,
    wrt: W,
) -> anyhow::Result<RunSummary> {
    let mut rdr = CountReader::new(rdr);
    let mut wrt = ProfileWriter::new(wrt);
    let mut summary = RunSummary::default();

    while let Some(c) = rdr.next_contig()? {
        let coverage = contigs.visit(c.id())?;
        let (rec, totals) = build_profile(c.id(), coverage, c.counts())?;
        trace!(
            "Contig {}: {} positions, {} classified",
            c.id(),
            rec.positions(),
            totals.total()
        );
        wrt.write_record(&rec)?;
        summary.add(rec.positions(), &totals);
    }
    wrt.finish()?;
    Ok(summary)
}

fn profile_file(counts: &Path, contigs: &ContigTable, output: &Path) -> anyhow::Result<RunSummary> {
    debug!("Opening {} for input", counts.display());
    let rdr = CompressIo::new()
        .path(counts)
        .bufreader()
        .with_context(|| format!("Could not open count file {}", counts.display()))?;

    debug!("Opening {} for output", output.display());
    let wrt = CompressIo::new()
        .path(output)
        .bufwriter()
        .with_context(|| format!("Could not open output file {}", output.display()))?;

    info!("Building k-mer profiles");
    let res = profile_stream(rdr, contigs, wrt);
    if res.is_err() {
        // A partial profile file must not be mistaken for a complete one
        if let Err(e) = fs::remove_file(output) {
            warn!("Could not remove partial output {}: {}", output.display(), e)
        }
    }
    res
}

fn load_assembly(input: &AssemblyInput) -> anyhow::Result<(ContigTable, PathBuf)> {
    match input {
        AssemblyInput::Gfa(gfa) => {
            info!("Producing fasta from gfa file");
            assembly::load_gfa(gfa)
        }
        AssemblyInput::Fasta {
            fasta,
            length_coverage,
        } => {
            info!("Checking fasta and length coverage file content");
            let table = assembly::read_length_coverage(length_coverage)?;
            assembly::check_fasta(fasta, &table)?;
            Ok((table, fasta.to_owned()))
        }
    }
}

pub fn process(cfg: &Config, input: &AssemblyInput) -> anyhow::Result<RunSummary> {
    let engine = match cfg.counts() {
        Some(_) => None,
        None => {
            let jf = Jellyfish::new(cfg.jellyfish(), cfg.query_per_sequence(), cfg.threads());
            jf.check()?;
            Some(jf)
        }
    };

    let (contigs, fasta) = load_assembly(input)?;
    if contigs.is_empty() {
        warn!("No contigs found in assembly input")
    } else {
        info!("Assembly has {} contigs", contigs.len())
    }

    let counts = match (engine, cfg.counts()) {
        (Some(jf), _) => {
            let db = jf.count(&fasta)?;
            jf.query(&fasta, &db)?
        }
        (None, Some(p)) => p.to_owned(),
        (None, None) => return Err(anyhow!("No k-mer count source available")),
    };

    profile_file(&counts, &contigs, cfg.output())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ProfileError;

    fn table() -> ContigTable {
        let mut t = ContigTable::new();
        t.insert("contigA", 23, 10).unwrap();
        t.insert("contigB", 22, 20).unwrap();
        t
    }

    #[test]
    fn end_to_end_stream() {
        let mut out = Vec::new();
        let s = profile_stream(">contigA\n5 5 5\n>contigB\n1 1\n".as_bytes(), &table(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "contigA\t10\t3\t0.0\t0.0\t0.0\t1000.0\t0.0\t0.0\t0.0\t0.0\t0.0\t0.0",
                "contigB\t20\t2\t1000.0\t0.0\t0.0\t0.0\t0.0\t0.0\t0.0\t0.0\t0.0\t0.0",
            ]
        );
        assert_eq!(s.contigs(), 2);
        assert_eq!(s.positions(), 5);
        assert_eq!(s.unclassified(), 0);
        assert_eq!(s.bucket_totals[0], 2);
        assert_eq!(s.bucket_totals[3], 3);
    }

    #[test]
    fn last_contig_is_flushed() {
        let mut out = Vec::new();
        profile_stream(">contigA\n1 2\n>contigB\n0 4 4".as_bytes(), &table(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("contigB\t20\t3\t"));
    }

    #[test]
    fn missing_coverage() {
        let mut out = Vec::new();
        let e = profile_stream(">contigA\n1\n>contigX\n1\n".as_bytes(), &table(), &mut out)
            .unwrap_err();
        match e.downcast_ref::<ProfileError>() {
            Some(ProfileError::MissingCoverage(s)) => assert_eq!(s, "contigX"),
            _ => panic!("Unexpected error {e:?}"),
        }
    }

    #[test]
    fn duplicate_contig() {
        let mut out = Vec::new();
        let e = profile_stream(
            ">contigA\n1\n>contigB\n2\n>contigA\n3\n".as_bytes(),
            &table(),
            &mut out,
        )
        .unwrap_err();
        match e.downcast_ref::<ProfileError>() {
            Some(ProfileError::DuplicateContig(s)) => assert_eq!(s, "contigA"),
            _ => panic!("Unexpected error {e:?}"),
        }
    }

    #[test]
    fn zero_only_contig_fails() {
        let mut out = Vec::new();
        let e = profile_stream(">contigA\n0 0\n".as_bytes(), &table(), &mut out).unwrap_err();
        assert!(matches!(
            e.downcast_ref::<ProfileError>(),
            Some(ProfileError::EmptyProfile(_))
        ));
    }

    #[test]
    fn failed_run_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let counts = dir.path().join("counts.gps_out");
        fs::write(&counts, ">contigA\n5\n>unknown\n5\n").unwrap();
        let output = dir.path().join("out.tsv");
        assert!(profile_file(&counts, &table(), &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn profile_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let counts = dir.path().join("counts.gps_out");
        fs::write(&counts, ">contigB\n1 1\n>contigA\n5 5 0\n").unwrap();
        let output = dir.path().join("out.tsv");
        let s = profile_file(&counts, &table(), &output).unwrap();
        assert_eq!(s.contigs(), 2);
        assert_eq!(s.unclassified(), 1);
        let txt = fs::read_to_string(&output).unwrap();
        let ids: Vec<_> = txt.lines().map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(ids, vec!["contigB", "contigA"]);
    }
}
