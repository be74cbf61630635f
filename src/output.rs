use std::{io::Write, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use serde::Serialize;

use crate::{
    cli::{AssemblyInput, Config},
    engine::KMER_LENGTH,
    process::RunSummary,
    profile::ProfileRecord,
};

/// Writes one tab separated line per profile record
pub struct ProfileWriter<W: Write> {
    w: W,
}

impl<W: Write> ProfileWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn write_record(&mut self, r: &ProfileRecord) -> anyhow::Result<()> {
        write!(self.w, "{}\t{}\t{}", r.contig(), r.coverage(), r.positions())?;
        for s in r.shares() {
            // Debug formatting keeps the decimal point on whole numbers (1000.0)
            write!(self.w, "\t{:?}", s)?;
        }
        writeln!(self.w)
            .with_context(|| format!("Error writing profile for contig {}", r.contig()))
    }

    pub fn finish(mut self) -> anyhow::Result<W> {
        self.w
            .flush()
            .with_context(|| "Error flushing profile output")?;
        Ok(self.w)
    }
}

#[derive(Serialize)]
struct JsOutput<'a, 'b> {
    program: &'static str,
    version: &'static str,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assembly_gfa: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assembly_fasta: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assembly_length_coverage: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<&'a Path>,
    output: &'a Path,
    threads: usize,
    kmer_length: usize,
    #[serde(flatten)]
    results: &'b RunSummary,
}

impl<'a, 'b> JsOutput<'a, 'b> {
    fn make(cfg: &'a Config, results: &'b RunSummary) -> Self {
        let (assembly_gfa, assembly_fasta, assembly_length_coverage) = match cfg.assembly() {
            Some(AssemblyInput::Gfa(p)) => (Some(p.as_path()), None, None),
            Some(AssemblyInput::Fasta {
                fasta,
                length_coverage,
            }) => (None, Some(fasta.as_path()), Some(length_coverage.as_path())),
            None => (None, None, None),
        };
        Self {
            program: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            date: cfg.date().to_rfc2822(),
            assembly_gfa,
            assembly_fasta,
            assembly_length_coverage,
            counts: cfg.counts(),
            output: cfg.output(),
            threads: cfg.threads(),
            kmer_length: KMER_LENGTH,
            results,
        }
    }
}

fn output_json<P: AsRef<Path>>(name: P, cfg: &Config, res: &RunSummary) -> anyhow::Result<()> {
    debug!("Writing JSON report");
    let wrt = CompressIo::new()
        .path(name)
        .bufwriter()
        .with_context(|| "Could not open output JSON file")?;

    let out = JsOutput::make(cfg, res);

    serde_json::to_writer_pretty(wrt, &out)
        .with_context(|| "Error writing out JSON file with run report")
}

pub fn output_report(cfg: &Config, res: &RunSummary) -> anyhow::Result<()> {
    info!(
        "Wrote profiles for {} contigs ({} positions, {} unclassified)",
        res.contigs(),
        res.positions(),
        res.unclassified()
    );
    match cfg.report() {
        Some(name) => output_json(name, cfg, res),
        None => Ok(()),
    }
}
