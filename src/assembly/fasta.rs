use std::{io::BufRead, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;

use super::ContigTable;
use crate::error::AssemblyError;

/// Read a FASTA stream returning the name and sequence length of each record.
/// Only the first whitespace delimited word of the header is kept as the name.
pub(super) fn fasta_lengths<R: BufRead>(mut rdr: R) -> anyhow::Result<Vec<(String, u64)>> {
    let mut buf = String::new();
    let mut v: Vec<(String, u64)> = Vec::new();

    let mut line = 0;
    while rdr
        .read_line(&mut buf)
        .with_context(|| format!("Error reading line {} from fasta file", line + 1))?
        > 0
    {
        line += 1;
        let s = buf.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if let Some(hdr) = s.strip_prefix('>') {
            let name = hdr.split_whitespace().next().unwrap_or("");
            v.push((name.to_owned(), 0))
        } else if let Some((_, l)) = v.last_mut() {
            *l += s.len() as u64
        } else if !s.trim().is_empty() {
            return Err(anyhow!("Bad FASTA format: expecting '>' at line {line}"));
        }
        buf.clear();
    }
    Ok(v)
}

/// Check that the contigs in fasta match those in the table, both in number and length
pub(super) fn check_lengths(fasta: &[(String, u64)], table: &ContigTable) -> Result<(), AssemblyError> {
    if fasta.len() != table.len() {
        return Err(AssemblyError::ContigCountMismatch {
            fasta: fasta.len(),
            table: table.len(),
        });
    }
    for (ctg, l) in fasta {
        let info = table
            .get(ctg)
            .ok_or_else(|| AssemblyError::MissingContig(ctg.to_owned()))?;
        if info.length() != *l {
            return Err(AssemblyError::LengthMismatch {
                contig: ctg.to_owned(),
                fasta: *l,
                table: info.length(),
            });
        }
    }
    Ok(())
}

pub fn check_fasta<P: AsRef<Path>>(path: P, table: &ContigTable) -> anyhow::Result<()> {
    let path = path.as_ref();
    debug!("Opening {} for input", path.display());
    let rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .with_context(|| format!("Could not open fasta file {}", path.display()))?;
    let v = fasta_lengths(rdr)?;
    debug!("Read in {} sequences from fasta file", v.len());
    check_lengths(&v, table)?;
    Ok(())
}
