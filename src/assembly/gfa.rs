use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use super::ContigTable;
use crate::{error::AssemblyError, utils::with_suffix};

const FASTA_LINE_WIDTH: usize = 80;
const LENGTH_TAG: &str = "LN:i:";
const COVERAGE_TAG: &str = "rd:i:";

/// One segment (`S`) record of a GFA file
#[derive(Debug, PartialEq)]
pub(super) struct Segment<'a> {
    name: &'a str,
    seq: &'a str,
    length: u64,
    coverage: u64,
}

fn parse_tag(tags: &[&str], tag: &'static str, name: &str, line: usize) -> anyhow::Result<u64> {
    let v = tags
        .iter()
        .find_map(|t| t.strip_prefix(tag))
        .ok_or_else(|| AssemblyError::MissingTag {
            contig: name.to_owned(),
            tag,
        })?;
    v.parse::<u64>().map_err(|_| {
        AssemblyError::BadRecord {
            line,
            reason: format!("bad {tag} value for segment {name}"),
        }
        .into()
    })
}

/// Parse a GFA line, returning None if it is not a segment record
pub(super) fn parse_segment(s: &str, line: usize) -> anyhow::Result<Option<Segment<'_>>> {
    let mut itr = s.split('\t');
    if itr.next() != Some("S") {
        return Ok(None);
    }
    let name = itr
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AssemblyError::BadRecord {
            line,
            reason: "missing segment name".to_owned(),
        })?;
    let seq = itr.next().ok_or_else(|| AssemblyError::BadRecord {
        line,
        reason: format!("missing sequence for segment {name}"),
    })?;
    let tags: Vec<_> = itr.collect();
    let length = parse_tag(&tags, LENGTH_TAG, name, line)?;
    let coverage = parse_tag(&tags, COVERAGE_TAG, name, line)?;
    Ok(Some(Segment {
        name,
        seq,
        length,
        coverage,
    }))
}

fn write_fasta_record<W: Write>(w: &mut W, seg: &Segment) -> anyhow::Result<()> {
    writeln!(w, ">{}", seg.name)?;
    for chunk in seg.seq.as_bytes().chunks(FASTA_LINE_WIDTH) {
        w.write_all(chunk)?;
        writeln!(w)?;
    }
    Ok(())
}

/// Read segments from a GFA stream, writing the sequences in FASTA format to `fasta`
/// and the lengths and coverages to `lc`
pub(super) fn convert_gfa<R: BufRead, W: Write, V: Write>(
    mut rdr: R,
    fasta: &mut W,
    lc: &mut V,
) -> anyhow::Result<ContigTable> {
    let mut buf = String::new();
    let mut table = ContigTable::new();

    let mut line = 0;
    while rdr
        .read_line(&mut buf)
        .with_context(|| format!("Error reading line {} from gfa file", line + 1))?
        > 0
    {
        line += 1;
        if let Some(seg) = parse_segment(buf.trim_end(), line)? {
            table.insert(seg.name, seg.length, seg.coverage)?;
            writeln!(lc, "{}\t{}\t{}", seg.name, seg.length, seg.coverage)
                .with_context(|| "Error writing length_coverage file")?;
            write_fasta_record(fasta, &seg).with_context(|| "Error writing fasta file")?;
        }
        buf.clear();
    }
    Ok(table)
}

/// Load a GFA assembly, producing `<gfa>.fasta` and `<gfa>.length_coverage`.
/// Returns the contig table and the path of the fasta file.
pub fn load_gfa<P: AsRef<Path>>(path: P) -> anyhow::Result<(ContigTable, PathBuf)> {
    let path = path.as_ref();
    let fasta_path = with_suffix(path, ".fasta");
    let lc_path = with_suffix(path, ".length_coverage");

    debug!("Opening {} for input", path.display());
    let rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .with_context(|| format!("Could not open gfa file {}", path.display()))?;
    let mut fasta = CompressIo::new()
        .path(&fasta_path)
        .bufwriter()
        .with_context(|| format!("Could not open {} for output", fasta_path.display()))?;
    let mut lc = CompressIo::new()
        .path(&lc_path)
        .bufwriter()
        .with_context(|| format!("Could not open {} for output", lc_path.display()))?;

    let table = convert_gfa(rdr, &mut fasta, &mut lc)?;
    fasta.flush().with_context(|| "Error flushing fasta file")?;
    lc.flush()
        .with_context(|| "Error flushing length_coverage file")?;

    info!("Read {} segments from gfa file", table.len());
    Ok((table, fasta_path))
}
