use std::{io::BufRead, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;

use super::ContigTable;
use crate::error::AssemblyError;

fn bad_record(line: usize, reason: &str) -> AssemblyError {
    AssemblyError::BadRecord {
        line,
        reason: reason.to_owned(),
    }
}

/// Parse `name<TAB>length<TAB>coverage` lines
pub(super) fn parse_length_coverage<R: BufRead>(mut rdr: R) -> anyhow::Result<ContigTable> {
    let mut buf = String::new();
    let mut table = ContigTable::new();

    let mut line = 0;
    while rdr
        .read_line(&mut buf)
        .with_context(|| format!("Error reading line {} from length_coverage file", line + 1))?
        > 0
    {
        line += 1;
        let s = buf.trim_end();
        if !s.is_empty() {
            let mut itr = s.split('\t');
            let ctg = itr
                .next()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| bad_record(line, "missing contig name"))?;
            let length = itr
                .next()
                .ok_or_else(|| bad_record(line, "missing length"))?
                .parse::<u64>()
                .map_err(|_| bad_record(line, "bad length value"))?;
            let coverage = itr
                .next()
                .ok_or_else(|| bad_record(line, "missing coverage"))?
                .parse::<u64>()
                .map_err(|_| bad_record(line, "bad coverage value"))?;
            table.insert(ctg, length, coverage)?;
        }
        buf.clear();
    }
    debug!("Read in {} contigs from length_coverage file", table.len());
    Ok(table)
}

pub fn read_length_coverage<P: AsRef<Path>>(path: P) -> anyhow::Result<ContigTable> {
    let rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .with_context(|| "Could not open length_coverage file")?;
    parse_length_coverage(rdr)
}
