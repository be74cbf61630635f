use std::io::BufRead;

use anyhow::Context;

use crate::error::ProfileError;

/// Marker lines start with this, data lines do not
const MARKER: char = '>';

/// Per position k-mer counts for one contig
#[derive(Debug)]
pub struct ContigCounts {
    id: String,
    counts: Vec<u64>,
}

impl ContigCounts {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

/// Streaming reader for the output of jellyfish query_per_sequence.
///
/// The stream consists of marker lines (`>contig_id`) each followed by zero or
/// more lines of whitespace separated counts.  All counts seen before the next
/// marker (or the end of the stream) belong to the preceding contig.
pub struct CountReader<R: BufRead> {
    r: R,
    buf: String,
    line: usize,
    // Id from a marker line that has been read but whose block is not yet complete
    pending: Option<String>,
}

impl<R: BufRead> CountReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            buf: String::new(),
            line: 0,
            pending: None,
        }
    }

    fn read_line(&mut self) -> anyhow::Result<bool> {
        self.buf.clear();
        let n = self
            .r
            .read_line(&mut self.buf)
            .with_context(|| format!("Error reading line {} from count file", self.line + 1))?;
        if n > 0 {
            self.line += 1;
        }
        Ok(n > 0)
    }

    fn open_contig(&mut self) -> anyhow::Result<()> {
        let id = self.buf[MARKER.len_utf8()..]
            .split_whitespace()
            .next()
            .ok_or(ProfileError::EmptyName(self.line))?;
        self.pending = Some(id.to_owned());
        Ok(())
    }

    fn add_counts(&self, v: &mut Vec<u64>) -> anyhow::Result<()> {
        for tok in self.buf.split_whitespace() {
            let x = tok.parse::<u64>().map_err(|_| ProfileError::BadCount {
                line: self.line,
                token: tok.to_owned(),
            })?;
            v.push(x)
        }
        Ok(())
    }

    /// Get the next complete contig block, or None at the end of the stream
    pub fn next_contig(&mut self) -> anyhow::Result<Option<ContigCounts>> {
        let mut counts = Vec::new();
        loop {
            if !self.read_line()? {
                // End of stream closes the last open contig
                return Ok(self.pending.take().map(|id| ContigCounts { id, counts }));
            }
            if self.buf.starts_with(MARKER) {
                let prev = self.pending.take();
                self.open_contig()?;
                if let Some(id) = prev {
                    return Ok(Some(ContigCounts { id, counts }));
                }
            } else if self.pending.is_some() {
                self.add_counts(&mut counts)?
            } else if !self.buf.trim().is_empty() {
                return Err(ProfileError::DataBeforeMarker(self.line).into());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::BufReader;

    fn collect(s: &str) -> anyhow::Result<Vec<(String, Vec<u64>)>> {
        let mut rdr = CountReader::new(s.as_bytes());
        let mut v = Vec::new();
        while let Some(c) = rdr.next_contig()? {
            v.push((c.id().to_owned(), c.counts().to_vec()))
        }
        Ok(v)
    }

    #[test]
    fn two_contigs() {
        let v = collect(">contigA\n5 5 5\n>contigB\n1 1\n").unwrap();
        assert_eq!(
            v,
            vec![
                ("contigA".to_owned(), vec![5, 5, 5]),
                ("contigB".to_owned(), vec![1, 1])
            ]
        );
    }

    #[test]
    fn last_contig_without_newline() {
        let v = collect(">a\n1 2\n>b\n3 4").unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[1], ("b".to_owned(), vec![3, 4]));
    }

    #[test]
    fn small_buffer() {
        let s = ">seq1 some description\n0 0 3 4 5\n>seq2\n10 11\n>seq3\n7\n";
        let mut rdr = CountReader::new(BufReader::with_capacity(4, s.as_bytes()));
        let exp = [("seq1", 5), ("seq2", 2), ("seq3", 1)];
        for (id, l) in exp {
            let c = rdr.next_contig().unwrap().unwrap();
            assert_eq!(c.id(), id);
            assert_eq!(c.counts().len(), l);
        }
        assert!(rdr.next_contig().unwrap().is_none());
        assert!(rdr.next_contig().unwrap().is_none());
    }

    #[test]
    fn multiple_and_missing_data_lines() {
        let v = collect(">a\n1 2\n3\n\n4 5\n>b\n>c\n9\n").unwrap();
        assert_eq!(v[0], ("a".to_owned(), vec![1, 2, 3, 4, 5]));
        assert_eq!(v[1], ("b".to_owned(), vec![]));
        assert_eq!(v[2], ("c".to_owned(), vec![9]));
    }

    #[test]
    fn empty_stream() {
        assert!(collect("").unwrap().is_empty());
    }

    #[test]
    fn data_before_marker() {
        let e = collect("1 2 3\n>a\n1\n").unwrap_err();
        assert!(matches!(
            e.downcast_ref::<ProfileError>(),
            Some(ProfileError::DataBeforeMarker(1))
        ));
    }

    #[test]
    fn bad_count() {
        let e = collect(">a\n1 x 3\n").unwrap_err();
        match e.downcast_ref::<ProfileError>() {
            Some(ProfileError::BadCount { line, token }) => {
                assert_eq!(*line, 2);
                assert_eq!(token, "x")
            }
            _ => panic!("Unexpected error {e:?}"),
        }
    }

    #[test]
    fn empty_name() {
        let e = collect(">\n1\n").unwrap_err();
        assert!(matches!(
            e.downcast_ref::<ProfileError>(),
            Some(ProfileError::EmptyName(1))
        ));
    }
}
