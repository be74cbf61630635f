use std::{cell::Cell, collections::HashMap};

use crate::error::{AssemblyError, ProfileError};

mod fasta;
mod gfa;
mod length_coverage;

pub use fasta::check_fasta;
pub use gfa::load_gfa;
pub use length_coverage::read_length_coverage;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ContigInfo {
    length: u64,
    coverage: u64,
    // Set once the contig's profile has been produced
    visited: Cell<bool>,
}

impl ContigInfo {
    #[inline]
    pub fn length(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn coverage(&self) -> u64 {
        self.coverage
    }
}

/// Length and coverage for each contig of the assembly
#[derive(Debug, Default)]
pub struct ContigTable {
    hash: HashMap<Box<str>, ContigInfo>,
}

impl ContigTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, contig: &str, length: u64, coverage: u64) -> Result<(), AssemblyError> {
        if self.hash.contains_key(contig) {
            return Err(AssemblyError::DuplicateContig(contig.to_owned()));
        }
        self.hash.insert(
            contig.into(),
            ContigInfo {
                length,
                coverage,
                visited: Cell::new(false),
            },
        );
        Ok(())
    }

    pub fn get(&self, contig: &str) -> Option<&ContigInfo> {
        self.hash.get(contig)
    }

    /// Coverage for a contig about to be profiled.  Each contig may only be
    /// visited once.
    pub fn visit(&self, contig: &str) -> Result<u64, ProfileError> {
        let info = self
            .get(contig)
            .ok_or_else(|| ProfileError::MissingCoverage(contig.to_owned()))?;
        if info.visited.replace(true) {
            Err(ProfileError::DuplicateContig(contig.to_owned()))
        } else {
            Ok(info.coverage())
        }
    }

    pub fn len(&self) -> usize {
        self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut t = ContigTable::new();
        assert!(t.is_empty());
        t.insert("ctg1", 100, 12).unwrap();
        t.insert("ctg2", 50, 3).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("ctg1").map(|c| c.coverage()), Some(12));
        assert_eq!(t.get("ctg2").map(|c| c.length()), Some(50));
        assert_eq!(t.get("ctg3").map(|c| c.coverage()), None);
        assert!(matches!(
            t.insert("ctg1", 1, 1),
            Err(AssemblyError::DuplicateContig(_))
        ));
    }

    #[test]
    fn visit_once() {
        let mut t = ContigTable::new();
        t.insert("ctg1", 100, 12).unwrap();
        assert_eq!(t.visit("ctg1").unwrap(), 12);
        assert!(matches!(
            t.visit("ctg1"),
            Err(ProfileError::DuplicateContig(ref s)) if s == "ctg1"
        ));
        assert!(matches!(
            t.visit("ctg2"),
            Err(ProfileError::MissingCoverage(ref s)) if s == "ctg2"
        ));
        // Plain lookups do not mark contigs as visited
        assert_eq!(t.get("ctg1").map(|c| c.coverage()), Some(12));
    }
}
