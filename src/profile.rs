use crate::error::ProfileError;

pub const N_BUCKETS: usize = 10;

/// Counts are scaled to parts per thousand of the classified total
const PER_MILLE: f64 = 1000.0;

/// Half open count range [low, high)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Interval {
    low: u64,
    high: u64,
}

impl Interval {
    const fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, x: u64) -> bool {
        x >= self.low && x < self.high
    }
}

pub const INTERVALS: [Interval; N_BUCKETS] = [
    Interval::new(1, 2),
    Interval::new(2, 3),
    Interval::new(3, 4),
    Interval::new(4, 11),
    Interval::new(11, 21),
    Interval::new(21, 101),
    Interval::new(101, 1000),
    Interval::new(1000, 10000),
    Interval::new(10000, 100000),
    Interval::new(100000, 100000000000),
];

/// Index of the interval containing x.  Zero and values at or beyond the
/// ceiling of the last interval are not classified.
pub fn classify(x: u64) -> Option<usize> {
    INTERVALS.iter().position(|i| i.contains(x))
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct BucketTotals {
    counts: [u64; N_BUCKETS],
}

impl BucketTotals {
    pub fn add(&mut self, x: u64) {
        if let Some(ix) = classify(x) {
            self.counts[ix] += 1
        }
    }

    pub fn counts(&self) -> &[u64; N_BUCKETS] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Per mille share of each bucket, or None if nothing has been classified
    pub fn shares(&self) -> Option<[f64; N_BUCKETS]> {
        let t = self.total();
        if t == 0 {
            None
        } else {
            let t = t as f64;
            Some(self.counts.map(|c| (c as f64) * PER_MILLE / t))
        }
    }
}

/// Summary of one contig, ready for output
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    contig: String,
    coverage: u64,
    positions: usize,
    shares: [f64; N_BUCKETS],
}

impl ProfileRecord {
    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn coverage(&self) -> u64 {
        self.coverage
    }

    /// Number of sampled positions, including those that were not classified
    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn shares(&self) -> &[f64; N_BUCKETS] {
        &self.shares
    }
}

/// Build the profile for one contig's count vector.
///
/// Buckets are totalled in one pass and normalized once at the end; zero
/// counts (and counts past the last interval) add to the number of positions
/// but not to any bucket or to the normalization denominator.
///
/// Returns the record together with the bucket totals used to compute it.
pub fn build_profile(
    contig: &str,
    coverage: u64,
    counts: &[u64],
) -> Result<(ProfileRecord, BucketTotals), ProfileError> {
    let mut totals = BucketTotals::default();
    for x in counts {
        totals.add(*x)
    }
    let shares = totals
        .shares()
        .ok_or_else(|| ProfileError::EmptyProfile(contig.to_owned()))?;

    Ok((
        ProfileRecord {
            contig: contig.to_owned(),
            coverage,
            positions: counts.len(),
            shares,
        },
        totals,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sum(s: &[f64]) -> f64 {
        s.iter().sum()
    }

    #[test]
    fn intervals_are_contiguous() {
        assert_eq!(INTERVALS[0].low, 1);
        for w in INTERVALS.windows(2) {
            assert!(w[0].low < w[0].high);
            assert_eq!(w[0].high, w[1].low);
        }
    }

    #[test]
    fn boundaries_go_to_upper_interval() {
        let exp = [
            (1, 0),
            (2, 1),
            (3, 2),
            (4, 3),
            (10, 3),
            (11, 4),
            (20, 4),
            (21, 5),
            (100, 5),
            (101, 6),
            (999, 6),
            (1000, 7),
            (9999, 7),
            (10000, 8),
            (10001, 8),
            (99999, 8),
            (100000, 9),
            (100001, 9),
            (99999999999, 9),
        ];
        for (x, ix) in exp {
            assert_eq!(classify(x), Some(ix), "count {x}");
        }
    }

    #[test]
    fn unclassified_counts() {
        assert_eq!(classify(0), None);
        assert_eq!(classify(100000000000), None);
        assert_eq!(classify(u64::MAX), None);
    }

    #[test]
    fn single_bucket() {
        let (r, t) = build_profile("contigA", 10, &[5, 5, 5]).unwrap();
        assert_eq!(r.contig(), "contigA");
        assert_eq!(r.coverage(), 10);
        assert_eq!(r.positions(), 3);
        assert_eq!(
            r.shares(),
            &[0.0, 0.0, 0.0, 1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn mixed_buckets() {
        let (r, _) = build_profile("c", 1, &[1, 2, 2, 3000]).unwrap();
        let s = r.shares();
        assert_eq!(s[0], 250.0);
        assert_eq!(s[1], 500.0);
        assert_eq!(s[7], 250.0);
        assert!((sum(s) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn zeros_count_as_positions_only() {
        let (r, t) = build_profile("c", 1, &[0, 7, 0, 0, 15]).unwrap();
        assert_eq!(r.positions(), 5);
        assert_eq!(t.total(), 2);
        assert_eq!(r.shares()[3], 500.0);
        assert_eq!(r.shares()[4], 500.0);
        assert!((sum(r.shares()) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn shares_sum_to_1000() {
        let v: Vec<u64> = (0..5000u64).map(|i| (i * 7919) % 250_000).collect();
        let (r, _) = build_profile("c", 1, &v).unwrap();
        assert!((sum(r.shares()) - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn repeated_builds_agree() {
        let v = [3, 1, 44, 0, 12, 12, 5000, 2];
        let a = build_profile("c", 4, &v).unwrap();
        let b = build_profile("c", 4, &v).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_vector_is_an_error() {
        let e = build_profile("c", 1, &[]).unwrap_err();
        assert!(matches!(e, ProfileError::EmptyProfile(ref s) if s == "c"));
        let e = build_profile("d", 1, &[0, 0]).unwrap_err();
        assert!(matches!(e, ProfileError::EmptyProfile(ref s) if s == "d"));
    }
}
