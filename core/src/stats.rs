//! Small numeric helpers shared by kernels and reports.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance. Zero for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|k| if k == n - 1 { hi } else { lo + step * k as f64 }).collect()
        }
    }
}

/// Equal-width histogram. Returns `(counts, edges)` with `edges.len() == bins + 1`.
/// The last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<u64>, Vec<f64>) {
    assert!(bins > 0, "bins must be > 0");
    if values.is_empty() {
        return (vec![0; bins], linspace(0.0, 1.0, bins + 1));
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        hi = lo + 1.0;
    }
    let edges = linspace(lo, hi, bins + 1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0u64; bins];
    for &v in values {
        let k = (((v - lo) / width) as usize).min(bins - 1);
        counts[k] += 1;
    }
    (counts, edges)
}

/// Sorted `(size, occurrences)` pairs.
pub fn size_distribution(sizes: &[usize]) -> Vec<(usize, usize)> {
    let mut sorted = sizes.to_vec();
    sorted.sort_unstable();
    let mut out: Vec<(usize, usize)> = Vec::new();
    for s in sorted {
        match out.last_mut() {
            Some((size, count)) if *size == s => *count += 1,
            _ => out.push((s, 1)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_of_constant_is_zero() {
        assert_eq!(variance(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(variance(&[]), 0.0);
    }

    #[test]
    fn variance_is_population_variance() {
        assert!((variance(&[1.0, 2.0, 3.0, 4.0]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace(0.01, 0.9, 5);
        assert_eq!(xs.len(), 5);
        assert_eq!(xs[0], 0.01);
        assert_eq!(xs[4], 0.9);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn histogram_counts_everything() {
        let (counts, edges) = histogram(&[1.0, 2.0, 2.0, 3.0, 10.0], 3);
        assert_eq!(counts.iter().sum::<u64>(), 5);
        assert_eq!(edges.len(), 4);
        assert_eq!(counts[2], 1);
    }

    #[test]
    fn size_distribution_groups_sizes() {
        assert_eq!(size_distribution(&[3, 1, 3, 2, 1, 1]), vec![(1, 3), (2, 1), (3, 2)]);
    }
}
