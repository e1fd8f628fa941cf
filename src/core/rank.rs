//! Midrank assignment with tie handling.
//!
//! Shared by Spearman correlation and the Mann-Whitney U test, both of which
//! replace observations by their average ranks.

/// Assign 1-based average ranks, giving tied values the mean of the ranks
/// they would occupy.
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && data[order[j + 1]] == data[order[i]] {
            j += 1;
        }
        // Ranks i+1 ..= j+1 are shared; assign their mean.
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Sizes of each group of tied values, for tie-correction terms.
pub fn tie_group_sizes(data: &[f64]) -> Vec<usize> {
    let mut sorted: Vec<f64> = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut groups = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        if j > i {
            groups.push(j - i + 1);
        }
        i = j + 1;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values() {
        let ranks = average_ranks(&[30.0, 10.0, 20.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_ties_get_midrank() {
        // 10 and 10 occupy ranks 1 and 2, both get 1.5
        let ranks = average_ranks(&[10.0, 10.0, 20.0]);
        assert_eq!(ranks, vec![1.5, 1.5, 3.0]);
    }

    #[test]
    fn test_tie_groups() {
        assert_eq!(tie_group_sizes(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0]), vec![2, 3]);
        assert!(tie_group_sizes(&[1.0, 2.0, 3.0]).is_empty());
    }
}
