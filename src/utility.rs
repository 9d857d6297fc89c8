//! Small numeric helpers shared by the grid and profile code.

/// Index of the value closest to `target`, the first one on ties. Non-finite values are never
/// chosen. Returns `None` for an empty or all non-finite slice.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let abs_diff = (v - target).abs();
        if !abs_diff.is_finite() {
            continue;
        }
        match best {
            Some((_, best_diff)) if best_diff <= abs_diff => {}
            _ => best = Some((i, abs_diff)),
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
pub mod test_tools {
    pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        assert!(eps > 0.0);

        (val1 - val2).abs() < eps
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nearest_index() {
        assert_eq!(nearest_index(&[50.0, 45.0, 40.0], 44.0), Some(1));
        assert_eq!(nearest_index(&[50.0, 45.0, 40.0], 42.5), Some(1)); // tie, first wins
        assert_eq!(nearest_index(&[f64::NAN, 10.0], 0.0), Some(1));
        assert_eq!(nearest_index(&[], 0.0), None);
        assert_eq!(nearest_index(&[f64::NAN], 0.0), None);
    }
}
