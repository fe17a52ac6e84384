//! Ultrametric checks.
//!
//! A metric is **ultrametric** when it satisfies the strong triangle inequality:
//!
//! ```text
//! d(x, z) <= max(d(x, y), d(y, z))
//! ```
//!
//! The cophenetic distances of a dendrogram (leaf-to-leaf distance = height
//! of the lowest common ancestor) are ultrametric exactly when merge heights
//! never decrease towards the root. That is the property the dendrogram
//! renderer relies on when it draws heights on a shared vertical axis.
//!
//! ```text
//!        *  (h=3)          d(a,b) = 1
//!       / \                d(a,c) = d(b,c) = 2
//!      *   d  (h=2)        d(a,d) = d(b,d) = d(c,d) = 3
//!     / \
//!    *   c  (h=1)
//!   / \
//!  a   b
//! ```

/// True when every triple of `distances` obeys the strong triangle inequality
/// within `tolerance`.
///
/// Ragged input is never ultrametric.
pub fn is_ultrametric(distances: &[Vec<f64>], tolerance: f64) -> bool {
    let n = distances.len();
    if distances.iter().any(|row| row.len() != n) {
        return false;
    }
    (0..n).all(|x| {
        (0..n).all(|y| {
            let d_xy = distances[x][y];
            (0..n).all(|z| distances[x][z] <= d_xy.max(distances[y][z]) + tolerance)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_distances() {
        // a, b, c, d from the diagram above.
        let cophenetic = vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 2.0, 3.0],
            vec![2.0, 2.0, 0.0, 3.0],
            vec![3.0, 3.0, 3.0, 0.0],
        ];
        assert!(is_ultrametric(&cophenetic, 1e-12));
    }

    #[test]
    fn test_plain_metric_is_not_ultrametric() {
        // Points 0, 1, 2 on a line: d(0,2) = 2 > max(1, 1).
        let line = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ];
        assert!(!is_ultrametric(&line, 1e-12));
        assert!(!is_ultrametric(&[vec![0.0, 1.0]], 1e-12));
    }
}
