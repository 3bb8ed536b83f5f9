//! Firmware version comparison
//!
//! Firmware versions are dotted strings whose segments may be numeric
//! ("1.10.3") or textual ("1.2.rc1"). Comparison is segment-wise: numeric
//! when both sides parse as integers, lexicographic otherwise. This is
//! deliberately not semver - devices report whatever their build system
//! stamped into the image.

use std::cmp::Ordering;

/// Compare two version strings.
///
/// Returns a negative, zero or positive value as `a` is older than, the same
/// as, or newer than `b`.
///
/// Empty segments compare as numeric zero, so `"1." == "1.0"`. When one
/// version has fewer segments, the missing tail compares equal as long as
/// every extra segment of the longer version is empty or numerically zero;
/// the first extra segment that is neither makes the longer version
/// greater. So `"1.0" == "1.0.0"` but `"1.0" < "1.0.1"` and
/// `"1.2" < "1.2.rc1"`.
///
/// Never fails: malformed segments fall back to string comparison.
pub fn vercmp(a: &str, b: &str) -> i32 {
    let seg_a: Vec<&str> = a.split('.').collect();
    let seg_b: Vec<&str> = b.split('.').collect();
    let common = seg_a.len().min(seg_b.len());

    for i in 0..common {
        match cmp_segment(seg_a[i], seg_b[i]) {
            Ordering::Less => return -1,
            Ordering::Greater => return 1,
            Ordering::Equal => {}
        }
    }

    if seg_a.len() > common && !tail_is_zero(&seg_a[common..]) {
        return 1;
    }
    if seg_b.len() > common && !tail_is_zero(&seg_b[common..]) {
        return -1;
    }
    0
}

/// Numeric comparison when both segments are integers, string otherwise.
fn cmp_segment(a: &str, b: &str) -> Ordering {
    match (segment_value(a), segment_value(b)) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        _ => a.cmp(b),
    }
}

/// Numeric value of a segment; an empty segment counts as zero.
fn segment_value(segment: &str) -> Option<i64> {
    if segment.is_empty() {
        Some(0)
    } else {
        segment.parse().ok()
    }
}

/// True if every segment is empty or parses as integer zero.
fn tail_is_zero(segments: &[&str]) -> bool {
    segments.iter().all(|s| segment_value(s) == Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions() {
        assert_eq!(vercmp("1.2.3", "1.2.3"), 0);
        assert_eq!(vercmp("0.0", "0.0"), 0);
        assert_eq!(vercmp("", ""), 0);
    }

    #[test]
    fn test_numeric_segments_not_lexicographic() {
        // "2" < "10" numerically, even though "2" > "1" as a string
        assert!(vercmp("1.2.0", "1.10.0") < 0);
        assert!(vercmp("1.10.0", "1.2.0") > 0);
        assert!(vercmp("9", "10") < 0);
    }

    #[test]
    fn test_textual_segments() {
        assert!(vercmp("1.2.rc1", "1.2.rc2") < 0);
        assert_eq!(vercmp("1.2.rc1", "1.2.rc1"), 0);
    }

    #[test]
    fn test_leading_zeros_compare_numerically() {
        assert_eq!(vercmp("1.02", "1.2"), 0);
        assert!(vercmp("1.007", "1.10") < 0);
    }

    #[test]
    fn test_trailing_zero_tail_is_equal() {
        assert_eq!(vercmp("1.0", "1.0.0"), 0);
        assert_eq!(vercmp("1.0.0.0", "1.0"), 0);
        assert_eq!(vercmp("1", "1.0.0"), 0);
    }

    #[test]
    fn test_non_zero_tail_is_greater() {
        assert!(vercmp("1.0", "1.0.1") < 0);
        assert!(vercmp("1.0.1", "1.0") > 0);
        assert!(vercmp("1.2", "1.2.rc1") < 0);
        assert!(vercmp("1.2.rc1", "1.2") > 0);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(vercmp("", "0.0"), 0);
        assert!(vercmp("", "0.1") < 0);
    }

    #[test]
    fn test_empty_segment_counts_as_zero() {
        // Head and tail positions agree: empty means numeric zero.
        assert_eq!(vercmp("1.", "1.0"), 0);
        assert_eq!(vercmp("1..2", "1.0.2"), 0);
        assert!(vercmp("1.", "1.1") < 0);
        assert_eq!(vercmp(".1", "0.1.0"), 0);
    }

    #[test]
    fn test_antisymmetry() {
        let versions = ["1.2.0", "1.10.0", "1.2.rc1", "1.0", "1.0.0", "", "2"];
        for a in versions {
            for b in versions {
                assert_eq!(
                    vercmp(a, b).signum(),
                    -vercmp(b, a).signum(),
                    "antisymmetry violated for {:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_reflexivity() {
        for v in ["1.2.3", "0.0", "rc1", "", "1.0.0"] {
            assert_eq!(vercmp(v, v), 0);
        }
    }

    #[test]
    fn test_transitivity_chain() {
        // 1.1.0 < 1.2.0 < 1.10.0
        assert!(vercmp("1.1.0", "1.2.0") < 0);
        assert!(vercmp("1.2.0", "1.10.0") < 0);
        assert!(vercmp("1.1.0", "1.10.0") < 0);

        // 0.9 < 1.0 < 1.0.1
        assert!(vercmp("0.9", "1.0") < 0);
        assert!(vercmp("1.0", "1.0.1") < 0);
        assert!(vercmp("0.9", "1.0.1") < 0);
    }
}
