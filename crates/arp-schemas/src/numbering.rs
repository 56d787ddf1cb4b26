//! Item-number ordering.
//!
//! Item numbers are dotted numeric strings ("1", "1.2", "1.10"). They sort
//! segment by segment, numerically where both segments are digits, so
//! "1.9" < "1.10" and "2" < "10". A segment that is not a plain number falls
//! back to a case-insensitive text comparison. A shorter number sorts before
//! any longer number it prefixes ("1" < "1.1").

use std::cmp::Ordering;

use crate::CatalogItem;

/// Numeric-aware comparison of two dotted item numbers.
pub fn cmp_item_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.trim().split('.');
    let mut right = b.trim().split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = cmp_segment(x.trim(), y.trim());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn cmp_segment(x: &str, y: &str) -> Ordering {
    match (x.parse::<u64>(), y.parse::<u64>()) {
        (Ok(nx), Ok(ny)) => nx.cmp(&ny),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => x.to_lowercase().cmp(&y.to_lowercase()),
    }
}

/// Stable in-place sort of catalog items by item number.
pub fn sort_by_item_number(items: &mut [CatalogItem]) {
    items.sort_by(|a, b| cmp_item_numbers(&a.number, &b.number));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_numbers_compare_numerically() {
        assert_eq!(cmp_item_numbers("1.10", "1.9"), Ordering::Greater);
        assert_eq!(cmp_item_numbers("2", "10"), Ordering::Less);
        assert_eq!(cmp_item_numbers("1", "1.1"), Ordering::Less);
        assert_eq!(cmp_item_numbers(" 3.2 ", "3.2"), Ordering::Equal);
    }

    #[test]
    fn text_segments_sort_after_numbers() {
        assert_eq!(cmp_item_numbers("1.A", "1.1"), Ordering::Greater);
        assert_eq!(cmp_item_numbers("1.a", "1.B"), Ordering::Less);
    }

    #[test]
    fn sort_is_numeric_aware() {
        let mut nums = vec!["1.10", "1.2", "10", "2", "1.9", "1"];
        nums.sort_by(|a, b| cmp_item_numbers(a, b));
        assert_eq!(nums, vec!["1", "1.2", "1.9", "1.10", "2", "10"]);
    }
}
