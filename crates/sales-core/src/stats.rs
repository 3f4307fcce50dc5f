//! Small statistics helpers over categorical values.

use std::collections::HashMap;
use std::hash::Hash;

/// Most frequent value in `values`.
///
/// Ties are resolved in favour of the value that appears first. Returns
/// `None` for an empty input.
///
/// # Examples
///
/// ```
/// use sales_core::stats::mode;
///
/// assert_eq!(mode([4, 3, 3, 4]), Some(4));
/// assert_eq!(mode([1, 2, 2]), Some(2));
/// assert_eq!(mode(Vec::<u32>::new()), None);
/// ```
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    // value -> (count, first index)
    let mut seen: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        seen.entry(value).or_insert((0, idx)).0 += 1;
    }

    seen.into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}
