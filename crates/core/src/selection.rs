//! Weighted random selection.
//!
//! Items keep their position in the table even when their weight is zero or
//! negative; such items simply have zero probability of being drawn.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid weights: total positive weight must be greater than zero")]
    InvalidWeights,
}

/// Sum of the strictly positive weights in `items`.
pub fn total_weight<T, F>(items: &[T], weight: F) -> i64
where
    F: Fn(&T) -> i64,
{
    items
        .iter()
        .map(&weight)
        .filter(|w| *w > 0)
        .fold(0i64, |acc, w| acc.saturating_add(w))
}

/// Draw one item with probability `weight / total_weight`.
///
/// The draw is a uniform real in `[0, total)`; see [`pick_at`] for how it is
/// mapped onto the table.
pub fn pick<'a, T, F, R>(items: &'a [T], weight: F, rng: &mut R) -> Result<&'a T, SelectionError>
where
    F: Fn(&T) -> i64,
    R: Rng + ?Sized,
{
    let total = total_weight(items, &weight);
    if total <= 0 {
        return Err(SelectionError::InvalidWeights);
    }
    let target = rng.random::<f64>() * total as f64;
    pick_at(items, weight, target)
}

/// Map a draw onto the table.
///
/// Walks the positive-weight items accumulating weight and returns the first
/// whose cumulative weight is `>= target`, so a draw landing exactly on a
/// boundary belongs to the lower item. If no item qualifies (the target
/// drifted past the total) the last positive-weight item is returned.
pub fn pick_at<T, F>(items: &[T], weight: F, target: f64) -> Result<&T, SelectionError>
where
    F: Fn(&T) -> i64,
{
    let mut cumulative = 0f64;
    let mut last_eligible = None;

    for item in items {
        let w = weight(item);
        if w <= 0 {
            continue;
        }
        cumulative += w as f64;
        last_eligible = Some(item);
        if target <= cumulative {
            return Ok(item);
        }
    }

    last_eligible.ok_or(SelectionError::InvalidWeights)
}
