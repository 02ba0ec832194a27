use crate::shapes::Collidable;

/// Every unordered pair of distinct slots in `0..n`
pub(crate) fn unordered_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Flag both items if their boxes overlap.
///
/// **Returns** whether the pair overlapped. Flags are only ever set here, never cleared.
pub(crate) fn flag_if_overlapping<T: Collidable>(items: &mut [T], a: usize, b: usize) -> bool {
    if !items[a].bounds().intersects(items[b].bounds()) {
        return false;
    }
    items[a].mark_colliding();
    items[b].mark_colliding();
    true
}
