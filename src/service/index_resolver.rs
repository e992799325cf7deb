use crate::error::PollError;

/// Resolves one positional index against an ordered universe. Negative
/// indices count from the end. The raw index is reported on bounds errors.
pub fn resolve_one<T>(index: i64, universe: &[T]) -> Result<&T, PollError> {
    let len = universe.len() as i64;
    let effective = if index < 0 { len + index } else { index };
    if effective < 0 || effective >= len {
        return Err(PollError::IndexOutOfRange { index });
    }
    Ok(&universe[effective as usize])
}

/// Resolves a sequence of indices against an ordered universe.
///
/// The output follows the order of the input indices, not the universe.
/// The first out-of-bounds index aborts the whole resolution. With
/// `dedupe`, repeated elements keep only their first occurrence; without
/// it, repeats pass through so the caller can surface them.
pub fn resolve<T: Clone + PartialEq>(
    indices: &[i64],
    universe: &[T],
    dedupe: bool,
) -> Result<Vec<T>, PollError> {
    let mut out = Vec::with_capacity(indices.len());
    for &index in indices {
        let item = resolve_one(index, universe)?.clone();
        if dedupe && out.contains(&item) {
            continue;
        }
        out.push(item);
    }
    Ok(out)
}
