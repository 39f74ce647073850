use crate::{commute_patches, invert, Operation, Patch, PatchError};

/// Rebases `patch` onto `history`.
///
/// `patch` and the first patch of `history` were both made against the same
/// document. The result can be applied after every patch in `history`.
/// Fails when a history patch cannot be inverted, or when `patch` conflicts
/// with it.
pub fn rebase(history: &[Patch], patch: &[Operation]) -> Result<Patch, PatchError> {
    history.iter().try_fold(patch.to_vec(), |patch, past| {
        let (rebased, _) = commute_patches(&invert(past)?, &patch)?;
        tracing::debug!(past = past.len(), rebased = rebased.len(), "rebased over patch");
        Ok(rebased)
    })
}
