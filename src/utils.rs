/// Marks the branch containing the call as unlikely.
#[cold]
#[inline(always)]
pub(crate) fn cold_path() {}
