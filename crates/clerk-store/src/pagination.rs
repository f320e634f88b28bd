/// A 1-based page request over an ordered iteration.
///
/// Page `n` covers items `[(n - 1) * limit, n * limit)`. There is no page
/// zero and a zero limit selects nothing: both yield an empty window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Cap `limit` at `max`.
    pub fn clamp(self, max: u64) -> Self {
        Self {
            page: self.page,
            limit: self.limit.min(max),
        }
    }

    /// `(skip, take)` for this page, or `None` if it selects nothing.
    pub fn window(&self) -> Option<(usize, usize)> {
        if self.page == 0 || self.limit == 0 {
            return None;
        }
        let skip = (self.page - 1).checked_mul(self.limit)?;
        Some((
            usize::try_from(skip).ok()?,
            usize::try_from(self.limit).ok()?,
        ))
    }
}
