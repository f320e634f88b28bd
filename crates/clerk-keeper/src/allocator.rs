use clerk_store::KvStore;
use tracing::warn;

use crate::codec;
use crate::error::{ClerkError, ClerkResult};
use crate::keeper::ClerkKeeper;
use crate::keys::LATEST_ID_KEY;

impl<S: KvStore, P> ClerkKeeper<S, P> {
    /// Highest canonical ID issued so far, `0` before the first record.
    ///
    /// A counter that fails to decode reads as `0`. Every replica holds the
    /// same bytes, so every replica takes the same fallback.
    pub fn latest_id(&self) -> ClerkResult<u64> {
        let Some(bytes) = self.store.get(&LATEST_ID_KEY)? else {
            return Ok(0);
        };
        match codec::decode_id(&bytes) {
            Ok(id) => Ok(id),
            Err(err) => {
                warn!(error = %err, "undecodable id counter, treating as 0");
                Ok(0)
            }
        }
    }

    /// Persist `id` as the highest issued canonical ID.
    ///
    /// Call only once every index of record `id` has been written. The
    /// counter never moves backwards.
    pub fn advance_to(&self, id: u64) -> ClerkResult<()> {
        let current = self.latest_id()?;
        if id < current {
            return Err(ClerkError::CounterRegression {
                current,
                requested: id,
            });
        }
        self.store.set(&LATEST_ID_KEY, &codec::encode_id(id)?)?;
        Ok(())
    }
}
