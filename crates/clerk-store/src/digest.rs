use crate::error::StoreResult;
use crate::traits::KvStore;

const DIGEST_DOMAIN: &[u8] = b"clerk-state-v1:";

/// BLAKE3 digest of every key and value in the store, in key order.
///
/// Keys and values are length-prefixed so distinct contents can never
/// produce the same byte stream. Two replicas that applied the same
/// transactions must report the same digest.
pub fn state_digest<S: KvStore + ?Sized>(store: &S) -> StoreResult<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DIGEST_DOMAIN);
    for (key, value) in store.iter_range(&[], None)? {
        hasher.update(&(key.len() as u64).to_be_bytes());
        hasher.update(&key);
        hasher.update(&(value.len() as u64).to_be_bytes());
        hasher.update(&value);
    }
    Ok(*hasher.finalize().as_bytes())
}
