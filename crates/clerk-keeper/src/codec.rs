//! Binary codec for stored values.
//!
//! Bincode with fixed-width little-endian integers and trailing bytes
//! rejected: one value has exactly one encoding, so every replica writes the
//! same bytes.

use bincode::Options;
use clerk_types::EventRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClerkError, ClerkResult};

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub fn encode<T: Serialize>(value: &T) -> ClerkResult<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| ClerkError::Codec(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ClerkResult<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| ClerkError::Codec(e.to_string()))
}

pub fn encode_record(record: &EventRecord) -> ClerkResult<Vec<u8>> {
    encode(record)
}

pub fn decode_record(bytes: &[u8]) -> ClerkResult<EventRecord> {
    decode(bytes)
}

pub fn encode_id(id: u64) -> ClerkResult<Vec<u8>> {
    encode(&id)
}

pub fn decode_id(bytes: &[u8]) -> ClerkResult<u64> {
    decode(bytes)
}
