//! Key encoding for every index the keeper maintains.
//!
//! Each index family owns a one-byte prefix. Numeric suffixes are 8-byte
//! big-endian and times are 12 bytes (sign-flipped big-endian seconds, then
//! big-endian nanoseconds), so lexicographic key order is numeric and
//! chronological order.
//!
//! ```text
//! record            0x11 | id
//! sequence          0x12 | token
//! record time       0x13 | time | id
//! tron record time  0x14 | time | id
//! eth record time   0x15 | time | id
//! tron record       0x16 | origin_id
//! eth record        0x17 | origin_id
//! latest id         0x18
//! root to canonical 0x19 | chain tag | origin_id
//! ```

use chrono::{DateTime, Utc};
use clerk_store::prefix_end;
use clerk_types::RootChainType;

use crate::error::{ClerkError, ClerkResult};

/// Encoded length of a time suffix.
pub const TIME_LEN: usize = 12;

/// Encoded length of a numeric suffix.
pub const ID_LEN: usize = 8;

/// Closed set of index families.
///
/// The one-byte tag is the enum discriminant, so two families can never share
/// a prefix: the compiler rejects duplicate discriminants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum IndexFamily {
    /// Canonical record by canonical ID.
    Record = 0x11,
    /// Sequence ledger membership markers.
    Sequence = 0x12,
    /// Canonical time index.
    RecordTime = 0x13,
    /// Tron time index.
    TronRecordTime = 0x14,
    /// Ethereum time index.
    EthRecordTime = 0x15,
    /// Tron dedupe entries by origin ID.
    TronRecord = 0x16,
    /// Ethereum dedupe entries by origin ID.
    EthRecord = 0x17,
    /// Singleton ID counter.
    LatestId = 0x18,
    /// Cross-reference from root-chain origin ID to canonical ID.
    RootToCanonical = 0x19,
}

impl IndexFamily {
    pub const ALL: [IndexFamily; 9] = [
        Self::Record,
        Self::Sequence,
        Self::RecordTime,
        Self::TronRecordTime,
        Self::EthRecordTime,
        Self::TronRecord,
        Self::EthRecord,
        Self::LatestId,
        Self::RootToCanonical,
    ];

    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn prefix(self) -> [u8; 1] {
        [self.tag()]
    }

    /// Dedupe family of a root chain.
    pub fn dedupe(chain: &RootChainType) -> ClerkResult<Self> {
        match chain {
            RootChainType::Eth => Ok(Self::EthRecord),
            RootChainType::Tron => Ok(Self::TronRecord),
            RootChainType::Unknown(tag) => Err(ClerkError::UnknownRootChain(tag.clone())),
        }
    }

    /// Time index family of a root chain.
    pub fn root_chain_time(chain: &RootChainType) -> ClerkResult<Self> {
        match chain {
            RootChainType::Eth => Ok(Self::EthRecordTime),
            RootChainType::Tron => Ok(Self::TronRecordTime),
            RootChainType::Unknown(tag) => Err(ClerkError::UnknownRootChain(tag.clone())),
        }
    }
}

/// Sub-key of a root chain inside the cross-reference family.
pub fn chain_tag(chain: &RootChainType) -> ClerkResult<u8> {
    match chain {
        RootChainType::Eth => Ok(0x01),
        RootChainType::Tron => Ok(0x02),
        RootChainType::Unknown(tag) => Err(ClerkError::UnknownRootChain(tag.clone())),
    }
}

/// Singleton key of the ID counter.
pub const LATEST_ID_KEY: [u8; 1] = IndexFamily::LatestId.prefix();

/// Order-preserving time encoding.
///
/// Flipping the sign bit maps `i64::MIN..=i64::MAX` onto `0..=u64::MAX`
/// monotonically, so pre-epoch times still sort first.
pub fn encode_time(time: &DateTime<Utc>) -> [u8; TIME_LEN] {
    let seconds = (time.timestamp() as u64) ^ (1 << 63);
    let nanos = time.timestamp_subsec_nanos();
    let mut out = [0u8; TIME_LEN];
    out[..8].copy_from_slice(&seconds.to_be_bytes());
    out[8..].copy_from_slice(&nanos.to_be_bytes());
    out
}

fn key(prefix: &[u8], suffixes: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + suffixes.iter().map(|s| s.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(prefix);
    for suffix in suffixes {
        out.extend_from_slice(suffix);
    }
    out
}

/// `0x11 | id`
pub fn record_key(id: u64) -> Vec<u8> {
    key(&IndexFamily::Record.prefix(), &[&id.to_be_bytes()])
}

/// `0x17 | origin_id` or `0x16 | origin_id`
pub fn root_chain_record_key(chain: &RootChainType, origin_id: u64) -> ClerkResult<Vec<u8>> {
    let family = IndexFamily::dedupe(chain)?;
    Ok(key(&family.prefix(), &[&origin_id.to_be_bytes()]))
}

/// `0x19 | chain tag | origin_id`
pub fn root_to_canonical_key(chain: &RootChainType, origin_id: u64) -> ClerkResult<Vec<u8>> {
    let tag = chain_tag(chain)?;
    Ok(key(
        &IndexFamily::RootToCanonical.prefix(),
        &[&[tag], &origin_id.to_be_bytes()],
    ))
}

/// `0x13 | time`
pub fn record_time_prefix(time: &DateTime<Utc>) -> Vec<u8> {
    key(&IndexFamily::RecordTime.prefix(), &[&encode_time(time)])
}

/// `0x13 | time | id`
pub fn record_time_key(time: &DateTime<Utc>, id: u64) -> Vec<u8> {
    key(
        &IndexFamily::RecordTime.prefix(),
        &[&encode_time(time), &id.to_be_bytes()],
    )
}

/// `0x15 | time` or `0x14 | time`
pub fn root_chain_record_time_prefix(
    chain: &RootChainType,
    time: &DateTime<Utc>,
) -> ClerkResult<Vec<u8>> {
    let family = IndexFamily::root_chain_time(chain)?;
    Ok(key(&family.prefix(), &[&encode_time(time)]))
}

/// `0x15 | time | id` or `0x14 | time | id`
pub fn root_chain_record_time_key(
    chain: &RootChainType,
    time: &DateTime<Utc>,
    id: u64,
) -> ClerkResult<Vec<u8>> {
    let family = IndexFamily::root_chain_time(chain)?;
    Ok(key(
        &family.prefix(),
        &[&encode_time(time), &id.to_be_bytes()],
    ))
}

/// `0x12 | token`
pub fn sequence_key(token: &str) -> Vec<u8> {
    key(&IndexFamily::Sequence.prefix(), &[token.as_bytes()])
}

/// Half-open scan bounds covering every time key in `[from, to]`.
///
/// `start` is the prefix of `from`; `end` is the first key past every key
/// carrying the prefix of `to`, which makes `to` itself inclusive.
pub fn closed_time_range(
    from_prefix: Vec<u8>,
    to_prefix: &[u8],
) -> (Vec<u8>, Option<Vec<u8>>) {
    (from_prefix, prefix_end(to_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, nanos).unwrap()
    }

    #[test]
    fn family_tags_are_unique_and_sorted() {
        let tags: Vec<u8> = IndexFamily::ALL.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, (0x11..=0x19).collect::<Vec<u8>>());
    }

    #[test]
    fn unknown_chain_has_no_key() {
        let unknown = RootChainType::Unknown("bsc".into());
        assert_eq!(
            root_chain_record_key(&unknown, 1),
            Err(ClerkError::UnknownRootChain("bsc".into()))
        );
        assert!(root_to_canonical_key(&unknown, 1).is_err());
        assert!(root_chain_record_time_key(&unknown, &at(0, 0), 1).is_err());
    }

    #[test]
    fn record_keys_sort_numerically() {
        // Decimal suffixes would put 10 before 9.
        assert!(record_key(9) < record_key(10));
        assert!(record_key(255) < record_key(256));
        assert!(record_key(u64::MAX - 1) < record_key(u64::MAX));
    }

    #[test]
    fn record_key_layout() {
        assert_eq!(record_key(1), vec![0x11, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn chains_use_distinct_families() {
        let eth = root_chain_record_key(&RootChainType::Eth, 7).unwrap();
        let tron = root_chain_record_key(&RootChainType::Tron, 7).unwrap();
        assert_ne!(eth, tron);
        assert_eq!(eth[0], IndexFamily::EthRecord.tag());
        assert_eq!(tron[0], IndexFamily::TronRecord.tag());

        let eth_x = root_to_canonical_key(&RootChainType::Eth, 7).unwrap();
        let tron_x = root_to_canonical_key(&RootChainType::Tron, 7).unwrap();
        assert_eq!(eth_x[..2], [0x19, 0x01]);
        assert_eq!(tron_x[..2], [0x19, 0x02]);
    }

    #[test]
    fn time_encoding_is_chronological() {
        let times = [
            at(-10, 0),
            at(-1, 999_999_999),
            at(0, 0),
            at(0, 1),
            at(1, 0),
            at(1_700_000_000, 5),
            at(1_700_000_001, 0),
        ];
        for pair in times.windows(2) {
            assert!(encode_time(&pair[0]) < encode_time(&pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn time_keys_order_by_time_then_id() {
        let early = record_time_key(&at(100, 0), 9);
        let late = record_time_key(&at(101, 0), 1);
        assert!(early < late);
        assert!(record_time_key(&at(100, 0), 1) < record_time_key(&at(100, 0), 2));
        assert_eq!(early.len(), 1 + TIME_LEN + ID_LEN);
    }

    #[test]
    fn time_key_starts_with_time_prefix() {
        let t = at(42, 7);
        assert!(record_time_key(&t, 3).starts_with(&record_time_prefix(&t)));
        let chain_key = root_chain_record_time_key(&RootChainType::Tron, &t, 3).unwrap();
        let chain_prefix = root_chain_record_time_prefix(&RootChainType::Tron, &t).unwrap();
        assert!(chain_key.starts_with(&chain_prefix));
    }

    #[test]
    fn closed_range_includes_upper_bound() {
        let to = at(200, 0);
        let (start, end) =
            closed_time_range(record_time_prefix(&at(100, 0)), &record_time_prefix(&to));
        let end = end.unwrap();
        let inside = record_time_key(&to, u64::MAX);
        let outside = record_time_key(&at(200, 1), 0);
        assert!(inside >= start && inside < end);
        assert!(outside >= end);
    }

    #[test]
    fn sequence_key_layout() {
        assert_eq!(sequence_key("ab"), vec![0x12, b'a', b'b']);
    }

    #[test]
    fn latest_id_key_is_singleton_prefix() {
        assert_eq!(LATEST_ID_KEY, [0x18]);
    }
}
