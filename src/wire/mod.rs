//! Wire boundary: message shapes, binary codec, encode/decode
//!
//! The request discriminator and comparison values are modeled as tagged
//! enums, so "exactly one of N fields set" holds structurally instead of by
//! convention.

pub mod codec;
pub mod decode;
pub mod encode;
pub mod request;
pub mod response;
pub mod vectors;

pub use codec::{BinaryCodec, Codec};
pub use decode::{decode_aggregate, decode_grouped, decode_results};
pub use encode::{encode_aggregate, encode_filter, encode_search};
pub use request::{AggregateRequest, FilterNode, SearchRequest, WireQuery, WireValue};
pub use response::{AggregateReply, GroupEntry, ResultEntry, SearchReply};
pub use vectors::{MULTI_VECTOR_TAG, SINGLE_VECTOR_TAG};
