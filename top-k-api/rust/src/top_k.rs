//! Top-k frequent elements: the ranking core and its HTTP surface.

pub(crate) mod http;
mod ranker;
mod value;

pub use ranker::{rank, FrequencyTable, RankError, Ranking};
pub use value::Value;

pub(crate) use http::{router, TopKRequest, TopKResponse, PATH};
