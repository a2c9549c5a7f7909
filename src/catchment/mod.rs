//! Per-query neighbour catchments.
//!
//! Every query owns four [`CatchmentBin`]s, one per [`Direction`], each a
//! size-capped best-first list with an O(1) admission bound. Candidates that
//! miss a bin's distance cutoff may be kept in a [`PushCatchment`] so that an
//! otherwise empty bin still reports its closest neighbours. Once the target
//! stream ends, [`balance`] decides how many members each bin outputs.
//!
//! [`Direction`]: crate::genomics::Direction

mod balance;
mod bin;
mod config;
mod push;
mod set;

pub use balance::balance;
pub use bin::{Admission, CatchmentBin, RankKey, ResultEntry};
pub use config::{BinSizes, CatchmentConfig, ConfigError, DEFAULT_PAIR_THRESHOLD};
pub use push::PushCatchment;
pub use set::{QueryCatchmentSet, QueryResult};
