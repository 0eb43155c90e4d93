// Ranking engine for the "recommended jobs" feed.
// Pure and synchronous: no I/O, no shared state. Handlers fetch the inputs and
// hand them over; nothing here is persisted.

pub mod handlers;
pub mod normalize;
pub mod ranker;
pub mod scorer;

pub use ranker::{rank, Item, ScoredItem, Taggable, DEFAULT_LIMIT};
pub use scorer::{score, TagMatch};
