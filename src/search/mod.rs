pub mod alphabeta;
pub mod eval;
pub mod info;
pub mod limits;
pub mod thread;
pub mod timer;

pub use alphabeta::{SearchOutcome, SearchState};
pub use eval::{Evaluator, Material};
pub use info::{BestMove, NullListener, PvInfo, Score, SearchEvent, SearchListener, SearchStatus};
pub use limits::{Clock, SearchMode};
pub use thread::{Search, SearchHandle};
