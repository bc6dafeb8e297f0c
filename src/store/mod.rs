pub mod ids;
pub mod latency;
pub mod memory;
pub mod record;

pub use ids::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidIds};
pub use latency::{Delay, LatencyProfile, NoDelay, Operation, SleepDelay};
pub use memory::FixtureStore;
pub use record::{Record, Stamp};
