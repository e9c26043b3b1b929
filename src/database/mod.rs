pub mod job_store;
pub mod memory;
pub mod pool;
pub mod postgres;

pub use job_store::{JobFilter, JobStore};
pub use memory::MemoryJobStore;
pub use postgres::PgJobStore;
