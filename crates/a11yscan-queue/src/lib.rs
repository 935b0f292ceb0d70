//! A11yscan job queue.
//!
//! The [`JobQueue`] trait is the seam between the enqueue gateway, the worker
//! loop, and the backing message service. The SQS backend is the durable
//! production implementation; the in-memory backend simulates visibility
//! timeouts for tests and local development.

mod factory;
mod memory;
mod sqs;
mod traits;

pub use factory::{create_queue, QueueBackend};
pub use memory::InMemoryJobQueue;
pub use sqs::{SqsJobQueue, SqsQueueConfig};
pub use traits::{JobQueue, QueueDiagnostics, QueueError, QueueMessage};
