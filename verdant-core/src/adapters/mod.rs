//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - MongoDB for the Repository port
//! - In-memory store for the Repository port (dev mode and tests)
//! - FCM HTTP client for PushDispatcher, with a disabled stand-in when
//!   no server key is configured

pub mod fcm;
pub mod memory;
pub mod mongo;

pub use fcm::{DisabledDispatcher, FcmDispatcher};
pub use memory::MemoryRepository;
pub use mongo::MongoRepository;
