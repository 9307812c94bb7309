//! In-process caches owned by the service layer

mod self_record;

pub use self_record::{RecordState, SelfPresenceCache, SelfRecord};
