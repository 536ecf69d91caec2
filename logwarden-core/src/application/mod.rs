pub mod conversation;
pub mod resilience;
pub mod response;
pub mod wrapper;
