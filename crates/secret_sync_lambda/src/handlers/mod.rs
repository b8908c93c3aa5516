pub mod accounts;
pub mod catalog;
pub mod keys;
pub mod orchestrator;
pub mod paging;
pub mod sync;
