//! Application orchestration: the root scope, mounted pages, event
//! dispatch and the seams between the core algorithms.

pub mod bridge;
pub mod event;
pub mod handler;
pub mod listeners;
pub mod page;
pub mod root;
pub mod router;
pub mod scene;
pub mod script;
pub mod site;
pub mod state;
pub mod store;
