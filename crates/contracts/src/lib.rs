//! Types shared between the backend service and the browser client.

pub mod domain;
pub mod shared;
