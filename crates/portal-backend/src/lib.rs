pub mod client;
pub mod error;


pub use client::PortalClient;
pub use error::{PortalError, Result};
