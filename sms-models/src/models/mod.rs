pub mod filter;
pub mod message;
