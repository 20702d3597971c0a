//! # Gatewayエンドポイント

pub mod link;
pub mod quote;
pub mod status;

pub use link::handle_get_link;
pub use quote::handle_get_quote;
pub use status::handle_get_status;
