pub mod arena_client;
pub mod dialog_helpers;
pub mod filter_helpers;
pub mod loader_helpers;
pub mod page_helpers;
pub mod render_helpers;
pub mod sanitization_helpers;
