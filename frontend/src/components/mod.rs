pub mod handlers;
pub mod header;
pub mod live_panel;
pub mod results;
pub mod upload_section;
pub mod utils;
