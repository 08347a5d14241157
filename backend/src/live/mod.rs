pub mod poller;
pub mod state;

pub use poller::LivePoller;
pub use state::LiveState;
