//! WebSocket support: connection management, heartbeat, and the market ticker.

pub mod handler;
pub mod manager;
pub mod ticker;

pub use handler::ws_handler;
pub use manager::WsManager;
pub use ticker::start_ticker;
