pub mod protocol;
pub mod sample_task;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use ws_handler::ws_handler;
