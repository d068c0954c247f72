#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod view;
pub mod window;

pub use controller::HistoryController;
pub use view::{build_history_page, build_threads, HistoryPage, ThreadedHistory};
pub use window::PaginationWindow;
