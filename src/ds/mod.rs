pub mod recency_window;

pub use recency_window::{RecencyWindow, Renumbering};
