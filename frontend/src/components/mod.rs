pub mod camera_view;
pub mod emotion_picker;
pub mod handlers;
pub mod header;
pub mod results;
pub mod utils;
