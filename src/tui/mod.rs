pub mod controls;
pub mod footer;
pub mod header;
pub mod logs;
pub mod render;
pub mod spinner;
