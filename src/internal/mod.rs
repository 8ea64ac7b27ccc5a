pub mod notification;
pub mod ui;
