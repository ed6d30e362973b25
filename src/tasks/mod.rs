pub mod lock;
pub mod ui;
