pub mod app;
pub mod keybindings;
pub mod logging;
pub mod notification;
pub mod realm;
pub mod settings;
pub mod theme;
pub mod timer;
pub mod todo;
pub mod ui;
pub mod view;
