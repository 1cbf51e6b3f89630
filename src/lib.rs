pub mod clock;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod food;
pub mod font;
pub mod game;
pub mod grid;
pub mod input;
pub mod keyboard;
pub mod mailbox;
pub mod renderer;
pub mod snake;
pub mod surface;
pub mod terminal_runtime;
