pub mod board;
pub mod device;
pub mod gamepad;
pub mod host;
pub mod input;
pub mod sound;
pub mod terminal;
pub mod tone;
