//! Protocols of the two controllers found on RGB character LCD modules.

pub mod backlight;
pub mod hd44780;
