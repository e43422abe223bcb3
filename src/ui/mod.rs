/// Terminal front end: input devices, pictures, sound and drawing.

pub mod frame;
pub mod gamepad;
pub mod input;
pub mod picture;
pub mod renderer;
pub mod sound;
pub mod widget;
