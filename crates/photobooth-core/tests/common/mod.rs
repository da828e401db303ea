#![allow(dead_code)]

pub mod booth_server;
pub mod scripted;

use photobooth_core::Payload;

pub fn png(name: &str) -> Payload {
    Payload::new(name, "image/png", format!("PNG bytes of {name}").into_bytes())
}
