// tests/property/main.rs

mod decoder;
mod range;
