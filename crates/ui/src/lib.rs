#![forbid(unsafe_code)]

pub mod vm;
