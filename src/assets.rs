pub mod decode;
pub mod loader;
