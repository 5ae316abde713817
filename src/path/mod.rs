pub mod resolver;
pub mod decode;
