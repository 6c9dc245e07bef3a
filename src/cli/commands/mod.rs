pub mod decode;
pub mod protocols;
