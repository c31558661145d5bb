pub mod flash;
pub mod media;
pub mod session;
