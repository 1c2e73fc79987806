pub mod batch;
pub mod clean;
pub mod convert;
pub mod init;
