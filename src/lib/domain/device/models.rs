pub mod device;
pub mod operation;
