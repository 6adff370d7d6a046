pub mod ash_device;
pub mod device;
