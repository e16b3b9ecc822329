pub mod csv_io;
pub mod env;
pub mod pipeline_config;
pub mod progress_bars;
pub mod signature;

pub fn get_memory_usage() -> u64 {
    use sysinfo::System;
    let mut sys = System::new_all();
    sys.refresh_memory();
    sys.used_memory() / (1024 * 1024) // Convert to MB
}
