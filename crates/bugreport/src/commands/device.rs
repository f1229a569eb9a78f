use anyhow::Result;
use bugreport_core::DeviceInfo;

use crate::cli::OutputFormat;
use crate::environment::HostEnvironment;
use crate::output::output_result;

pub fn handle_device_info(format: OutputFormat) -> Result<()> {
    let info = DeviceInfo::capture(&HostEnvironment::default());
    output_result(&info, format);
    Ok(())
}
