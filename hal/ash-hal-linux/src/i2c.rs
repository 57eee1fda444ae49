//! i2c-dev bus access (servo board)

use linux_embedded_hal::I2cdev;
use tracing::debug;

use crate::error::HalError;

/// Open `/dev/i2c-<bus>`
pub fn open_i2c(bus: u8) -> Result<I2cdev, HalError> {
    let path = format!("/dev/i2c-{}", bus);
    let dev = I2cdev::new(&path).map_err(|e| HalError::I2c {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    debug!(path = %path, "I2C bus opened");
    Ok(dev)
}
