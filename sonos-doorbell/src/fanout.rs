//! Ring every device at once.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error};

use crate::config::RingSettings;
use crate::control::DeviceControl;
use crate::device::Device;
use crate::error::{DoorbellError, Result};
use crate::report::RingReport;
use crate::ring::{ring_device, Announce};

/// Report message for a device whose task panicked
pub const TASK_FAILED: &str = "Ringing this device crashed:";

/// Run [`ring_device`] for every device concurrently
///
/// Reports come back in `devices` order. A device that fails, even by
/// panicking, only affects its own report; the call itself fails only when
/// a task is cancelled because the runtime is shutting down.
pub async fn ring_all(
    control: Arc<dyn DeviceControl>,
    settings: &RingSettings,
    announce: Announce,
    devices: &[Device],
) -> Result<Vec<RingReport>> {
    let handles: Vec<_> = devices
        .iter()
        .cloned()
        .map(|device| {
            let control = Arc::clone(&control);
            let settings = settings.clone();
            tokio::spawn(async move {
                ring_device(control.as_ref(), &settings, &announce, &device).await
            })
        })
        .collect();

    debug!(devices = handles.len(), "ringing");

    join_all(handles)
        .await
        .into_iter()
        .zip(devices)
        .map(|(joined, device)| match joined {
            Ok(report) => Ok(report),
            Err(e) if e.is_panic() => {
                error!(device = %device.name, error = %e, "device task panicked");
                let mut report = RingReport::new(device.name.clone());
                report.push_error(format!("{} {}", TASK_FAILED, e));
                Ok(report)
            }
            Err(e) => {
                error!(device = %device.name, error = %e, "device task cancelled");
                Err(DoorbellError::from(e))
            }
        })
        .collect()
}
