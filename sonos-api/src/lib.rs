//! Typed Sonos API for UPnP device control
//!
//! Every UPnP action is a zero-sized type implementing [`SonosOperation`],
//! pairing a request struct with a response struct. [`SonosClient`] turns
//! those into SOAP calls through the private `soap-client` crate:
//!
//! ```rust,no_run
//! use sonos_api::SonosClient;
//! use sonos_api::operations::rendering_control::{GetVolumeOperation, GetVolumeRequest};
//!
//! let client = SonosClient::new();
//! let volume = client.execute::<GetVolumeOperation>(
//!     "192.168.1.100",
//!     1400,
//!     &GetVolumeRequest::master(),
//! )?;
//! println!("volume is {}", volume.current_volume);
//! # Ok::<(), sonos_api::ApiError>(())
//! ```

pub mod client;
pub mod error;
pub mod operation;
pub mod operations;
pub mod service;
pub mod time;
pub mod topology;

pub use client::SonosClient;
pub use error::{ApiError, Result};
pub use operation::SonosOperation;
pub use service::{Service, ServiceInfo};
