//! Commonly used types for consumers of this crate.
//!
//! Import everything with `use wsc_enrollee::prelude::*;`.

pub use crate::attr::{
    ConfigMethods, ConfigurationError, DevicePasswordId, PrimaryDeviceType, RfBand,
};
pub use crate::eap::{handle_request, EAP_HEADER_LEN};
pub use crate::error::{Result, WscError};
pub use crate::message::Credential;
pub use crate::session::{MapSettingsSource, Session, SettingsSource, State};
