//! Wi-Fi Simple Configuration (WSC) Enrollee protocol core.
//!
//! Implements the Enrollee side of WSC v2.0.5 as it runs embedded inside an
//! EAP Expanded-Type method: the M1..M8 message exchange, the
//! Diffie-Hellman/HMAC key schedule, the Encrypted Settings envelope, and
//! the credential bundle a Registrar hands back at the end.
//!
//! # Architecture
//!
//! ```text
//! +---------------------------+
//! |   eap (EAP framing)       |   opcode/flag byte, 12-byte header slot
//! +---------------------------+
//! |   session (state machine) |   EXPECT_START .. FINISHED, auth chain
//! +---------------------------+
//! |   message  |  keyschedule |   M1..M8 codec  |  DH -> AuthKey/KWK/EMSK
//! +---------------------------+
//! |   tlv      |  attr        |   TLV framing   |  WSC attribute types
//! +---------------------------+
//! |   crypto (SHA-256, HMAC, AES-CBC, DH group 5) |
//! +---------------------------+
//! ```
//!
//! This crate never generates M2, M4, M6, or M8 — only an Enrollee role is
//! implemented. A Registrar core would live in a sibling crate sharing
//! [`crypto`] and [`tlv`].
//!
//! # Quick start
//!
//! ```no_run
//! use wsc_enrollee::prelude::*;
//!
//! let mut settings = MapSettingsSource::new();
//! settings
//!     .set("WSC", "EnrolleeMAC", "02:00:00:00:00:01")
//!     .set("WSC", "RFBand", "1")
//!     .set("WSC", "DevicePassword", "12345678");
//!
//! let mut session = Session::load_settings(&settings)?;
//! let _m1 = session.handle_request(0x01, 0x00, &[])?;
//! # Ok::<(), WscError>(())
//! ```

pub mod attr;
pub mod crypto;
pub mod eap;
pub mod error;
pub mod keyschedule;
pub mod message;
pub mod prelude;
pub mod session;
pub mod tlv;

pub use error::{Result, WscError};
