//! WSC/WPS attribute type identifiers and the enumerations/bitmasks carried
//! inside them.
//!
//! These values come from the published Wi-Fi Simple Configuration
//! Technical Specification rather than from any file in this crate's
//! lineage — the iwd tree this core's message flow is grounded on keeps
//! its own copies of these constants in a header that wasn't part of the
//! retrieved sources, so they're sourced the way any independent
//! implementer would: from the spec document itself.

use bitflags::bitflags;

pub const ATTR_AP_CHANNEL: u16 = 0x1001;
pub const ATTR_ASSOCIATION_STATE: u16 = 0x1002;
pub const ATTR_AUTHENTICATION_TYPE: u16 = 0x1003;
pub const ATTR_AUTHENTICATION_TYPE_FLAGS: u16 = 0x1004;
pub const ATTR_AUTHENTICATOR: u16 = 0x1005;
pub const ATTR_CONFIG_METHODS: u16 = 0x1008;
pub const ATTR_CONFIGURATION_ERROR: u16 = 0x1009;
pub const ATTR_CONFIRMATION_URL4: u16 = 0x100A;
pub const ATTR_CONFIRMATION_URL6: u16 = 0x100B;
pub const ATTR_CONNECTION_TYPE: u16 = 0x100C;
pub const ATTR_CONNECTION_TYPE_FLAGS: u16 = 0x100D;
pub const ATTR_CREDENTIAL: u16 = 0x100E;
pub const ATTR_DEVICE_NAME: u16 = 0x1011;
pub const ATTR_DEVICE_PASSWORD_ID: u16 = 0x1012;
pub const ATTR_ENCRYPTED_SETTINGS: u16 = 0x1018;
pub const ATTR_ENCRYPTION_TYPE: u16 = 0x100F;
pub const ATTR_ENCRYPTION_TYPE_FLAGS: u16 = 0x1010;
pub const ATTR_ENROLLEE_NONCE: u16 = 0x101A;
pub const ATTR_E_HASH1: u16 = 0x1014;
pub const ATTR_E_HASH2: u16 = 0x1015;
pub const ATTR_E_SNONCE1: u16 = 0x1016;
pub const ATTR_E_SNONCE2: u16 = 0x1017;
pub const ATTR_KEY_WRAP_AUTHENTICATOR: u16 = 0x101E;
pub const ATTR_MAC_ADDRESS: u16 = 0x1020;
pub const ATTR_MANUFACTURER: u16 = 0x1021;
pub const ATTR_MODEL_NAME: u16 = 0x1023;
pub const ATTR_MODEL_NUMBER: u16 = 0x1024;
pub const ATTR_MSG_TYPE: u16 = 0x1022;
pub const ATTR_NETWORK_KEY: u16 = 0x1027;
pub const ATTR_OS_VERSION: u16 = 0x102D;
pub const ATTR_PRIMARY_DEVICE_TYPE: u16 = 0x1054;
pub const ATTR_PUBLIC_KEY: u16 = 0x1032;
pub const ATTR_R_HASH1: u16 = 0x1035;
pub const ATTR_R_HASH2: u16 = 0x1036;
pub const ATTR_R_SNONCE1: u16 = 0x1037;
pub const ATTR_R_SNONCE2: u16 = 0x1038;
pub const ATTR_RF_BANDS: u16 = 0x103C;
pub const ATTR_REGISTRAR_NONCE: u16 = 0x1039;
pub const ATTR_RESPONSE_TYPE: u16 = 0x103B;
pub const ATTR_SERIAL_NUMBER: u16 = 0x1042;
pub const ATTR_SSID: u16 = 0x1045;
pub const ATTR_UUID_E: u16 = 0x1047;
pub const ATTR_UUID_R: u16 = 0x1048;
pub const ATTR_VENDOR_EXTENSION: u16 = 0x1049;
pub const ATTR_VERSION: u16 = 0x104A;
pub const ATTR_WSC_STATE: u16 = 0x1044;

/// Wi-Fi Alliance vendor ID used by the Vendor Extension attribute to carry
/// the Version2 sub-element (WSC v2.0.5 §12).
pub const WFA_VENDOR_ID: [u8; 3] = [0x00, 0x37, 0x2A];
/// Sub-element type for Version2 inside `ATTR_VENDOR_EXTENSION`.
pub const WFA_VENDOR_EXT_VERSION2: u8 = 0x00;

bitflags! {
    /// Authentication types as carried in `ATTR_AUTHENTICATION_TYPE_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AuthenticationType: u16 {
        const OPEN          = 0x0001;
        const WPA_PERSONAL  = 0x0002;
        const SHARED        = 0x0004;
        const WPA_ENTERPRISE = 0x0008;
        const WPA2_ENTERPRISE = 0x0010;
        const WPA2_PERSONAL = 0x0020;
    }
}

bitflags! {
    /// Encryption types as carried in `ATTR_ENCRYPTION_TYPE_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EncryptionType: u16 {
        const NONE      = 0x0001;
        const WEP       = 0x0002;
        const TKIP      = 0x0004;
        const AES       = 0x0008;
    }
}

bitflags! {
    /// Connection types as carried in `ATTR_CONNECTION_TYPE_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConnectionType: u8 {
        const ESS = 0x01;
        const IBSS = 0x02;
    }
}

bitflags! {
    /// Configuration methods supported by the Enrollee.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigMethods: u16 {
        const USBA                  = 0x0001;
        const ETHERNET               = 0x0002;
        const LABEL                  = 0x0004;
        const DISPLAY                = 0x0008;
        const EXTERNAL_NFC_TOKEN     = 0x0010;
        const INTEGRATED_NFC_TOKEN   = 0x0020;
        const NFC_INTERFACE          = 0x0040;
        const PUSHBUTTON             = 0x0080;
        const KEYPAD                 = 0x0100;
        const VIRTUAL_PUSHBUTTON     = 0x0280;
        const PHYSICAL_PUSHBUTTON    = 0x0480;
        const VIRTUAL_DISPLAY_PIN    = 0x2008;
        const PHYSICAL_DISPLAY_PIN   = 0x4008;
    }
}

/// RF band, `ATTR_RF_BANDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfBand {
    Band24Ghz,
    Band50Ghz,
    Band60Ghz,
}

impl RfBand {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(RfBand::Band24Ghz),
            0x02 => Some(RfBand::Band50Ghz),
            0x04 => Some(RfBand::Band60Ghz),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            RfBand::Band24Ghz => 0x01,
            RfBand::Band50Ghz => 0x02,
            RfBand::Band60Ghz => 0x04,
        }
    }
}

/// WSC device state, `ATTR_WSC_STATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WscState {
    NotConfigured = 1,
    Configured = 2,
}

/// Association state, `ATTR_ASSOCIATION_STATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationState {
    NotAssociated = 0,
    ConnectionSuccess = 1,
    ConfigurationFailure = 2,
    AssociationFailure = 3,
    IpFailure = 4,
}

/// Device password ID, `ATTR_DEVICE_PASSWORD_ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePasswordId {
    DefaultPin = 0x0000,
    UserSpecified = 0x0001,
    MachineSpecified = 0x0002,
    Rekey = 0x0003,
    PushButton = 0x0004,
    RegistrarSpecified = 0x0005,
}

/// Configuration error codes, `ATTR_CONFIGURATION_ERROR`. `NoError` must
/// never be transmitted inside a NACK; the adapter treats it as a sentinel
/// meaning "suppress this response".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    NoError = 0,
    OobInterfaceReadError = 1,
    DecryptionCrcFailure = 2,
    Pwd2PasswordId = 3,
    FailedToConnect = 4,
    DeviceBusy = 6,
    SetupLocked = 7,
    MessageTimeout = 8,
    RegistrationSessionTimeout = 9,
    DevicePasswordAuthFailure = 18,
}

impl ConfigurationError {
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Primary device type: category, OUI, OUI type, subcategory (WSC v2.0.5
/// §12, `ATTR_PRIMARY_DEVICE_TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryDeviceType {
    pub category: u16,
    pub oui: [u8; 3],
    pub oui_type: u8,
    pub subcategory: u16,
}

/// The WFA-registered OUI used for standard (non-vendor-specific) device
/// subcategories.
pub const WFA_OUI: [u8; 3] = [0x00, 0x50, 0xF2];

impl Default for PrimaryDeviceType {
    fn default() -> Self {
        Self {
            category: 1,
            oui: WFA_OUI,
            oui_type: 0x04,
            subcategory: 1,
        }
    }
}

impl PrimaryDeviceType {
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..2].copy_from_slice(&self.category.to_be_bytes());
        out[2..5].copy_from_slice(&self.oui);
        out[5] = self.oui_type;
        out[6..8].copy_from_slice(&self.subcategory.to_be_bytes());
        out
    }

    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        if b.len() != 8 {
            return None;
        }
        Some(Self {
            category: u16::from_be_bytes([b[0], b[1]]),
            oui: [b[2], b[3], b[4]],
            oui_type: b[5],
            subcategory: u16::from_be_bytes([b[6], b[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rf_band_round_trip() {
        assert_eq!(RfBand::from_u8(0x01), Some(RfBand::Band24Ghz));
        assert_eq!(RfBand::Band60Ghz.to_u8(), 0x04);
        assert_eq!(RfBand::from_u8(0x03), None);
    }

    #[test]
    fn test_primary_device_type_round_trip() {
        let pdt = PrimaryDeviceType::default();
        let bytes = pdt.to_bytes();
        assert_eq!(PrimaryDeviceType::from_bytes(&bytes), Some(pdt));
    }

    #[test]
    fn test_config_methods_bitflags() {
        let methods = ConfigMethods::PUSHBUTTON | ConfigMethods::DISPLAY;
        assert!(methods.contains(ConfigMethods::PUSHBUTTON));
        assert!(!methods.contains(ConfigMethods::LABEL));
    }
}
