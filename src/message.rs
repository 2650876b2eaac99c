//! Parse and build functions for every WSC message the Enrollee role sends
//! or receives: M1..M8, NACK, DONE, and the encrypted-settings inner
//! records carried inside M3/M5/M7 (Enrollee-originated) and M4/M6/M8
//! (Registrar-originated).
//!
//! Field layouts and the overall build/parse split mirror
//! `eap-wsc.c`'s `wsc_build_*`/`wsc_parse_*` call sites; this module owns
//! only the TLV-level mapping, not the cryptographic checks layered on top
//! in [`crate::session`].

use crate::attr::*;
use crate::tlv::{AttrBuilder, AttrIter};

/// WSC v2.0.5 Table 28 message type codes.
pub mod msg_type {
    pub const M1: u8 = 0x04;
    pub const M2: u8 = 0x05;
    pub const M3: u8 = 0x07;
    pub const M4: u8 = 0x08;
    pub const M5: u8 = 0x09;
    pub const M6: u8 = 0x0A;
    pub const M7: u8 = 0x0B;
    pub const M8: u8 = 0x0C;
    pub const WSC_ACK: u8 = 0x0D;
    pub const WSC_NACK: u8 = 0x0E;
    pub const WSC_DONE: u8 = 0x0F;
}

const WSC_VERSION_BYTE: u8 = 0x10;

fn attrs(data: &[u8]) -> Vec<(u16, &[u8])> {
    AttrIter::new(data).collect()
}

fn find<'a>(attrs: &[(u16, &'a [u8])], tag: u16) -> Option<&'a [u8]> {
    attrs.iter().find(|(t, _)| *t == tag).map(|(_, v)| *v)
}

fn find_fixed<const N: usize>(attrs: &[(u16, &[u8])], tag: u16) -> Option<[u8; N]> {
    let v = find(attrs, tag)?;
    if v.len() != N {
        return None;
    }
    let mut out = [0u8; N];
    out.copy_from_slice(v);
    Some(out)
}

fn find_u8(attrs: &[(u16, &[u8])], tag: u16) -> Option<u8> {
    find(attrs, tag).filter(|v| v.len() == 1).map(|v| v[0])
}

fn find_u16(attrs: &[(u16, &[u8])], tag: u16) -> Option<u16> {
    find(attrs, tag)
        .filter(|v| v.len() == 2)
        .map(|v| u16::from_be_bytes([v[0], v[1]]))
}

fn find_u32(attrs: &[(u16, &[u8])], tag: u16) -> Option<u32> {
    find(attrs, tag)
        .filter(|v| v.len() == 4)
        .map(|v| u32::from_be_bytes([v[0], v[1], v[2], v[3]]))
}

fn find_string(attrs: &[(u16, &[u8])], tag: u16) -> Option<String> {
    let v = find(attrs, tag)?;
    Some(String::from_utf8_lossy(v).trim_end_matches('\0').to_string())
}

fn append_version2(builder: &mut AttrBuilder) {
    let mut vendor = Vec::with_capacity(3 + 1 + 1 + 1);
    vendor.extend_from_slice(&WFA_VENDOR_ID);
    vendor.push(WFA_VENDOR_EXT_VERSION2);
    vendor.push(1);
    vendor.push(0x20);
    builder.append(ATTR_VENDOR_EXTENSION, &vendor);
}

/// Descriptive fields shared by M1 and M2 (manufacturer/model/etc.).
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub primary_device_type: PrimaryDeviceType,
    pub device_name: String,
    pub rf_bands: RfBand,
    pub association_state: AssociationState,
    pub configuration_error: ConfigurationError,
    pub device_password_id: DevicePasswordId,
    pub os_version: u32,
}

fn append_device_info(builder: &mut AttrBuilder, info: &DeviceInfo) {
    builder.append(ATTR_MANUFACTURER, info.manufacturer.as_bytes());
    builder.append(ATTR_MODEL_NAME, info.model_name.as_bytes());
    builder.append(ATTR_MODEL_NUMBER, info.model_number.as_bytes());
    builder.append(ATTR_SERIAL_NUMBER, info.serial_number.as_bytes());
    builder.append(
        ATTR_PRIMARY_DEVICE_TYPE,
        &info.primary_device_type.to_bytes(),
    );
    builder.append(ATTR_DEVICE_NAME, info.device_name.as_bytes());
    builder.append_u8(ATTR_RF_BANDS, info.rf_bands.to_u8());
    builder.append_u16(ATTR_ASSOCIATION_STATE, info.association_state as u16);
    builder.append_u16(
        ATTR_CONFIGURATION_ERROR,
        info.configuration_error.code(),
    );
    builder.append_u16(ATTR_DEVICE_PASSWORD_ID, info.device_password_id as u16);
    builder.append_u32(ATTR_OS_VERSION, info.os_version);
}

fn parse_device_info(attrs: &[(u16, &[u8])]) -> Option<DeviceInfo> {
    Some(DeviceInfo {
        manufacturer: find_string(attrs, ATTR_MANUFACTURER)?,
        model_name: find_string(attrs, ATTR_MODEL_NAME)?,
        model_number: find_string(attrs, ATTR_MODEL_NUMBER)?,
        serial_number: find_string(attrs, ATTR_SERIAL_NUMBER)?,
        primary_device_type: PrimaryDeviceType::from_bytes(find(
            attrs,
            ATTR_PRIMARY_DEVICE_TYPE,
        )?)?,
        device_name: find_string(attrs, ATTR_DEVICE_NAME)?,
        rf_bands: RfBand::from_u8(find_u8(attrs, ATTR_RF_BANDS)?)?,
        association_state: match find_u16(attrs, ATTR_ASSOCIATION_STATE)? {
            0 => AssociationState::NotAssociated,
            1 => AssociationState::ConnectionSuccess,
            2 => AssociationState::ConfigurationFailure,
            3 => AssociationState::AssociationFailure,
            4 => AssociationState::IpFailure,
            _ => return None,
        },
        configuration_error: match find_u16(attrs, ATTR_CONFIGURATION_ERROR)? {
            0 => ConfigurationError::NoError,
            1 => ConfigurationError::OobInterfaceReadError,
            2 => ConfigurationError::DecryptionCrcFailure,
            3 => ConfigurationError::Pwd2PasswordId,
            4 => ConfigurationError::FailedToConnect,
            6 => ConfigurationError::DeviceBusy,
            7 => ConfigurationError::SetupLocked,
            8 => ConfigurationError::MessageTimeout,
            9 => ConfigurationError::RegistrationSessionTimeout,
            18 => ConfigurationError::DevicePasswordAuthFailure,
            _ => return None,
        },
        device_password_id: match find_u16(attrs, ATTR_DEVICE_PASSWORD_ID)? {
            0 => DevicePasswordId::DefaultPin,
            1 => DevicePasswordId::UserSpecified,
            2 => DevicePasswordId::MachineSpecified,
            3 => DevicePasswordId::Rekey,
            4 => DevicePasswordId::PushButton,
            5 => DevicePasswordId::RegistrarSpecified,
            _ => return None,
        },
        os_version: find_u32(attrs, ATTR_OS_VERSION)?,
    })
}

/// The Enrollee's M1 introduction.
#[derive(Debug, Clone)]
pub struct M1 {
    pub addr: [u8; 6],
    pub uuid_e: [u8; 16],
    pub enrollee_nonce: [u8; 16],
    pub public_key: [u8; 192],
    pub auth_type_flags: AuthenticationType,
    pub encryption_type_flags: EncryptionType,
    pub connection_type_flags: ConnectionType,
    pub config_methods: ConfigMethods,
    pub wsc_state: WscState,
    pub info: DeviceInfo,
}

pub fn build_m1(m1: &M1) -> Vec<u8> {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M1);
    b.append(ATTR_UUID_E, &m1.uuid_e);
    b.append(ATTR_MAC_ADDRESS, &m1.addr);
    b.append(ATTR_ENROLLEE_NONCE, &m1.enrollee_nonce);
    b.append(ATTR_PUBLIC_KEY, &m1.public_key);
    b.append_u16(
        ATTR_AUTHENTICATION_TYPE_FLAGS,
        m1.auth_type_flags.bits(),
    );
    b.append_u16(ATTR_ENCRYPTION_TYPE_FLAGS, m1.encryption_type_flags.bits());
    b.append_u8(ATTR_CONNECTION_TYPE_FLAGS, m1.connection_type_flags.bits());
    b.append_u16(ATTR_CONFIG_METHODS, m1.config_methods.bits());
    b.append_u8(ATTR_WSC_STATE, m1.wsc_state as u8);
    append_device_info(&mut b, &m1.info);
    append_version2(&mut b);
    b.into_bytes()
}

pub fn parse_m1(data: &[u8]) -> Option<M1> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M1 {
        return None;
    }
    Some(M1 {
        addr: find_fixed(&a, ATTR_MAC_ADDRESS)?,
        uuid_e: find_fixed(&a, ATTR_UUID_E)?,
        enrollee_nonce: find_fixed(&a, ATTR_ENROLLEE_NONCE)?,
        public_key: find_fixed(&a, ATTR_PUBLIC_KEY)?,
        auth_type_flags: AuthenticationType::from_bits_truncate(find_u16(
            &a,
            ATTR_AUTHENTICATION_TYPE_FLAGS,
        )?),
        encryption_type_flags: EncryptionType::from_bits_truncate(find_u16(
            &a,
            ATTR_ENCRYPTION_TYPE_FLAGS,
        )?),
        connection_type_flags: ConnectionType::from_bits_truncate(find_u8(
            &a,
            ATTR_CONNECTION_TYPE_FLAGS,
        )?),
        config_methods: ConfigMethods::from_bits_truncate(find_u16(&a, ATTR_CONFIG_METHODS)?),
        wsc_state: match find_u8(&a, ATTR_WSC_STATE)? {
            1 => WscState::NotConfigured,
            2 => WscState::Configured,
            _ => return None,
        },
        info: parse_device_info(&a)?,
    })
}

/// The Registrar's M2 reply.
#[derive(Debug, Clone)]
pub struct M2 {
    pub registrar_nonce: [u8; 16],
    pub uuid_r: [u8; 16],
    pub public_key: [u8; 192],
    pub auth_type_flags: AuthenticationType,
    pub encryption_type_flags: EncryptionType,
    pub connection_type_flags: ConnectionType,
    pub config_methods: ConfigMethods,
    pub info: DeviceInfo,
}

pub fn parse_m2(data: &[u8]) -> Option<M2> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M2 {
        return None;
    }
    Some(M2 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
        uuid_r: find_fixed(&a, ATTR_UUID_R)?,
        public_key: find_fixed(&a, ATTR_PUBLIC_KEY)?,
        auth_type_flags: AuthenticationType::from_bits_truncate(find_u16(
            &a,
            ATTR_AUTHENTICATION_TYPE_FLAGS,
        )?),
        encryption_type_flags: EncryptionType::from_bits_truncate(find_u16(
            &a,
            ATTR_ENCRYPTION_TYPE_FLAGS,
        )?),
        connection_type_flags: ConnectionType::from_bits_truncate(find_u8(
            &a,
            ATTR_CONNECTION_TYPE_FLAGS,
        )?),
        config_methods: ConfigMethods::from_bits_truncate(find_u16(&a, ATTR_CONFIG_METHODS)?),
        info: parse_device_info(&a)?,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn build_m2(
    enrollee_nonce: [u8; 16],
    registrar_nonce: [u8; 16],
    uuid_r: [u8; 16],
    public_key: &[u8; 192],
    auth_type_flags: AuthenticationType,
    encryption_type_flags: EncryptionType,
    connection_type_flags: ConnectionType,
    config_methods: ConfigMethods,
    info: &DeviceInfo,
) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M2);
    b.append(ATTR_ENROLLEE_NONCE, &enrollee_nonce);
    b.append(ATTR_REGISTRAR_NONCE, &registrar_nonce);
    b.append(ATTR_UUID_R, &uuid_r);
    b.append(ATTR_PUBLIC_KEY, public_key);
    b.append_u16(ATTR_AUTHENTICATION_TYPE_FLAGS, auth_type_flags.bits());
    b.append_u16(ATTR_ENCRYPTION_TYPE_FLAGS, encryption_type_flags.bits());
    b.append_u8(ATTR_CONNECTION_TYPE_FLAGS, connection_type_flags.bits());
    b.append_u16(ATTR_CONFIG_METHODS, config_methods.bits());
    append_device_info(&mut b, info);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// M3: Enrollee sends E-Hash1/E-Hash2.
#[derive(Debug, Clone)]
pub struct M3 {
    pub registrar_nonce: [u8; 16],
    pub e_hash1: [u8; 32],
    pub e_hash2: [u8; 32],
}

pub fn build_m3(m3: &M3) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M3);
    b.append(ATTR_REGISTRAR_NONCE, &m3.registrar_nonce);
    b.append(ATTR_E_HASH1, &m3.e_hash1);
    b.append(ATTR_E_HASH2, &m3.e_hash2);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn parse_m3(data: &[u8]) -> Option<M3> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M3 {
        return None;
    }
    Some(M3 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
        e_hash1: find_fixed(&a, ATTR_E_HASH1)?,
        e_hash2: find_fixed(&a, ATTR_E_HASH2)?,
    })
}

/// M4 outer fields; the Encrypted Settings blob is returned separately so
/// the session layer can run the decrypt/verify pipeline before trusting
/// anything inside it.
#[derive(Debug, Clone)]
pub struct M4 {
    pub registrar_nonce: [u8; 16],
    pub r_hash1: [u8; 32],
    pub r_hash2: [u8; 32],
}

pub fn parse_m4<'a>(data: &'a [u8]) -> Option<(M4, &'a [u8])> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M4 {
        return None;
    }
    let m4 = M4 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
        r_hash1: find_fixed(&a, ATTR_R_HASH1)?,
        r_hash2: find_fixed(&a, ATTR_R_HASH2)?,
    };
    let encrypted = find(&a, ATTR_ENCRYPTED_SETTINGS)?;
    Some((m4, encrypted))
}

pub fn build_m4(m4: &M4, encrypted_settings: &[u8]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M4);
    b.append(ATTR_REGISTRAR_NONCE, &m4.registrar_nonce);
    b.append(ATTR_R_HASH1, &m4.r_hash1);
    b.append(ATTR_R_HASH2, &m4.r_hash2);
    b.append(ATTR_ENCRYPTED_SETTINGS, encrypted_settings);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// Inner plaintext of M4's Encrypted Settings.
pub struct M4EncryptedSettings {
    pub r_snonce1: [u8; 16],
}

pub fn parse_m4_encrypted_settings(data: &[u8]) -> Option<M4EncryptedSettings> {
    let a = attrs(data);
    Some(M4EncryptedSettings {
        r_snonce1: find_fixed(&a, ATTR_R_SNONCE1)?,
    })
}

pub fn build_m4_encrypted_settings(r_snonce1: &[u8; 16]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append(ATTR_R_SNONCE1, r_snonce1);
    let auth_offset = b.reserve(ATTR_KEY_WRAP_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// M5: Enrollee sends E-SNonce1 inside Encrypted Settings.
#[derive(Debug, Clone)]
pub struct M5 {
    pub registrar_nonce: [u8; 16],
}

pub fn build_m5(m5: &M5, encrypted_settings: &[u8]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M5);
    b.append(ATTR_REGISTRAR_NONCE, &m5.registrar_nonce);
    b.append(ATTR_ENCRYPTED_SETTINGS, encrypted_settings);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn build_m5_encrypted_settings(e_snonce1: &[u8; 16]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append(ATTR_E_SNONCE1, e_snonce1);
    let auth_offset = b.reserve(ATTR_KEY_WRAP_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn parse_m5<'a>(data: &'a [u8]) -> Option<(M5, &'a [u8])> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M5 {
        return None;
    }
    let m5 = M5 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
    };
    let encrypted = find(&a, ATTR_ENCRYPTED_SETTINGS)?;
    Some((m5, encrypted))
}

/// Inner plaintext of M5's Encrypted Settings.
pub struct M5EncryptedSettings {
    pub e_snonce1: [u8; 16],
}

pub fn parse_m5_encrypted_settings(data: &[u8]) -> Option<M5EncryptedSettings> {
    let a = attrs(data);
    Some(M5EncryptedSettings {
        e_snonce1: find_fixed(&a, ATTR_E_SNONCE1)?,
    })
}

/// M6 outer fields; Encrypted Settings returned separately, matching M4.
#[derive(Debug, Clone)]
pub struct M6 {
    pub registrar_nonce: [u8; 16],
}

pub fn parse_m6<'a>(data: &'a [u8]) -> Option<(M6, &'a [u8])> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M6 {
        return None;
    }
    let m6 = M6 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
    };
    let encrypted = find(&a, ATTR_ENCRYPTED_SETTINGS)?;
    Some((m6, encrypted))
}

pub struct M6EncryptedSettings {
    pub r_snonce2: [u8; 16],
}

pub fn parse_m6_encrypted_settings(data: &[u8]) -> Option<M6EncryptedSettings> {
    let a = attrs(data);
    Some(M6EncryptedSettings {
        r_snonce2: find_fixed(&a, ATTR_R_SNONCE2)?,
    })
}

pub fn build_m6(m6: &M6, encrypted_settings: &[u8]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M6);
    b.append(ATTR_REGISTRAR_NONCE, &m6.registrar_nonce);
    b.append(ATTR_ENCRYPTED_SETTINGS, encrypted_settings);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn build_m6_encrypted_settings(r_snonce2: &[u8; 16]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append(ATTR_R_SNONCE2, r_snonce2);
    let auth_offset = b.reserve(ATTR_KEY_WRAP_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// M7: Enrollee sends E-SNonce2, potentially with its own network
/// configuration when acting as a standalone AP; the Enrollee role
/// modelled here never populates that settings variant.
#[derive(Debug, Clone)]
pub struct M7 {
    pub registrar_nonce: [u8; 16],
}

pub fn build_m7(m7: &M7, encrypted_settings: &[u8]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M7);
    b.append(ATTR_REGISTRAR_NONCE, &m7.registrar_nonce);
    b.append(ATTR_ENCRYPTED_SETTINGS, encrypted_settings);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn build_m7_encrypted_settings(e_snonce2: &[u8; 16]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append(ATTR_E_SNONCE2, e_snonce2);
    let auth_offset = b.reserve(ATTR_KEY_WRAP_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

pub fn parse_m7<'a>(data: &'a [u8]) -> Option<(M7, &'a [u8])> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M7 {
        return None;
    }
    let m7 = M7 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
    };
    let encrypted = find(&a, ATTR_ENCRYPTED_SETTINGS)?;
    Some((m7, encrypted))
}

/// Inner plaintext of M7's Encrypted Settings.
pub struct M7EncryptedSettings {
    pub e_snonce2: [u8; 16],
}

pub fn parse_m7_encrypted_settings(data: &[u8]) -> Option<M7EncryptedSettings> {
    let a = attrs(data);
    Some(M7EncryptedSettings {
        e_snonce2: find_fixed(&a, ATTR_E_SNONCE2)?,
    })
}

/// M8 outer fields carrying the Registrar's credential bundle.
#[derive(Debug, Clone)]
pub struct M8 {
    pub registrar_nonce: [u8; 16],
}

pub fn parse_m8<'a>(data: &'a [u8]) -> Option<(M8, &'a [u8])> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::M8 {
        return None;
    }
    let m8 = M8 {
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
    };
    let encrypted = find(&a, ATTR_ENCRYPTED_SETTINGS)?;
    Some((m8, encrypted))
}

pub fn build_m8(m8: &M8, encrypted_settings: &[u8]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::M8);
    b.append(ATTR_REGISTRAR_NONCE, &m8.registrar_nonce);
    b.append(ATTR_ENCRYPTED_SETTINGS, encrypted_settings);
    append_version2(&mut b);
    let auth_offset = b.reserve(ATTR_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// A single network credential extracted from M8's Encrypted Settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub ssid: Vec<u8>,
    pub auth_type: AuthenticationType,
    pub encryption_type: EncryptionType,
    pub network_key: Vec<u8>,
    pub mac_address: [u8; 6],
}

fn parse_credential(data: &[u8]) -> Option<Credential> {
    let a = attrs(data);
    Some(Credential {
        ssid: find(&a, ATTR_SSID)?.to_vec(),
        auth_type: AuthenticationType::from_bits_truncate(find_u16(
            &a,
            ATTR_AUTHENTICATION_TYPE,
        )?),
        encryption_type: EncryptionType::from_bits_truncate(find_u16(&a, ATTR_ENCRYPTION_TYPE)?),
        network_key: find(&a, ATTR_NETWORK_KEY)?.to_vec(),
        mac_address: find_fixed(&a, ATTR_MAC_ADDRESS)?,
    })
}

fn build_credential(cred: &Credential) -> Vec<u8> {
    let mut b = AttrBuilder::new();
    b.append(ATTR_SSID, &cred.ssid);
    b.append_u16(ATTR_AUTHENTICATION_TYPE, cred.auth_type.bits());
    b.append_u16(ATTR_ENCRYPTION_TYPE, cred.encryption_type.bits());
    b.append(ATTR_NETWORK_KEY, &cred.network_key);
    b.append(ATTR_MAC_ADDRESS, &cred.mac_address);
    b.into_bytes()
}

/// Up to three credentials, WSC v2.0.5 §7.5.
pub fn parse_m8_encrypted_settings(data: &[u8]) -> Option<Vec<Credential>> {
    let mut creds = Vec::new();
    for (tag, value) in AttrIter::new(data) {
        if tag == ATTR_CREDENTIAL {
            creds.push(parse_credential(value)?);
            if creds.len() > 3 {
                return None;
            }
        }
    }
    Some(creds)
}

pub fn build_m8_encrypted_settings(creds: &[Credential]) -> (Vec<u8>, usize) {
    let mut b = AttrBuilder::new();
    for cred in creds {
        b.append(ATTR_CREDENTIAL, &build_credential(cred));
    }
    let auth_offset = b.reserve(ATTR_KEY_WRAP_AUTHENTICATOR, 8);
    (b.into_bytes(), auth_offset)
}

/// WSC_NACK.
#[derive(Debug, Clone)]
pub struct Nack {
    pub enrollee_nonce: [u8; 16],
    pub registrar_nonce: [u8; 16],
    pub configuration_error: ConfigurationError,
}

pub fn build_nack(nack: &Nack) -> Vec<u8> {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::WSC_NACK);
    b.append(ATTR_ENROLLEE_NONCE, &nack.enrollee_nonce);
    b.append(ATTR_REGISTRAR_NONCE, &nack.registrar_nonce);
    b.append_u16(ATTR_CONFIGURATION_ERROR, nack.configuration_error.code());
    append_version2(&mut b);
    b.into_bytes()
}

pub fn parse_nack(data: &[u8]) -> Option<Nack> {
    let a = attrs(data);
    if find_u8(&a, ATTR_MSG_TYPE)? != msg_type::WSC_NACK {
        return None;
    }
    Some(Nack {
        enrollee_nonce: find_fixed(&a, ATTR_ENROLLEE_NONCE)?,
        registrar_nonce: find_fixed(&a, ATTR_REGISTRAR_NONCE)?,
        configuration_error: match find_u16(&a, ATTR_CONFIGURATION_ERROR)? {
            0 => ConfigurationError::NoError,
            2 => ConfigurationError::DecryptionCrcFailure,
            18 => ConfigurationError::DevicePasswordAuthFailure,
            8 => ConfigurationError::MessageTimeout,
            _ => ConfigurationError::NoError,
        },
    })
}

/// WSC_Done.
#[derive(Debug, Clone)]
pub struct Done {
    pub enrollee_nonce: [u8; 16],
    pub registrar_nonce: [u8; 16],
}

pub fn build_done(done: &Done) -> Vec<u8> {
    let mut b = AttrBuilder::new();
    b.append_u8(ATTR_VERSION, WSC_VERSION_BYTE);
    b.append_u8(ATTR_MSG_TYPE, msg_type::WSC_DONE);
    b.append(ATTR_ENROLLEE_NONCE, &done.enrollee_nonce);
    b.append(ATTR_REGISTRAR_NONCE, &done.registrar_nonce);
    append_version2(&mut b);
    b.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_device_info() -> DeviceInfo {
        DeviceInfo {
            manufacturer: "Acme".into(),
            model_name: "Widget".into(),
            model_number: "1".into(),
            serial_number: "SN1".into(),
            primary_device_type: PrimaryDeviceType::default(),
            device_name: "my-device".into(),
            rf_bands: RfBand::Band24Ghz,
            association_state: AssociationState::NotAssociated,
            configuration_error: ConfigurationError::NoError,
            device_password_id: DevicePasswordId::PushButton,
            os_version: 0,
        }
    }

    #[test]
    fn test_m1_round_trip() {
        let m1 = M1 {
            addr: [0x02, 0, 0, 0, 0, 0],
            uuid_e: [1u8; 16],
            enrollee_nonce: [2u8; 16],
            public_key: [3u8; 192],
            auth_type_flags: AuthenticationType::WPA2_PERSONAL,
            encryption_type_flags: EncryptionType::AES,
            connection_type_flags: ConnectionType::ESS,
            config_methods: ConfigMethods::VIRTUAL_DISPLAY_PIN,
            wsc_state: WscState::NotConfigured,
            info: sample_device_info(),
        };
        let bytes = build_m1(&m1);
        let parsed = parse_m1(&bytes).unwrap();
        assert_eq!(parsed.addr, m1.addr);
        assert_eq!(parsed.uuid_e, m1.uuid_e);
        assert_eq!(parsed.public_key, m1.public_key);
        assert_eq!(parsed.info.manufacturer, "Acme");
    }

    #[test]
    fn test_m3_round_trip_with_authenticator_slot() {
        let m3 = M3 {
            registrar_nonce: [9u8; 16],
            e_hash1: [1u8; 32],
            e_hash2: [2u8; 32],
        };
        let (mut bytes, offset) = build_m3(&m3);
        bytes[offset..offset + 8].copy_from_slice(&[0xFFu8; 8]);
        let parsed = parse_m3(&bytes).unwrap();
        assert_eq!(parsed.registrar_nonce, m3.registrar_nonce);
        assert_eq!(parsed.e_hash1, m3.e_hash1);
        assert_eq!(&bytes[bytes.len() - 8..], &[0xFFu8; 8]);
    }

    #[test]
    fn test_m4_extracts_encrypted_settings_slice() {
        let m4 = M4 {
            registrar_nonce: [5u8; 16],
            r_hash1: [6u8; 32],
            r_hash2: [7u8; 32],
        };
        let (bytes, _) = build_m4(&m4, &[1, 2, 3, 4]);
        let (parsed, encrypted) = parse_m4(&bytes).unwrap();
        assert_eq!(parsed.r_hash1, m4.r_hash1);
        assert_eq!(encrypted, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_nack_round_trip() {
        let nack = Nack {
            enrollee_nonce: [1u8; 16],
            registrar_nonce: [2u8; 16],
            configuration_error: ConfigurationError::DevicePasswordAuthFailure,
        };
        let bytes = build_nack(&nack);
        let parsed = parse_nack(&bytes).unwrap();
        assert_eq!(
            parsed.configuration_error,
            ConfigurationError::DevicePasswordAuthFailure
        );
    }

    #[test]
    fn test_credentials_round_trip() {
        let creds = vec![Credential {
            ssid: b"MyNetwork".to_vec(),
            auth_type: AuthenticationType::WPA2_PERSONAL,
            encryption_type: EncryptionType::AES,
            network_key: b"supersecret".to_vec(),
            mac_address: [0xAA; 6],
        }];
        let (bytes, offset) = build_m8_encrypted_settings(&creds);
        let mut bytes = bytes;
        bytes[offset..offset + 8].copy_from_slice(&[0u8; 8]);
        let parsed = parse_m8_encrypted_settings(&bytes).unwrap();
        assert_eq!(parsed, creds);
    }
}
