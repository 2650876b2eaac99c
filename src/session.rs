//! The Enrollee session: state machine, authenticator chain, encrypted
//! settings, and the settings-loading surface.
//!
//! Grounded directly on `eap-wsc.c`'s `eap_wsc_state` struct and its
//! `authenticator_check`/`_put`, `keywrap_authenticator_check`/`_put`,
//! `r_hash_check`, `encrypted_settings_decrypt`/`_encrypt`, and
//! `eap_wsc_load_settings` functions; the outer shell (struct layout,
//! `Drop`, accessor style) is styled on `hardware_support/networking`'s
//! `SecurityManager`.

use crate::attr::{
    AssociationState, AuthenticationType, ConfigMethods, ConfigurationError, ConnectionType,
    DevicePasswordId, EncryptionType, PrimaryDeviceType, RfBand, WscState,
};
use crate::crypto::{hmac_sha256, hmac_sha256_truncated, random_bytes, sha256, DhKeyPair};
use crate::error::{Result, WscError};
use crate::keyschedule::{derive_psks, derive_session_keys, Psks, SessionKeys};
use crate::message::{self, Credential, DeviceInfo, M1};
use zeroize::Zeroize;

/// Abstracts an already-loaded configuration source. A real embedder backs
/// this with its own keyfile reader; [`MapSettingsSource`] provides an
/// in-memory implementation for tests.
pub trait SettingsSource {
    fn get_str(&self, section: &str, key: &str) -> Option<&str>;
    fn get_u32(&self, section: &str, key: &str) -> Option<u32>;
}

/// An in-memory [`SettingsSource`] backed by a map, for tests and as a
/// reference implementation.
#[derive(Default)]
pub struct MapSettingsSource {
    values: std::collections::HashMap<(String, String), String>,
}

impl MapSettingsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.into());
        self
    }
}

impl SettingsSource for MapSettingsSource {
    fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .map(|s| s.as_str())
    }

    fn get_u32(&self, section: &str, key: &str) -> Option<u32> {
        self.get_str(section, key)?.parse().ok()
    }
}

fn load_hexencoded(settings: &dyn SettingsSource, key: &str, out: &mut [u8]) -> bool {
    match settings.get_str("WSC", key).and_then(|v| hex::decode(v).ok()) {
        Some(bytes) if bytes.len() == out.len() => {
            out.copy_from_slice(&bytes);
            true
        }
        _ => false,
    }
}

fn load_constrained_string(settings: &dyn SettingsSource, key: &str, max: usize) -> String {
    match settings.get_str("WSC", key) {
        Some(v) => {
            let mut s = v.to_string();
            s.truncate(max.saturating_sub(1).max(1));
            s
        }
        None => " ".to_string(),
    }
}

fn load_primary_device_type(settings: &dyn SettingsSource) -> Option<PrimaryDeviceType> {
    let v = settings.get_str("WSC", "PrimaryDeviceType")?;
    let (category_str, rest) = v.split_once('-')?;
    let (mid, subcategory_str) = rest.split_once('-')?;
    if mid.len() != 10 {
        return None;
    }
    Some(PrimaryDeviceType {
        category: u16::from_str_radix(category_str, 16).ok()?,
        oui: [
            u8::from_str_radix(&mid[0..2], 16).ok()?,
            u8::from_str_radix(&mid[2..4], 16).ok()?,
            u8::from_str_radix(&mid[4..6], 16).ok()?,
        ],
        oui_type: u8::from_str_radix(&mid[6..8], 16).ok()?,
        subcategory: u16::from_str_radix(subcategory_str, 16).ok()?,
    })
}

fn parse_mac(v: &str) -> Option<[u8; 6]> {
    let mut out = [0u8; 6];
    let parts: Vec<&str> = v.split(':').collect();
    if parts.len() != 6 {
        return None;
    }
    for (i, part) in parts.iter().enumerate() {
        out[i] = u8::from_str_radix(part, 16).ok()?;
    }
    Some(out)
}

fn uuid_from_addr(addr: &[u8; 6]) -> [u8; 16] {
    // A namespace-free derivation: SHA-256(addr) truncated to 16 bytes,
    // matching the intent of WSC's "UUID derived from the MAC address"
    // convention without depending on a specific UUID version profile.
    let digest = sha256(addr);
    let mut uuid = [0u8; 16];
    uuid.copy_from_slice(&digest[..16]);
    uuid
}

/// Protocol opcodes, WSC v2.0.5 §7.7.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Start = 0x01,
    Ack = 0x02,
    Nack = 0x03,
    Msg = 0x04,
    Done = 0x05,
    FragAck = 0x06,
}

impl Opcode {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Opcode::Start),
            0x02 => Some(Opcode::Ack),
            0x03 => Some(Opcode::Nack),
            0x04 => Some(Opcode::Msg),
            0x05 => Some(Opcode::Done),
            0x06 => Some(Opcode::FragAck),
            _ => None,
        }
    }
}

/// Protocol state, `eap-wsc.c`'s `enum state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    ExpectStart,
    ExpectM2,
    ExpectM4,
    ExpectM6,
    ExpectM8,
    Finished,
}

/// An established round of key material, present once M2's authenticator
/// has been verified.
struct Established {
    keys: SessionKeys,
    psks: Option<Psks>,
    pke: [u8; 192],
    pkr: [u8; 192],
    r_hash2: [u8; 32],
}

/// The WSC Enrollee session.
pub struct Session {
    m1: M1,
    device_password: String,
    private: Option<DhKeyPair>,
    e_snonce1: [u8; 16],
    e_snonce2: [u8; 16],
    iv1: [u8; 16],
    iv2: [u8; 16],
    state: State,
    sent_pdu: Option<Vec<u8>>,
    established: Option<Established>,
    registrar_nonce: Option<[u8; 16]>,
    credentials: Vec<Credential>,
}

impl Session {
    /// `eap_wsc_probe`: accepts the method name case-insensitively.
    pub fn probe(name: &str) -> Result<()> {
        if name.eq_ignore_ascii_case("WSC") {
            Ok(())
        } else {
            Err(WscError::UnsupportedMethod(name.to_string()))
        }
    }

    /// `eap_wsc_load_settings`: populates M1 and the session's secret
    /// material from a [`SettingsSource`].
    pub fn load_settings(settings: &dyn SettingsSource) -> Result<Self> {
        let addr = settings
            .get_str("WSC", "EnrolleeMAC")
            .and_then(parse_mac)
            .ok_or(WscError::MissingSetting("EnrolleeMAC"))?;

        let mut enrollee_nonce = [0u8; 16];
        if !load_hexencoded(settings, "EnrolleeNonce", &mut enrollee_nonce) {
            random_bytes(&mut enrollee_nonce);
        }

        let mut private_key_bytes = [0u8; 192];
        if !load_hexencoded(settings, "PrivateKey", &mut private_key_bytes) {
            random_bytes(&mut private_key_bytes);
        }
        let private = DhKeyPair::from_private_bytes(&private_key_bytes)
            .ok_or(WscError::KeyAgreementFailed)?;
        private_key_bytes.zeroize();

        let config_methods = ConfigMethods::from_bits_truncate(
            settings
                .get_u32("WSC", "ConfigurationMethods")
                .map(|v| v as u16)
                .unwrap_or(ConfigMethods::VIRTUAL_DISPLAY_PIN.bits()),
        );

        let rf_bands = settings
            .get_u32("WSC", "RFBand")
            .and_then(|v| RfBand::from_u8(v as u8))
            .ok_or(WscError::MissingSetting("RFBand"))?;

        let primary_device_type =
            load_primary_device_type(settings).unwrap_or_default();

        let os_version = settings.get_u32("WSC", "OSVersion").unwrap_or(0) & 0x7fff_ffff;

        let device_password = match settings.get_str("WSC", "DevicePassword") {
            Some(v) => {
                if v.len() < 8 || !v.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(WscError::InvalidDevicePassword);
                }
                v.to_ascii_uppercase()
            }
            None => "00000000".to_string(),
        };

        let mut e_snonce1 = [0u8; 16];
        if !load_hexencoded(settings, "E-SNonce1", &mut e_snonce1) {
            random_bytes(&mut e_snonce1);
        }
        let mut e_snonce2 = [0u8; 16];
        if !load_hexencoded(settings, "E-SNonce2", &mut e_snonce2) {
            random_bytes(&mut e_snonce2);
        }
        let mut iv1 = [0u8; 16];
        if !load_hexencoded(settings, "IV1", &mut iv1) {
            random_bytes(&mut iv1);
        }
        let mut iv2 = [0u8; 16];
        if !load_hexencoded(settings, "IV2", &mut iv2) {
            random_bytes(&mut iv2);
        }

        let info = DeviceInfo {
            manufacturer: load_constrained_string(settings, "Manufacturer", 65),
            model_name: load_constrained_string(settings, "ModelName", 33),
            model_number: load_constrained_string(settings, "ModelNumber", 33),
            serial_number: load_constrained_string(settings, "SerialNumber", 33),
            primary_device_type,
            device_name: load_constrained_string(settings, "DeviceName", 33),
            rf_bands,
            association_state: AssociationState::NotAssociated,
            configuration_error: ConfigurationError::NoError,
            device_password_id: DevicePasswordId::PushButton,
            os_version,
        };

        let m1 = M1 {
            addr,
            uuid_e: uuid_from_addr(&addr),
            enrollee_nonce,
            public_key: *private.public_key(),
            auth_type_flags: AuthenticationType::WPA2_PERSONAL
                | AuthenticationType::WPA_PERSONAL
                | AuthenticationType::OPEN,
            encryption_type_flags: EncryptionType::NONE | EncryptionType::AES,
            connection_type_flags: ConnectionType::ESS,
            config_methods,
            wsc_state: WscState::NotConfigured,
            info,
        };

        Ok(Self {
            m1,
            device_password,
            private: Some(private),
            e_snonce1,
            e_snonce2,
            iv1,
            iv2,
            state: State::ExpectStart,
            sent_pdu: None,
            established: None,
            registrar_nonce: None,
            credentials: Vec::new(),
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The exported master session key, available once the method has
    /// reached [`State::Finished`].
    pub fn emsk(&self) -> Option<&[u8; 32]> {
        self.established.as_ref().map(|e| &e.keys.emsk)
    }

    fn set_sent_pdu(&mut self, pdu: Vec<u8>) {
        self.sent_pdu = Some(pdu);
    }

    /// `authenticator_check`: verifies the trailing 8-byte tag of `pdu`
    /// against HMAC(AuthKey; previous TX payload || pdu[..len-12]).
    fn authenticator_check(&self, pdu: &[u8]) -> bool {
        let Some(est) = &self.established else {
            return false;
        };
        if pdu.len() < 12 {
            return false;
        }
        let Some(sent) = &self.sent_pdu else {
            return false;
        };
        let body = &pdu[..pdu.len() - 12];
        let expected = hmac_sha256(&est.keys.auth_key, &[sent.as_slice(), body]);
        pdu[pdu.len() - 8..] == expected[..8]
    }

    /// `authenticator_put`: writes the trailing 8-byte tag of `cur` in
    /// place, using `prev` as the previously transmitted payload.
    fn authenticator_put(&self, prev: &[u8], cur: &mut [u8], auth_offset: usize) {
        let est = self.established.as_ref().expect("keys established");
        let body = &cur[..auth_offset - 4];
        let tag = hmac_sha256(&est.keys.auth_key, &[prev, body]);
        cur[auth_offset..auth_offset + 8].copy_from_slice(&tag[..8]);
    }

    /// `keywrap_authenticator_check`.
    fn keywrap_authenticator_check(&self, plaintext: &[u8]) -> bool {
        let Some(est) = &self.established else {
            return false;
        };
        if plaintext.len() < 12 {
            return false;
        }
        let body = &plaintext[..plaintext.len() - 12];
        let mut expected = [0u8; 8];
        hmac_sha256_truncated(&est.keys.auth_key, &[body], &mut expected);
        plaintext[plaintext.len() - 8..] == expected
    }

    /// `keywrap_authenticator_put`.
    fn keywrap_authenticator_put(&self, plaintext: &mut [u8], auth_offset: usize) {
        let est = self.established.as_ref().expect("keys established");
        let body = &plaintext[..auth_offset - 4];
        let mut tag = [0u8; 8];
        hmac_sha256_truncated(&est.keys.auth_key, &[body], &mut tag);
        plaintext[auth_offset..auth_offset + 8].copy_from_slice(&tag);
    }

    /// `r_hash_check`: HMAC_AuthKey(r_snonce || psk || PKE || PKR) ==
    /// expected.
    fn r_hash_check(&self, r_snonce: &[u8; 16], psk: &[u8; 16], expected: &[u8; 32]) -> bool {
        let est = self.established.as_ref().expect("keys established");
        let computed = hmac_sha256(
            &est.keys.auth_key,
            &[r_snonce, psk, &est.pke, &est.pkr],
        );
        &computed == expected
    }

    /// `encrypted_settings_decrypt`: splits off the 16-byte IV, decrypts
    /// the remainder, and validates PKCS-style padding.
    fn encrypted_settings_decrypt(&self, data: &[u8]) -> Option<Vec<u8>> {
        let est = self.established.as_ref()?;
        if data.len() < 16 {
            return None;
        }
        let (iv, ciphertext) = data.split_at(16);
        if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
            return None;
        }
        let mut iv_arr = [0u8; 16];
        iv_arr.copy_from_slice(iv);
        let mut buf = ciphertext.to_vec();
        crate::crypto::aes128_cbc_decrypt(&est.keys.key_wrap_key, &iv_arr, &mut buf);

        let pad = *buf.last()? as usize;
        if pad == 0 || pad > buf.len() {
            return None;
        }
        if !buf[buf.len() - pad..].iter().all(|&b| b as usize == pad) {
            return None;
        }
        buf.truncate(buf.len() - pad);
        Some(buf)
    }

    /// `encrypted_settings_encrypt`: prepends `iv`, pads `plaintext` to a
    /// block multiple with the PKCS-style pad, then encrypts in place.
    fn encrypted_settings_encrypt(&self, iv: &[u8; 16], plaintext: &[u8]) -> Option<Vec<u8>> {
        let est = self.established.as_ref()?;
        let pad = 16 - (plaintext.len() % 16);
        let mut out = Vec::with_capacity(16 + plaintext.len() + pad);
        out.extend_from_slice(iv);
        out.extend_from_slice(plaintext);
        out.extend(std::iter::repeat(pad as u8).take(pad));
        let body_start = 16;
        crate::crypto::aes128_cbc_encrypt(&est.keys.key_wrap_key, iv, &mut out[body_start..]);
        Some(out)
    }

    /// Entry point for every inbound EAP WSC payload: `opcode`, `flags`,
    /// and `body` as split out by the EAP envelope adapter. Returns the
    /// payload of a response to send (MSG, NACK, or DONE), or `None` for a
    /// silent drop.
    pub fn handle_request(&mut self, opcode: u8, flags: u8, body: &[u8]) -> Result<Option<Vec<u8>>> {
        if self.private.is_none() {
            return Err(WscError::NotInitialized);
        }
        if flags != 0 {
            log::debug!(target: "wsc_enrollee", "dropping PDU with non-zero flags {flags:#x}");
            return Ok(None);
        }

        let Some(op) = Opcode::from_u8(opcode) else {
            log::debug!(target: "wsc_enrollee", "dropping PDU with unknown opcode {opcode:#x}");
            return Ok(None);
        };

        match op {
            Opcode::Start => self.handle_start(),
            Opcode::Msg => self.handle_msg(body),
            Opcode::Nack => {
                log::info!(target: "wsc_enrollee", "peer sent NACK, terminating session");
                self.state = State::Finished;
                Ok(None)
            }
            Opcode::Ack | Opcode::Done | Opcode::FragAck => {
                log::debug!(target: "wsc_enrollee", "dropping unexpected opcode {op:?} for an enrollee");
                Ok(None)
            }
        }
    }

    fn handle_start(&mut self) -> Result<Option<Vec<u8>>> {
        if self.state != State::ExpectStart {
            return Ok(None);
        }
        let pdu = message::build_m1(&self.m1);
        self.set_sent_pdu(pdu.clone());
        self.state = State::ExpectM2;
        log::info!(target: "wsc_enrollee", "sent M1, expecting M2");
        Ok(Some(pdu))
    }

    fn handle_msg(&mut self, pdu: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.state {
            State::ExpectStart => Ok(None),
            State::ExpectM2 => self.handle_m2(pdu),
            State::ExpectM4 => self.handle_m4(pdu),
            State::ExpectM6 => self.handle_m6(pdu),
            State::ExpectM8 => self.handle_m8(pdu),
            State::Finished => {
                log::warn!(target: "wsc_enrollee", "message received after completion");
                Ok(Some(self.build_nack(ConfigurationError::MessageTimeout)))
            }
        }
    }

    fn handle_m2(&mut self, pdu: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(m2) = message::parse_m2(pdu) else {
            return Ok(None);
        };
        self.registrar_nonce = Some(m2.registrar_nonce);

        let private = self.private.as_ref().expect("checked in handle_request");
        let Some(mut shared_secret) = private.shared_secret(&m2.public_key) else {
            return Ok(None);
        };

        let keys = derive_session_keys(
            &shared_secret,
            &self.m1.enrollee_nonce,
            &self.m1.addr,
            &m2.registrar_nonce,
        );
        shared_secret.zeroize();

        self.established = Some(Established {
            keys,
            psks: None,
            pke: self.m1.public_key,
            pkr: m2.public_key,
            r_hash2: [0u8; 32],
        });

        if !self.authenticator_check(pdu) {
            self.established = None;
            return Ok(None);
        }

        let psks = derive_psks(
            &self.established.as_ref().unwrap().keys.auth_key,
            self.device_password.as_bytes(),
        );

        let e_hash1 = hmac_sha256(
            &self.established.as_ref().unwrap().keys.auth_key,
            &[
                &self.e_snonce1[..],
                &psks.psk1[..],
                &self.m1.public_key[..],
                &m2.public_key[..],
            ],
        );
        let e_hash2 = hmac_sha256(
            &self.established.as_ref().unwrap().keys.auth_key,
            &[
                &self.e_snonce2[..],
                &psks.psk2[..],
                &self.m1.public_key[..],
                &m2.public_key[..],
            ],
        );

        self.established.as_mut().unwrap().psks = Some(psks);

        let m3 = message::M3 {
            registrar_nonce: m2.registrar_nonce,
            e_hash1,
            e_hash2,
        };
        let (mut out, auth_offset) = message::build_m3(&m3);
        let prev = self.sent_pdu.clone().unwrap_or_default();
        self.authenticator_put(&prev, &mut out, auth_offset);
        self.set_sent_pdu(out.clone());
        self.state = State::ExpectM4;
        log::info!(target: "wsc_enrollee", "M2 accepted, sent M3, expecting M4");
        Ok(Some(out))
    }

    fn handle_m4(&mut self, pdu: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some((m4, encrypted)) = message::parse_m4(pdu) else {
            return Ok(None);
        };
        if !self.authenticator_check(pdu) {
            return Ok(None);
        }

        let Some(decrypted) = self.encrypted_settings_decrypt(encrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        let Some(m4es) = message::parse_m4_encrypted_settings(&decrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        if !self.keywrap_authenticator_check(&decrypted) {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        }

        let psk1 = self.established.as_ref().unwrap().psks.as_ref().unwrap().psk1;
        if !self.r_hash_check(&m4es.r_snonce1, &psk1, &m4.r_hash1) {
            return Ok(Some(self.build_nack(
                ConfigurationError::DevicePasswordAuthFailure,
            )));
        }
        self.established.as_mut().unwrap().r_hash2 = m4.r_hash2;

        let (mut es, es_auth_offset) = message::build_m5_encrypted_settings(&self.e_snonce1);
        self.keywrap_authenticator_put(&mut es, es_auth_offset);
        let Some(encrypted_settings) = self.encrypted_settings_encrypt(&self.iv1, &es) else {
            return Ok(None);
        };

        let m5 = message::M5 {
            registrar_nonce: m4.registrar_nonce,
        };
        let (mut out, auth_offset) = message::build_m5(&m5, &encrypted_settings);
        let prev = self.sent_pdu.clone().unwrap_or_default();
        self.authenticator_put(&prev, &mut out, auth_offset);
        self.set_sent_pdu(out.clone());
        self.state = State::ExpectM6;
        log::info!(target: "wsc_enrollee", "M4 accepted, sent M5, expecting M6");
        Ok(Some(out))
    }

    fn handle_m6(&mut self, pdu: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some((m6, encrypted)) = message::parse_m6(pdu) else {
            return Ok(None);
        };
        if !self.authenticator_check(pdu) {
            return Ok(None);
        }

        let Some(decrypted) = self.encrypted_settings_decrypt(encrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        let Some(m6es) = message::parse_m6_encrypted_settings(&decrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        if !self.keywrap_authenticator_check(&decrypted) {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        }

        let psk2 = self.established.as_ref().unwrap().psks.as_ref().unwrap().psk2;
        let r_hash2 = self.established.as_ref().unwrap().r_hash2;
        if !self.r_hash_check(&m6es.r_snonce2, &psk2, &r_hash2) {
            return Ok(Some(self.build_nack(
                ConfigurationError::DevicePasswordAuthFailure,
            )));
        }

        let (mut es, es_auth_offset) = message::build_m7_encrypted_settings(&self.e_snonce2);
        self.keywrap_authenticator_put(&mut es, es_auth_offset);
        let Some(encrypted_settings) = self.encrypted_settings_encrypt(&self.iv2, &es) else {
            return Ok(None);
        };

        let m7 = message::M7 {
            registrar_nonce: m6.registrar_nonce,
        };
        let (mut out, auth_offset) = message::build_m7(&m7, &encrypted_settings);
        let prev = self.sent_pdu.clone().unwrap_or_default();
        self.authenticator_put(&prev, &mut out, auth_offset);
        self.set_sent_pdu(out.clone());
        self.state = State::ExpectM8;
        log::info!(target: "wsc_enrollee", "M6 accepted, sent M7, expecting M8");
        Ok(Some(out))
    }

    fn handle_m8(&mut self, pdu: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some((m8, encrypted)) = message::parse_m8(pdu) else {
            return Ok(None);
        };
        if !self.authenticator_check(pdu) {
            return Ok(None);
        }

        let Some(decrypted) = self.encrypted_settings_decrypt(encrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        let Some(creds) = message::parse_m8_encrypted_settings(&decrypted) else {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        };
        if !self.keywrap_authenticator_check(&decrypted) {
            return Ok(Some(self.build_nack(ConfigurationError::DecryptionCrcFailure)));
        }

        self.credentials = creds;

        let done = message::Done {
            enrollee_nonce: self.m1.enrollee_nonce,
            registrar_nonce: m8.registrar_nonce,
        };
        let out = message::build_done(&done);
        self.state = State::Finished;
        log::info!(target: "wsc_enrollee", "M8 accepted, session complete");
        Ok(Some(out))
    }

    fn build_nack(&self, error: ConfigurationError) -> Vec<u8> {
        message::build_nack(&message::Nack {
            enrollee_nonce: self.m1.enrollee_nonce,
            registrar_nonce: self.registrar_nonce.unwrap_or([0u8; 16]),
            configuration_error: error,
        })
    }

    /// Credentials extracted from M8, once the session has finished.
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.device_password.zeroize();
        self.e_snonce1.zeroize();
        self.e_snonce2.zeroize();
        self.iv1.zeroize();
        self.iv2.zeroize();
        self.m1.enrollee_nonce.zeroize();
    }
}
