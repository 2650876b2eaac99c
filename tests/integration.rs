//! End-to-end exercises of the Enrollee state machine against a small
//! scripted Registrar built from the same primitives the Enrollee core
//! uses. There is no live Registrar to test against, so this harness plays
//! that role deterministically: it derives the same session keys via the
//! DH exchange, builds M2/M4/M6/M8 by hand, and feeds them through
//! [`Session::handle_request`] exactly as a real wire adapter would.

use wsc_enrollee::attr::{
    AssociationState, AuthenticationType, ConfigMethods, ConfigurationError, ConnectionType,
    DevicePasswordId, EncryptionType, PrimaryDeviceType, RfBand,
};
use wsc_enrollee::crypto::{self, DhKeyPair};
use wsc_enrollee::keyschedule::{derive_psks, derive_session_keys};
use wsc_enrollee::message::{self, DeviceInfo, M4, M6, M8};
use wsc_enrollee::session::{MapSettingsSource, Session, State};

const START_OPCODE: u8 = 0x01;
const ACK_OPCODE: u8 = 0x02;
const MSG_OPCODE: u8 = 0x04;

fn enrollee_settings(password: &str) -> MapSettingsSource {
    let mut settings = MapSettingsSource::new();
    settings
        .set("WSC", "EnrolleeMAC", "02:00:00:00:00:01")
        .set("WSC", "RFBand", "1")
        .set("WSC", "DevicePassword", password);
    settings
}

fn registrar_device_info() -> DeviceInfo {
    DeviceInfo {
        manufacturer: "TestRegistrar".into(),
        model_name: "Reg".into(),
        model_number: "1".into(),
        serial_number: "SN-REG".into(),
        primary_device_type: PrimaryDeviceType::default(),
        device_name: "registrar".into(),
        rf_bands: RfBand::Band24Ghz,
        association_state: AssociationState::NotAssociated,
        configuration_error: ConfigurationError::NoError,
        device_password_id: DevicePasswordId::PushButton,
        os_version: 0,
    }
}

fn encrypt_settings(key_wrap_key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let pad = 16 - (plaintext.len() % 16);
    let mut padded = plaintext.to_vec();
    padded.extend(std::iter::repeat(pad as u8).take(pad));
    crypto::aes128_cbc_encrypt(key_wrap_key, iv, &mut padded);
    let mut out = iv.to_vec();
    out.extend(padded);
    out
}

/// A scripted counterpart to the Enrollee under test. Holds its own DH
/// keypair and nonces so it can derive the identical session keys and walk
/// the M2/M4/M6/M8 half of the exchange by hand.
struct Registrar {
    nonce: [u8; 16],
    uuid_r: [u8; 16],
    r_snonce1: [u8; 16],
    r_snonce2: [u8; 16],
    iv1: [u8; 16],
    iv2: [u8; 16],
    auth_key: [u8; 32],
    key_wrap_key: [u8; 16],
    psk1: [u8; 16],
    psk2: [u8; 16],
    pke: [u8; 192],
    pkr: [u8; 192],
}

impl Registrar {
    /// Derives session keys against the Enrollee's M1 using `password` as
    /// the shared device password.
    fn new(m1: &message::M1, password: &str) -> Self {
        let mut private_bytes = [0u8; crypto::DH_GROUP5_LEN];
        private_bytes[crypto::DH_GROUP5_LEN - 1] = 0x2A;
        let private = DhKeyPair::from_private_bytes(&private_bytes).unwrap();
        let nonce = [0x11u8; 16];
        let shared = private.shared_secret(&m1.public_key).unwrap();
        let keys = derive_session_keys(&shared, &m1.enrollee_nonce, &m1.addr, &nonce);
        let psks = derive_psks(&keys.auth_key, password.as_bytes());

        Registrar {
            pkr: *private.public_key(),
            pke: m1.public_key,
            auth_key: keys.auth_key,
            key_wrap_key: keys.key_wrap_key,
            psk1: psks.psk1,
            psk2: psks.psk2,
            nonce,
            uuid_r: [0x22u8; 16],
            r_snonce1: [0x33u8; 16],
            r_snonce2: [0x44u8; 16],
            iv1: [0x55u8; 16],
            iv2: [0x66u8; 16],
        }
    }

    fn authenticate(&self, prev: &[u8], buf: &mut [u8], auth_offset: usize) {
        let tag = crypto::hmac_sha256(&self.auth_key, &[prev, &buf[..auth_offset - 4]]);
        buf[auth_offset..auth_offset + 8].copy_from_slice(&tag[..8]);
    }

    fn build_m2(&self, m1: &message::M1, prev: &[u8]) -> Vec<u8> {
        let (mut bytes, offset) = message::build_m2(
            m1.enrollee_nonce,
            self.nonce,
            self.uuid_r,
            &self.pkr,
            AuthenticationType::WPA2_PERSONAL,
            EncryptionType::AES,
            ConnectionType::ESS,
            ConfigMethods::VIRTUAL_DISPLAY_PIN,
            &registrar_device_info(),
        );
        self.authenticate(prev, &mut bytes, offset);
        bytes
    }

    fn r_hash1(&self) -> [u8; 32] {
        crypto::hmac_sha256(
            &self.auth_key,
            &[&self.r_snonce1[..], &self.psk1[..], &self.pke[..], &self.pkr[..]],
        )
    }

    fn r_hash2(&self) -> [u8; 32] {
        crypto::hmac_sha256(
            &self.auth_key,
            &[&self.r_snonce2[..], &self.psk2[..], &self.pke[..], &self.pkr[..]],
        )
    }

    fn encrypted_m4_settings(&self) -> Vec<u8> {
        let (mut es, offset) = message::build_m4_encrypted_settings(&self.r_snonce1);
        let mut tag = [0u8; 8];
        crypto::hmac_sha256_truncated(&self.auth_key, &[&es[..offset - 4]], &mut tag);
        es[offset..offset + 8].copy_from_slice(&tag);
        encrypt_settings(&self.key_wrap_key, &self.iv1, &es)
    }

    fn build_m4(&self, prev: &[u8]) -> Vec<u8> {
        let encrypted = self.encrypted_m4_settings();
        let (mut bytes, offset) = message::build_m4(
            &M4 {
                registrar_nonce: self.nonce,
                r_hash1: self.r_hash1(),
                r_hash2: self.r_hash2(),
            },
            &encrypted,
        );
        self.authenticate(prev, &mut bytes, offset);
        bytes
    }

    /// Same as [`Registrar::build_m4`] but flips a ciphertext byte before
    /// the outer Authenticator is computed, so the outer check passes and
    /// decryption fails on padding instead.
    fn build_m4_with_corrupted_ciphertext(&self, prev: &[u8]) -> Vec<u8> {
        let mut encrypted = self.encrypted_m4_settings();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0x01;
        let (mut bytes, offset) = message::build_m4(
            &M4 {
                registrar_nonce: self.nonce,
                r_hash1: self.r_hash1(),
                r_hash2: self.r_hash2(),
            },
            &encrypted,
        );
        self.authenticate(prev, &mut bytes, offset);
        bytes
    }

    fn build_m6(&self, prev: &[u8]) -> Vec<u8> {
        let (mut es, offset) = message::build_m6_encrypted_settings(&self.r_snonce2);
        let mut tag = [0u8; 8];
        crypto::hmac_sha256_truncated(&self.auth_key, &[&es[..offset - 4]], &mut tag);
        es[offset..offset + 8].copy_from_slice(&tag);
        let encrypted = encrypt_settings(&self.key_wrap_key, &self.iv2, &es);

        let (mut bytes, offset) = message::build_m6(
            &M6 {
                registrar_nonce: self.nonce,
            },
            &encrypted,
        );
        self.authenticate(prev, &mut bytes, offset);
        bytes
    }

    fn build_m8(&self, prev: &[u8]) -> Vec<u8> {
        let credential = message::Credential {
            ssid: b"TestNetwork".to_vec(),
            auth_type: AuthenticationType::WPA2_PERSONAL,
            encryption_type: EncryptionType::AES,
            network_key: b"supersecretkey12".to_vec(),
            mac_address: [0xAA; 6],
        };
        let (mut es, offset) = message::build_m8_encrypted_settings(&[credential]);
        let mut tag = [0u8; 8];
        crypto::hmac_sha256_truncated(&self.auth_key, &[&es[..offset - 4]], &mut tag);
        es[offset..offset + 8].copy_from_slice(&tag);
        let encrypted = encrypt_settings(&self.key_wrap_key, &self.iv2, &es);

        let (mut bytes, offset) = message::build_m8(
            &M8 {
                registrar_nonce: self.nonce,
            },
            &encrypted,
        );
        self.authenticate(prev, &mut bytes, offset);
        bytes
    }
}

/// Drives a session through M1..M8 using `password` for both sides and
/// returns the completed session.
fn run_happy_path(password: &str) -> Session {
    let settings = enrollee_settings(password);
    let mut session = Session::load_settings(&settings).unwrap();

    let m1 = session.handle_request(START_OPCODE, 0, &[]).unwrap().unwrap();
    let parsed_m1 = message::parse_m1(&m1).unwrap();
    let registrar = Registrar::new(&parsed_m1, password);

    let m2 = registrar.build_m2(&parsed_m1, &m1);
    let m3 = session.handle_request(MSG_OPCODE, 0, &m2).unwrap().unwrap();

    let m4 = registrar.build_m4(&m3);
    let m5 = session.handle_request(MSG_OPCODE, 0, &m4).unwrap().unwrap();

    let m6 = registrar.build_m6(&m5);
    let m7 = session.handle_request(MSG_OPCODE, 0, &m6).unwrap().unwrap();

    let m8 = registrar.build_m8(&m7);
    let done = session.handle_request(MSG_OPCODE, 0, &m8).unwrap();
    assert!(done.is_some());

    assert_eq!(session.state(), State::Finished);
    session
}

#[test]
fn test_happy_path_reaches_finished_with_credentials_and_emsk() {
    let session = run_happy_path("12345678");
    assert_eq!(session.credentials().len(), 1);
    assert_eq!(session.credentials()[0].ssid, b"TestNetwork");
    assert!(session.emsk().is_some());
}

#[test]
fn test_wrong_password_yields_device_password_auth_failure_nack() {
    let settings = enrollee_settings("12345678");
    let mut session = Session::load_settings(&settings).unwrap();

    let m1 = session.handle_request(START_OPCODE, 0, &[]).unwrap().unwrap();
    let parsed_m1 = message::parse_m1(&m1).unwrap();
    let registrar = Registrar::new(&parsed_m1, "00000000");

    let m2 = registrar.build_m2(&parsed_m1, &m1);
    let m3 = session.handle_request(MSG_OPCODE, 0, &m2).unwrap().unwrap();

    let m4 = registrar.build_m4(&m3);
    let reply = session.handle_request(MSG_OPCODE, 0, &m4).unwrap().unwrap();

    let nack = message::parse_nack(&reply).unwrap();
    assert_eq!(
        nack.configuration_error,
        ConfigurationError::DevicePasswordAuthFailure
    );
    assert_eq!(session.state(), State::ExpectM4);
}

#[test]
fn test_corrupted_m4_ciphertext_yields_decryption_crc_failure_nack() {
    let settings = enrollee_settings("12345678");
    let mut session = Session::load_settings(&settings).unwrap();

    let m1 = session.handle_request(START_OPCODE, 0, &[]).unwrap().unwrap();
    let parsed_m1 = message::parse_m1(&m1).unwrap();
    let registrar = Registrar::new(&parsed_m1, "12345678");

    let m2 = registrar.build_m2(&parsed_m1, &m1);
    let m3 = session.handle_request(MSG_OPCODE, 0, &m2).unwrap().unwrap();

    let m4 = registrar.build_m4_with_corrupted_ciphertext(&m3);
    let reply = session.handle_request(MSG_OPCODE, 0, &m4).unwrap().unwrap();

    let nack = message::parse_nack(&reply).unwrap();
    assert_eq!(
        nack.configuration_error,
        ConfigurationError::DecryptionCrcFailure
    );
}

#[test]
fn test_truncated_m2_is_silently_dropped() {
    let settings = enrollee_settings("12345678");
    let mut session = Session::load_settings(&settings).unwrap();

    let m1 = session.handle_request(START_OPCODE, 0, &[]).unwrap().unwrap();
    let parsed_m1 = message::parse_m1(&m1).unwrap();
    let registrar = Registrar::new(&parsed_m1, "12345678");

    let m2 = registrar.build_m2(&parsed_m1, &m1);
    let truncated = &m2[..m2.len() / 2];

    let reply = session.handle_request(MSG_OPCODE, 0, truncated).unwrap();
    assert!(reply.is_none());
    assert_eq!(session.state(), State::ExpectM2);
}

#[test]
fn test_unexpected_ack_while_expecting_m2_is_silently_dropped() {
    let settings = enrollee_settings("12345678");
    let mut session = Session::load_settings(&settings).unwrap();

    session.handle_request(START_OPCODE, 0, &[]).unwrap();
    assert_eq!(session.state(), State::ExpectM2);

    let reply = session.handle_request(ACK_OPCODE, 0, &[]).unwrap();
    assert!(reply.is_none());
    assert_eq!(session.state(), State::ExpectM2);
}

#[test]
fn test_message_after_finished_sends_nack_instead_of_silent_drop() {
    let mut session = run_happy_path("12345678");

    let reply = session.handle_request(MSG_OPCODE, 0, &[0x00]).unwrap();
    let nack = message::parse_nack(&reply.unwrap()).unwrap();
    assert_eq!(nack.configuration_error, ConfigurationError::MessageTimeout);
    assert_eq!(session.state(), State::Finished);
}
