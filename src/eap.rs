//! The EAP Expanded-Type envelope carrying WSC opcodes over the wire.
//!
//! `eap-wsc.c` reserves the outer EAP request/response header (code, id,
//! length, type, vendor ID, vendor type — 12 bytes) at the front of every
//! buffer it hands to the transport, writing the WSC opcode and flag byte
//! immediately after it and the attribute payload after that. This module
//! owns that framing so [`crate::session::Session`] only ever sees and
//! produces attribute payloads.

use crate::session::Session;

/// WFA vendor ID carried in the EAP Expanded-Type header.
pub const WSC_VENDOR_ID: [u8; 3] = [0x00, 0x37, 0x2A];
/// WFA vendor type identifying WSC within the Expanded-Type space.
pub const WSC_VENDOR_TYPE: u32 = 0x0000_0001;

/// Bytes reserved for the outer EAP header before the opcode/flag/payload
/// that this module writes.
pub const EAP_HEADER_LEN: usize = 12;

const OPCODE_OFFSET: usize = EAP_HEADER_LEN;
const FLAG_OFFSET: usize = EAP_HEADER_LEN + 1;
const PAYLOAD_OFFSET: usize = EAP_HEADER_LEN + 2;

/// Splits a raw EAP-WSC frame into its opcode, flag byte, and attribute
/// payload, assuming the caller has already stripped the outer EAP header
/// down to the point where the WSC opcode begins.
///
/// Returns `None` if the frame is too short to contain an opcode and flag
/// byte.
pub fn split_frame(frame: &[u8]) -> Option<(u8, u8, &[u8])> {
    if frame.len() < 2 {
        return None;
    }
    Some((frame[0], frame[1], &frame[2..]))
}

/// Wraps a WSC payload with its opcode and flag byte, reserving
/// [`EAP_HEADER_LEN`] bytes at the front for the caller's outer EAP header.
/// The flag byte is always zero: this core never originates fragmentation.
pub fn wrap_frame(opcode: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; PAYLOAD_OFFSET + payload.len()];
    out[OPCODE_OFFSET] = opcode;
    out[FLAG_OFFSET] = 0;
    out[PAYLOAD_OFFSET..].copy_from_slice(payload);
    out
}

/// Drives one inbound EAP-WSC PDU through the session and returns the full
/// outer-header-reserved response buffer to transmit, if any.
///
/// `request` begins at the byte immediately following the outer EAP header
/// (i.e. at the WSC opcode), matching how `eap_wsc_handle_request` receives
/// its `pkt`/`len` pair from the generic EAP layer.
pub fn handle_request(
    session: &mut Session,
    request: &[u8],
) -> crate::error::Result<Option<Vec<u8>>> {
    let Some((opcode, flags, body)) = split_frame(request) else {
        log::debug!(target: "wsc_enrollee", "dropping EAP-WSC frame shorter than 2 bytes");
        return Ok(None);
    };

    let reply = session.handle_request(opcode, flags, body)?;
    Ok(reply.map(|payload| wrap_frame(response_opcode_for(&payload), &payload)))
}

/// Every M1..M8 and NACK payload carries its own WSC message type
/// attribute; the outer EAP opcode it travels under is derived from that
/// rather than tracked separately, matching `eap_wsc_send_response`'s
/// dispatch to `eap_wsc_send_nack`/`eap_wsc_send_done` by message content.
fn response_opcode_for(payload: &[u8]) -> u8 {
    use crate::message::msg_type;
    const OPCODE_NACK: u8 = 0x03;
    const OPCODE_MSG: u8 = 0x04;
    const OPCODE_DONE: u8 = 0x05;

    match crate::tlv::AttrIter::new(payload)
        .find(|(tag, _)| *tag == crate::attr::ATTR_MSG_TYPE)
        .and_then(|(_, v)| v.first().copied())
    {
        Some(msg_type::WSC_NACK) => OPCODE_NACK,
        Some(msg_type::WSC_DONE) => OPCODE_DONE,
        _ => OPCODE_MSG,
    }
}
