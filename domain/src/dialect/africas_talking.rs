//! Africa's Talking dialect: form-encoded request, `CON `/`END ` text reply.

use crate::dialect::codec::DialectCodec;
use crate::dialect::kind::Dialect;
use crate::dialect::turn::{TurnRequest, TurnResult};
use crate::dialect::wire::{ContentType, DecodeError, EncodeError, WirePayload, WireReply};
use tracing::warn;

/// Reply prefix for a dialogue that expects more input
pub const CONTINUE_PREFIX: &str = "CON ";

/// Reply prefix for a dialogue that has ended
pub const END_PREFIX: &str = "END ";

/// Codec for Africa's Talking callbacks
pub struct AfricasTalkingCodec;

impl DialectCodec for AfricasTalkingCodec {
    fn dialect(&self) -> Dialect {
        Dialect::AfricasTalking
    }

    fn content_type(&self) -> ContentType {
        ContentType::FormUrlEncoded
    }

    fn encode(&self, request: &TurnRequest) -> Result<WirePayload, EncodeError> {
        // The gateway replays the whole trail on every turn.
        let text = if request.is_new_session {
            ""
        } else {
            request.full_input.as_str()
        };

        Ok(WirePayload::form(&[
            ("sessionId", request.session_id.as_str()),
            ("phoneNumber", &request.phone_number),
            ("serviceCode", &request.service_code),
            ("text", text),
        ]))
    }

    fn decode(&self, reply: &WireReply<'_>) -> Result<TurnResult, DecodeError> {
        let text = reply.text(Dialect::AfricasTalking)?;
        Ok(parse_reply(text))
    }
}

/// Interpret a text reply.
///
/// Anything without a recognised prefix ends the dialogue with the whole
/// trimmed body as its message, so a non-conforming gateway never leaves the
/// session hanging.
pub fn parse_reply(text: &str) -> TurnResult {
    let trimmed = text.trim();

    if let Some(message) = trimmed.strip_prefix(CONTINUE_PREFIX) {
        return TurnResult::continues(message);
    }
    if let Some(message) = trimmed.strip_prefix(END_PREFIX) {
        return TurnResult::ends(message);
    }

    warn!(
        "Africa's Talking reply has no CON/END prefix, ending session: {:?}",
        trimmed
    );
    TurnResult::ends(trimmed)
}
