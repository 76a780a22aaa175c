//! Arkesel dialect: JSON in both directions, boolean continuation flag.

use crate::dialect::codec::DialectCodec;
use crate::dialect::kind::Dialect;
use crate::dialect::turn::{TurnRequest, TurnResult};
use crate::dialect::wire::{ContentType, DecodeError, EncodeError, WirePayload, WireReply};
use crate::dialect::SIMULATED_NETWORK;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct ArkeselRequest<'a> {
    #[serde(rename = "sessionID")]
    session_id: &'a str,
    #[serde(rename = "userID")]
    user_id: String,
    #[serde(rename = "newSession")]
    new_session: bool,
    msisdn: &'a str,
    #[serde(rename = "userData")]
    user_data: &'a str,
    network: &'a str,
}

#[derive(Debug, Deserialize)]
struct ArkeselReply {
    message: String,
    #[serde(rename = "continueSession")]
    continue_session: bool,
}

/// Codec for Arkesel callbacks
pub struct ArkeselCodec;

impl DialectCodec for ArkeselCodec {
    fn dialect(&self) -> Dialect {
        Dialect::Arkesel
    }

    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn encode(&self, request: &TurnRequest) -> Result<WirePayload, EncodeError> {
        // Arkesel wants the dialed code first, then only the latest token.
        let user_data = if request.is_new_session {
            &request.service_code
        } else {
            &request.input
        };

        WirePayload::json(&ArkeselRequest {
            session_id: request.session_id.as_str(),
            user_id: Uuid::new_v4().to_string(),
            new_session: request.is_new_session,
            msisdn: &request.phone_number,
            user_data,
            network: SIMULATED_NETWORK,
        })
    }

    fn decode(&self, reply: &WireReply<'_>) -> Result<TurnResult, DecodeError> {
        let reply: ArkeselReply = reply.json(Dialect::Arkesel)?;
        Ok(TurnResult {
            message: reply.message,
            continue_session: reply.continue_session,
        })
    }
}
