//! Hollatags dialect: JSON with an explicit session operation tag.

use crate::dialect::codec::DialectCodec;
use crate::dialect::kind::Dialect;
use crate::dialect::turn::{TurnRequest, TurnResult};
use crate::dialect::wire::{ContentType, DecodeError, EncodeError, WirePayload, WireReply};
use crate::dialect::SIMULATED_NETWORK;
use serde::{Deserialize, Serialize};

const OPERATION_BEGIN: &str = "begin";
const OPERATION_CONTINUE: &str = "continue";
const OPERATION_END: &str = "end";

/// Hollatags `session_type` for an interactive USSD menu
const SESSION_TYPE_MENU: u8 = 1;

#[derive(Debug, Serialize)]
struct HollatagsRequest<'a> {
    session_operation: &'a str,
    session_type: u8,
    session_id: &'a str,
    session_msg: &'a str,
    session_msisdn: &'a str,
    session_from: &'a str,
    session_mno: &'a str,
}

#[derive(Debug, Deserialize)]
struct HollatagsReply {
    session_msg: String,
    session_operation: String,
}

/// Codec for Hollatags callbacks
pub struct HollatagsCodec;

impl DialectCodec for HollatagsCodec {
    fn dialect(&self) -> Dialect {
        Dialect::Hollatags
    }

    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn encode(&self, request: &TurnRequest) -> Result<WirePayload, EncodeError> {
        let (operation, message) = if request.is_new_session {
            (OPERATION_BEGIN, request.service_code.as_str())
        } else {
            (OPERATION_CONTINUE, request.input.as_str())
        };

        WirePayload::json(&HollatagsRequest {
            session_operation: operation,
            session_type: SESSION_TYPE_MENU,
            session_id: request.session_id.as_str(),
            session_msg: message,
            session_msisdn: &request.phone_number,
            session_from: &request.service_code,
            session_mno: SIMULATED_NETWORK,
        })
    }

    fn decode(&self, reply: &WireReply<'_>) -> Result<TurnResult, DecodeError> {
        let reply: HollatagsReply = reply.json(Dialect::Hollatags)?;
        Ok(TurnResult {
            continue_session: reply.session_operation != OPERATION_END,
            message: reply.session_msg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::value_objects::SessionId;
    use serde_json::{Value, json};

    fn encode(request: &TurnRequest) -> Value {
        serde_json::from_slice(&HollatagsCodec.encode(request).unwrap().body).unwrap()
    }

    fn decode(body: Value) -> Result<TurnResult, DecodeError> {
        HollatagsCodec.decode(&WireReply::new(body.to_string().as_bytes()))
    }

    #[test]
    fn test_opening_turn_begins() {
        let request = TurnRequest::opening(SessionId::new("h-1"), "2348030000000", "*347*2#");
        let body = encode(&request);

        assert_eq!(
            body,
            json!({
                "session_operation": "begin",
                "session_type": 1,
                "session_id": "h-1",
                "session_msg": "*347*2#",
                "session_msisdn": "2348030000000",
                "session_from": "*347*2#",
                "session_mno": "SIM"
            })
        );
    }

    #[test]
    fn test_follow_up_continues_with_latest_token() {
        let history = vec!["4".to_string(), "1".to_string()];
        let request =
            TurnRequest::follow_up(SessionId::new("h-1"), "2348030000000", "*347#", "1", &history);
        let body = encode(&request);

        assert_eq!(body["session_operation"], "continue");
        assert_eq!(body["session_msg"], "1");
        assert_eq!(body["session_from"], "*347#");
        assert_eq!(body["session_type"], 1);
    }

    #[test]
    fn test_decode_end_operation_ends() {
        let result = decode(json!({"session_operation": "end", "session_msg": "Thanks"})).unwrap();
        assert_eq!(result, TurnResult::ends("Thanks"));
    }

    #[test]
    fn test_decode_other_operations_continue() {
        for operation in ["continue", "begin", "END", "anything"] {
            let result =
                decode(json!({"session_operation": operation, "session_msg": "Menu"})).unwrap();
            assert!(result.continue_session, "operation {operation} should continue");
            assert_eq!(result.message, "Menu");
        }
    }

    #[test]
    fn test_decode_missing_message_is_error() {
        let err = decode(json!({"session_operation": "end"})).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { dialect: Dialect::Hollatags, .. }));
    }
}
