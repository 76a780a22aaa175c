//! Codec capability shared by every dialect

use crate::dialect::africas_talking::AfricasTalkingCodec;
use crate::dialect::arkesel::ArkeselCodec;
use crate::dialect::hollatags::HollatagsCodec;
use crate::dialect::kind::Dialect;
use crate::dialect::turn::{TurnRequest, TurnResult};
use crate::dialect::wire::{ContentType, DecodeError, EncodeError, WirePayload, WireReply};

/// Bidirectional translation between logical turns and one gateway's wire format.
///
/// Implementations are stateless and may be shared across any number of
/// concurrent sessions.
pub trait DialectCodec: Send + Sync {
    /// The dialect this codec speaks
    fn dialect(&self) -> Dialect;

    /// Content type of the encoded request body
    fn content_type(&self) -> ContentType;

    /// Encode a logical turn into the gateway's request body
    fn encode(&self, request: &TurnRequest) -> Result<WirePayload, EncodeError>;

    /// Decode the gateway's reply into a normalized result
    fn decode(&self, reply: &WireReply<'_>) -> Result<TurnResult, DecodeError>;
}

impl Dialect {
    /// Get the codec for this dialect
    pub fn codec(&self) -> &'static dyn DialectCodec {
        match self {
            Dialect::Arkesel => &ArkeselCodec,
            Dialect::AfricasTalking => &AfricasTalkingCodec,
            Dialect::Hollatags => &HollatagsCodec,
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.codec().content_type()
    }

    pub fn encode(&self, request: &TurnRequest) -> Result<WirePayload, EncodeError> {
        self.codec().encode(request)
    }

    pub fn decode(&self, body: &[u8]) -> Result<TurnResult, DecodeError> {
        self.codec().decode(&WireReply::new(body))
    }
}
