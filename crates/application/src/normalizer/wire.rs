use bytes::Bytes;
use ferrous_bridge_domain::wire::{self, Edns, Flags, Question, ResponseCode, WireMessage};
use ferrous_bridge_domain::{EncodeError, Query, ResolutionResult, ResolutionStatus};

/// Advertised in responses to clients that sent EDNS0.
const RESPONSE_UDP_PAYLOAD: u16 = 1232;

/// The first question of `msg`. Additional questions are ignored.
pub fn from_wire(msg: &WireMessage) -> Option<Query> {
    msg.questions
        .first()
        .map(|q| Query::with_class(&q.name, q.record_type, q.class))
}

pub fn rcode_for(status: ResolutionStatus) -> ResponseCode {
    match status {
        ResolutionStatus::Ok => ResponseCode::NoError,
        ResolutionStatus::NxDomain => ResponseCode::NxDomain,
        ResolutionStatus::ServFail | ResolutionStatus::Timeout => ResponseCode::ServFail,
    }
}

/// Response message for `result`, echoing `original_id` and the query.
pub fn to_wire_message(original_id: u16, result: &ResolutionResult) -> WireMessage {
    let query = &result.query;
    WireMessage {
        id: original_id,
        flags: Flags {
            response: true,
            recursion_desired: true,
            recursion_available: true,
            rcode: rcode_for(result.status),
            ..Flags::default()
        },
        questions: vec![Question {
            name: query.name().to_string(),
            record_type: query.record_type(),
            class: query.class(),
        }],
        answers: result.records.clone(),
        ..WireMessage::default()
    }
}

/// Wire response for a client without EDNS0, capped at 512 bytes.
pub fn to_wire_response(original_id: u16, result: &ResolutionResult) -> Result<Bytes, EncodeError> {
    wire::encode_with_limit(
        &to_wire_message(original_id, result),
        wire::DEFAULT_UDP_PAYLOAD,
    )
}

/// Wire response shaped after the client's own request.
///
/// The question is echoed byte for byte (original letter case), RD is copied
/// and an OPT record is added when the client sent one. `limit` caps the
/// encoded size; `None` means a stream transport with no ceiling.
pub fn respond_to(
    request: &WireMessage,
    result: &ResolutionResult,
    limit: Option<usize>,
) -> Result<Bytes, EncodeError> {
    let mut msg = to_wire_message(request.id, result);
    msg.flags.recursion_desired = request.flags.recursion_desired;
    msg.flags.checking_disabled = request.flags.checking_disabled;
    if let Some(q) = request.questions.first() {
        msg.questions = vec![q.clone()];
    }
    if request.edns.is_some() {
        msg.edns = Some(Edns::new(RESPONSE_UDP_PAYLOAD));
    }

    match limit {
        Some(limit) => wire::encode_with_limit(&msg, limit),
        None => wire::encode(&msg),
    }
}

/// Header-only error reply (FORMERR, NOTIMP, SERVFAIL) for `request`.
pub fn error_response(request: &WireMessage, rcode: ResponseCode) -> Result<Bytes, EncodeError> {
    let msg = WireMessage {
        id: request.id,
        flags: Flags {
            response: true,
            opcode: request.flags.opcode,
            recursion_desired: request.flags.recursion_desired,
            recursion_available: true,
            rcode,
            ..Flags::default()
        },
        questions: request.questions.iter().take(1).cloned().collect(),
        edns: request.edns.as_ref().map(|_| Edns::new(RESPONSE_UDP_PAYLOAD)),
        ..WireMessage::default()
    };
    wire::encode(&msg)
}
