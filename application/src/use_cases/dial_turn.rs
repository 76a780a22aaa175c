//! Dial Turn use case
//!
//! Drives a single dialer: turns UI actions (start, send, cancel, acknowledge)
//! into gateway round trips and applies each outcome to the session.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoTurnProgress, TurnProgressNotifier};
use crate::ports::transport::{TransportError, TransportRequest, UssdTransport};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ussd_domain::{
    DecodeError, DomainError, EncodeError, Endpoint, ServiceCode, Session, SessionId,
    SessionPhase, SessionSnapshot, TurnRequest, TurnResult,
};

/// Errors returned to the caller of the dialer.
///
/// Gateway failures are not in here: they are recorded on the session and
/// reported as [`TurnOutcome::Failed`].
#[derive(Error, Debug)]
pub enum DialTurnError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Session is not waiting for acknowledgement")]
    NotTerminal,
}

/// Why a turn's round trip failed
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Gateway returned HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A UI-level action that triggers a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialAction {
    /// Dial a service code, opening a new dialogue
    Start { service_code: String },
    /// Reply to the message currently shown
    Send { input: String },
}

/// What happened to a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The gateway expects another turn
    Continued { message: String },
    /// The gateway ended the dialogue; acknowledge to return to idle
    Ended { message: String },
    /// Transport or decode failure; the session stays open
    Failed { error: String },
    /// The session was cancelled or replaced while the turn was in flight
    Discarded,
}

impl TurnOutcome {
    fn succeeded(&self) -> bool {
        matches!(
            self,
            TurnOutcome::Continued { .. } | TurnOutcome::Ended { .. }
        )
    }
}

struct DialerState {
    session: Session,
    in_flight: Option<CancellationToken>,
}

/// Use case for running USSD turns against one endpoint
///
/// Cloning is cheap and every clone drives the same session, so a cancel
/// issued from one task reaches a turn awaited in another.
pub struct DialTurnUseCase<T: UssdTransport + 'static> {
    transport: Arc<T>,
    endpoint: Arc<Endpoint>,
    behavior: BehaviorConfig,
    logger: Arc<dyn ConversationLogger>,
    state: Arc<Mutex<DialerState>>,
}

impl<T: UssdTransport + 'static> Clone for DialTurnUseCase<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            endpoint: Arc::clone(&self.endpoint),
            behavior: self.behavior.clone(),
            logger: Arc::clone(&self.logger),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: UssdTransport + 'static> DialTurnUseCase<T> {
    /// Create a dialer for `endpoint`.
    ///
    /// Fails if the endpoint configuration is unusable, before any session
    /// can start.
    pub fn new(transport: Arc<T>, endpoint: Endpoint) -> Result<Self, DialTurnError> {
        endpoint.validate()?;
        Ok(Self {
            transport,
            endpoint: Arc::new(endpoint),
            behavior: BehaviorConfig::default(),
            logger: Arc::new(NoConversationLogger),
            state: Arc::new(Mutex::new(DialerState {
                session: Session::new(),
                in_flight: None,
            })),
        })
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_state().session.snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock_state().session.phase()
    }

    /// Dial `service_code` and run the opening turn
    pub async fn start(&self, service_code: &str) -> Result<TurnOutcome, DialTurnError> {
        self.execute(DialAction::Start {
            service_code: service_code.to_string(),
        })
        .await
    }

    /// Send the next input token
    pub async fn send(&self, input: &str) -> Result<TurnOutcome, DialTurnError> {
        self.execute(DialAction::Send {
            input: input.to_string(),
        })
        .await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, action: DialAction) -> Result<TurnOutcome, DialTurnError> {
        self.execute_with_progress(action, &NoTurnProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        action: DialAction,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutcome, DialTurnError> {
        let (request, token) = self.begin_turn(&action)?;

        self.log_event(
            "turn_sent",
            json!({
                "session_id": request.session_id,
                "dialect": self.endpoint.dialect,
                "is_new_session": request.is_new_session,
                "input": request.input,
                "full_input": request.full_input,
            }),
        );
        progress.on_turn_start(
            &request.session_id,
            self.endpoint.dialect,
            request.is_new_session,
        );

        let result = tokio::select! {
            _ = token.cancelled() => None,
            result = self.round_trip(&request) => Some(result),
        };

        let outcome = self.finish_turn(&request.session_id, &token, result)?;
        progress.on_turn_finished(&request.session_id, outcome.succeeded());
        Ok(outcome)
    }

    /// Tear down the current dialogue immediately, abandoning any turn in flight.
    ///
    /// Returns the id of the dialogue that was cancelled, if there was one.
    pub fn cancel(&self) -> Option<SessionId> {
        let mut state = self.lock_state();
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }

        let ended = state.session.end_session();
        if let Some(session_id) = &ended {
            info!("Session {} cancelled", session_id);
            self.log_event(
                "session_ended",
                json!({"session_id": session_id, "reason": "cancelled"}),
            );
        }
        ended
    }

    /// Dismiss the terminal message of an ended dialogue
    pub fn acknowledge(&self) -> Result<SessionId, DialTurnError> {
        let mut state = self.lock_state();
        match state.session.phase() {
            SessionPhase::Terminal => {}
            SessionPhase::Idle => return Err(DomainError::NoActiveSession("acknowledge").into()),
            SessionPhase::Loading | SessionPhase::AwaitingInput => {
                return Err(DialTurnError::NotTerminal);
            }
        }

        let session_id = state
            .session
            .end_session()
            .ok_or(DomainError::NoActiveSession("acknowledge"))?;
        info!("Session {} acknowledged", session_id);
        self.log_event(
            "session_ended",
            json!({"session_id": session_id, "reason": "acknowledged"}),
        );
        Ok(session_id)
    }

    /// Mutate the session for `action` and build the request to send
    fn begin_turn(
        &self,
        action: &DialAction,
    ) -> Result<(TurnRequest, CancellationToken), DialTurnError> {
        let mut state = self.lock_state();

        let request = match action {
            DialAction::Start { service_code } => {
                let code = ServiceCode::parse(service_code)?;

                if let Some(previous) = state.session.session_id().cloned() {
                    if let Some(token) = state.in_flight.take() {
                        token.cancel();
                    }
                    info!("Replacing session {} with a new dialogue", previous);
                    self.log_event(
                        "session_ended",
                        json!({"session_id": previous, "reason": "replaced"}),
                    );
                }

                let session_id = state.session.start_session(code.as_str());
                info!(
                    "Session {} started: {} via {} ({})",
                    session_id, code, self.endpoint.name, self.endpoint.dialect
                );
                self.log_event(
                    "session_started",
                    json!({
                        "session_id": session_id,
                        "endpoint": self.endpoint.name,
                        "callback_url": self.endpoint.callback_url,
                        "dialect": self.endpoint.dialect,
                        "service_code": code.as_str(),
                    }),
                );
                TurnRequest::opening(session_id, &self.endpoint.phone_number, code.as_str())
            }
            DialAction::Send { input } => {
                if input.trim().is_empty() {
                    return Err(DomainError::EmptyInput.into());
                }

                state.session.record_turn_submission(input.as_str())?;
                let session_id = state
                    .session
                    .session_id()
                    .cloned()
                    .ok_or(DomainError::NoActiveSession("send input"))?;
                TurnRequest::follow_up(
                    session_id,
                    &self.endpoint.phone_number,
                    state.session.service_code(),
                    input.as_str(),
                    state.session.history(),
                )
            }
        };

        let token = CancellationToken::new();
        state.in_flight = Some(token.clone());
        Ok((request, token))
    }

    /// Encode, send and decode one turn
    async fn round_trip(&self, request: &TurnRequest) -> Result<TurnResult, TurnError> {
        let dialect = self.endpoint.dialect;
        let payload = dialect.encode(request)?;
        debug!(
            "Sending {} turn for session {} to {}: {}",
            dialect,
            request.session_id,
            self.endpoint.callback_url,
            payload.body_text()
        );

        let response = self
            .transport
            .send(TransportRequest {
                url: self.endpoint.callback_url.clone(),
                body: payload.body,
                content_type: payload.content_type.as_str(),
                timeout: self.behavior.timeout,
            })
            .await?;

        if !response.is_success() {
            return Err(TurnError::Status(response.status));
        }
        Ok(dialect.decode(&response.body)?)
    }

    /// Apply a finished round trip, unless its session is gone
    fn finish_turn(
        &self,
        session_id: &SessionId,
        token: &CancellationToken,
        result: Option<Result<TurnResult, TurnError>>,
    ) -> Result<TurnOutcome, DialTurnError> {
        let mut state = self.lock_state();

        let result = match result {
            Some(result) if !token.is_cancelled() && state.session.is_current(session_id) => {
                result
            }
            _ => {
                debug!("Discarding stale turn result for session {}", session_id);
                self.log_event("turn_discarded", json!({"session_id": session_id}));
                return Ok(TurnOutcome::Discarded);
            }
        };
        state.in_flight = None;

        match result {
            Ok(turn) => {
                state.session.apply_turn_result(&turn)?;
                info!(
                    "Session {} turn completed (continue: {})",
                    session_id, turn.continue_session
                );
                self.log_event(
                    "turn_completed",
                    json!({
                        "session_id": session_id,
                        "message": turn.message,
                        "continue_session": turn.continue_session,
                    }),
                );
                Ok(if turn.continue_session {
                    TurnOutcome::Continued {
                        message: turn.message,
                    }
                } else {
                    TurnOutcome::Ended {
                        message: turn.message,
                    }
                })
            }
            Err(e) => {
                let error = e.to_string();
                warn!("Session {} turn failed: {}", session_id, error);
                state.session.apply_turn_failure(error.clone())?;
                self.log_event(
                    "turn_failed",
                    json!({"session_id": session_id, "error": error}),
                );
                Ok(TurnOutcome::Failed { error })
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DialerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_event(&self, event_type: &'static str, payload: serde_json::Value) {
        self.logger.log(ConversationEvent::new(event_type, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::transport::TransportResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use ussd_domain::{Dialect, EndpointId};

    type Reply = Result<TransportResponse, TransportError>;

    /// Transport that answers from a fixed script and records every request
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn bodies(&self) -> Vec<String> {
            self.requests()
                .into_iter()
                .map(|r| String::from_utf8(r.body).unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl UssdTransport for ScriptedTransport {
        async fn send(&self, request: TransportRequest) -> Reply {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())))
        }
    }

    /// Transport that holds every request until the test releases it
    #[derive(Default)]
    struct GatedTransport {
        calls: AtomicUsize,
        started: Notify,
        release: Notify,
        reply: Mutex<Option<TransportResponse>>,
    }

    impl GatedTransport {
        async fn wait_until_started(&self) {
            self.started.notified().await;
        }

        fn release_with(&self, response: TransportResponse) {
            *self.reply.lock().unwrap() = Some(response);
            self.release.notify_one();
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UssdTransport for GatedTransport {
        async fn send(&self, _request: TransportRequest) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            self.reply
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| TransportError::Connection("no reply".into()))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn endpoint(dialect: Dialect) -> Endpoint {
        Endpoint {
            id: EndpointId::new("e-1"),
            name: "Test menu".to_string(),
            phone_number: "233244000111".to_string(),
            callback_url: "http://localhost:9000/ussd".to_string(),
            dialect,
            created_at: 0,
        }
    }

    fn ok(body: &str) -> Reply {
        Ok(TransportResponse::new(200, body))
    }

    #[tokio::test]
    async fn test_africas_talking_dialogue_sends_cumulative_text() {
        let transport = ScriptedTransport::new(vec![
            ok("CON Welcome\n1. Airtime"),
            ok("CON Amount?"),
            ok("END Done"),
        ]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking))
            .unwrap();

        let outcome = dialer.start("*384#").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Continued {
                message: "Welcome\n1. Airtime".to_string()
            }
        );
        assert_eq!(dialer.phase(), SessionPhase::AwaitingInput);

        dialer.send("1").await.unwrap();
        let outcome = dialer.send("5").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Ended {
                message: "Done".to_string()
            }
        );
        assert_eq!(dialer.phase(), SessionPhase::Terminal);

        let bodies = transport.bodies();
        assert!(bodies[0].ends_with("&text="));
        assert!(bodies[1].ends_with("&text=1"));
        assert!(bodies[2].ends_with("&text=1%2A5"));

        let requests = transport.requests();
        assert!(
            requests
                .iter()
                .all(|r| r.content_type == "application/x-www-form-urlencoded")
        );
        assert!(requests.iter().all(|r| r.url == "http://localhost:9000/ussd"));
    }

    #[tokio::test]
    async fn test_arkesel_sends_latest_token_and_stable_session_id() {
        let transport = ScriptedTransport::new(vec![
            ok(r#"{"message":"Menu","continueSession":true}"#),
            ok(r#"{"message":"Bye","continueSession":false}"#),
        ]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::Arkesel)).unwrap();

        dialer.start("*123#").await.unwrap();
        dialer.send("2").await.unwrap();

        let bodies: Vec<serde_json::Value> = transport
            .bodies()
            .iter()
            .map(|b| serde_json::from_str(b).unwrap())
            .collect();
        assert_eq!(bodies[0]["userData"], "*123#");
        assert_eq!(bodies[0]["newSession"], true);
        assert_eq!(bodies[1]["userData"], "2");
        assert_eq!(bodies[1]["newSession"], false);
        assert_eq!(bodies[0]["sessionID"], bodies[1]["sessionID"]);
        assert_eq!(transport.requests()[0].content_type, "application/json");
    }

    #[tokio::test]
    async fn test_hollatags_end_operation_terminates() {
        let transport = ScriptedTransport::new(vec![ok(
            r#"{"session_operation":"end","session_msg":"Thanks"}"#,
        )]);
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::Hollatags)).unwrap();

        let outcome = dialer.start("*347#").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Ended {
                message: "Thanks".to_string()
            }
        );
        assert_eq!(dialer.snapshot().current_message, "Thanks");
    }

    #[tokio::test]
    async fn test_http_error_keeps_token_and_session() {
        let transport = ScriptedTransport::new(vec![
            ok("CON Pick one"),
            Ok(TransportResponse::new(502, "Bad Gateway")),
            ok("CON Picked 3"),
        ]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking))
            .unwrap();

        dialer.start("*384#").await.unwrap();
        let outcome = dialer.send("3").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                error: "Gateway returned HTTP 502".to_string()
            }
        );

        let snapshot = dialer.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::AwaitingInput);
        assert_eq!(snapshot.history, ["3"]);
        assert_eq!(snapshot.error.as_deref(), Some("Gateway returned HTTP 502"));
        assert!(!snapshot.is_loading);

        // Retrying is just another submission; the error clears.
        let outcome = dialer.send("3").await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Continued { .. }));
        assert!(dialer.snapshot().error.is_none());
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_transport_timeout_is_turn_failure() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Timeout(
            Duration::from_secs(30),
        ))]);
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::Arkesel)).unwrap();

        let outcome = dialer.start("*123#").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                error: "Request timed out after 30s".to_string()
            }
        );
        let snapshot = dialer.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::AwaitingInput);
        assert!(snapshot.session_id.is_some());
    }

    #[tokio::test]
    async fn test_decode_error_is_turn_failure() {
        let transport = ScriptedTransport::new(vec![ok("<html>Service unavailable</html>")]);
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::Hollatags)).unwrap();

        let outcome = dialer.start("*347#").await.unwrap();
        match outcome {
            TurnOutcome::Failed { error } => assert!(error.contains("Hollatags")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(dialer.phase(), SessionPhase::AwaitingInput);
    }

    #[tokio::test]
    async fn test_timeout_comes_from_behavior_config() {
        let transport = ScriptedTransport::new(vec![ok("END Bye")]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking))
            .unwrap()
            .with_behavior(BehaviorConfig::with_timeout_seconds(5));

        dialer.start("*1#").await.unwrap();
        assert_eq!(transport.requests()[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_send_without_session_is_contract_violation() {
        let transport = ScriptedTransport::new(vec![]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::Arkesel)).unwrap();

        let err = dialer.send("1").await.unwrap_err();
        match err {
            DialTurnError::Domain(e) => assert!(e.is_contract_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_send_after_end_is_rejected() {
        let transport = ScriptedTransport::new(vec![ok("END Bye")]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking))
            .unwrap();

        dialer.start("*1#").await.unwrap();
        let err = dialer.send("1").await.unwrap_err();
        assert!(matches!(
            err,
            DialTurnError::Domain(DomainError::SessionEnded(_))
        ));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let transport = ScriptedTransport::new(vec![ok("CON Menu")]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking))
            .unwrap();

        dialer.start("*1#").await.unwrap();
        let err = dialer.send("  ").await.unwrap_err();
        assert!(matches!(err, DialTurnError::Domain(DomainError::EmptyInput)));
        assert!(dialer.snapshot().history.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_service_code_never_starts() {
        let transport = ScriptedTransport::new(vec![]);
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::Arkesel)).unwrap();

        let err = dialer.start("*12x#").await.unwrap_err();
        assert!(matches!(
            err,
            DialTurnError::Domain(DomainError::InvalidServiceCode(_))
        ));
        assert_eq!(dialer.phase(), SessionPhase::Idle);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected_up_front() {
        let mut bad = endpoint(Dialect::Arkesel);
        bad.callback_url = "localhost/ussd".to_string();
        let result = DialTurnUseCase::new(ScriptedTransport::new(vec![]), bad);
        assert!(matches!(
            result,
            Err(DialTurnError::Domain(DomainError::InvalidCallbackUrl(_)))
        ));
    }

    #[test]
    fn test_unparseable_callback_url_never_reaches_transport() {
        for url in [
            "http://host:abc/ussd",
            "http://exa<mple.com/",
            "http://localhost:99999/ussd",
        ] {
            let mut bad = endpoint(Dialect::AfricasTalking);
            bad.callback_url = url.to_string();
            let transport = ScriptedTransport::new(vec![ok("CON Welcome")]);
            let result = DialTurnUseCase::new(transport.clone(), bad);
            assert!(
                matches!(
                    result,
                    Err(DialTurnError::Domain(DomainError::InvalidCallbackUrl(_)))
                ),
                "accepted {url}"
            );
            assert!(transport.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn test_acknowledge_returns_to_idle() {
        let transport = ScriptedTransport::new(vec![ok("CON Menu"), ok("END Bye")]);
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::AfricasTalking)).unwrap();

        dialer.start("*1#").await.unwrap();
        assert!(matches!(
            dialer.acknowledge(),
            Err(DialTurnError::NotTerminal)
        ));

        dialer.send("1").await.unwrap();
        dialer.acknowledge().unwrap();
        let snapshot = dialer.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.session_id.is_none());
        assert!(snapshot.history.is_empty());
    }

    #[tokio::test]
    async fn test_submission_while_loading_is_rejected() {
        let transport = Arc::new(GatedTransport::default());
        let dialer =
            DialTurnUseCase::new(transport.clone(), endpoint(Dialect::AfricasTalking)).unwrap();

        let background = dialer.clone();
        let opening = tokio::spawn(async move { background.start("*384#").await });
        transport.wait_until_started().await;

        assert_eq!(dialer.phase(), SessionPhase::Loading);
        let before = dialer.snapshot();
        let err = dialer.send("1").await.unwrap_err();
        assert!(matches!(
            err,
            DialTurnError::Domain(DomainError::TurnInFlight(_))
        ));
        assert_eq!(dialer.snapshot(), before);
        assert_eq!(transport.calls(), 1);

        transport.release_with(TransportResponse::new(200, "CON Menu"));
        let outcome = opening.await.unwrap().unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Continued {
                message: "Menu".to_string()
            }
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_loading_discards_late_result() {
        let transport = Arc::new(GatedTransport::default());
        let logger = Arc::new(RecordingLogger::default());
        let dialer = DialTurnUseCase::new(transport.clone(), endpoint(Dialect::Arkesel))
            .unwrap()
            .with_logger(logger.clone());

        let background = dialer.clone();
        let opening = tokio::spawn(async move { background.start("*123#").await });
        transport.wait_until_started().await;

        let cancelled = dialer.cancel();
        assert!(cancelled.is_some());
        assert_eq!(dialer.phase(), SessionPhase::Idle);

        // The gateway answers after the user walked away.
        transport.release_with(TransportResponse::new(
            200,
            r#"{"message":"Too late","continueSession":true}"#,
        ));
        let outcome = opening.await.unwrap().unwrap();
        assert_eq!(outcome, TurnOutcome::Discarded);

        let snapshot = dialer.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.current_message.is_empty());

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                "session_started",
                "turn_sent",
                "session_ended",
                "turn_discarded"
            ]
        );
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let transport = ScriptedTransport::new(vec![ok("CON One"), ok("CON Two")]);
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::AfricasTalking)).unwrap();

        dialer.start("*1#").await.unwrap();
        let first = dialer.snapshot().session_id.unwrap();
        dialer.start("*2#").await.unwrap();
        let snapshot = dialer.snapshot();

        assert_ne!(snapshot.session_id.unwrap(), first);
        assert_eq!(snapshot.service_code, "*2#");
        assert_eq!(snapshot.current_message, "Two");
    }

    #[tokio::test]
    async fn test_transcript_events_for_full_dialogue() {
        let transport = ScriptedTransport::new(vec![
            ok("CON Menu"),
            Ok(TransportResponse::new(500, "")),
            ok("END Bye"),
        ]);
        let logger = Arc::new(RecordingLogger::default());
        let dialer = DialTurnUseCase::new(transport, endpoint(Dialect::AfricasTalking))
            .unwrap()
            .with_logger(logger.clone());

        dialer.start("*1#").await.unwrap();
        dialer.send("1").await.unwrap();
        dialer.send("1").await.unwrap();
        dialer.acknowledge().unwrap();

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                "session_started",
                "turn_sent",
                "turn_completed",
                "turn_sent",
                "turn_failed",
                "turn_sent",
                "turn_completed",
                "session_ended",
            ]
        );
    }
}
