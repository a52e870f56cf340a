//! The chat orchestrator: one reply per turn, one question per reply.

use std::collections::HashMap;
use std::sync::Arc;

use intake_core::{
    Category, ComplaintMetadata, ComplaintPayload, ComplaintSink, Department, DepartmentDirectory,
    Intent, LanguageDetector, Translator, COMPLAINT_SOURCE_CHATBOT,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::classification::TextClassifier;
use crate::department::{map_department, DEFAULT_DEPARTMENT_CODE};
use crate::intent::{detect_intent, IntentTag};
use crate::language::{detect_or_unknown, ScriptLanguageDetector};
use crate::message::{ChatRequest, ChatResponse, UserFields};
use crate::replies;
use crate::session::{AwaitingField, ChatState, ConversationSession, ERROR_REFERENCE};
use crate::store::{MemorySessionStore, SessionStore};
use crate::validation::{clean_phone, validate_description, validate_location, validate_phone};

/// Language complaint descriptions are stored in.
pub const CANONICAL_LANGUAGE: &str = "en";

/// Replies accepted as confirmation.
const AFFIRMATIONS: &[&str] = &["yes", "y", "confirm", "correct"];

static REFERENCE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bCOMP-(\d{6})\b").expect("reference number pattern"));

static STATUS_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(status|track|reference|complaint number|tracking id)\b")
        .expect("status query pattern")
});

/// Drives conversations from first message to filed complaint.
///
/// Turns for the same session id are serialized; different sessions proceed
/// concurrently. Every turn produces a reply, whatever the collaborators do.
pub struct ChatOrchestrator {
    classifier: TextClassifier,
    sink: Arc<dyn ComplaintSink>,
    store: Arc<dyn SessionStore>,
    directory: Option<Arc<dyn DepartmentDirectory>>,
    translator: Option<Arc<dyn Translator>>,
    detector: Arc<dyn LanguageDetector>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatOrchestrator {
    /// Create an orchestrator with an in-memory session store.
    pub fn new(classifier: TextClassifier, sink: Arc<dyn ComplaintSink>) -> Self {
        Self {
            classifier,
            sink,
            store: Arc::new(MemorySessionStore::new()),
            directory: None,
            translator: None,
            detector: Arc::new(ScriptLanguageDetector::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_directory(mut self, directory: Arc<dyn DepartmentDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// The session store in use.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handle one chat turn.
    pub async fn handle(&self, request: ChatRequest) -> ChatResponse {
        let lock = self.session_lock(&request.session_id).await;
        let response = {
            let _turn = lock.lock().await;
            self.handle_locked(&request).await
        };
        drop(lock);
        self.release_session_lock(&request.session_id).await;
        response
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_session_lock(&self, session_id: &str) {
        let mut locks = self.locks.lock().await;
        // Only the map holds it once no turn is running or waiting.
        if locks
            .get(session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(session_id);
        }
    }

    async fn handle_locked(&self, request: &ChatRequest) -> ChatResponse {
        let mut session = match self.store.get(&request.session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => ConversationSession::new(&request.session_id),
            Err(err) => {
                warn!(session_id = %request.session_id, error = %err, "Failed to load session; starting fresh");
                ConversationSession::new(&request.session_id)
            }
        };

        let response = self.advance(&mut session, request).await;

        if let Err(err) = self.store.put(&session).await {
            error!(session_id = %session.session_id, error = %err, "Failed to save session");
        }
        response
    }

    async fn advance(&self, session: &mut ConversationSession, request: &ChatRequest) -> ChatResponse {
        let input = request.user_input.as_str();
        let state = session.state();
        debug!(session_id = %session.session_id, ?state, "Chat turn");

        match state {
            ChatState::Done => {
                info!(session_id = %session.session_id, "Starting a new complaint in a filed session");
                session.reset_for_new_complaint();
                self.start(session, input, request.user.as_ref()).await
            }
            ChatState::Fresh => self.start(session, input, request.user.as_ref()).await,
            ChatState::Collecting(field) => {
                self.collect(session, field, input, request.user.as_ref()).await
            }
            ChatState::Confirming => self.confirm(session, input).await,
        }
    }

    /// Route a message that arrives with no complaint in progress.
    async fn start(
        &self,
        session: &mut ConversationSession,
        input: &str,
        user: Option<&UserFields>,
    ) -> ChatResponse {
        if let Some(response) = self.lookup_status(session, input).await {
            return response;
        }

        match detect_intent(input) {
            IntentTag::Incomplete => return ChatResponse::reply(replies::INCOMPLETE, session),
            IntentTag::Greeting => return ChatResponse::reply(replies::GREETING, session),
            IntentTag::Thanks => return ChatResponse::reply(replies::THANKS, session),
            tag @ (IntentTag::Query | IntentTag::Suggestion | IntentTag::Request) => {
                return self.answer_non_complaint(session, input, tag).await;
            }
            IntentTag::Complaint => {}
        }

        if let Err(reason) = validate_description(input) {
            return ChatResponse::reply(reason.to_string(), session);
        }

        self.capture_description(session, input).await;
        self.apply_user_fields(session, user);
        self.next_prompt(session)
    }

    async fn lookup_status(
        &self,
        session: &ConversationSession,
        input: &str,
    ) -> Option<ChatResponse> {
        let captures = REFERENCE_NUMBER.captures(input)?;
        let reference_number = format!("COMP-{}", &captures[1]);

        let message = match self.sink.find_by_reference(&reference_number).await {
            Ok(Some(receipt)) => replies::complaint_status(&receipt.reference_number, &receipt.status),
            Ok(None) => replies::complaint_not_found(&reference_number),
            Err(err) => {
                warn!(reference_number = %reference_number, error = %err, "Status lookup failed");
                replies::STATUS_UNAVAILABLE.to_string()
            }
        };
        Some(ChatResponse::reply(message, session))
    }

    /// Query, suggestion or request: pick a canned reply after asking the
    /// classifier for its view of the intent.
    async fn answer_non_complaint(
        &self,
        session: &ConversationSession,
        input: &str,
        tag: IntentTag,
    ) -> ChatResponse {
        // Keyword rules only ever yield complaint intents, so skip the call.
        let model_intent = if self.classifier.has_model() {
            Some(self.classifier.classify(input).await.intent)
        } else {
            None
        };
        let said = |wanted_tag: IntentTag, wanted_intent: Intent| {
            tag == wanted_tag || model_intent == Some(wanted_intent)
        };

        let message = if said(IntentTag::Query, Intent::Query) {
            if STATUS_QUERY.is_match(input) {
                replies::STATUS_QUERY
            } else {
                replies::QUERY
            }
        } else if said(IntentTag::Suggestion, Intent::Suggestion) {
            replies::SUGGESTION
        } else {
            replies::REQUEST
        };

        debug!(detected = %tag, model = ?model_intent, "Answered non-complaint message");
        ChatResponse::reply(message, session)
    }

    async fn capture_description(&self, session: &mut ConversationSession, input: &str) {
        let text = input.trim();
        let language = detect_or_unknown(self.detector.as_ref(), text);
        let description = self.translate(text).await;

        let classification = self.classifier.classify(&description).await;
        let departments = self.known_departments().await;
        let department_code =
            map_department(classification.category.as_str(), departments.as_deref());

        info!(
            session_id = %session.session_id,
            category = %classification.category,
            intent = %classification.intent,
            department = %department_code,
            "Complaint description captured"
        );

        session.raw_text = Some(text.to_string());
        session.language = Some(language);
        session.description = Some(description);
        session.category = Some(classification.category);
        session.subcategory = Some(classification.subcategory);
        session.intent = Some(classification.intent);
        session.department_code = Some(department_code);
    }

    async fn translate(&self, text: &str) -> String {
        let Some(translator) = &self.translator else {
            return text.to_string();
        };
        match translator.translate(text, CANONICAL_LANGUAGE).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => text.to_string(),
            Err(err) => {
                warn!(error = %err, "Translation failed; keeping original text");
                text.to_string()
            }
        }
    }

    async fn known_departments(&self) -> Option<Vec<Department>> {
        let directory = self.directory.as_ref()?;
        match directory.list_departments().await {
            Ok(departments) => Some(departments),
            Err(err) => {
                warn!(error = %err, "Department directory unavailable; using static table");
                None
            }
        }
    }

    fn apply_user_fields(&self, session: &mut ConversationSession, user: Option<&UserFields>) {
        let Some(user) = user else {
            return;
        };
        if let Some(phone) = user.phone.as_deref() {
            if validate_phone(phone) {
                session.phone = Some(clean_phone(phone));
            } else {
                debug!(session_id = %session.session_id, "Ignoring invalid caller-supplied phone");
            }
        }
        // Callers vouch for their own location; only blank values are ignored.
        if let Some(location) = user.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            session.location = Some(location.to_string());
        }
    }

    /// Ask for the highest-priority missing field, or for confirmation.
    fn next_prompt(&self, session: &mut ConversationSession) -> ChatResponse {
        let missing = session.missing_fields();
        match missing.first() {
            Some(field) => {
                session.awaiting_field = Some(*field);
                ChatResponse::asking(replies::question(*field), &missing, session)
            }
            None => {
                session.awaiting_field = Some(AwaitingField::Confirmation);
                ChatResponse::reply(replies::confirmation_summary(session), session)
            }
        }
    }

    async fn collect(
        &self,
        session: &mut ConversationSession,
        field: AwaitingField,
        input: &str,
        user: Option<&UserFields>,
    ) -> ChatResponse {
        match field {
            AwaitingField::Phone => {
                if !validate_phone(input) {
                    return ChatResponse::asking(replies::INVALID_PHONE, &[field], session);
                }
                session.phone = Some(clean_phone(input));
            }
            AwaitingField::Location => match validate_location(input) {
                Some(location) => session.location = Some(location),
                None => return ChatResponse::asking(replies::INVALID_LOCATION, &[field], session),
            },
            AwaitingField::DepartmentCode => {
                let choice = input.trim();
                if choice.is_empty() {
                    return ChatResponse::asking(replies::question(field), &[field], session);
                }
                let label = match choice {
                    "1" => Category::Sanitation.as_str(),
                    "2" => Category::WaterSupply.as_str(),
                    "3" => Category::StreetLighting.as_str(),
                    other => other,
                };
                let departments = self.known_departments().await;
                session.department_code = Some(map_department(label, departments.as_deref()));
            }
            AwaitingField::Confirmation => return self.confirm(session, input).await,
        }

        session.awaiting_field = None;
        self.apply_user_fields(session, user);
        self.next_prompt(session)
    }

    async fn confirm(&self, session: &mut ConversationSession, input: &str) -> ChatResponse {
        let answer = input.trim().to_lowercase();
        if AFFIRMATIONS.contains(&answer.as_str()) {
            session.confirmed = true;
            session.awaiting_field = None;
            return self.file_complaint(session).await;
        }

        self.correct(session, input).await
    }

    /// Treat a non-affirmative confirmation reply as more detail.
    async fn correct(&self, session: &mut ConversationSession, input: &str) -> ChatResponse {
        let mut description = session.description.take().unwrap_or_default();
        description.push_str("\nUser added: ");
        description.push_str(input);

        let previous = session.category;
        let classification = self.classifier.classify(&description).await;
        let departments = self.known_departments().await;

        session.description = Some(description);
        session.category = Some(classification.category);
        session.subcategory = Some(classification.subcategory);
        session.department_code = Some(map_department(
            classification.category.as_str(),
            departments.as_deref(),
        ));
        session.awaiting_field = Some(AwaitingField::Confirmation);

        info!(
            session_id = %session.session_id,
            category = %classification.category,
            changed = previous != session.category,
            "Complaint re-classified after correction"
        );

        let message = if previous != session.category {
            replies::updated_summary(session)
        } else {
            replies::confirmation_summary(session)
        };
        ChatResponse::reply(message, session)
    }

    fn build_payload(session: &ConversationSession) -> ComplaintPayload {
        let description = session.description.clone().unwrap_or_default();
        ComplaintPayload {
            title: ComplaintPayload::title_from(&description),
            transcript: session.raw_text.clone(),
            language: session.language.clone(),
            translated_text: Some(description.clone()),
            category: session.category.map(|c| c.as_str().to_string()),
            subcategory: session.subcategory.clone(),
            department_code: session
                .department_code
                .clone()
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DEPARTMENT_CODE.to_string()),
            source: COMPLAINT_SOURCE_CHATBOT.to_string(),
            metadata: ComplaintMetadata {
                location: session.location.clone(),
                phone: session.phone.clone(),
                intent: Some(session.intent.unwrap_or(Intent::Complaint)),
            },
            description,
        }
    }

    async fn file_complaint(&self, session: &mut ConversationSession) -> ChatResponse {
        let payload = Self::build_payload(session);

        match self.sink.create(payload).await {
            Ok(receipt) => {
                info!(
                    session_id = %session.session_id,
                    reference_number = %receipt.reference_number,
                    "Complaint created"
                );
                let message = replies::filed(session, &receipt.reference_number);
                session.backend_reference = Some(receipt.reference_number.clone());
                ChatResponse {
                    is_ready: true,
                    backend_reference: Some(receipt.reference_number),
                    ..ChatResponse::reply(message, session)
                }
            }
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "Error creating complaint");
                // Confirming again retries the creation.
                session.backend_reference = Some(ERROR_REFERENCE.to_string());
                session.confirmed = false;
                session.awaiting_field = Some(AwaitingField::Confirmation);
                ChatResponse {
                    backend_reference: Some(ERROR_REFERENCE.to_string()),
                    ..ChatResponse::reply(replies::CREATION_FAILED, session)
                }
            }
        }
    }
}
