//! End-to-end chat flows against in-memory collaborators.

use std::sync::Arc;

use database::Database;
use intake::{
    detect_intent, replies, validate_description, validate_phone, AwaitingField, ChatOrchestrator,
    ChatRequest, ChatResponse, ChatState, ConversationSession, DatabaseComplaintSink,
    DatabaseDirectory, IntentTag, MemorySessionStore, SessionStore, TextClassifier, UserFields,
};
use intake::IntakeError;
use mock_services::{
    async_trait, Category, ClassificationResult, ComplaintSink, DelayedClassifier,
    FailingClassifier, FailingComplaintSink, FailingDirectory, FailingTranslator, FailureMode,
    FixedLanguageDetector, IdentityTranslator, Intent, MemoryComplaintSink, ScriptedClassifier,
    ServiceError, StaticClassifier, Translator,
};
use regex::Regex;

const COMPLAINT: &str = "There is a huge pile of garbage rotting near my house";

fn keyword_orchestrator(sink: Arc<dyn ComplaintSink>) -> ChatOrchestrator {
    ChatOrchestrator::new(TextClassifier::keyword_only(), sink)
}

async fn send(orchestrator: &ChatOrchestrator, session_id: &str, text: &str) -> ChatResponse {
    orchestrator.handle(ChatRequest::new(session_id, text)).await
}

fn assert_reference(reference: Option<&str>) {
    let pattern = Regex::new(r"^COMP-\d{6}$").unwrap();
    let reference = reference.expect("backend reference");
    assert!(pattern.is_match(reference), "unexpected reference {}", reference);
}

#[tokio::test]
async fn test_end_to_end_with_keyword_fallback() {
    let sink = Arc::new(MemoryComplaintSink::new());
    let orchestrator = keyword_orchestrator(sink.clone());

    let first = send(&orchestrator, "e2e", COMPLAINT).await;
    assert_eq!(first.message, replies::question(AwaitingField::Phone));
    assert_eq!(first.missing_fields, vec!["user.phone", "location"]);

    let second = send(&orchestrator, "e2e", "9876543210").await;
    assert_eq!(second.message, replies::question(AwaitingField::Location));
    assert_eq!(second.missing_fields, vec!["location"]);

    let third = send(&orchestrator, "e2e", "MG Road, Blr").await;
    assert!(third.message.starts_with("Please review your complaint:"));
    assert!(third.message.contains("Category: Sanitation"));
    assert!(!third.is_ready);

    let last = send(&orchestrator, "e2e", "yes").await;
    assert!(last.is_ready);
    assert_eq!(last.context["category"], "Sanitation");
    assert_reference(last.backend_reference.as_deref());
    assert!(last.message.starts_with("✅ Your complaint has been filed successfully!"));

    let payloads = sink.payloads().await;
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.department_code, "BBMP");
    assert_eq!(payload.source, "chatbot");
    assert_eq!(payload.title, COMPLAINT);
    assert_eq!(payload.metadata.phone.as_deref(), Some("9876543210"));
    assert_eq!(payload.metadata.location.as_deref(), Some("MG Road, Blr"));
    assert_eq!(payload.metadata.intent, Some(Intent::Complaint));
}

#[tokio::test]
async fn test_end_to_end_against_sqlite() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    let orchestrator = keyword_orchestrator(Arc::new(DatabaseComplaintSink::new(db.clone())))
        .with_directory(Arc::new(DatabaseDirectory::new(db.clone())));

    for text in [COMPLAINT, "987-654-3210", "MG Road, Blr"] {
        send(&orchestrator, "db", text).await;
    }
    let last = send(&orchestrator, "db", "YES").await;

    assert!(last.is_ready);
    assert_reference(last.backend_reference.as_deref());
    let stored = database::complaint::get_complaint_by_reference(
        db.pool(),
        last.backend_reference.as_deref().unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(stored.department_code, "BBMP");
    assert_eq!(stored.category.as_deref(), Some("Sanitation"));
    assert_eq!(stored.metadata_json().unwrap()["phone"], "9876543210");
}

#[tokio::test]
async fn test_classification_total_under_model_failure() {
    for mode in [FailureMode::Network, FailureMode::Timeout, FailureMode::MalformedOutput] {
        let classifier = TextClassifier::new(Arc::new(FailingClassifier::with_mode(mode)));
        for text in [COMPLAINT, "streetlight not working", "my neighbour plays music", ""] {
            let result = classifier.classify(text).await;
            assert!(Category::ALL.contains(&result.category));
            assert!(Intent::ALL.contains(&result.intent));
            assert!(!result.subcategory.is_empty());
            assert!(!result.place.is_empty());
            assert!(!result.department.is_empty());
        }
    }

    let classifier = TextClassifier::new(Arc::new(FailingClassifier::new()));
    let result = classifier.classify(COMPLAINT).await;
    assert_eq!(result.category, Category::Sanitation);
    assert_eq!(result.intent, Intent::Complaint);
}

#[test]
fn test_validators() {
    assert!(validate_phone("987-654-3210"));
    assert!(validate_phone("9876543210"));
    assert!(validate_phone("(987) 654 3210"));
    assert!(!validate_phone("98765"));
    assert!(!validate_phone("98765432101"));

    assert!(validate_description("hi").is_err());
    assert!(validate_description("ok ok ok").is_err());
    assert_eq!(validate_description("There is garbage on my street"), Ok(()));
}

#[tokio::test]
async fn test_phone_is_asked_before_location() {
    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()));

    let response = orchestrator
        .handle(ChatRequest::new("order", COMPLAINT).with_user(UserFields {
            phone: None,
            location: None,
        }))
        .await;
    assert_eq!(response.message, replies::question(AwaitingField::Phone));

    let session = orchestrator.store().get("order").await.unwrap().unwrap();
    assert!(session.department_code.is_some());
    assert!(session.phone.is_none() && session.location.is_none());
    assert_eq!(session.awaiting_field, Some(AwaitingField::Phone));
}

#[tokio::test]
async fn test_caller_supplied_fields_skip_questions() {
    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()));

    let response = orchestrator
        .handle(ChatRequest::new("prefill", COMPLAINT).with_user(UserFields {
            phone: Some("(987) 654-3210".to_string()),
            location: None,
        }))
        .await;
    assert_eq!(response.message, replies::question(AwaitingField::Location));

    let response = orchestrator
        .handle(ChatRequest::new("bad-prefill", COMPLAINT).with_user(UserFields {
            phone: Some("12345".to_string()),
            location: Some("Indiranagar".to_string()),
        }))
        .await;
    assert_eq!(response.message, replies::question(AwaitingField::Phone));
    assert_eq!(response.missing_fields, vec!["user.phone"]);

    // Short caller locations are accepted as given; blank ones are ignored.
    let response = orchestrator
        .handle(ChatRequest::new("short-prefill", COMPLAINT).with_user(UserFields {
            phone: Some("9876543210".to_string()),
            location: Some(" B1 ".to_string()),
        }))
        .await;
    assert!(response.message.starts_with("Please review your complaint:"));
    let session = orchestrator.store().get("short-prefill").await.unwrap().unwrap();
    assert_eq!(session.location.as_deref(), Some("B1"));

    let response = orchestrator
        .handle(ChatRequest::new("blank-prefill", COMPLAINT).with_user(UserFields {
            phone: Some("9876543210".to_string()),
            location: Some("   ".to_string()),
        }))
        .await;
    assert_eq!(response.message, replies::question(AwaitingField::Location));
}

#[tokio::test]
async fn test_invalid_answers_keep_state() {
    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()));
    send(&orchestrator, "s", COMPLAINT).await;

    let response = send(&orchestrator, "s", "98765").await;
    assert_eq!(response.message, replies::INVALID_PHONE);
    assert_eq!(response.missing_fields, vec!["user.phone"]);

    send(&orchestrator, "s", "9876543210").await;
    let response = send(&orchestrator, "s", "ab").await;
    assert_eq!(response.message, replies::INVALID_LOCATION);

    let session = orchestrator.store().get("s").await.unwrap().unwrap();
    assert_eq!(session.phone.as_deref(), Some("9876543210"));
    assert_eq!(session.state(), ChatState::Collecting(AwaitingField::Location));
}

#[tokio::test]
async fn test_confirmation_loop_reclassifies() {
    let classifier = Arc::new(
        ScriptedClassifier::new()
            .on(
                "dead dog",
                ClassificationResult::for_category(Category::Sanitation, Intent::Complaint),
            )
            .on(
                "water",
                ClassificationResult::for_category(Category::WaterSupply, Intent::Complaint),
            ),
    );
    let orchestrator = ChatOrchestrator::new(
        TextClassifier::new(classifier.clone()),
        Arc::new(MemoryComplaintSink::new()),
    );

    send(&orchestrator, "loop", "No water supply in our lane since morning").await;
    send(&orchestrator, "loop", "9876543210").await;
    let summary = send(&orchestrator, "loop", "5th Cross, Jayanagar").await;
    assert!(summary.message.contains("Category: Water Supply"));

    let updated = send(&orchestrator, "loop", "actually it's worse, there's also a dead dog").await;
    assert!(updated.message.contains("Sanitation (updated)"));
    assert!(!updated.is_ready);
    assert_eq!(classifier.calls(), 2);

    let session = orchestrator.store().get("loop").await.unwrap().unwrap();
    assert!(session
        .description
        .as_deref()
        .unwrap()
        .ends_with("\nUser added: actually it's worse, there's also a dead dog"));
    assert_eq!(session.category, Some(Category::Sanitation));
    assert_eq!(session.department_code.as_deref(), Some("BBMP"));
    assert_eq!(session.state(), ChatState::Confirming);

    // A correction that does not change the category re-shows the plain summary.
    let same = send(&orchestrator, "loop", "it smells terrible").await;
    assert!(same.message.starts_with("Please review your complaint:"));

    let done = send(&orchestrator, "loop", "yes").await;
    assert!(done.is_ready);
    assert_reference(done.backend_reference.as_deref());
}

#[tokio::test]
async fn test_dead_animal_rule_overrides_model() {
    let model = StaticClassifier::new(ClassificationResult::for_category(
        Category::Roads,
        Intent::Complaint,
    ));
    let orchestrator =
        ChatOrchestrator::new(TextClassifier::new(Arc::new(model)), Arc::new(MemoryComplaintSink::new()));

    send(&orchestrator, "animal", "A dead cow is lying in the middle of the road").await;
    let session = orchestrator.store().get("animal").await.unwrap().unwrap();
    assert_eq!(session.category, Some(Category::Sanitation));
    assert_eq!(session.department_code.as_deref(), Some("BBMP"));
}

#[tokio::test]
async fn test_greeting_short_circuits() {
    assert_eq!(detect_intent("hi"), IntentTag::Greeting);

    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()));
    for text in ["hi", "Thank you!", "hmm"] {
        let response = send(&orchestrator, "greet", text).await;
        assert!(!response.is_ready);
        assert!(response.missing_fields.is_empty());
    }
    let session = orchestrator.store().get("greet").await.unwrap().unwrap();
    assert!(session.description.is_none());
    assert_eq!(session.state(), ChatState::Fresh);
}

#[tokio::test]
async fn test_non_complaint_replies_use_model_intent() {
    let model = Arc::new(StaticClassifier::new(ClassificationResult::for_category(
        Category::Other,
        Intent::Query,
    )));
    let orchestrator =
        ChatOrchestrator::new(TextClassifier::new(model.clone()), Arc::new(MemoryComplaintSink::new()));

    let response = send(&orchestrator, "q", "What is the status of my complaint").await;
    assert_eq!(response.message, replies::STATUS_QUERY);

    // Detected as a suggestion, but the model reads it as a query.
    let response = send(&orchestrator, "q", "The park would be better with more benches").await;
    assert_eq!(response.message, replies::QUERY);
    assert_eq!(model.calls(), 2);

    let keyword_only = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()));
    let response = send(&keyword_only, "r", "The park would be better with more benches").await;
    assert_eq!(response.message, replies::SUGGESTION);
    let response = send(&keyword_only, "r", "I need a birth certificate form").await;
    assert_eq!(response.message, replies::REQUEST);
}

#[tokio::test]
async fn test_status_lookup_in_chat() {
    let sink = Arc::new(MemoryComplaintSink::new());
    let orchestrator = keyword_orchestrator(sink.clone());

    for text in [COMPLAINT, "9876543210", "MG Road, Blr"] {
        send(&orchestrator, "filer", text).await;
    }
    let filed = send(&orchestrator, "filer", "yes").await;
    let reference = filed.backend_reference.unwrap();

    let response = send(&orchestrator, "other", &format!("status of {}", reference.to_lowercase())).await;
    assert_eq!(response.message, replies::complaint_status(&reference, "new"));

    let response = send(&orchestrator, "other", "what about COMP-000000?").await;
    assert_eq!(response.message, replies::complaint_not_found("COMP-000000"));
}

#[tokio::test]
async fn test_status_lookup_when_sink_unreachable() {
    let orchestrator = keyword_orchestrator(Arc::new(FailingComplaintSink::new()));

    let response = send(&orchestrator, "lookup", "status of COMP-123456?").await;
    assert_eq!(response.message, replies::STATUS_UNAVAILABLE);
    assert!(!response.is_ready);

    let session = orchestrator.store().get("lookup").await.unwrap().unwrap();
    assert_eq!(session.state(), ChatState::Fresh);
}

#[tokio::test]
async fn test_creation_failure_is_reported_and_retryable() {
    let sink = Arc::new(FailingComplaintSink::new());
    let orchestrator = keyword_orchestrator(sink.clone());

    for text in [COMPLAINT, "9876543210", "MG Road, Blr"] {
        send(&orchestrator, "fail", text).await;
    }
    let response = send(&orchestrator, "fail", "yes").await;
    assert_eq!(response.message, replies::CREATION_FAILED);
    assert!(!response.is_ready);
    assert_eq!(response.backend_reference.as_deref(), Some("ERROR"));

    let session = orchestrator.store().get("fail").await.unwrap().unwrap();
    assert_eq!(session.backend_reference.as_deref(), Some("ERROR"));
    assert_eq!(session.state(), ChatState::Confirming);

    send(&orchestrator, "fail", "yes").await;
    assert_eq!(sink.attempts(), 2);
}

#[tokio::test]
async fn test_filed_session_starts_new_complaint() {
    let sink = Arc::new(MemoryComplaintSink::new());
    let orchestrator = keyword_orchestrator(sink.clone());

    for text in [COMPLAINT, "9876543210", "MG Road, Blr", "yes"] {
        send(&orchestrator, "again", text).await;
    }

    let response = send(&orchestrator, "again", "Streetlight on 3rd Main is not working").await;
    assert_eq!(response.message, replies::question(AwaitingField::Location));

    let session = orchestrator.store().get("again").await.unwrap().unwrap();
    assert_eq!(session.phone.as_deref(), Some("9876543210"));
    assert_eq!(session.category, Some(Category::StreetLighting));
    assert!(session.backend_reference.is_none());
}

#[tokio::test]
async fn test_language_and_translation() {
    struct BlankTranslator;

    #[async_trait]
    impl Translator for BlankTranslator {
        async fn translate(&self, _text: &str, _target: &str) -> Result<String, ServiceError> {
            Ok(String::new())
        }
    }

    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()))
        .with_translator(Arc::new(BlankTranslator))
        .with_language_detector(Arc::new(FixedLanguageDetector::failing()));

    send(&orchestrator, "lang", COMPLAINT).await;
    let session = orchestrator.store().get("lang").await.unwrap().unwrap();
    assert_eq!(session.language.as_deref(), Some("unknown"));
    assert_eq!(session.description.as_deref(), Some(COMPLAINT));
    assert_eq!(session.raw_text.as_deref(), Some(COMPLAINT));
}

#[tokio::test]
async fn test_same_session_turns_are_serialized() {
    let store = Arc::new(MemorySessionStore::new());
    let classifier = DelayedClassifier::with_millis(
        StaticClassifier::new(ClassificationResult::for_category(
            Category::Sanitation,
            Intent::Complaint,
        )),
        50,
    );
    let orchestrator = ChatOrchestrator::new(
        TextClassifier::new(Arc::new(classifier)),
        Arc::new(MemoryComplaintSink::new()),
    )
    .with_store(store.clone());

    let (a, b) = tokio::join!(
        send(&orchestrator, "race", COMPLAINT),
        send(&orchestrator, "race", "Another pile of garbage near the school")
    );

    // One turn captured the description; the other was read as the phone answer.
    let mut messages = vec![a.message, b.message];
    messages.sort();
    let mut expected = vec![
        replies::question(AwaitingField::Phone).to_string(),
        replies::INVALID_PHONE.to_string(),
    ];
    expected.sort();
    assert_eq!(messages, expected);
    assert_eq!(store.version("race").await, Some(2));

    let session: ConversationSession = store.get("race").await.unwrap().unwrap();
    assert_eq!(session.awaiting_field, Some(AwaitingField::Phone));
}

#[tokio::test]
async fn test_directory_outage_falls_back_to_static_table() {
    let sink = Arc::new(MemoryComplaintSink::new());
    let orchestrator = keyword_orchestrator(sink.clone()).with_directory(Arc::new(FailingDirectory));

    for text in [COMPLAINT, "9876543210", "MG Road, Blr"] {
        send(&orchestrator, "offline-dir", text).await;
    }
    let last = send(&orchestrator, "offline-dir", "yes").await;
    assert!(last.is_ready);

    let payloads = sink.payloads().await;
    assert_eq!(payloads[0].department_code, "BBMP");
}

#[tokio::test]
async fn test_translation_failure_keeps_original_text() {
    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()))
        .with_translator(Arc::new(FailingTranslator))
        .with_language_detector(Arc::new(FixedLanguageDetector::new("kn")));

    let response = send(&orchestrator, "translate-down", COMPLAINT).await;
    assert_eq!(response.message, replies::question(AwaitingField::Phone));

    let session = orchestrator.store().get("translate-down").await.unwrap().unwrap();
    assert_eq!(session.language.as_deref(), Some("kn"));
    assert_eq!(session.description.as_deref(), Some(COMPLAINT));
    assert_eq!(session.category, Some(Category::Sanitation));

    let identity = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()))
        .with_translator(Arc::new(IdentityTranslator));
    send(&identity, "translate-up", COMPLAINT).await;
    let session = identity.store().get("translate-up").await.unwrap().unwrap();
    assert_eq!(session.description.as_deref(), Some(COMPLAINT));
    assert_eq!(session.language.as_deref(), Some("en"));
}

/// A store whose backend rejects every call.
struct UnreachableStore;

#[async_trait]
impl SessionStore for UnreachableStore {
    async fn get(&self, _session_id: &str) -> Result<Option<ConversationSession>, IntakeError> {
        Err(ServiceError::Unavailable("session store offline".to_string()).into())
    }

    async fn put(&self, _session: &ConversationSession) -> Result<u64, IntakeError> {
        Err(ServiceError::Unavailable("session store offline".to_string()).into())
    }

    async fn delete(&self, _session_id: &str) -> Result<(), IntakeError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_session_store_outage_still_answers() {
    let orchestrator = keyword_orchestrator(Arc::new(MemoryComplaintSink::new()))
        .with_store(Arc::new(UnreachableStore));

    // Each turn starts fresh, so a complaint always gets the first question.
    let response = send(&orchestrator, "no-store", COMPLAINT).await;
    assert_eq!(response.message, replies::question(AwaitingField::Phone));
    assert_eq!(response.missing_fields, vec!["user.phone", "location"]);

    let response = send(&orchestrator, "no-store", "hi").await;
    assert_eq!(response.message, replies::GREETING);
}
