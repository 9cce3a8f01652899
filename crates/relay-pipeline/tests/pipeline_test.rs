//! End-to-end tests of [`relay_pipeline::RelayPipeline`] with in-memory transports.

use std::sync::{Arc, Once};
use std::time::Duration;

use classifier_client::{ClassifierConfig, InterestProfile, OllamaClassifier, RelevanceClassifier};
use relay_core::{
    Attachment, ChannelInfo, ContentKind, DeliveryOutcome, InboundMessage, Locale, MediaPayload,
    RelayError,
};
use relay_pipeline::{
    CaptionFormatter, ContentResolver, RelayDispatcher, RelayPipeline, RelayStats,
    MAX_CAPTION_CHARS,
};
use tracing_subscriber::{fmt, EnvFilter};

use mock_transport::{MockClassifier, MockFetcher, RecordingDestination};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,relay_pipeline=debug"));
        let _ = fmt().with_env_filter(env_filter).with_test_writer().try_init();
    });
}

fn channel() -> ChannelInfo {
    ChannelInfo::new(-1001234567890)
        .with_username("ai_news")
        .with_title("AI News")
}

fn pipeline(
    classifier: Arc<dyn RelevanceClassifier>,
    destination: &RecordingDestination,
    fetcher: &MockFetcher,
    reupload: bool,
) -> RelayPipeline {
    RelayPipeline::new(
        classifier,
        Arc::new(InterestProfile::new(vec!["AI".to_string()])),
        ContentResolver::new(Arc::new(fetcher.clone()), reupload),
        RelayDispatcher::new(
            Arc::new(destination.clone()),
            CaptionFormatter::new(Locale::Ru),
        ),
        Arc::new(RelayStats::new()),
    )
}

/// **Test: Relevant text post is delivered with attribution.**
///
/// **Setup:** Classifier answers yes; text-only post from `@ai_news`, message id 42.
///
/// **Expected:** `Delivered`; exactly one `send_text` whose body ends with the link to `https://t.me/ai_news/42`.
#[tokio::test]
async fn test_text_match_is_delivered_with_attribution() {
    init_tracing();
    let classifier = MockClassifier::with_verdict(true);
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(vec![1]);
    let pipeline = pipeline(Arc::new(classifier.clone()), &destination, &fetcher, true);

    let message = InboundMessage::new(channel(), 42).with_text("Вышла новая модель GPT");
    let outcome = pipeline.process(&message).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert_eq!(classifier.texts(), vec!["Вышла новая модель GPT".to_string()]);
    let calls = destination.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "send_text");
    let text = calls[0].text.as_deref().unwrap();
    assert!(text.starts_with("<b>Вышла новая модель GPT</b>"));
    assert!(text.ends_with("<a href=\"https://t.me/ai_news/42\">@ai_news</a>"));
}

/// **Test: Photo with classifier HTTP failure is not relevant and nothing is sent.**
///
/// **Setup:** Real `OllamaClassifier` against a mockito endpoint returning 503; photo with caption.
///
/// **Expected:** `NotRelevant`; zero outbound calls and zero downloads.
#[tokio::test]
async fn test_photo_with_classifier_failure_is_not_relevant() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .create_async()
        .await;
    let classifier = OllamaClassifier::new(
        &ClassifierConfig::new(format!("{}/api/generate", server.url()), "llama3")
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(vec![1, 2, 3]);
    let pipeline = pipeline(Arc::new(classifier), &destination, &fetcher, true);

    let message = InboundMessage::new(channel(), 5)
        .with_caption("Новый чип для нейросетей")
        .with_attachment(Attachment::new(ContentKind::Photo, "photo-1"));
    let outcome = pipeline.process(&message).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::NotRelevant);
    assert!(destination.calls().is_empty());
    assert_eq!(fetcher.calls(), 0);
}

/// **Test: Media without text is relevant without asking the classifier.**
#[tokio::test]
async fn test_media_without_text_skips_classifier() {
    init_tracing();
    let classifier = MockClassifier::with_verdict(false);
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(vec![9; 16]);
    let pipeline = pipeline(Arc::new(classifier.clone()), &destination, &fetcher, true);

    let message = InboundMessage::new(channel(), 6)
        .with_attachment(Attachment::new(ContentKind::Photo, "photo-2"));
    let outcome = pipeline.process(&message).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert!(classifier.texts().is_empty());
    let calls = destination.calls();
    assert_eq!(calls[0].method, "send_photo");
    assert!(calls[0].text.as_deref().unwrap().starts_with("<b>📷 Медиа из "));
    assert!(matches!(calls[0].media, Some(MediaPayload::Buffer(_))));
}

/// **Test: Rejected video falls back to text with marker and link.**
///
/// **Setup:** Destination rejects `send_video`; video with caption; classifier yes.
///
/// **Expected:** `FallbackText`; calls are `send_video` then `send_text`; the text carries the
/// attachment-lost marker and the origin link.
#[tokio::test]
async fn test_rejected_video_falls_back_to_text() {
    init_tracing();
    let destination = RecordingDestination::rejecting(&["send_video"]);
    let fetcher = MockFetcher::returning(vec![1; 64]);
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        true,
    );

    let message = InboundMessage::new(channel(), 77)
        .with_caption("Демо нового робота")
        .with_attachment(Attachment::new(ContentKind::Video, "video-1").with_file_name("demo.mp4"));
    let outcome = pipeline.process(&message).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::FallbackText);
    assert_eq!(destination.methods(), vec!["send_video", "send_text"]);
    let fallback = destination.calls()[1].text.clone().unwrap();
    assert!(fallback.starts_with("⚠️ Ошибка вложения\n\n<b>Демо нового робота</b>"));
    assert!(fallback.contains("https://t.me/ai_news/77"));
}

/// **Test: Zero-byte document with caption falls back; without caption it is suppressed.**
#[tokio::test]
async fn test_empty_document_fallback_or_suppressed() {
    init_tracing();
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(Vec::new());
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        true,
    );

    let with_caption = InboundMessage::new(channel(), 8)
        .with_caption("Отчёт по рынку AI")
        .with_attachment(Attachment::new(ContentKind::Document, "doc-1"));
    assert_eq!(
        pipeline.process(&with_caption).await.unwrap(),
        DeliveryOutcome::FallbackText
    );
    assert_eq!(destination.methods(), vec!["send_text"]);

    let without_caption = InboundMessage::new(channel(), 9)
        .with_attachment(Attachment::new(ContentKind::Document, "doc-2"));
    let err = pipeline.process(&without_caption).await.unwrap_err();
    assert!(matches!(
        err,
        RelayError::Suppressed {
            kind: ContentKind::Document,
            ..
        }
    ));
    assert_eq!(destination.methods(), vec!["send_text"]);
}

/// **Test: Download failure degrades to text.**
#[tokio::test]
async fn test_download_failure_degrades() {
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::failing("file is too big");
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        true,
    );
    let message = InboundMessage::new(channel(), 10)
        .with_text("Большое видео про LLM")
        .with_attachment(Attachment::new(ContentKind::Video, "big"));
    assert_eq!(
        pipeline.process(&message).await.unwrap(),
        DeliveryOutcome::FallbackText
    );
    assert_eq!(destination.methods(), vec!["send_text"]);
}

/// **Test: Reference mode relays by file id without downloading.**
#[tokio::test]
async fn test_reference_mode_uses_file_id() {
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(vec![1]);
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        false,
    );
    let message = InboundMessage::new(channel(), 11)
        .with_attachment(Attachment::new(ContentKind::Animation, "gif-1"));
    assert_eq!(
        pipeline.process(&message).await.unwrap(),
        DeliveryOutcome::Delivered
    );
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        destination.calls()[0].media,
        Some(MediaPayload::Reference("gif-1".to_string()))
    );
}

/// **Test: Long captions are clamped to the caption limit.**
#[tokio::test]
async fn test_long_caption_is_clamped() {
    let destination = RecordingDestination::new();
    let fetcher = MockFetcher::returning(vec![1]);
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        false,
    );
    let message = InboundMessage::new(channel(), 12)
        .with_caption("ИИ ".repeat(800))
        .with_attachment(Attachment::new(ContentKind::Photo, "p"));
    pipeline.process(&message).await.unwrap();
    let caption = destination.calls()[0].text.clone().unwrap();
    assert!(caption.chars().count() <= MAX_CAPTION_CHARS);
    assert!(caption.ends_with("@ai_news</a>"));
}

/// **Test: `handle` never propagates and updates the counters.**
#[tokio::test]
async fn test_handle_updates_stats() {
    let destination = RecordingDestination::rejecting(&["send_text"]);
    let fetcher = MockFetcher::returning(vec![1]);
    let pipeline = pipeline(
        Arc::new(MockClassifier::with_verdict(true)),
        &destination,
        &fetcher,
        false,
    );
    pipeline
        .handle(InboundMessage::new(channel(), 13).with_text("AI"))
        .await;
    pipeline
        .handle(InboundMessage::new(channel(), 14).with_attachment(Attachment::new(ContentKind::Sticker, "s")))
        .await;

    let snapshot = pipeline.stats().snapshot();
    assert_eq!(snapshot.received, 2);
    assert_eq!(snapshot.suppressed, 1);
    assert_eq!(snapshot.delivered, 1);
}
