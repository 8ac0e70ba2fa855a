//! Test Helper Utilities
//!
//! Scriptable fakes for every external AI client, plus a builder that
//! bundles them into `AiClients`. Each fake counts its calls so tests can
//! assert which services a request reached.

#![allow(dead_code)]

use async_trait::async_trait;
use kalakar_ai::clients::{
    AiClients, ClientError, ResponseFormat, SpeechToText, TextGenerator, TextToSpeech, Translator,
    VisionAnnotation, VisionClient,
};
use kalakar_ai::models::{DetectedObject, DominantColor, ImageSource, ScoredLabel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted reply: `Ok(text)` or a failure with this message
pub type Reply = Result<String, String>;

fn unavailable(service: &'static str, message: &str) -> ClientError {
    ClientError::Api {
        service,
        status: 503,
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

/// Answers every image with the same annotation, or fails
pub struct FakeVision {
    annotation: Option<VisionAnnotation>,
    /// Zero-based call indexes that fail even when an annotation is set
    failing_calls: Vec<usize>,
    calls: AtomicUsize,
}

impl FakeVision {
    pub fn with_annotation(annotation: VisionAnnotation) -> Self {
        Self {
            annotation: Some(annotation),
            failing_calls: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            annotation: None,
            failing_calls: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_calls(mut self, calls: &[usize]) -> Self {
        self.failing_calls = calls.to_vec();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for FakeVision {
    async fn annotate(&self, _image: &ImageSource) -> Result<VisionAnnotation, ClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_calls.contains(&call) {
            return Err(unavailable("Vision", "scripted failure"));
        }
        self.annotation
            .clone()
            .ok_or_else(|| unavailable("Vision", "vision offline"))
    }
}

/// Annotation of a blue pottery vase
pub fn pottery_annotation() -> VisionAnnotation {
    VisionAnnotation {
        labels: vec![
            ScoredLabel {
                description: "Pottery".into(),
                score: 0.95,
            },
            ScoredLabel {
                description: "Ceramic".into(),
                score: 0.9,
            },
            ScoredLabel {
                description: "Handmade".into(),
                score: 0.82,
            },
        ],
        objects: vec![DetectedObject {
            name: "Vase".into(),
            score: 0.88,
        }],
        text: vec!["Khurja".into()],
        colors: vec![DominantColor {
            color: "#1f4e9c".into(),
            score: 0.6,
        }],
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Which pipeline step a prompt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Listing,
    Story,
    Intent,
    Command,
    Other,
}

pub fn classify_prompt(prompt: &str) -> PromptKind {
    if prompt.starts_with("Create a compelling product listing") {
        PromptKind::Listing
    } else if prompt.starts_with("Create a compelling cultural story") {
        PromptKind::Story
    } else if prompt.contains("Process the following user input") {
        PromptKind::Intent
    } else if prompt.starts_with("Analyze this voice command") {
        PromptKind::Command
    } else {
        PromptKind::Other
    }
}

/// Generator answering each prompt kind with its scripted reply
///
/// Unscripted kinds fail.
pub struct FakeGenerator {
    replies: Mutex<Vec<(PromptKind, Reply)>>,
    prompts: Mutex<Vec<(PromptKind, String)>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, kind: PromptKind, reply: Reply) -> Self {
        self.replies.lock().unwrap().push((kind, reply));
        self
    }

    /// Total calls
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn calls_of(&self, kind: PromptKind) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn prompts_of(&self, kind: PromptKind) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _format: ResponseFormat) -> Result<String, ClientError> {
        let kind = classify_prompt(prompt);
        self.prompts.lock().unwrap().push((kind, prompt.to_string()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(unavailable("Gemini", &message)),
            None => Err(unavailable("Gemini", "no scripted reply")),
        }
    }
}

/// Well-formed listing draft as the generator would return it
pub const LISTING_JSON: &str = r#"```json
{
  "title": "Khurja Blue Pottery Vase",
  "description": "A handmade vase thrown on the wheel and glazed in cobalt blue by artisans of Khurja.",
  "culturalSignificance": "Khurja pottery has been made in Uttar Pradesh for centuries.",
  "materials": ["clay", "cobalt oxide"],
  "techniques": ["wheel throwing", "hand painting"],
  "category": "Home Decor",
  "subcategory": "Vases",
  "tags": ["blue pottery", "vase", "khurja"],
  "suggestedPrice": 1450
}
```"#;

pub const STORY_TEXT: &str = "In the lanes of Khurja, potters have shaped river clay for generations.";

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

pub struct FakeSpeech {
    reply: Reply,
    calls: AtomicUsize,
    locales: Mutex<Vec<String>>,
}

impl FakeSpeech {
    pub fn transcript(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            locales: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err("speech offline".to_string()),
            calls: AtomicUsize::new(0),
            locales: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechToText for FakeSpeech {
    async fn transcribe(&self, _audio: &[u8], locale: &str) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.locales.lock().unwrap().push(locale.to_string());
        self.reply
            .clone()
            .map_err(|message| unavailable("Speech", &message))
    }
}

pub struct FakeTts {
    audio: Option<Vec<u8>>,
    calls: AtomicUsize,
    voices: Mutex<Vec<String>>,
}

impl FakeTts {
    pub fn with_audio(audio: &[u8]) -> Self {
        Self {
            audio: Some(audio.to_vec()),
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn voices(&self) -> Vec<String> {
        self.voices.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextToSpeech for FakeTts {
    async fn synthesize(&self, _text: &str, _locale: &str, voice: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.voices.lock().unwrap().push(voice.to_string());
        self.audio
            .clone()
            .ok_or_else(|| unavailable("TextToSpeech", "tts offline"))
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Prefixes the text with the target language
pub struct FakeTranslator {
    calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", target, text))
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Fakes kept alongside the `AiClients` built from them
pub struct TestClients {
    pub vision: Arc<FakeVision>,
    pub generator: Arc<FakeGenerator>,
    pub speech: Arc<FakeSpeech>,
    pub tts: Arc<FakeTts>,
    pub translator: Arc<FakeTranslator>,
}

impl TestClients {
    /// Every service healthy with the pottery fixtures
    pub fn healthy() -> Self {
        Self {
            vision: Arc::new(FakeVision::with_annotation(pottery_annotation())),
            generator: Arc::new(
                FakeGenerator::new()
                    .reply(PromptKind::Listing, Ok(LISTING_JSON.to_string()))
                    .reply(PromptKind::Story, Ok(STORY_TEXT.to_string())),
            ),
            speech: Arc::new(FakeSpeech::transcript("This vase is painted by hand")),
            tts: Arc::new(FakeTts::with_audio(b"ID3-mp3")),
            translator: Arc::new(FakeTranslator::new()),
        }
    }

    pub fn vision(mut self, vision: FakeVision) -> Self {
        self.vision = Arc::new(vision);
        self
    }

    pub fn generator(mut self, generator: FakeGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn speech(mut self, speech: FakeSpeech) -> Self {
        self.speech = Arc::new(speech);
        self
    }

    pub fn tts(mut self, tts: FakeTts) -> Self {
        self.tts = Arc::new(tts);
        self
    }

    pub fn ai_clients(&self) -> AiClients {
        AiClients {
            vision: self.vision.clone(),
            generator: self.generator.clone(),
            speech: self.speech.clone(),
            tts: self.tts.clone(),
            translator: self.translator.clone(),
        }
    }
}

/// Single inline JPEG-tagged image
pub fn inline_image() -> ImageSource {
    ImageSource::Inline {
        mime_type: "image/jpeg".into(),
        data: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}
