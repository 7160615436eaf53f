//! End-to-end pipeline tests against a scripted mock backend.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chatterbox_session::{
    BackendError, Device, FailureClass, GenerateRequest, MemoryReclaimer, ModelLoader,
    ModelVariant, RenderError, RenderRequest, RenderRequestBuilder, Session, SessionConfig,
    SpeechModel, VoiceSource,
};
use tempfile::TempDir;

const MOCK_SAMPLE_RATE: u32 = 24_000;

/// One observed `generate` call.
#[derive(Debug, Clone)]
struct Call {
    text: String,
    language: Option<String>,
    prompt: Option<PathBuf>,
}

/// Shared script/observations for the mock backend.
#[derive(Default)]
struct Script {
    loads: usize,
    fail_next_load: bool,
    fail_generate_with: Option<String>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
struct MockBackend {
    script: Rc<RefCell<Script>>,
}

impl MockBackend {
    fn loads(&self) -> usize {
        self.script.borrow().loads
    }

    fn calls(&self) -> Vec<Call> {
        self.script.borrow().calls.clone()
    }
}

struct MockModel {
    script: Rc<RefCell<Script>>,
}

impl SpeechModel for MockModel {
    fn sample_rate(&self) -> u32 {
        MOCK_SAMPLE_RATE
    }

    fn generate(&mut self, request: GenerateRequest<'_>) -> Result<Vec<f32>, BackendError> {
        let mut script = self.script.borrow_mut();
        if let Some(message) = script.fail_generate_with.take() {
            return Err(message.into());
        }
        let language = match request {
            GenerateRequest::Multilingual { language_id, .. } => Some(language_id.to_string()),
            GenerateRequest::Monolingual { .. } => None,
        };
        script.calls.push(Call {
            text: request.text().to_string(),
            language,
            prompt: request.audio_prompt().map(|p| p.to_path_buf()),
        });
        Ok(vec![0.0, 0.5, -0.5, 1.0, -1.0])
    }
}

impl ModelLoader for MockBackend {
    fn load(
        &mut self,
        _variant: ModelVariant,
        _device: Device,
    ) -> Result<Box<dyn SpeechModel>, BackendError> {
        let mut script = self.script.borrow_mut();
        script.loads += 1;
        if script.fail_next_load {
            script.fail_next_load = false;
            return Err("the paging file is too small for this operation".into());
        }
        Ok(Box::new(MockModel {
            script: Rc::clone(&self.script),
        }))
    }
}

#[derive(Clone, Default)]
struct CountingReclaimer {
    passes: Rc<RefCell<usize>>,
}

impl MemoryReclaimer for CountingReclaimer {
    fn release_cached(&self) {
        *self.passes.borrow_mut() += 1;
    }
}

fn request(variant: ModelVariant, text: &str) -> RenderRequest {
    RenderRequestBuilder::default()
        .variant(variant)
        .text(text)
        .build()
        .expect("build request")
}

#[test]
fn standard_render_produces_a_playable_artifact() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    let artifact = session
        .render(&request(ModelVariant::Standard, "Hello world"))
        .expect("render should succeed");

    assert_eq!(artifact.sample_rate(), MOCK_SAMPLE_RATE);
    assert!(artifact.path().exists());
    assert!(!artifact.read_bytes().expect("read artifact").is_empty());

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "Hello world");
    assert_eq!(calls[0].language, None);
    assert_eq!(calls[0].prompt, None);
}

#[test]
fn same_variant_loads_once_per_session() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    session
        .render(&request(ModelVariant::Turbo, "first"))
        .expect("first render");
    session
        .render(&request(ModelVariant::Turbo, "second"))
        .expect("second render");

    assert_eq!(backend.loads(), 1);
    assert_eq!(session.loaded_variants(), vec![ModelVariant::Turbo]);
}

#[test]
fn variant_switch_keeps_both_models_resident() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    session
        .render(&request(ModelVariant::Standard, "english"))
        .expect("standard render");
    session
        .render(&request(ModelVariant::Multilingual, "français"))
        .expect("multilingual render");

    assert_eq!(backend.loads(), 2);
    assert_eq!(
        session.loaded_variants(),
        vec![ModelVariant::Multilingual, ModelVariant::Standard]
    );
}

#[test]
fn empty_text_never_reaches_the_loader() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    let err = session
        .render(&request(ModelVariant::Standard, "   \n\t"))
        .unwrap_err();

    assert!(matches!(err, RenderError::EmptyText));
    assert_eq!(backend.loads(), 0);
    assert!(session.last_output().is_none());
}

#[test]
fn failed_load_is_not_cached_and_is_retried() {
    let backend = MockBackend::default();
    backend.script.borrow_mut().fail_next_load = true;
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    let err = session
        .render(&request(ModelVariant::Standard, "Hello"))
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::ModelLoad {
            variant: ModelVariant::Standard,
            ..
        }
    ));
    assert!(session.loaded_variants().is_empty());

    session
        .render(&request(ModelVariant::Standard, "Hello"))
        .expect("retry should load and render");
    assert_eq!(backend.loads(), 2);
}

#[test]
fn multilingual_passes_language_and_library_voice() {
    let speakers = TempDir::new().expect("create speakers dir");
    std::fs::write(speakers.path().join("alice.wav"), b"riff").expect("write voice");

    let backend = MockBackend::default();
    let mut session = Session::new(
        backend.clone(),
        SessionConfig {
            speakers_dir: speakers.path().to_path_buf(),
            device: Device::Cpu,
        },
    );

    let request = RenderRequestBuilder::default()
        .variant(ModelVariant::Multilingual)
        .text("Bonjour, comment ça va?")
        .language("fr")
        .voice(VoiceSource::Library("alice.wav".to_string()))
        .build()
        .expect("build request");

    session.render(&request).expect("render");

    let calls = backend.calls();
    assert_eq!(calls[0].language.as_deref(), Some("fr"));
    assert_eq!(
        calls[0].prompt.as_deref(),
        Some(speakers.path().join("alice.wav").as_path())
    );
}

#[test]
fn stale_library_selection_fails_before_any_load() {
    let speakers = TempDir::new().expect("create speakers dir");
    let backend = MockBackend::default();
    let mut session = Session::new(
        backend.clone(),
        SessionConfig {
            speakers_dir: speakers.path().to_path_buf(),
            device: Device::Cpu,
        },
    );

    let request = RenderRequestBuilder::default()
        .variant(ModelVariant::Standard)
        .text("Hello")
        .voice(VoiceSource::Library("gone.wav".to_string()))
        .build()
        .expect("build request");

    let err = session.render(&request).unwrap_err();
    assert!(matches!(err, RenderError::VoiceNotFound(name) if name == "gone.wav"));
    assert_eq!(backend.loads(), 0);
}

#[test]
fn uploaded_voice_is_persisted_and_passed_through() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    let request = RenderRequestBuilder::default()
        .variant(ModelVariant::Turbo)
        .text("Hi there [chuckle]")
        .voice(VoiceSource::Upload(b"fake reference audio".to_vec()))
        .build()
        .expect("build request");

    session.render(&request).expect("render");

    let calls = backend.calls();
    let prompt = calls[0].prompt.as_ref().expect("prompt should be set");
    assert!(prompt.exists());
    assert_eq!(
        std::fs::read(prompt).expect("read prompt"),
        b"fake reference audio"
    );
}

#[test]
fn last_output_is_replaced_and_the_old_file_deleted() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend, SessionConfig::default());

    let first_path = session
        .render(&request(ModelVariant::Standard, "first"))
        .expect("first render")
        .path()
        .to_path_buf();
    assert!(first_path.exists());

    let second_path = session
        .render(&request(ModelVariant::Standard, "second"))
        .expect("second render")
        .path()
        .to_path_buf();

    assert!(!first_path.exists());
    assert!(second_path.exists());
    assert_eq!(
        session.last_output().expect("last output").path(),
        second_path.as_path()
    );
}

#[test]
fn session_drop_deletes_all_artifacts() {
    let backend = MockBackend::default();
    let mut session = Session::new(backend.clone(), SessionConfig::default());

    let upload = RenderRequestBuilder::default()
        .variant(ModelVariant::Standard)
        .text("Hello")
        .voice(VoiceSource::Upload(b"bytes".to_vec()))
        .build()
        .expect("build request");

    let output_path = session.render(&upload).expect("render").path().to_path_buf();
    let prompt_path = backend.calls()[0].prompt.clone().expect("prompt");
    assert!(output_path.exists());
    assert!(prompt_path.exists());

    drop(session);
    assert!(!output_path.exists());
    assert!(!prompt_path.exists());
}

#[test]
fn reclamation_runs_before_and_after_even_on_failure() {
    let backend = MockBackend::default();
    backend.script.borrow_mut().fail_generate_with =
        Some("CUDA out of memory. Tried to allocate 2.00 GiB".to_string());

    let reclaimer = CountingReclaimer::default();
    let passes = Rc::clone(&reclaimer.passes);
    let mut session =
        Session::new(backend, SessionConfig::default()).with_reclaimer(reclaimer);

    let err = session
        .render(&request(ModelVariant::Standard, "Hello"))
        .unwrap_err();

    assert_eq!(err.failure_class(), Some(FailureClass::DeviceOutOfMemory));
    assert!(err.remediation().expect("hint").contains("Turbo"));
    // Pre-call pass plus the unconditional post-call pass.
    assert_eq!(*passes.borrow(), 2);

    // The session stays usable: the model is cached, generation can succeed now.
    session
        .render(&request(ModelVariant::Standard, "Hello again"))
        .expect("render after failure");
    assert_eq!(*passes.borrow(), 4);
}
