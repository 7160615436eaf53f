//! Renders a short phrase through the session pipeline using a synthetic
//! sine-wave backend, standing in for a real inference runtime.

use std::f32::consts::TAU;
use std::time::Instant;

use chatterbox_session::{
    BackendError, Device, GenerateRequest, ModelLoader, ModelVariant, RenderRequestBuilder,
    Session, SessionConfig, SpeechModel,
};

const SAMPLE_RATE: u32 = 24_000;

/// Produces a 440 Hz tone whose duration scales with the text length.
struct SineModel;

impl SpeechModel for SineModel {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn generate(&mut self, request: GenerateRequest<'_>) -> Result<Vec<f32>, BackendError> {
        let duration_samples = request.text().len() * SAMPLE_RATE as usize / 20;
        Ok((0..duration_samples)
            .map(|i| (TAU * 440.0 * i as f32 / SAMPLE_RATE as f32).sin() * 0.3)
            .collect())
    }
}

struct SineLoader;

impl ModelLoader for SineLoader {
    fn load(
        &mut self,
        variant: ModelVariant,
        device: Device,
    ) -> Result<Box<dyn SpeechModel>, BackendError> {
        println!("Loading {variant} on {device}...");
        Ok(Box::new(SineModel))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut session = Session::new(SineLoader, SessionConfig::default());

    let request = RenderRequestBuilder::default()
        .variant(ModelVariant::Standard)
        .text("Hello! This is the session rendering pipeline.")
        .build()?;

    let start = Instant::now();
    let artifact = session.render(&request)?;
    println!(
        "Rendered {} bytes at {} Hz in {:.2?} -> {}",
        artifact.read_bytes()?.len(),
        artifact.sample_rate(),
        start.elapsed(),
        artifact.path().display()
    );

    // Second render of the same variant reuses the cached model.
    let again = RenderRequestBuilder::default()
        .variant(ModelVariant::Standard)
        .text("Rendered again without reloading the model.")
        .build()?;
    session.render(&again)?;
    println!("Loaded variants: {:?}", session.loaded_variants());

    Ok(())
}
