//! Session-scoped model cache.
//!
//! Loading a variant's weights dominates end-to-end latency, so each session
//! pays it at most once per variant: the first `acquire` loads and stores the
//! handle, every later one returns it untouched. Switching variants does not
//! evict what is already resident: multiple variants may coexist, bounded
//! only by available memory.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use crate::backend::{Device, ModelLoader, SpeechModel};
use crate::error::RenderError;
use crate::variant::ModelVariant;

#[derive(Default)]
pub struct ModelCache {
    models: HashMap<ModelVariant, Box<dyn SpeechModel>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached handle for `variant`, loading it first if this is
    /// the variant's first use in the session.
    ///
    /// On load failure nothing is cached (no partial handle is ever stored)
    /// and the next `acquire` for the same variant retries the load.
    pub fn acquire(
        &mut self,
        variant: ModelVariant,
        loader: &mut dyn ModelLoader,
        device: Device,
    ) -> Result<&mut dyn SpeechModel, RenderError> {
        match self.models.entry(variant) {
            Entry::Occupied(entry) => {
                log::debug!("{variant} already resident, reusing handle");
                Ok(entry.into_mut().as_mut())
            }
            Entry::Vacant(entry) => {
                log::info!("loading {variant} on {device} (first use this session)");
                let start = Instant::now();
                let model = loader
                    .load(variant, device)
                    .map_err(|source| RenderError::ModelLoad { variant, source })?;
                log::info!("{variant} loaded in {:.2?}", start.elapsed());
                Ok(entry.insert(model).as_mut())
            }
        }
    }

    pub fn is_loaded(&self, variant: ModelVariant) -> bool {
        self.models.contains_key(&variant)
    }

    /// Variants currently resident, in presentation order.
    pub fn loaded_variants(&self) -> Vec<ModelVariant> {
        ModelVariant::ALL
            .into_iter()
            .filter(|v| self.models.contains_key(v))
            .collect()
    }
}
