// ============================================================
// Layer 5 - MlContext
// ============================================================
// One explicitly constructed value carrying the random seed and
// the Burn device. It is created once by the application layer and
// passed by reference to every stage that fits or loads anything.

use crate::ml::InferBackend;
use burn::prelude::Backend;

pub type Device = <InferBackend as Backend>::Device;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct MlContext {
    seed:   u64,
    device: Device,
}

impl MlContext {
    pub fn new(seed: u64) -> Self {
        Self { seed, device: Device::default() }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Default for MlContext {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
