use serde::{Deserialize, Serialize};

use chartbench_core::{EngineMode, Specification};

use crate::error::EngineError;
use crate::snapshot::{RasterImage, SnapshotOptions};
use crate::surface::{SurfaceBox, SurfaceId};

/// Factory for engine instances bound to a surface.
pub trait RenderBackend {
    type Instance: EngineInstance;

    /// Create an instance with the given theme and backend baked in.
    fn instantiate(
        &mut self,
        surface: &SurfaceBox,
        mode: EngineMode,
    ) -> Result<Self::Instance, EngineError>;
}

/// A live, stateful rendering object.
pub trait EngineInstance {
    /// Replace the instance's visual content with `spec`. Last write wins.
    fn set_specification(&mut self, spec: &Specification) -> Result<(), EngineError>;

    /// The surface's pixel box changed.
    fn resize(&mut self, surface: &SurfaceBox);

    fn snapshot(&self, options: &SnapshotOptions) -> Result<RasterImage, EngineError>;

    /// Release native resources. Called exactly once, by [`LiveInstance`].
    fn dispose(&mut self);
}

/// Identifies one instance generation on one surface.
///
/// A handle stops resolving as soon as its instance is disposed, so a caller
/// holding an old one gets `None` instead of a dangling instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineHandle {
    pub surface: SurfaceId,
    pub generation: u64,
}

/// Scoped ownership of an engine instance: disposed on drop, on every path.
#[derive(Debug)]
pub struct LiveInstance<I: EngineInstance> {
    instance: I,
    handle: EngineHandle,
    mode: EngineMode,
}

impl<I: EngineInstance> LiveInstance<I> {
    pub fn new(instance: I, handle: EngineHandle, mode: EngineMode) -> Self {
        log::debug!(
            "Engine instance {} created on surface {} ({:?})",
            handle.generation,
            handle.surface,
            mode
        );
        Self {
            instance,
            handle,
            mode,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn get(&self) -> &I {
        &self.instance
    }

    pub fn get_mut(&mut self) -> &mut I {
        &mut self.instance
    }

    /// Dispose now rather than at end of scope.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<I: EngineInstance> Drop for LiveInstance<I> {
    fn drop(&mut self) {
        log::debug!(
            "Disposing engine instance {} on surface {}",
            self.handle.generation,
            self.handle.surface
        );
        self.instance.dispose();
    }
}
