use std::rc::Rc;
use std::time::Instant;

use chartbench_core::{
    plan_transition, Backend, Clock, EngineMode, Metrics, ModeTransition, RenderMode,
    Specification, Theme,
};

use crate::engine::{EngineHandle, EngineInstance, LiveInstance, RenderBackend};
use crate::error::EngineError;
use crate::surface::SurfaceBox;

/// Outcome of an apply that reached a live instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyReport {
    /// The instance now showing the specification. Supersedes earlier handles.
    pub handle: EngineHandle,
    pub metrics: Metrics,
    pub transition: ModeTransition,
}

/// Keeps exactly one live engine instance in step with the latest
/// `(Specification, RenderMode)` pair.
///
/// Calls made before a surface is attached are accepted and do nothing.
/// Every apply runs to completion, including any dispose-then-create, before
/// it returns, so two instances are never live at once.
pub struct RenderController<B: RenderBackend> {
    backend: B,
    clock: Rc<dyn Clock>,
    surface: Option<SurfaceBox>,
    live: Option<LiveInstance<B::Instance>>,
    mode: RenderMode,
    /// Last spec handed to `apply`, before mode folding.
    last_spec: Option<Specification>,
    generation: u64,
}

impl<B: RenderBackend> RenderController<B> {
    pub fn new(backend: B, clock: Rc<dyn Clock>, mode: RenderMode) -> Self {
        Self {
            backend,
            clock,
            surface: None,
            live: None,
            mode,
            last_spec: None,
            generation: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn surface(&self) -> Option<&SurfaceBox> {
        self.surface.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn current_handle(&self) -> Option<EngineHandle> {
        self.live.as_ref().map(|live| live.handle())
    }

    /// Resolve a handle to the instance, if it is still the live one.
    pub fn instance(&self, handle: EngineHandle) -> Option<&B::Instance> {
        self.live
            .as_ref()
            .filter(|live| live.handle() == handle)
            .map(|live| live.get())
    }

    // ── Surface ──────────────────────────────────────────────────────

    /// Bind to a surface. A different surface already attached is detached
    /// first, disposing its instance.
    pub fn attach_surface(&mut self, surface: SurfaceBox) {
        if let Some(current) = &self.surface {
            if current.id != surface.id {
                self.detach_surface();
            }
        }
        self.surface = Some(surface);
    }

    /// Tear down the instance, then release the surface.
    pub fn detach_surface(&mut self) -> Option<SurfaceBox> {
        self.teardown();
        self.surface.take()
    }

    // ── Apply ────────────────────────────────────────────────────────

    pub fn apply(
        &mut self,
        spec: &Specification,
        mode: RenderMode,
    ) -> Result<Option<ApplyReport>, EngineError> {
        self.mode = mode;
        self.last_spec = Some(spec.clone());

        let Some(surface) = self.surface else {
            log::debug!("Apply skipped: no surface attached");
            return Ok(None);
        };

        let engine_mode = mode.engine_mode();
        let transition = plan_transition(self.live.as_ref().map(|l| l.mode()), engine_mode);

        let mut live = match self.live.take() {
            Some(live) if transition == ModeTransition::Reuse => live,
            previous => {
                if let Some(previous) = previous {
                    log::info!(
                        "Render mode changed from {:?} to {:?}; recreating engine",
                        previous.mode(),
                        engine_mode
                    );
                    previous.dispose();
                }
                self.create_instance(&surface, engine_mode)?
            }
        };

        let folded = spec.folded(&mode);
        let started = Instant::now();
        let result = live.get_mut().set_specification(&folded);
        let elapsed = started.elapsed();
        let handle = live.handle();
        self.live = Some(live);
        result?;

        Ok(Some(ApplyReport {
            handle,
            metrics: Metrics::new(self.clock.now(), elapsed),
            transition,
        }))
    }

    fn create_instance(
        &mut self,
        surface: &SurfaceBox,
        mode: EngineMode,
    ) -> Result<LiveInstance<B::Instance>, EngineError> {
        let instance = self.backend.instantiate(surface, mode)?;
        self.generation += 1;
        let handle = EngineHandle {
            surface: surface.id,
            generation: self.generation,
        };
        Ok(LiveInstance::new(instance, handle, mode))
    }

    // ── Mode toggles ─────────────────────────────────────────────────

    /// Switch render mode and re-apply the last spec under it.
    pub fn set_mode(&mut self, mode: RenderMode) -> Result<Option<ApplyReport>, EngineError> {
        if mode == self.mode {
            return Ok(None);
        }
        match self.last_spec.clone() {
            Some(spec) => self.apply(&spec, mode),
            None => {
                self.mode = mode;
                Ok(None)
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Option<ApplyReport>, EngineError> {
        self.set_mode(RenderMode { theme, ..self.mode })
    }

    pub fn set_backend(&mut self, backend: Backend) -> Result<Option<ApplyReport>, EngineError> {
        self.set_mode(RenderMode { backend, ..self.mode })
    }

    pub fn set_decal_pattern(
        &mut self,
        enabled: bool,
    ) -> Result<Option<ApplyReport>, EngineError> {
        self.set_mode(RenderMode {
            decal_pattern_enabled: enabled,
            ..self.mode
        })
    }

    // ── Resize / teardown ────────────────────────────────────────────

    /// Forward a resize to the live instance. Returns whether one was live.
    pub fn resize(&mut self) -> bool {
        match (&self.surface, self.live.as_mut()) {
            (Some(surface), Some(live)) => {
                live.get_mut().resize(surface);
                true
            }
            _ => false,
        }
    }

    /// Record a new pixel box for the surface and forward the resize.
    pub fn resize_surface(&mut self, width_px: u32, height_px: u32) -> bool {
        match self.surface.as_mut() {
            Some(surface) => {
                surface.resize(width_px, height_px);
                self.resize()
            }
            None => false,
        }
    }

    /// Dispose the live instance, if any. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(live) = self.live.take() {
            live.dispose();
        }
    }
}

impl<B: RenderBackend> Drop for RenderController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
