use std::cell::RefCell;
use std::rc::Rc;

use chartbench_core::Metrics;
use chartbench_render::EngineHandle;

/// Upward signals from the workbench to its host.
///
/// A handle passed to `on_ready` supersedes every earlier one; hosts should
/// not resolve older handles.
pub trait WorkbenchObserver {
    fn on_ready(&mut self, _handle: EngineHandle) {}
    fn on_metrics(&mut self, _metrics: &Metrics) {}
}

/// Logs every signal at `info`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl WorkbenchObserver for LogObserver {
    fn on_ready(&mut self, handle: EngineHandle) {
        log::info!(
            "Engine ready: generation {} on surface {}",
            handle.generation,
            handle.surface
        );
    }

    fn on_metrics(&mut self, metrics: &Metrics) {
        log::info!("Applied in {:.3}ms", metrics.apply_duration_ms);
    }
}

impl<T: WorkbenchObserver> WorkbenchObserver for Rc<RefCell<T>> {
    fn on_ready(&mut self, handle: EngineHandle) {
        self.borrow_mut().on_ready(handle);
    }

    fn on_metrics(&mut self, metrics: &Metrics) {
        self.borrow_mut().on_metrics(metrics);
    }
}
