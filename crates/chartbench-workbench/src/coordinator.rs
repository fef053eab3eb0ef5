use std::rc::Rc;

use chartbench_core::{Backend, Clock, KeyValueStore, Metrics, RenderMode, Specification, Theme};
use chartbench_io::{
    ActionDispatcher, Artifact, ArtifactKind, Clipboard, DownloadSink, ExportError, Location,
    WorkbenchSettings,
};
use chartbench_layout::{ContainerRect, LayoutManager, LayoutSignal, LayoutState, PointerCapture};
use chartbench_render::{
    ApplyReport, EngineError, EngineHandle, RenderBackend, RenderController, SurfaceBox,
};

use crate::observer::WorkbenchObserver;

/// The live preview workbench.
///
/// `run` is the only way the specification changes. The ready handle is
/// re-read from this struct on every export, never cached elsewhere.
pub struct Workbench<B: RenderBackend> {
    layout: LayoutManager,
    render: RenderController<B>,
    actions: ActionDispatcher,
    clock: Rc<dyn Clock>,
    spec: Option<Specification>,
    metrics: Option<Metrics>,
    ready: Option<EngineHandle>,
    container: Option<ContainerRect>,
    /// A container resize arrived mid-drag and is owed to the surface.
    resize_deferred: bool,
    observers: Vec<Box<dyn WorkbenchObserver>>,
}

impl<B: RenderBackend> Workbench<B> {
    pub fn new(
        backend: B,
        store: Box<dyn KeyValueStore>,
        pointer: Box<dyn PointerCapture>,
        settings: &WorkbenchSettings,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            layout: LayoutManager::new(settings.layout.clone(), store, pointer),
            render: RenderController::new(backend, Rc::clone(&clock), settings.default_mode),
            actions: ActionDispatcher::new(),
            clock,
            spec: None,
            metrics: None,
            ready: None,
            container: None,
            resize_deferred: false,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn WorkbenchObserver>) {
        self.observers.push(observer);
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn spec(&self) -> Option<&Specification> {
        self.spec.as_ref()
    }

    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics
    }

    pub fn ready_handle(&self) -> Option<EngineHandle> {
        self.ready
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render.mode()
    }

    pub fn layout_state(&self) -> LayoutState {
        self.layout.state()
    }

    pub fn panel_widths(&self) -> Option<(f64, f64)> {
        self.layout.panel_widths()
    }

    pub fn render(&self) -> &RenderController<B> {
        &self.render
    }

    pub fn is_mounted(&self) -> bool {
        self.render.surface().is_some()
    }

    // ── Mount / unmount ──────────────────────────────────────────────

    /// Measure the container, restore the split, and bind the preview surface.
    ///
    /// A spec run before mounting is applied now.
    pub fn mount(&mut self, container: ContainerRect) -> Result<(), EngineError> {
        self.container = Some(container);
        let offset = self.layout.initialize(container.width);
        log::info!(
            "Workbench mounted at {}x{} with split at {}px",
            container.width,
            container.height,
            offset
        );

        let (_, right) = self.layout.panel_widths().unwrap_or((offset, container.width - offset));
        self.render.attach_surface(SurfaceBox::from_layout(right, container.height));
        self.apply_current()
    }

    /// Release drag listeners, then dispose the engine before the surface goes.
    pub fn unmount(&mut self) {
        self.layout.teardown();
        self.ready = None;
        self.resize_deferred = false;
        if self.render.detach_surface().is_some() {
            log::info!("Workbench unmounted");
        }
    }

    // ── Editor input ─────────────────────────────────────────────────

    /// Replace the specification and push it to the engine.
    ///
    /// Backend failures on a malformed spec are returned unchanged.
    pub fn run(&mut self, spec: Specification) -> Result<(), EngineError> {
        self.spec = Some(spec);
        self.metrics = Some(Metrics::pending(self.clock.now()));
        self.apply_current()
    }

    fn apply_current(&mut self) -> Result<(), EngineError> {
        let Some(spec) = self.spec.as_ref() else {
            return Ok(());
        };
        let mode = self.render.mode();
        let outcome = self.render.apply(spec, mode);
        self.settle(outcome)
    }

    fn settle(
        &mut self,
        outcome: Result<Option<ApplyReport>, EngineError>,
    ) -> Result<(), EngineError> {
        match outcome {
            Ok(Some(report)) => {
                self.publish(report);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                // A failed recreate leaves the stored handle pointing at a
                // disposed instance.
                let render = &self.render;
                self.ready = self.ready.filter(|h| render.instance(*h).is_some());
                Err(e)
            }
        }
    }

    fn publish(&mut self, report: ApplyReport) {
        self.ready = Some(report.handle);
        self.metrics = Some(report.metrics);
        for observer in &mut self.observers {
            observer.on_ready(report.handle);
            observer.on_metrics(&report.metrics);
        }
    }

    // ── Render mode toggles ──────────────────────────────────────────

    pub fn set_render_mode(&mut self, mode: RenderMode) -> Result<(), EngineError> {
        let outcome = self.render.set_mode(mode);
        self.settle(outcome)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), EngineError> {
        let outcome = self.render.set_theme(theme);
        self.settle(outcome)
    }

    pub fn set_backend(&mut self, backend: Backend) -> Result<(), EngineError> {
        let outcome = self.render.set_backend(backend);
        self.settle(outcome)
    }

    pub fn set_decal_pattern(&mut self, enabled: bool) -> Result<(), EngineError> {
        let outcome = self.render.set_decal_pattern(enabled);
        self.settle(outcome)
    }

    // ── Layout input ─────────────────────────────────────────────────

    pub fn begin_drag(&mut self) -> bool {
        self.layout.begin_drag()
    }

    /// Pointer moved to viewport `pointer_x` during a drag.
    pub fn update_drag(&mut self, pointer_x: f64) -> Option<f64> {
        let container = self.container?;
        self.layout.update_drag(pointer_x, container)
    }

    /// Commit the drag. The offset is persisted before the surface resizes.
    pub fn end_drag(&mut self) -> bool {
        match self.layout.end_drag() {
            Some(LayoutSignal::Changed { .. }) => {
                self.resize_deferred = false;
                self.sync_surface()
            }
            None => false,
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        if !self.layout.cancel_drag() {
            return false;
        }
        if std::mem::take(&mut self.resize_deferred) {
            self.sync_surface();
        }
        true
    }

    /// The container's box changed. Coalesced while a drag is active.
    pub fn container_resized(&mut self, container: ContainerRect) -> bool {
        if !container.width.is_finite() {
            log::debug!("Ignoring container resize to width {}", container.width);
            return false;
        }
        self.container = Some(container);
        self.layout.resize_container(container.width);
        if self.layout.is_dragging() {
            self.resize_deferred = true;
            return false;
        }
        self.sync_surface()
    }

    /// Resize the surface to the right panel and tell the engine.
    fn sync_surface(&mut self) -> bool {
        let (Some(container), Some((_, right))) = (self.container, self.layout.panel_widths())
        else {
            return false;
        };
        let surface = SurfaceBox::from_layout(right, container.height);
        self.render.resize_surface(surface.width_px, surface.height_px)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Export the current spec or a snapshot of the ready instance.
    ///
    /// Nothing is exported before the first `run`, and a raster export with
    /// no ready instance is skipped.
    pub fn export_artifact(
        &self,
        kind: ArtifactKind,
        title: &str,
        sink: &mut dyn DownloadSink,
    ) -> Result<Option<Artifact>, ExportError> {
        let Some(spec) = self.spec.as_ref() else {
            log::debug!("Export skipped: no specification yet");
            return Ok(None);
        };
        let instance = self.ready.and_then(|handle| self.render.instance(handle));
        self.actions.export_artifact(kind, spec, instance, title, sink)
    }

    pub fn share_link(
        &self,
        location: &dyn Location,
        clipboard: &mut dyn Clipboard,
    ) -> Result<String, ExportError> {
        self.actions.share_link(location, clipboard)
    }
}

impl<B: RenderBackend> Drop for Workbench<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartbench_core::{ManualClock, MemoryStore};
    use chartbench_io::MemorySink;
    use chartbench_layout::{ListenerRegistry, SPLIT_STORAGE_KEY};
    use chartbench_render::HeadlessBackend;
    use serde_json::json;
    use std::cell::RefCell;
    use std::time::{Duration, SystemTime};

    #[derive(Default)]
    struct Recorder {
        ready: Vec<EngineHandle>,
        metrics: Vec<Metrics>,
    }

    impl WorkbenchObserver for Recorder {
        fn on_ready(&mut self, handle: EngineHandle) {
            self.ready.push(handle);
        }

        fn on_metrics(&mut self, metrics: &Metrics) {
            self.metrics.push(*metrics);
        }
    }

    struct Fixture {
        bench: Workbench<HeadlessBackend>,
        store: Rc<RefCell<MemoryStore>>,
        pointer: Rc<RefCell<ListenerRegistry>>,
        recorder: Rc<RefCell<Recorder>>,
    }

    fn fixture_with(store: MemoryStore) -> Fixture {
        let store = Rc::new(RefCell::new(store));
        let pointer = Rc::new(RefCell::new(ListenerRegistry::new()));
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let clock = Rc::new(ManualClock::new(
            SystemTime::UNIX_EPOCH,
            Duration::from_millis(10),
        ));
        let mut bench = Workbench::new(
            HeadlessBackend::new(),
            Box::new(Rc::clone(&store)),
            Box::new(Rc::clone(&pointer)),
            &WorkbenchSettings::default(),
            clock,
        );
        bench.add_observer(Box::new(Rc::clone(&recorder)));
        Fixture {
            bench,
            store,
            pointer,
            recorder,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryStore::new())
    }

    fn spec(label: &str) -> Specification {
        Specification::new(json!({
            "title": { "text": label },
            "series": [{ "type": "pie", "data": [{ "name": label, "value": 1 }] }]
        }))
    }

    fn live_spec(bench: &Workbench<HeadlessBackend>) -> Option<Specification> {
        let handle = bench.ready_handle()?;
        bench.render().instance(handle)?.specification().cloned()
    }

    #[test]
    fn test_mount_splits_container_in_half() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(800.0, 500.0)).unwrap();
        assert_eq!(f.bench.panel_widths(), Some((400.0, 400.0)));
        let surface = f.bench.render().surface().unwrap();
        assert_eq!((surface.width_px, surface.height_px), (400, 500));
    }

    #[test]
    fn test_run_before_mount_is_applied_on_mount() {
        let mut f = fixture();
        f.bench.run(spec("early")).unwrap();
        assert!(f.bench.ready_handle().is_none());
        assert_eq!(f.bench.metrics().unwrap().apply_duration_ms, 0.0);

        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        assert!(f.bench.ready_handle().is_some());
        assert_eq!(live_spec(&f.bench), Some(spec("early")));
    }

    #[test]
    fn test_back_to_back_runs_publish_only_latest() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        let first = f.bench.metrics().unwrap();
        f.bench.run(spec("b")).unwrap();
        let second = f.bench.metrics().unwrap();

        assert!(second.generated_at > first.generated_at);
        assert_eq!(f.bench.spec(), Some(&spec("b")));
        assert_eq!(live_spec(&f.bench), Some(spec("b")));
        let recorder = f.recorder.borrow();
        assert_eq!(recorder.metrics.last(), Some(&second));
        // Same mode: the instance was reused.
        assert_eq!(recorder.ready[0], recorder.ready[1]);
    }

    #[test]
    fn test_backend_toggle_supersedes_handle() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        let old = f.bench.ready_handle().unwrap();
        f.bench.set_backend(Backend::Vector).unwrap();
        let new = f.bench.ready_handle().unwrap();
        assert_ne!(old, new);
        assert!(f.bench.render().instance(old).is_none());
        assert_eq!(f.bench.render().backend().instances_created(), 2);
        assert_eq!(f.bench.render_mode().backend, Backend::Vector);
    }

    #[test]
    fn test_drag_persists_then_resizes_surface() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();

        assert!(f.bench.begin_drag());
        assert_eq!(f.bench.update_drag(50.0), Some(300.0));
        assert_eq!(f.pointer.borrow().active_count(), 1);
        assert!(f.bench.end_drag());

        assert_eq!(f.pointer.borrow().active_count(), 0);
        assert_eq!(f.store.borrow().get(SPLIT_STORAGE_KEY).as_deref(), Some("300"));
        assert_eq!(f.bench.render().surface().unwrap().width_px, 600);
        let handle = f.bench.ready_handle().unwrap();
        let instance = f.bench.render().instance(handle).unwrap();
        assert_eq!(instance.surface().width_px, 600);
    }

    #[test]
    fn test_persisted_split_restored_on_mount() {
        let store = MemoryStore::new().with_entry(SPLIT_STORAGE_KEY, "350");
        let mut f = fixture_with(store);
        f.bench.mount(ContainerRect::at_origin(1000.0, 600.0)).unwrap();
        assert_eq!(f.bench.panel_widths(), Some((350.0, 650.0)));
    }

    #[test]
    fn test_container_resize_is_coalesced_during_drag() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(1200.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        f.bench.begin_drag();
        f.bench.update_drag(800.0);
        assert!(!f.bench.container_resized(ContainerRect::at_origin(1000.0, 600.0)));
        // Surface still has the pre-drag box until the drag commits.
        assert_eq!(f.bench.render().surface().unwrap().width_px, 600);
        f.bench.update_drag(650.0);
        assert!(f.bench.end_drag());
        assert_eq!(f.bench.render().surface().unwrap().width_px, 350);
        assert_eq!(f.store.borrow().get(SPLIT_STORAGE_KEY).as_deref(), Some("650"));
    }

    #[test]
    fn test_container_resize_outside_drag_reclamps() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(1200.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        assert!(f.bench.container_resized(ContainerRect::at_origin(700.0, 500.0)));
        assert_eq!(f.bench.panel_widths(), Some((400.0, 300.0)));
        let surface = f.bench.render().surface().unwrap();
        assert_eq!((surface.width_px, surface.height_px), (300, 500));
    }

    #[test]
    fn test_mount_with_unmeasurable_container() {
        let mut f = fixture();
        f.bench.run(spec("a")).unwrap();
        f.bench.mount(ContainerRect::at_origin(f64::NAN, 600.0)).unwrap();
        assert_eq!(f.bench.panel_widths(), Some((0.0, 0.0)));
        assert_eq!(f.bench.render().surface().unwrap().width_px, 0);

        assert!(!f.bench.container_resized(ContainerRect::at_origin(f64::NAN, 600.0)));
        assert!(f.bench.container_resized(ContainerRect::at_origin(1000.0, 600.0)));
        assert_eq!(f.bench.panel_widths(), Some((300.0, 700.0)));
        let handle = f.bench.ready_handle().unwrap();
        assert_eq!(f.bench.render().instance(handle).unwrap().surface().width_px, 700);
    }

    #[test]
    fn test_cancel_drag_flushes_deferred_resize() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(1200.0, 600.0)).unwrap();
        f.bench.begin_drag();
        f.bench.container_resized(ContainerRect::at_origin(800.0, 600.0));
        assert!(f.bench.cancel_drag());
        assert_eq!(f.bench.panel_widths(), Some((500.0, 300.0)));
        assert_eq!(f.bench.render().surface().unwrap().width_px, 300);
        assert!(f.store.borrow().get(SPLIT_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_exports_read_latest_handle() {
        let mut f = fixture();
        let mut sink = MemorySink::new();
        assert!(f
            .bench
            .export_artifact(ArtifactKind::Spec, "Empty", &mut sink)
            .unwrap()
            .is_none());

        f.bench.run(spec("a")).unwrap();
        assert!(f
            .bench
            .export_artifact(ArtifactKind::Raster, "Not Mounted", &mut sink)
            .unwrap()
            .is_none());

        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        let artifact = f
            .bench
            .export_artifact(ArtifactKind::Raster, "Pie Chart", &mut sink)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.file_name, "pie-chart.png");
        assert_eq!(artifact.mime_type, "image/png");

        f.bench.set_backend(Backend::Vector).unwrap();
        let artifact = f
            .bench
            .export_artifact(ArtifactKind::Raster, "Pie Chart", &mut sink)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.file_name, "pie-chart.svg");

        let artifact = f
            .bench
            .export_artifact(ArtifactKind::Spec, "Pie Chart", &mut sink)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.file_name, "pie-chart.json");
        let bytes = &sink.last().unwrap().bytes;
        let parsed: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(parsed, *spec("a").tree());
    }

    #[test]
    fn test_decal_does_not_leak_into_canonical_spec() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        f.bench.set_decal_pattern(true).unwrap();
        assert_eq!(f.bench.spec(), Some(&spec("a")));
        let applied = live_spec(&f.bench).unwrap();
        assert_eq!(applied.tree()["aria"]["enabled"], true);
    }

    #[test]
    fn test_unmount_mid_drag_releases_everything() {
        let mut f = fixture();
        f.bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        f.bench.run(spec("a")).unwrap();
        let handle = f.bench.ready_handle().unwrap();
        f.bench.begin_drag();
        f.bench.unmount();
        assert_eq!(f.pointer.borrow().active_count(), 0);
        assert!(f.bench.ready_handle().is_none());
        assert!(f.bench.render().instance(handle).is_none());
        assert!(!f.bench.is_mounted());
        // Safe to repeat.
        f.bench.unmount();
    }

    #[test]
    fn test_drop_releases_listeners() {
        let f = fixture();
        let pointer = Rc::clone(&f.pointer);
        let Fixture { mut bench, .. } = f;
        bench.mount(ContainerRect::at_origin(900.0, 600.0)).unwrap();
        bench.begin_drag();
        drop(bench);
        assert_eq!(pointer.borrow().active_count(), 0);
    }
}
