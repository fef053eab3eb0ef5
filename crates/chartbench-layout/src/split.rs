use serde::{Deserialize, Serialize};

use chartbench_core::KeyValueStore;

use crate::geometry::ContainerRect;
use crate::pointer::{ListenerId, PointerCapture};
use crate::{MIN_PANEL_WIDTH, SPLIT_STORAGE_KEY};

/// Tunables for the split layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub min_panel_width: f64,
    pub storage_key: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_panel_width: MIN_PANEL_WIDTH,
            storage_key: SPLIT_STORAGE_KEY.to_string(),
        }
    }
}

/// Observable layout state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    /// Left panel width in pixels; `None` until the container is measured.
    pub split_offset_px: Option<f64>,
    pub dragging: bool,
}

/// Emitted when the committed geometry changed and the surface must resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutSignal {
    Changed { split_offset_px: f64 },
}

/// Clamp an offset to `[min, width - min]`.
///
/// A container narrower than two minimum panels has an empty range; the
/// split is pinned to the middle instead. A non-finite or negative width is
/// treated as zero, and a NaN offset falls back to the middle.
pub fn clamp_offset(offset: f64, container_width: f64, min_panel_width: f64) -> f64 {
    let container_width = finite_width(container_width);
    let upper = container_width - min_panel_width;
    if upper.is_nan() || upper < min_panel_width {
        return container_width / 2.0;
    }
    let offset = if offset.is_nan() { container_width / 2.0 } else { offset };
    offset.clamp(min_panel_width, upper)
}

fn finite_width(width: f64) -> f64 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

/// Drives the split offset through the `Idle -> Dragging -> Idle` cycle.
///
/// Pointer listeners are held only while dragging and are released on every
/// way out: `end_drag`, `cancel_drag`, `teardown` and drop.
pub struct LayoutManager {
    config: SplitConfig,
    store: Box<dyn KeyValueStore>,
    pointer: Box<dyn PointerCapture>,
    state: LayoutState,
    container_width: f64,
    listener: Option<ListenerId>,
    /// Offset held when the current drag began (restored on cancel).
    drag_origin: Option<f64>,
}

impl LayoutManager {
    pub fn new(
        config: SplitConfig,
        store: Box<dyn KeyValueStore>,
        pointer: Box<dyn PointerCapture>,
    ) -> Self {
        Self {
            config,
            store,
            pointer,
            state: LayoutState::default(),
            container_width: 0.0,
            listener: None,
            drag_origin: None,
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn split_offset(&self) -> Option<f64> {
        self.state.split_offset_px
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// `(left, right)` panel widths for the current container.
    pub fn panel_widths(&self) -> Option<(f64, f64)> {
        self.state
            .split_offset_px
            .map(|offset| (offset, (self.container_width - offset).max(0.0)))
    }

    // ── Mount ────────────────────────────────────────────────────────

    /// Load the persisted offset, or split the container in half.
    ///
    /// The stored value is re-clamped: the container may have a different
    /// width than when it was saved.
    pub fn initialize(&mut self, container_width: f64) -> f64 {
        if !container_width.is_finite() {
            log::warn!("Container width {} is not finite; treating it as 0", container_width);
        }
        self.container_width = finite_width(container_width);
        let container_width = self.container_width;
        let offset = match self.load_persisted() {
            Some(stored) => {
                log::debug!("Restored split offset {}px", stored);
                stored
            }
            None => container_width / 2.0,
        };
        let offset = self.clamp(offset);
        self.state.split_offset_px = Some(offset);
        offset
    }

    fn load_persisted(&self) -> Option<f64> {
        let raw = self.store.get(&self.config.storage_key)?;
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                log::warn!(
                    "Ignoring unreadable split offset '{}' under '{}'",
                    raw,
                    self.config.storage_key
                );
                None
            }
        }
    }

    // ── Drag lifecycle ───────────────────────────────────────────────

    /// Enter the dragging state. Returns `false` if a drag is already active.
    pub fn begin_drag(&mut self) -> bool {
        if self.state.dragging {
            return false;
        }
        self.listener = Some(self.pointer.subscribe());
        self.drag_origin = self.state.split_offset_px;
        self.state.dragging = true;
        true
    }

    /// Track one pointer-move. Ignored outside a drag.
    pub fn update_drag(&mut self, pointer_x: f64, container: ContainerRect) -> Option<f64> {
        if !self.state.dragging {
            return None;
        }
        let candidate = container.relative_x(pointer_x);
        if !(candidate.is_finite() && container.width.is_finite()) {
            return self.state.split_offset_px;
        }
        self.container_width = container.width;
        let offset = self.clamp(candidate);
        self.state.split_offset_px = Some(offset);
        Some(offset)
    }

    /// Leave the dragging state and persist the committed offset.
    ///
    /// Persisting happens before the returned signal is acted on, so the
    /// stored value is never behind a resize it triggered.
    pub fn end_drag(&mut self) -> Option<LayoutSignal> {
        if !self.state.dragging {
            return None;
        }
        self.release_listener();
        self.state.dragging = false;
        self.drag_origin = None;

        let offset = self.state.split_offset_px?;
        self.persist(offset);
        Some(LayoutSignal::Changed {
            split_offset_px: offset,
        })
    }

    /// Abort a drag: restore the offset it started from, persist nothing.
    pub fn cancel_drag(&mut self) -> bool {
        if !self.state.dragging {
            return false;
        }
        self.release_listener();
        self.state.dragging = false;
        if let Some(origin) = self.drag_origin.take() {
            self.state.split_offset_px = Some(self.clamp(origin));
        }
        true
    }

    /// Re-clamp against a new container width. Nothing is persisted.
    ///
    /// Returns whether the offset moved. A non-finite width is ignored.
    pub fn resize_container(&mut self, container_width: f64) -> bool {
        if !container_width.is_finite() {
            log::debug!("Ignoring non-finite container width {}", container_width);
            return false;
        }
        self.container_width = container_width.max(0.0);
        let container_width = self.container_width;
        let previous = self.state.split_offset_px;
        let next = self.clamp(previous.unwrap_or(container_width / 2.0));
        self.state.split_offset_px = Some(next);
        previous != Some(next)
    }

    /// Release any listeners held by an interrupted drag.
    pub fn teardown(&mut self) {
        if self.state.dragging {
            log::debug!("Layout torn down mid-drag; dropping uncommitted offset");
            self.release_listener();
            self.state.dragging = false;
            self.drag_origin = None;
        }
    }

    fn release_listener(&mut self) {
        if let Some(id) = self.listener.take() {
            self.pointer.unsubscribe(id);
        }
    }

    fn persist(&mut self, offset: f64) {
        let key = self.config.storage_key.clone();
        if let Err(e) = self.store.set(&key, &offset.to_string()) {
            log::warn!("Failed to persist split offset: {}", e);
        }
    }

    fn clamp(&self, offset: f64) -> f64 {
        clamp_offset(offset, self.container_width, self.config.min_panel_width)
    }
}

impl Drop for LayoutManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutManager")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("container_width", &self.container_width)
            .field("listener", &self.listener)
            .finish()
    }
}
