//! The taste intensity bar.
//!
//! A bar is a row of `max` equal segments; pressing or dragging across it
//! selects the segment under the pointer. The web form renders the segments
//! server-side, and this module owns the geometry and the drag protocol:
//!
//! 1. `begin_drag` marks the bar as dragging, selects the segment under the
//!    press, and attaches move and release listeners on the [`ListenerHost`].
//! 2. While the returned [`DragSession`] lives, `move_to` follows the pointer.
//! 3. `release` (or dropping the session) clears the dragging flag and
//!    detaches both listeners exactly once.

use crate::types::TasteScore;

/// Input device driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Global listeners a drag needs for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Move,
    Release,
}

/// Something that global pointer listeners can be attached to.
pub trait ListenerHost {
    fn attach(&mut self, kind: PointerKind, event: PointerEvent);
    fn detach(&mut self, kind: PointerKind, event: PointerEvent);
}

/// Segment geometry of an intensity bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityScale {
    max: u8,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            max: TasteScore::MAX,
        }
    }
}

/// One rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// 1-based value this segment selects.
    pub value: u8,
    /// At or below the current value.
    pub filled: bool,
    /// Exactly the current value.
    pub selected: bool,
}

impl IntensityScale {
    /// A scale with `max` segments (at least one).
    #[must_use]
    pub fn new(max: u8) -> Self {
        Self { max: max.max(1) }
    }

    #[must_use]
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Value under horizontal offset `x` on a bar `width` units wide.
    ///
    /// Offsets before the bar select 1 and offsets past it select `max`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn value_at(&self, x: f64, width: f64) -> u8 {
        if !(width > 0.0) || !x.is_finite() {
            return 1;
        }
        let segment_width = width / f64::from(self.max);
        let index = (x / segment_width).floor() + 1.0;
        if index <= 1.0 {
            1
        } else if index >= f64::from(self.max) {
            self.max
        } else {
            // bounded to 1..max above
            index as u8
        }
    }

    /// Segments for rendering a bar at `value`.
    #[must_use]
    pub fn segments(&self, value: u8) -> Vec<Segment> {
        (1..=self.max)
            .map(|v| Segment {
                value: v,
                filled: v <= value,
                selected: v == value,
            })
            .collect()
    }
}

/// An intensity bar and its current value.
#[derive(Debug, Clone)]
pub struct IntensityBar {
    scale: IntensityScale,
    width: f64,
    value: u8,
    editable: bool,
    dragging: bool,
}

impl IntensityBar {
    /// An editable bar `width` units wide.
    #[must_use]
    pub fn editable(scale: IntensityScale, width: f64, value: u8) -> Self {
        Self {
            scale,
            width,
            value,
            editable: true,
            dragging: false,
        }
    }

    /// A display-only bar. It never starts a drag.
    #[must_use]
    pub fn read_only(scale: IntensityScale, value: u8) -> Self {
        Self {
            scale,
            width: 0.0,
            value,
            editable: false,
            dragging: false,
        }
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Select a segment directly (click or keyboard).
    pub fn select(&mut self, value: u8) {
        if self.editable {
            self.value = value.clamp(1, self.scale.max());
        }
    }

    /// Start a drag at offset `x`.
    ///
    /// Returns `None` for read-only bars; no listeners are attached then.
    pub fn begin_drag<'a, H: ListenerHost>(
        &'a mut self,
        host: &'a mut H,
        kind: PointerKind,
        x: f64,
    ) -> Option<DragSession<'a, H>> {
        if !self.editable {
            return None;
        }

        self.dragging = true;
        self.value = self.scale.value_at(x, self.width);
        host.attach(kind, PointerEvent::Move);
        host.attach(kind, PointerEvent::Release);

        Some(DragSession {
            bar: self,
            host,
            kind,
            attached: true,
        })
    }
}

/// A drag in progress. Listeners stay attached until it is released or dropped.
pub struct DragSession<'a, H: ListenerHost> {
    bar: &'a mut IntensityBar,
    host: &'a mut H,
    kind: PointerKind,
    attached: bool,
}

impl<H: ListenerHost> DragSession<'_, H> {
    /// Follow the pointer to offset `x` and return the selected value.
    pub fn move_to(&mut self, x: f64) -> u8 {
        if self.bar.dragging {
            self.bar.value = self.bar.scale.value_at(x, self.bar.width);
        }
        self.bar.value
    }

    /// End the drag and return the final value.
    pub fn release(mut self) -> u8 {
        self.finish();
        self.bar.value
    }

    fn finish(&mut self) {
        self.bar.dragging = false;
        if self.attached {
            self.host.detach(self.kind, PointerEvent::Move);
            self.host.detach(self.kind, PointerEvent::Release);
            self.attached = false;
        }
    }
}

impl<H: ListenerHost> Drop for DragSession<'_, H> {
    fn drop(&mut self) {
        self.finish();
    }
}
