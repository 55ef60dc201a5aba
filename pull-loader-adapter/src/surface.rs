use pull_loader::ScrollMetrics;

/// Touch listeners the controller registers on the scroll surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureKind {
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

impl GestureKind {
    pub const ALL: [GestureKind; 4] = [
        GestureKind::TouchStart,
        GestureKind::TouchMove,
        GestureKind::TouchEnd,
        GestureKind::TouchCancel,
    ];
}

/// Listener registration options.
///
/// Hosts that understand an options object get `passive: false` so handlers may cancel the
/// native scroll; older hosts only take the capture flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListenerOptions {
    Options { passive: bool },
    Capture(bool),
}

impl ListenerOptions {
    /// Options for a listener that may call `prevent_default`.
    pub fn will_prevent_default(passive_supported: bool) -> Self {
        if passive_supported {
            Self::Options { passive: false }
        } else {
            Self::Capture(false)
        }
    }
}

/// The scrolling element the list lives in.
pub trait Surface {
    /// Current scroll position, viewport height and content height.
    fn metrics(&self) -> ScrollMetrics;

    /// Maximum draggable distance for the pull easing (usually the available screen height).
    fn display_height(&self) -> Option<f64> {
        None
    }

    /// Capability probe for passive listeners. Runs at most once per process.
    fn probe_passive_listeners(&self) -> bool {
        false
    }

    fn add_listener(&mut self, kind: GestureKind, options: ListenerOptions);

    fn remove_listener(&mut self, kind: GestureKind);
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchPoint {
    pub client_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchEvent {
    /// Contact points currently on the surface.
    pub touches: Vec<TouchPoint>,
    pub cancelable: bool,
}

impl TouchEvent {
    /// A cancelable event with one contact point.
    pub fn single(client_y: f64) -> Self {
        Self {
            touches: vec![TouchPoint { client_y }],
            cancelable: true,
        }
    }

    pub fn first(&self) -> Option<TouchPoint> {
        self.touches.first().copied()
    }
}

/// Which element finished a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionTarget {
    /// The content body itself.
    Body,
    /// A row or other descendant whose transition bubbled up.
    Descendant,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostEvent {
    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd(TouchEvent),
    TouchCancel(TouchEvent),
    Scroll,
    TransitionEnd(TransitionTarget),
    /// The footer "load more" control was tapped.
    FooterTap,
}

impl HostEvent {
    /// The listener this event arrives through, for touch events.
    pub fn gesture_kind(&self) -> Option<GestureKind> {
        match self {
            Self::TouchStart(_) => Some(GestureKind::TouchStart),
            Self::TouchMove(_) => Some(GestureKind::TouchMove),
            Self::TouchEnd(_) => Some(GestureKind::TouchEnd),
            Self::TouchCancel(_) => Some(GestureKind::TouchCancel),
            Self::Scroll | Self::TransitionEnd(_) | Self::FooterTap => None,
        }
    }
}
