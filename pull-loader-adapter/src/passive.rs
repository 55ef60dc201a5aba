use std::sync::OnceLock;

static PASSIVE_LISTENERS: OnceLock<bool> = OnceLock::new();

/// Whether the host honours the `passive` listener option.
///
/// The probe runs at most once per process; later calls return the cached answer and never
/// run their probe.
pub fn passive_listeners_supported(probe: impl FnOnce() -> bool) -> bool {
    *PASSIVE_LISTENERS.get_or_init(|| {
        let supported = probe();
        adebug!(supported, "passive listener probe");
        supported
    })
}
