/// Held-key switches read once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneToggles {
    /// The clock does not advance.
    pub time_frozen: bool,
    /// Camera drift runs at the boost factor.
    pub speed_boost: bool,
    /// Camera drift stops; rotation still applies.
    pub camera_stopped: bool,
    /// Orbit paths are drawn.
    pub show_orbits: bool,
}
