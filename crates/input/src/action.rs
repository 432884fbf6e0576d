/// A discrete, one-shot action produced by the input layer.
///
/// Held movement keys become an `InputIntent` instead; actions are for
/// toggles that must fire once per physical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Show or hide the minimap.
    ToggleMiniMap,
    /// Start the next level after a win.
    NewGame,
}
