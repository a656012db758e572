/// Host-level events bridged into the GTK main loop (control socket, config
/// watcher, CLI client).
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Open the menu, optionally drilled to a nested level path.
    Open(Option<Vec<usize>>),
    Close,
    ConfigReload,
}
