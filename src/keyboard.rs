// Key mapping for the book surface and the viewer.
// Book keys animate; viewer keys jump instantly.


/// Keys the engine reacts to, parsed from DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    PageDown,
    PageUp,
    Space,
    Home,
    End,
    Zoom,
    Escape,
}

impl Key {
    pub fn from_dom_key(value: &str) -> Option<Self> {
        match value {
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "PageDown" => Some(Key::PageDown),
            "PageUp" => Some(Key::PageUp),
            " " | "Spacebar" => Some(Key::Space),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "z" | "Z" => Some(Key::Zoom),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCommand {
    FlipForward,
    FlipBackward,
    /// Animated chain to the first item.
    First,
    /// Animated chain to the last item.
    Last,
    OpenViewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Previous,
    First,
    Last,
    ToggleZoom,
    Close,
}

pub fn surface_command(key: Key) -> Option<SurfaceCommand> {
    match key {
        Key::ArrowRight | Key::PageDown | Key::Space => Some(SurfaceCommand::FlipForward),
        Key::ArrowLeft | Key::PageUp => Some(SurfaceCommand::FlipBackward),
        Key::Home => Some(SurfaceCommand::First),
        Key::End => Some(SurfaceCommand::Last),
        Key::Zoom => Some(SurfaceCommand::OpenViewer),
        Key::Escape => None,
    }
}

pub fn viewer_command(key: Key) -> Option<ViewerCommand> {
    match key {
        Key::ArrowRight | Key::PageDown | Key::Space => Some(ViewerCommand::Next),
        Key::ArrowLeft | Key::PageUp => Some(ViewerCommand::Previous),
        Key::Home => Some(ViewerCommand::First),
        Key::End => Some(ViewerCommand::Last),
        Key::Zoom => Some(ViewerCommand::ToggleZoom),
        Key::Escape => Some(ViewerCommand::Close),
    }
}
