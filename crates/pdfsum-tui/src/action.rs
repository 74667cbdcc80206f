/// Everything the user can ask the TUI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    ScrollUp,
    ScrollDown,
    /// Submit on the upload view, open the highlighted document in the library.
    Confirm,
    /// Close a modal or leave the current input.
    Back,
    Yes,
    No,
    ShowUpload,
    ShowLibrary,
    EditPath,
    CycleMode,
    TogglePreview,
    Regenerate,
    Delete,
    DownloadText,
    DownloadPdf,
    Refresh,
    CancelJob,
    ToggleHelp,
    TextInput(char),
    Backspace,
    Resize(u16, u16),
    Tick,
    None,
}
