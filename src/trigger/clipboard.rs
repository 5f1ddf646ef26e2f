use anyhow::{Context, Result};

/// Plain-text clipboard access.
pub(crate) trait ClipboardAccess {
    /// Current text content; `None` when the clipboard holds no text.
    fn read_text(&mut self) -> Result<Option<String>>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard through `arboard`.
pub(crate) struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub(crate) fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().context("Failed to open the system clipboard")?;
        Ok(Self { inner })
    }
}

impl ClipboardAccess for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>> {
        match self.inner.get_text() {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e).context("Failed to read clipboard text"),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .context("Failed to write clipboard text")
    }
}
