mod clipboard;
mod hotkey;
mod injector;

pub(crate) use clipboard::{ClipboardAccess, SystemClipboard};
pub(crate) use hotkey::Hotkey;
pub(crate) use injector::{CommandInjector, DesktopNotifier, KeyInjector, Notifier};

use anyhow::Result;
use tracing::{debug, info};

use crate::locale::Locale;
use crate::manager::{FilterManager, RuleStore};

/// What a filtered paste did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PasteOutcome {
    /// Nothing to paste; no keystroke was sent.
    EmptyClipboard,
    Pasted {
        chars: usize,
        matches: usize,
        notified: bool,
    },
}

/// The devices a filtered paste talks to.
pub(crate) struct PasteTarget<'a> {
    pub(crate) clipboard: &'a mut dyn ClipboardAccess,
    pub(crate) injector: &'a mut dyn KeyInjector,
    pub(crate) notifier: &'a mut dyn Notifier,
}

/// Filter the clipboard in place and paste it into the focused window.
///
/// Runs strictly in order: read, filter, write back, inject. The filtered
/// text is left on the clipboard, but on X11 it only outlives the process
/// when a clipboard manager takes it over. A notification is shown only when
/// enabled in the settings and at least one match was replaced.
pub(crate) fn paste_filtered<S: RuleStore>(
    manager: &mut FilterManager<S>,
    target: PasteTarget<'_>,
    locale: &Locale,
) -> Result<PasteOutcome> {
    let Some(original) = target.clipboard.read_text()? else {
        info!("clipboard is empty, nothing to paste");
        return Ok(PasteOutcome::EmptyClipboard);
    };

    debug!(chars = original.chars().count(), "processing clipboard");
    let outcome = manager.apply_filters(&original)?;
    info!(matches = outcome.matches, "clipboard filtered");

    target.clipboard.write_text(&outcome.text)?;
    target.injector.send_paste()?;

    let matches = manager.last_match_count();
    let notified = manager.settings()?.notifications && matches > 0;
    if notified {
        let count = matches.to_string();
        target.notifier.notify(
            &locale.translate("notifications.pasteFiltered", &[]),
            &locale.translate("notifications.itemsFiltered", &[("count", &count)]),
        );
    }

    Ok(PasteOutcome::Pasted {
        chars: outcome.text.chars().count(),
        matches,
        notified,
    })
}
