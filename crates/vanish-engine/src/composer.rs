use vanish_types::api::VanishPreset;

use crate::config::DEFAULT_MAX_MESSAGE_LEN;
use crate::error::ComposeError;

/// Check that `text` may be sent: something besides whitespace, and no more
/// than `max_len` characters.
pub fn validate_content(text: &str, max_len: usize) -> Result<(), ComposeError> {
    if text.trim().is_empty() {
        return Err(ComposeError::Empty);
    }
    let len = text.chars().count();
    if len > max_len {
        return Err(ComposeError::TooLong { len, max: max_len });
    }
    Ok(())
}

/// Draft state behind the message input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    draft: String,
    vanish: VanishPreset,
    options_open: bool,
    max_len: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LEN)
    }
}

impl Composer {
    pub fn new(max_len: usize) -> Self {
        Self {
            draft: String::new(),
            vanish: VanishPreset::Forever,
            options_open: false,
            max_len,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn vanish(&self) -> VanishPreset {
        self.vanish
    }

    pub fn select_vanish(&mut self, preset: VanishPreset) {
        self.vanish = preset;
    }

    pub fn options_open(&self) -> bool {
        self.options_open
    }

    /// Show or hide the vanish preset picker.
    pub fn toggle_options(&mut self) {
        self.options_open = !self.options_open;
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn char_count(&self) -> usize {
        self.draft.chars().count()
    }

    pub fn is_over_limit(&self) -> bool {
        self.char_count() > self.max_len
    }

    pub fn can_send(&self) -> bool {
        validate_content(&self.draft, self.max_len).is_ok()
    }

    /// e.g. `42/500`
    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.char_count(), self.max_len)
    }

    pub fn status_line(&self) -> String {
        match self.vanish.secs() {
            Some(secs) => format!("Message will vanish after {secs}s"),
            None => "Message will stay forever".to_string(),
        }
    }

    /// Validate the draft and, if accepted, hand back its text and preset
    /// and reset the composer. A rejected draft is left as it was.
    pub fn take(&mut self) -> Result<(String, VanishPreset), ComposeError> {
        validate_content(&self.draft, self.max_len)?;
        let text = std::mem::take(&mut self.draft);
        let vanish = std::mem::take(&mut self.vanish);
        self.options_open = false;
        Ok((text, vanish))
    }
}
