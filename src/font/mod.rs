pub const DEFAULT_FONT_SIZE: i32 = 12;
pub const MIN_FONT_SIZE: i32 = 8;
const FONT_SIZE_STEP: i32 = 2;

/// Point size plus family of the note's text font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSizeStepper {
    family: String,
    current_size: i32,
}

impl FontSizeStepper {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            current_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn current_size(&self) -> i32 {
        self.current_size
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size actually rendered; never below the floor even after a font pick.
    pub fn applied_size(&self) -> i32 {
        self.current_size.max(MIN_FONT_SIZE)
    }

    pub fn increase(&mut self) -> i32 {
        self.current_size = self.current_size.saturating_add(FONT_SIZE_STEP);
        self.current_size
    }

    pub fn decrease(&mut self) -> i32 {
        if self.current_size > MIN_FONT_SIZE {
            self.current_size = (self.current_size - FONT_SIZE_STEP).max(MIN_FONT_SIZE);
        }
        self.current_size
    }

    /// Applies a font chosen from the font picker; `None` means canceled.
    pub fn apply_picked_font(&mut self, picked: Option<(String, i32)>) -> bool {
        let Some((family, size)) = picked else {
            tracing::debug!("font picker canceled");
            return false;
        };
        if !family.trim().is_empty() {
            self.family = family;
        }
        if size > 0 {
            self.current_size = size;
        }
        tracing::debug!(family = self.family, size = self.current_size, "font picked");
        true
    }
}
