//! Page chrome: counters, hints, scroll thresholds and keyboard shortcuts.

/// Counter turns to its warning state at this share of the max length.
const COUNTER_WARNING_RATIO: f64 = 0.9;

/// Scroll offset past which the navbar gets its shadow.
pub const NAVBAR_SHADOW_OFFSET: u32 = 100;

/// Default scroll offset past which the scroll-to-top control appears.
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 300;

const DEFAULT_PLATFORM_HINT: &str = "Paste text or URL to verify";

/// Input length as the page counts it: UTF-16 code units, so characters
/// outside the Basic Multilingual Plane (most emoji) count as two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCounter {
    pub count: usize,
    pub max_length: usize,
}

impl CharacterCounter {
    pub fn for_input(input: &str, max_length: usize) -> Self {
        Self {
            count: input.encode_utf16().count(),
            max_length,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.count as f64 >= self.max_length as f64 * COUNTER_WARNING_RATIO
    }
}

/// Placeholder hint for the selected platform (case-insensitive).
pub fn platform_hint(selected: Option<&str>) -> &'static str {
    let selected = selected.unwrap_or_default().trim().to_lowercase();
    match selected.as_str() {
        "twitter" => "Paste tweet text or thread snippet",
        "facebook" => "Paste Facebook post text",
        "instagram" => "Paste caption or short description",
        "youtube" => "Paste title or description",
        "news url" => "Paste full article URL to auto-fetch",
        _ => DEFAULT_PLATFORM_HINT,
    }
}

/// Visual effects driven by the page scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEffects {
    pub scroll_to_top_visible: bool,
    pub navbar_shadow: bool,
}

impl ScrollEffects {
    pub fn at_offset(offset: u32, scroll_threshold: u32) -> Self {
        Self {
            scroll_to_top_visible: offset > scroll_threshold,
            navbar_shadow: offset > NAVBAR_SHADOW_OFFSET,
        }
    }
}

/// In-page anchor target, or `None` for empty anchors.
pub fn anchor_target(href: &str) -> Option<&str> {
    let target = href.strip_prefix('#')?;
    (!target.is_empty()).then_some(target)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SubmitDetection,
    ClearDetection,
}

/// Shortcuts only apply while the detection input has focus.
pub fn shortcut_for(press: KeyPress, detection_focused: bool) -> Option<ShortcutAction> {
    if !detection_focused {
        return None;
    }

    match press.key {
        Key::Enter if press.ctrl || press.meta => Some(ShortcutAction::SubmitDetection),
        Key::Escape => Some(ShortcutAction::ClearDetection),
        _ => None,
    }
}
