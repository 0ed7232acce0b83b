//! UI chrome rules.
//!
//! The chat page wraps content in buttons, toolbars, screen-reader copies
//! and hidden MathML. None of it is conversation content.

use dom_query::Selection;

use crate::dom;
use crate::patterns::DECORATIVE_CLASSES;

/// Tags that never carry conversation content.
const CHROME_TAGS: &[&str] = &[
    "button", "svg", "script", "style", "noscript", "template", "nav", "form", "input",
    "textarea", "select", "iframe",
];

/// Class tokens that disqualify an element from being a message container.
const NON_MESSAGE_CLASSES: &[&str] = &["cursor-pointer", "absolute", "hidden"];

/// Element is decorative, hidden or an interactive control.
#[must_use]
pub fn is_chrome(sel: &Selection) -> bool {
    if dom::is_one_of_tags(sel, CHROME_TAGS) {
        return true;
    }
    if dom::get_attribute(sel, "aria-hidden").is_some_and(|v| v == "true") {
        return true;
    }
    if dom::get_attribute(sel, "role").is_some_and(|r| r == "button" || r == "toolbar") {
        return true;
    }
    if dom::has_attribute(sel, "hidden") {
        return true;
    }
    DECORATIVE_CLASSES.iter().any(|c| dom::has_class_token(sel, c))
}

/// Element or one of its ancestors is chrome.
#[must_use]
pub fn is_within_chrome(sel: &Selection) -> bool {
    dom::closest(sel, |s| is_chrome(s)).is_some()
}

/// Class list marks the element as a UI surface rather than a message.
#[must_use]
pub fn has_non_message_class(sel: &Selection) -> bool {
    NON_MESSAGE_CLASSES.iter().any(|c| dom::has_class_token(sel, c))
}
