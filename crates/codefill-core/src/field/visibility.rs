//! Visibility and interactivity predicate shared by every classifier tier.

use crate::models::page::ElementSnapshot;

/// Whether a user could see and type into the element.
///
/// Hidden, disabled and read-only controls are excluded, as are elements
/// with no rendered area or a computed style of `display: none`,
/// `visibility: hidden` or `opacity: 0`.
pub fn is_visible(element: &ElementSnapshot) -> bool {
    if element.has_attr("hidden") || element.has_attr("disabled") || element.has_attr("readonly") {
        return false;
    }
    if element.input_type().as_deref() == Some("hidden") {
        return false;
    }
    if !element.rect.has_area() {
        return false;
    }

    let style = &element.style;
    !style.display.trim().eq_ignore_ascii_case("none")
        && !style.visibility.trim().eq_ignore_ascii_case("hidden")
        && style.opacity > 0.0
}
