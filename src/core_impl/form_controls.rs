use super::*;

pub(crate) fn is_form_control(element: &Element) -> bool {
    element.is_tag("input")
        || element.is_tag("select")
        || element.is_tag("textarea")
        || element.is_tag("button")
}

fn is_input_of_type(element: &Element, kind: &str) -> bool {
    element.input_type().is_some_and(|actual| actual == kind)
}

pub(crate) fn is_checkbox_input(element: &Element) -> bool {
    is_input_of_type(element, "checkbox")
}

pub(crate) fn is_radio_input(element: &Element) -> bool {
    is_input_of_type(element, "radio")
}

pub(crate) fn is_hidden_input(element: &Element) -> bool {
    is_input_of_type(element, "hidden")
}

/// Inputs that carry a value the user can type: everything except buttons,
/// hidden inputs and the checkable kinds.
pub(crate) fn is_text_entry_input(element: &Element) -> bool {
    match element.input_type().as_deref() {
        Some("button" | "submit" | "reset" | "image" | "hidden" | "radio" | "checkbox") => false,
        Some(_) => true,
        None => false,
    }
}
