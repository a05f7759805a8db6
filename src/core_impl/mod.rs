use super::*;

mod dom;
mod form_controls;
mod html;

pub(crate) use form_controls::*;
pub(crate) use html::parse_html;
