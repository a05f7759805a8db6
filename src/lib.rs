//! Attribute-driven form validation over a deterministic in-memory DOM.
//!
//! A [`Document`] is parsed from HTML and holds live form-control state. A
//! [`FormValidator`] binds to one container inside it, derives per-field
//! validity from attributes (`required`, `pattern`, `type`, `data-validator`,
//! `data-equalto`), and toggles error classes, accessibility attributes and
//! global error regions in place.
//!
//! ```
//! use form_abide::{ConfigOverrides, Document, FormValidator, Result};
//!
//! fn main() -> Result<()> {
//!     let mut doc = Document::from_html(
//!         r#"<form id='signup'>
//!              <input id='nick' type='text' pattern='alpha' required>
//!              <span class='form-error'>Letters only</span>
//!            </form>"#,
//!     )?;
//!     let form = doc.select_one("#signup")?;
//!     let mut validator = FormValidator::new(&mut doc, form, ConfigOverrides::default())?;
//!
//!     let events = doc.type_text("#nick", "abc123")?;
//!     validator.handle_events(&mut doc, &events)?;
//!
//!     let nick = doc.select_one("#nick")?;
//!     assert!(doc.has_class(nick, "is-invalid-input"));
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod abide;
mod core_dom_utils;
mod core_impl;
mod document;
mod js_regex;
mod runtime_state;
mod selector;


pub(crate) use core_dom_utils::*;
pub(crate) use core_impl::*;
pub(crate) use runtime_state::*;
pub(crate) use selector::*;

pub use abide::{
    A11yLevel, ConfigOverrides, EventOutcome, FieldValidator, FormValidator, Pattern,
    PatternSet, ValidateOn, ValidatorConfig, ValidatorRegistry,
};
pub use core_dom_utils::NodeId;
pub use document::Document;
pub use runtime_state::{DomEvent, UiEvent, UiEventKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    NotAnElement(String),
    TypeMismatch {
        target: String,
        expected: String,
        actual: String,
    },
    InvalidPattern {
        pattern: String,
        message: String,
    },
    PatternRuntime {
        pattern: String,
        message: String,
    },
    UnknownValidator {
        name: String,
        field: String,
    },
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::NotAnElement(operation) => write!(f, "{operation} target is not an element"),
            Self::TypeMismatch {
                target,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {target}: expected {expected}, actual {actual}"
            ),
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern /{pattern}/: {message}")
            }
            Self::PatternRuntime { pattern, message } => {
                write!(f, "pattern /{pattern}/ failed while matching: {message}")
            }
            Self::UnknownValidator { name, field } => {
                write!(f, "unknown validator `{name}` referenced by {field}")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid validator config: {msg}"),
        }
    }
}

impl StdError for Error {}
