//! Presentation surface the flag effects write to.
//!
//! Flag effects never touch a document directly. They address page
//! elements by stable id through [`PageSurface`], which a browser binding
//! implements over the live DOM (`web::DomSurface`) and which
//! [`PageModel`] implements in memory for tests and the headless demo.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tbd_types::Flag;

use crate::config::PageSettings;

/// Mutations the flag effects perform on the page.
///
/// Every operation is idempotent. Implementations decide what to do with
/// an id that does not resolve to an element; the provided ones skip it
/// and log a warning.
pub trait PageSurface {
    /// Add (`present == true`) or remove a class on the document body.
    fn set_body_class(&mut self, class: &str, present: bool);

    /// Add or remove a class on the element with id `id`.
    fn set_element_class(&mut self, id: &str, class: &str, present: bool);

    /// Replace the text content of the element with id `id`.
    fn set_text(&mut self, id: &str, text: &str);

    /// Show (`display: block`) or hide (`display: none`) an element.
    fn set_visible(&mut self, id: &str, visible: bool);

    /// Check or uncheck the checkbox with id `id`.
    fn set_checked(&mut self, id: &str, checked: bool);
}

impl<T: PageSurface + ?Sized> PageSurface for &mut T {
    fn set_body_class(&mut self, class: &str, present: bool) {
        (**self).set_body_class(class, present);
    }

    fn set_element_class(&mut self, id: &str, class: &str, present: bool) {
        (**self).set_element_class(id, class, present);
    }

    fn set_text(&mut self, id: &str, text: &str) {
        (**self).set_text(id, text);
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        (**self).set_visible(id, visible);
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        (**self).set_checked(id, checked);
    }
}

// ---------------------------------------------------------------------------
// In-memory page
// ---------------------------------------------------------------------------

/// State of a single element in a [`PageModel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    /// Classes currently on the element.
    pub classes: BTreeSet<String>,
    /// Text content.
    pub text: String,
    /// Whether the element is displayed.
    pub visible: bool,
    /// Checked state (meaningful for checkboxes only).
    pub checked: bool,
}

impl ElementState {
    /// A visible element with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// A hidden element.
    pub fn hidden() -> Self {
        Self::default()
    }

    /// A visible, unchecked checkbox.
    pub fn checkbox() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Whether `class` is on the element.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// An in-memory stand-in for the demo page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageModel {
    body_classes: BTreeSet<String>,
    elements: BTreeMap<String, ElementState>,
}

impl PageModel {
    /// An empty page with no elements.
    pub const fn new() -> Self {
        Self {
            body_classes: BTreeSet::new(),
            elements: BTreeMap::new(),
        }
    }

    /// The demo page as served: title with the classic header text, both
    /// panels hidden, and one unchecked checkbox per flag.
    pub fn standard(settings: &PageSettings) -> Self {
        let mut page = Self::new();
        page.insert(
            settings.title_id.clone(),
            ElementState::with_text(settings.classic_header_text.clone()),
        );
        page.insert(settings.analytics_id.clone(), ElementState::hidden());
        page.insert(settings.premium_id.clone(), ElementState::hidden());
        for flag in Flag::ALL {
            page.insert(flag.key(), ElementState::checkbox());
        }
        page
    }

    /// Add or replace an element.
    pub fn insert(&mut self, id: impl Into<String>, element: ElementState) {
        self.elements.insert(id.into(), element);
    }

    /// The element with id `id`.
    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    /// Whether `class` is on the body.
    pub fn body_has_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    /// Text of the element with id `id`.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    /// Whether the element with id `id` is displayed.
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.visible)
    }

    /// Checked state of the checkbox with id `id`.
    pub fn is_checked(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.checked)
    }

    /// Plain-text summary of the page: body classes, then one line per
    /// element in id order.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut ElementState> {
        let element = self.elements.get_mut(id);
        if element.is_none() {
            tracing::warn!(id, "page element not found");
        }
        element
    }
}

impl fmt::Display for PageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<&str> = self.body_classes.iter().map(String::as_str).collect();
        writeln!(f, "body [{}]", body.join(" "))?;
        for (id, element) in &self.elements {
            let shown = if element.visible { "shown" } else { "hidden" };
            write!(f, "#{id} {shown}")?;

            let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
            if !classes.is_empty() {
                write!(f, " .{}", classes.join(" ."))?;
            }
            if Flag::from_key(id).is_some() {
                write!(f, " [{}]", if element.checked { "x" } else { " " })?;
            }
            if !element.text.is_empty() {
                write!(f, " \"{}\"", element.text)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl PageSurface for PageModel {
    fn set_body_class(&mut self, class: &str, present: bool) {
        if present {
            self.body_classes.insert(class.to_owned());
        } else {
            self.body_classes.remove(class);
        }
    }

    fn set_element_class(&mut self, id: &str, class: &str, present: bool) {
        if let Some(element) = self.element_mut(id) {
            if present {
                element.classes.insert(class.to_owned());
            } else {
                element.classes.remove(class);
            }
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(element) = self.element_mut(id) {
            text.clone_into(&mut element.text);
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(element) = self.element_mut(id) {
            element.visible = visible;
        }
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        if let Some(element) = self.element_mut(id) {
            element.checked = checked;
        }
    }
}
