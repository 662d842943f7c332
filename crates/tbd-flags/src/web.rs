//! Browser bindings: `localStorage`, the live document, and DOM toasts.
//!
//! Compiled only with the `web` feature. A host page builds a
//! [`FlagStore`](crate::FlagStore) from [`LocalStorage`] and [`DomSurface`]
//! and calls into it from its checkbox and button handlers.

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Storage, Window};

use crate::error::StorageError;
use crate::presentation::PageSurface;
use crate::storage::KeyValueStore;
use crate::toast::Notifier;

fn js_error(context: &str, value: &JsValue) -> StorageError {
    StorageError::Unavailable(format!("{context}: {value:?}"))
}

fn window() -> Result<Window, StorageError> {
    web_sys::window().ok_or_else(|| StorageError::Unavailable("no global window".to_owned()))
}

fn document() -> Result<Document, StorageError> {
    window()?
        .document()
        .ok_or_else(|| StorageError::Unavailable("window has no document".to_owned()))
}

// =========================================================================
// LocalStorage
// =========================================================================

/// [`KeyValueStore`] over `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Bind to the current window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a browser window or
    /// when the browser denies storage access.
    pub fn from_window() -> Result<Self, StorageError> {
        let storage = window()?
            .local_storage()
            .map_err(|e| js_error("localStorage access denied", &e))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_owned()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("localStorage.getItem failed", &e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("localStorage.setItem failed", &e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("localStorage.removeItem failed", &e))
    }
}

// =========================================================================
// DomSurface
// =========================================================================

/// [`PageSurface`] over the live document.
///
/// Ids that do not resolve, or resolve to the wrong kind of element, are
/// skipped with a warning.
#[derive(Debug, Clone)]
pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    /// Bind to the current window's document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a browser window.
    pub fn from_window() -> Result<Self, StorageError> {
        Ok(Self {
            document: document()?,
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            tracing::warn!(id, "page element not found");
        }
        element
    }
}

fn toggle_class(element: &Element, class: &str, present: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, present) {
        tracing::warn!(class, error = ?e, "failed to update class list");
    }
}

impl PageSurface for DomSurface {
    fn set_body_class(&mut self, class: &str, present: bool) {
        match self.document.body() {
            Some(body) => toggle_class(&body, class, present),
            None => tracing::warn!("document has no body"),
        }
    }

    fn set_element_class(&mut self, id: &str, class: &str, present: bool) {
        if let Some(element) = self.element(id) {
            toggle_class(&element, class, present);
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        let Some(element) = self.element(id) else {
            return;
        };
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            tracing::warn!(id, "element is not an HTML element");
            return;
        };
        let display = if visible { "block" } else { "none" };
        if let Err(e) = html.style().set_property("display", display) {
            tracing::warn!(id, error = ?e, "failed to set display");
        }
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        if let Some(input) = self
            .element(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(checked);
        }
    }
}

// =========================================================================
// DomToaster
// =========================================================================

/// [`Notifier`] that shows a `div.toast` and removes it after a delay.
#[derive(Debug, Clone)]
pub struct DomToaster {
    document: Document,
    duration: Duration,
}

impl DomToaster {
    /// Bind to the current window's document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a browser window.
    pub fn from_window(duration: Duration) -> Result<Self, StorageError> {
        Ok(Self {
            document: document()?,
            duration,
        })
    }

    fn try_show(&self, message: &str) -> Result<(), JsValue> {
        if let Some(existing) = self.document.query_selector(".toast")? {
            existing.remove();
        }

        let toast = self.document.create_element("div")?;
        toast.set_class_name("toast");
        toast.set_text_content(Some(message));
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&toast)?;

        let timeout_ms = i32::try_from(self.duration.as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || toast.remove());
        window()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_ms,
            )?;
        Ok(())
    }
}

impl Notifier for DomToaster {
    fn show_message(&mut self, message: &str) {
        if let Err(e) = self.try_show(message) {
            tracing::warn!(error = ?e, "failed to show toast");
        }
    }
}
