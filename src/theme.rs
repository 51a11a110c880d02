use crate::prefs::{LocalStore, Store};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

/// Themes the switcher offers controls for. `set_theme` itself accepts
/// any name; unknown names simply have no styling attached.
pub const THEMES: [&str; 4] = ["green", "amber", "blue", "purple"];
pub const DEFAULT_THEME: &str = "green";

const THEME_KEY: &str = "portfolio-theme";
const FADE_MS: u32 = 300;

pub fn saved_theme(store: &dyn Store) -> String {
    store
        .get(THEME_KEY)
        .unwrap_or_else(|| DEFAULT_THEME.to_string())
}

pub fn remember_theme(store: &dyn Store, name: &str) {
    store.set(THEME_KEY, name);
}

/// Apply a theme document-wide and run the cosmetic fade.
pub fn set_theme(name: &str) {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    if let Some(root) = doc.document_element() {
        let _ = root.set_attribute("data-theme", name);
    }
    if let Some(body) = doc.body() {
        let _ = body.style().set_property("opacity", "0.8");
        let restore = body.clone();
        Timeout::new(FADE_MS, move || {
            let _ = restore.style().set_property("opacity", "1");
        })
        .forget();
    }
}

/// Apply the persisted theme and wire up the `.theme-option` controls.
pub fn init_theme_switcher() -> Result<(), JsValue> {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return Ok(()),
    };

    let saved = saved_theme(&LocalStore);
    set_theme(&saved);
    mark_active_option(&saved);

    let options = doc.query_selector_all(".theme-option")?;
    for i in 0..options.length() {
        let el = match options.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => continue,
        };
        let name = match el.get_attribute("data-theme") {
            Some(name) => name,
            None => continue,
        };
        let on_click = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            set_theme(&name);
            remember_theme(&LocalStore, &name);
            mark_active_option(&name);
        }));
        el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

fn mark_active_option(name: &str) {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let options = match doc.query_selector_all(".theme-option") {
        Ok(list) => list,
        Err(_) => return,
    };
    for i in 0..options.length() {
        if let Some(el) = options.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            let matches = el.get_attribute("data-theme").as_deref() == Some(name);
            let classes = el.class_list();
            if matches {
                let _ = classes.add_1("active");
            } else {
                let _ = classes.remove_1("active");
            }
        }
    }
}
