use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Page entry point: install the panic hook, then bring up navigation,
/// theme switching, the terminal, and the decorative effects.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    stamp_last_updated();
    crate::router::init_navigation()?;
    crate::theme::init_theme_switcher()?;
    crate::console::init_terminal()?;
    crate::animate::add_animations()?;
    crate::animate::simulate_service_status();
    install_shortcuts()?;
    web_sys::console::log_1(&JsValue::from_str("Portfolio loaded"));
    Ok(())
}

/// Copy a string to the clipboard and confirm with an alert. Exposed for
/// the contact-card buttons.
#[wasm_bindgen]
pub fn copy_to_clipboard(text: String) {
    spawn_local(async move {
        let win = match web_sys::window() {
            Some(w) => w,
            None => return,
        };
        let clipboard = win.navigator().clipboard();
        if JsFuture::from(clipboard.write_text(&text)).await.is_ok() {
            let _ = win.alert_with_message(&format!("Copied to clipboard: {}", text));
        }
    });
}

fn stamp_last_updated() {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("current-date") {
            let date = String::from(js_sys::Date::new_0().to_date_string());
            el.set_text_content(Some(&format!("Last updated: {}", date)));
        }
    }
}

// Ctrl+T opens the terminal, Escape closes it.
fn install_shortcuts() -> Result<(), JsValue> {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return Ok(()),
    };
    let on_key = Closure::<dyn FnMut(_)>::wrap(Box::new(|e: web_sys::KeyboardEvent| {
        if e.ctrl_key() && e.key() == "t" {
            e.prevent_default();
            crate::console::open_terminal();
        }
        if e.key() == "Escape" {
            crate::console::close_terminal();
        }
    }));
    doc.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}
