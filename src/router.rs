use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

pub const PAGES: [&str; 5] = ["home", "about", "projects", "services", "contact"];
pub const HOME_PAGE: &str = "home";

thread_local! {
    static ROUTER: RefCell<Router> = RefCell::new(Router::new());
}

/// Active-page state. Exactly one page is active at any time; unknown
/// identifiers are rejected without touching anything.
pub struct Router {
    active: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Router {
            active: HOME_PAGE.to_string(),
        }
    }

    pub fn is_known(page: &str) -> bool {
        PAGES.contains(&page)
    }

    /// Switch the active page. Returns `false` (state unchanged) for
    /// identifiers outside the page set.
    pub fn navigate(&mut self, page: &str) -> bool {
        if Self::is_known(page) {
            self.active = page.to_string();
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }
}

/// Page identifier carried by a location fragment, defaulting to home
/// when the fragment is absent or empty.
pub fn page_from_hash(hash: &str) -> &str {
    let page = hash.strip_prefix('#').unwrap_or(hash);
    if page.is_empty() {
        HOME_PAGE
    } else {
        page
    }
}

/// Navigate from a user action: push a history entry and re-project the
/// active state into the document. Unknown targets are a no-op.
pub fn navigate(page: &str) {
    let changed = ROUTER.with(|r| r.borrow_mut().navigate(page));
    if !changed {
        return;
    }
    push_fragment(page);
    apply_active(page);
}

/// Wire up nav links, the initial fragment, and back/forward handling.
pub fn init_navigation() -> Result<(), JsValue> {
    let win = match web_sys::window() {
        Some(w) => w,
        None => return Ok(()),
    };
    let doc = match win.document() {
        Some(d) => d,
        None => return Ok(()),
    };

    let links = doc.query_selector_all(".nav-link")?;
    for i in 0..links.length() {
        let el = match links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => continue,
        };
        let page = match el.get_attribute("href") {
            Some(href) => href.trim_start_matches('#').to_string(),
            None => continue,
        };
        let on_click = Closure::<dyn FnMut(_)>::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            navigate(&page);
        }));
        el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    // Initial page from the current fragment; no history push so the
    // landing entry is not duplicated.
    let hash = win.location().hash().unwrap_or_default();
    ROUTER.with(|r| {
        let mut router = r.borrow_mut();
        router.navigate(page_from_hash(&hash));
        apply_active(router.active());
    });

    let on_popstate = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: web_sys::Event| {
        let hash = match web_sys::window() {
            Some(w) => w.location().hash().unwrap_or_default(),
            None => return,
        };
        let page = page_from_hash(&hash).to_string();
        ROUTER.with(|r| {
            let mut router = r.borrow_mut();
            if router.navigate(&page) {
                apply_active(router.active());
            }
        });
    }));
    win.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
    on_popstate.forget();
    Ok(())
}

fn push_fragment(page: &str) {
    if let Some(win) = web_sys::window() {
        if let Ok(history) = win.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{}", page)));
        }
    }
}

fn apply_active(page: &str) {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let target_href = format!("#{}", page);
    if let Ok(links) = doc.query_selector_all(".nav-link") {
        for i in 0..links.length() {
            if let Some(el) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let on = el.get_attribute("href").as_deref() == Some(target_href.as_str());
                set_active(&el, on);
            }
        }
    }
    if let Ok(pages) = doc.query_selector_all(".page") {
        for i in 0..pages.length() {
            if let Some(el) = pages.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                set_active(&el, el.id() == page);
            }
        }
    }
}

fn set_active(el: &Element, on: bool) {
    let classes = el.class_list();
    if on {
        let _ = classes.add_1("active");
    } else {
        let _ = classes.remove_1("active");
    }
}
