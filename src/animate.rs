//! Decorative effects: the floating terminal toggle, the hero-title
//! typewriter, scroll-triggered reveals, and the fake service status
//! blinker. None of these touch router, theme, or terminal state.

use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry};

const FLOAT_TICK_MS: u32 = 100;
const FLOAT_START_PX: i32 = 30;
const FLOAT_MIN_PX: i32 = 20;
const FLOAT_MAX_PX: i32 = 40;
const TYPE_TICK_MS: u32 = 50;
const STATUS_TICK_MS: u32 = 10_000;
const OFFLINE_THRESHOLD: f64 = 0.95;

thread_local! {
    static REVEAL_OBSERVER: RefCell<Option<IntersectionObserver>> = const { RefCell::new(None) };
}

/// Pixel offset bouncing between fixed bounds, one step per tick.
pub struct FloatBob {
    offset: i32,
    dir: i32,
}

impl FloatBob {
    pub fn new(start: i32) -> Self {
        FloatBob {
            offset: start,
            dir: 1,
        }
    }

    pub fn step(&mut self) -> i32 {
        self.offset += self.dir;
        if self.offset > FLOAT_MAX_PX || self.offset < FLOAT_MIN_PX {
            self.dir = -self.dir;
        }
        self.offset
    }
}

/// Character-by-character reveal of a fixed string.
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Typewriter {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.chars.get(self.shown).copied()?;
        self.shown += 1;
        Some(ch)
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }
}

/// Status sampled once per tick; anything above the threshold reads as a
/// brief outage.
pub fn service_online(sample: f64) -> bool {
    sample <= OFFLINE_THRESHOLD
}

pub fn add_animations() -> Result<(), JsValue> {
    start_toggle_float();
    start_title_typewriter();
    observe_scroll_reveals()?;
    Ok(())
}

fn start_toggle_float() {
    let toggle = match query_html(".terminal-toggle") {
        Some(el) => el,
        None => return,
    };
    let mut bob = FloatBob::new(FLOAT_START_PX);
    Interval::new(FLOAT_TICK_MS, move || {
        let _ = toggle
            .style()
            .set_property("bottom", &format!("{}px", bob.step()));
    })
    .forget();
}

fn start_title_typewriter() {
    let title = match query_html(".hero-title") {
        Some(el) => el,
        None => return,
    };
    let text = title.text_content().unwrap_or_default();
    title.set_text_content(Some(""));

    let mut writer = Typewriter::new(&text);
    let mut buffer = String::new();
    let handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let slot = handle.clone();
    let interval = Interval::new(TYPE_TICK_MS, move || match writer.next_char() {
        Some(ch) => {
            buffer.push(ch);
            title.set_text_content(Some(&buffer));
        }
        None => {
            slot.borrow_mut().take();
        }
    });
    *handle.borrow_mut() = Some(interval);
}

fn observe_scroll_reveals() -> Result<(), JsValue> {
    let doc = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return Ok(()),
    };

    let on_intersect = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::wrap(Box::new(
        |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    if entry.is_intersecting() {
                        let _ = entry.target().class_list().add_1("animate-in");
                    }
                }
            }
        },
    ));
    let options = web_sys::IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    options.set_root_margin("0px 0px -50px 0px");
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();

    for selector in [".card", ".section-title", ".skill-category"] {
        let nodes = doc.query_selector_all(selector)?;
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                observer.observe(&el);
            }
        }
    }

    REVEAL_OBSERVER.with(|slot| *slot.borrow_mut() = Some(observer));
    Ok(())
}

/// Periodically flip `.service-status` badges between Online and a rare
/// Offline blip.
pub fn simulate_service_status() {
    Interval::new(STATUS_TICK_MS, || {
        let doc = match web_sys::window().and_then(|w| w.document()) {
            Some(d) => d,
            None => return,
        };
        let nodes = match doc.query_selector_all(".service-status") {
            Ok(nodes) => nodes,
            Err(_) => return,
        };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                apply_status(&el, service_online(js_sys::Math::random()));
            }
        }
    })
    .forget();
}

fn apply_status(el: &Element, online: bool) {
    let classes = el.class_list();
    if online {
        let _ = classes.add_1("online");
        el.set_inner_html("<i class=\"fas fa-circle\"></i> Online");
    } else {
        let _ = classes.remove_1("online");
        el.set_inner_html("<i class=\"fas fa-circle\"></i> Offline");
    }
}

fn query_html(selector: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}
