//! Terminal overlay view. Owns the session in a thread-local cell,
//! projects the output log into the DOM, and drives running scans on
//! their 800 ms cadence.

use crate::scan;
use crate::terminal::{Clock, Session};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

const OVERLAY_ID: &str = "terminalOverlay";
const INPUT_ID: &str = "terminalCommand";
const OUTPUT_ID: &str = "terminalOutput";

thread_local! {
    static CONSOLE: RefCell<Option<Console>> = const { RefCell::new(None) };
}

struct Console {
    session: Session,
    rendered: usize,
    shown_generation: u32,
}

struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> String {
        String::from(js_sys::Date::new_0().to_string())
    }
}

/// Create the session and wire the input field. Replaces any previous
/// session wholesale.
pub fn init_terminal() -> Result<(), JsValue> {
    CONSOLE.with(|slot| {
        *slot.borrow_mut() = Some(Console {
            session: Session::new(Box::new(JsClock)),
            rendered: 0,
            shown_generation: 0,
        });
    });
    with_console(sync_output);

    let input = match input_element() {
        Some(input) => input,
        None => return Ok(()),
    };
    let field = input.clone();
    let on_key = Closure::<dyn FnMut(_)>::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
        match e.key().as_str() {
            "Enter" => {
                let raw = field.value();
                field.set_value("");
                let outcome = with_console(|console| {
                    let outcome = console.session.submit(&raw);
                    sync_output(console);
                    outcome
                });
                if let Some(outcome) = outcome {
                    if let Some(id) = outcome.scan {
                        start_scan_timer(id);
                    }
                    if outcome.close {
                        close_terminal();
                    }
                }
            }
            "ArrowUp" => {
                e.prevent_default();
                if let Some(Some(entry)) = with_console(|c| c.session.recall_previous()) {
                    field.set_value(&entry);
                }
            }
            "ArrowDown" => {
                e.prevent_default();
                if let Some(entry) = with_console(|c| c.session.recall_next()) {
                    match entry {
                        Some(entry) => field.set_value(&entry),
                        None => field.set_value(""),
                    }
                }
            }
            _ => {}
        }
    }));
    input.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

#[wasm_bindgen]
pub fn open_terminal() {
    if let Some(overlay) = overlay_element() {
        let _ = overlay.class_list().add_1("active");
    }
    if let Some(input) = input_element() {
        let _ = input.focus();
    }
}

#[wasm_bindgen]
pub fn close_terminal() {
    if let Some(overlay) = overlay_element() {
        let _ = overlay.class_list().remove_1("active");
    }
}

#[wasm_bindgen]
pub fn minimize_terminal() {
    close_terminal();
}

fn with_console<R>(f: impl FnOnce(&mut Console) -> R) -> Option<R> {
    CONSOLE.with(|slot| slot.borrow_mut().as_mut().map(f))
}

/// One interval per scan invocation; the handle drops itself once its
/// sequence reports completion.
fn start_scan_timer(id: u32) {
    let handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let slot = handle.clone();
    let interval = Interval::new(scan::SCAN_TICK_MS, move || {
        let more = with_console(|console| {
            let more = console.session.advance_scan(id);
            sync_output(console);
            more
        })
        .unwrap_or(false);
        if !more {
            slot.borrow_mut().take();
        }
    });
    *handle.borrow_mut() = Some(interval);
}

/// Append lines the DOM has not seen yet; a generation bump means the
/// log was cleared and the container starts over. Always scroll to the
/// tail afterwards.
fn sync_output(console: &mut Console) {
    let doc = match document() {
        Some(d) => d,
        None => return,
    };
    let output = match output_element() {
        Some(el) => el,
        None => return,
    };
    if console.shown_generation != console.session.generation() {
        output.set_inner_html("");
        console.rendered = 0;
        console.shown_generation = console.session.generation();
    }
    let lines = console.session.lines();
    for line in &lines[console.rendered..] {
        if let Ok(div) = doc.create_element("div") {
            div.set_class_name("terminal-line");
            div.set_inner_html(line);
            let _ = output.append_child(&div);
        }
    }
    console.rendered = lines.len();
    output.set_scroll_top(output.scroll_height());
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn overlay_element() -> Option<Element> {
    document()?.get_element_by_id(OVERLAY_ID)
}

fn input_element() -> Option<HtmlInputElement> {
    document()?
        .get_element_by_id(INPUT_ID)?
        .dyn_into::<HtmlInputElement>()
        .ok()
}

fn output_element() -> Option<HtmlElement> {
    document()?
        .get_element_by_id(OUTPUT_ID)?
        .dyn_into::<HtmlElement>()
        .ok()
}
