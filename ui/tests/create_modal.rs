//! Browser tests for the create-instance modal's dismissal rules
//!
//! Run with `wasm-pack test --headless --firefox ui`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use grist_manager_shared::InstanceStore;
use grist_manager_ui::client::{GristApi, Latency, MockClient};
use grist_manager_ui::components::instances::CreateInstanceModal;
use grist_manager_ui::state::AppState;
use leptos::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, EventInit, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

struct Mounted {
    root: HtmlElement,
    store: Rc<RefCell<InstanceStore>>,
    closed: Rc<Cell<u32>>,
}

fn mount_modal() -> Mounted {
    let document = web_sys::window().unwrap().document().unwrap();
    let root: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    document.body().unwrap().append_child(&root).unwrap();

    let store = Rc::new(RefCell::new(InstanceStore::seeded()));
    let closed = Rc::new(Cell::new(0));

    let client_store = store.clone();
    let on_close_count = closed.clone();
    mount_to(root.clone(), move || {
        let api: Rc<dyn GristApi> =
            Rc::new(MockClient::with_shared_store(client_store, Latency::DEMO));
        provide_context(AppState::new(api));
        let on_close = move || on_close_count.set(on_close_count.get() + 1);
        view! { <CreateInstanceModal on_close=on_close /> }
    });

    Mounted { root, store, closed }
}

fn element(root: &HtmlElement, selector: &str) -> HtmlElement {
    root.query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element for {}", selector))
        .unchecked_into()
}

#[allow(deprecated)]
fn fill_form(root: &HtmlElement) {
    let values = [
        "QA Grist",
        "qa-team",
        "https://qa.grist.example.com",
        "qa@example.com",
        "secret123",
    ];
    let inputs = root.query_selector_all("input").unwrap();
    for (index, value) in values.iter().enumerate() {
        let input: HtmlInputElement = inputs.item(index as u32).unwrap().unchecked_into();
        input.set_value(value);
        let event = Event::new_with_event_init_dict("input", EventInit::new().bubbles(true)).unwrap();
        input.dispatch_event(&event).unwrap();
    }
}

#[wasm_bindgen_test]
async fn test_backdrop_closes_idle_modal() {
    let mounted = mount_modal();

    element(&mounted.root, "div.backdrop-blur-sm").click();
    assert_eq!(mounted.closed.get(), 1);
}

#[wasm_bindgen_test]
async fn test_dismissal_ignored_while_submitting() {
    let mounted = mount_modal();
    fill_form(&mounted.root);

    element(&mounted.root, "button[type=submit]").click();
    TimeoutFuture::new(50).await;
    assert_eq!(mounted.store.borrow().len(), 3);

    element(&mounted.root, "div.backdrop-blur-sm").click();
    // Header close button
    element(&mounted.root, "button").click();
    assert_eq!(mounted.closed.get(), 0);

    // The modal closes itself once the create call lands
    TimeoutFuture::new(Latency::DEMO.create + 500).await;
    assert_eq!(mounted.store.borrow().len(), 4);
    assert_eq!(mounted.closed.get(), 1);
}
