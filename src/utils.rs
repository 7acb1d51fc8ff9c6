use leptos::web_sys::HtmlInputElement;
use wasm_bindgen::JsCast;

/// Current value of the `<select>`/`<input>` behind an event. The unchecked
/// cast is fine for any element with a `value` property.
pub fn select_value(ev: &leptos::ev::Event) -> String {
    ev.target()
        .map(|t| t.unchecked_into::<HtmlInputElement>().value())
        .unwrap_or_default()
}
