//! WASM bindings for verification-code autofill.
//!
//! This crate provides WebAssembly bindings for browser extensions and pages:
//! code extraction, field classification on the live DOM, autofill, and an
//! async request dispatcher for cross-context messaging.

mod dom;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use codefill_core::models::MailConfig;
use codefill_core::{
    CodefillConfig, Engine, FieldClassifier, FillPlan, MailMessage, PageSnapshot, Request,
    Session, TieredCodeExtractor, first_code, order_newest_first,
};

use dom::HandleTable;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Plain JS objects rather than `Map`s, so results survive `postMessage`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Extract a verification code from a message.
///
/// Returns `{ code, tier }`, or `null` when the message has no code.
#[wasm_bindgen]
pub fn extract_code(subject: &str, body: &str) -> Result<JsValue, JsValue> {
    let code = TieredCodeExtractor::new()
        .extract_text(subject, body)
        .map_err(js_error)?;

    to_js(&code)
}

/// Find the code field in a captured page snapshot.
///
/// Returns `{ field, tier }`, or `null` when the page has no code field.
#[wasm_bindgen]
pub fn classify_snapshot(snapshot: JsValue) -> Result<JsValue, JsValue> {
    let page: PageSnapshot = serde_wasm_bindgen::from_value(snapshot).map_err(js_error)?;
    let detection = FieldClassifier::new().detect(&page).map_err(js_error)?;

    to_js(&detection)
}

/// Handle a `{ kind, ... }` request object and resolve with the response.
///
/// Malformed requests reject the promise.
#[wasm_bindgen]
pub fn dispatch(request: JsValue) -> js_sys::Promise {
    future_to_promise(async move {
        let request: Request = serde_wasm_bindgen::from_value(request).map_err(js_error)?;
        let response = Engine::new().dispatch(request).await;
        to_js(&response)
    })
}

/// Code extractor class for browser use.
#[wasm_bindgen]
pub struct CodeExtractor {
    extractor: TieredCodeExtractor,
    mail: MailConfig,
}

#[wasm_bindgen]
impl CodeExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: TieredCodeExtractor::new(),
            mail: MailConfig::default(),
        }
    }

    /// Create an extractor from a configuration object.
    #[wasm_bindgen]
    pub fn with_config(config: JsValue) -> Result<CodeExtractor, JsValue> {
        let config: CodefillConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;

        Ok(Self {
            extractor: TieredCodeExtractor::from_config(&config.extraction),
            mail: config.mail,
        })
    }

    /// Extract a code from a plain-text message.
    #[wasm_bindgen]
    pub fn extract(&self, subject: &str, body: &str) -> Result<JsValue, JsValue> {
        let code = self
            .extractor
            .extract_text(subject, body)
            .map_err(js_error)?;

        to_js(&code)
    }

    /// Extract a code from a message whose body is HTML.
    #[wasm_bindgen]
    pub fn extract_html(&self, subject: &str, html: &str) -> Result<JsValue, JsValue> {
        let message = MailMessage::html(subject, html);
        let body = message.plain_body(self.mail.strip_html);
        let code = self
            .extractor
            .extract_text(subject, &body)
            .map_err(js_error)?;

        to_js(&code)
    }

    /// Search recent messages, newest first, for the first code.
    ///
    /// Returns `{ index, code }` where `index` counts in newest-first order,
    /// or `null`.
    #[wasm_bindgen]
    pub fn first_code(&self, messages: JsValue) -> Result<JsValue, JsValue> {
        let mut messages: Vec<MailMessage> =
            serde_wasm_bindgen::from_value(messages).map_err(js_error)?;
        order_newest_first(&mut messages);

        to_js(&first_code(&self.extractor, &messages, &self.mail))
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Watches the current document for a code field and fills it.
#[wasm_bindgen]
pub struct PageScanner {
    window: web_sys::Window,
    document: web_sys::Document,
    classifier: FieldClassifier,
    session: Session,
    handles: HandleTable,
}

#[wasm_bindgen]
impl PageScanner {
    /// Create a scanner bound to the current window.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PageScanner, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut session = Session::new();
        session.navigate(window.location().href()?);

        Ok(Self {
            window,
            document,
            classifier: FieldClassifier::new(),
            session,
            handles: HandleTable::default(),
        })
    }

    /// Forget the previous page. Call after a navigation.
    #[wasm_bindgen]
    pub fn navigate(&mut self, url: &str) {
        self.session.navigate(url);
    }

    /// Snapshot of the fillable elements on the page.
    #[wasm_bindgen]
    pub fn capture(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = dom::capture(&self.window, &self.document, &mut self.handles)?;
        to_js(&snapshot)
    }

    /// Classify the page and report how the result changed since the last scan.
    ///
    /// Returns a `{ event, ... }` object: `detected` carries the field,
    /// `unchanged`, `lost` and `idle` carry nothing.
    #[wasm_bindgen]
    pub fn scan(&mut self) -> Result<JsValue, JsValue> {
        let epoch = self.session.epoch();
        let snapshot = dom::capture(&self.window, &self.document, &mut self.handles)?;
        let detection = self.classifier.detect(&snapshot).map_err(js_error)?;
        let event = self.session.observe(epoch, detection.map(|d| d.field));

        to_js(&event)
    }

    /// Fill `code` into the code field on the page.
    ///
    /// The page is captured again first so handles match the current
    /// document. Returns the number of elements filled, 0 without a field.
    #[wasm_bindgen]
    pub fn fill(&mut self, code: &str) -> Result<usize, JsValue> {
        let snapshot = dom::capture(&self.window, &self.document, &mut self.handles)?;
        let Some(detection) = self.classifier.detect(&snapshot).map_err(js_error)? else {
            return Ok(0);
        };

        let plan = FillPlan::new(&detection.field, code);
        dom::apply(&plan, &self.handles)
    }
}
