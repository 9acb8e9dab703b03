//! Abstract browser-automation host.
//!
//! Components and pages are written against the [`Driver`] trait, which
//! captures the element query/wait/act primitives the suite consumes. The
//! default implementation is [`CdpDriver`] over the Chrome DevTools
//! Protocol (feature `browser`); the hermetic test suite runs against the
//! scripted storefront in [`crate::mock`] instead. Every call is one
//! command on the host's serialized queue: effects are ordered strictly by
//! call order, and exactly one logical actor mutates the page at a time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dialog::DialogHandler;
use crate::locator::Selector;
use crate::result::ComprarResult;
use crate::session::SessionSnapshot;

/// Opaque handle to a resolved element.
///
/// Handles are only valid against the driver that produced them and only
/// for the page render they were resolved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    /// Create a handle from a driver-assigned id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file to attach to a file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name as the page will see it
    pub name: String,
    /// MIME type
    pub mime: String,
    /// File contents
    pub content: Vec<u8>,
}

impl FilePayload {
    /// Create a payload from name, MIME type and contents
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            content,
        }
    }

    /// Convenience constructor for a plain-text file
    #[must_use]
    pub fn text(name: impl Into<String>, content: &str) -> Self {
        Self::new(name, "text/plain", content.as_bytes().to_vec())
    }
}

/// Browser-automation host primitives.
///
/// Implementations must serialize commands: callers rely on FIFO effect
/// ordering. No method retries internally; failures propagate to the
/// caller.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to a URL and wait for the page load
    async fn visit(&self, url: &str) -> ComprarResult<()>;

    /// Current page URL
    async fn current_url(&self) -> ComprarResult<String>;

    /// Reload the current page
    async fn reload(&self) -> ComprarResult<()>;

    /// All elements currently matching a selector, in document order
    async fn find(&self, selector: &Selector) -> ComprarResult<Vec<ElementId>>;

    /// Matching descendants of a previously resolved element
    async fn find_within(
        &self,
        parent: &ElementId,
        selector: &Selector,
    ) -> ComprarResult<Vec<ElementId>>;

    /// Click an element
    async fn click(&self, element: &ElementId) -> ComprarResult<()>;

    /// Type text into an element
    async fn type_text(&self, element: &ElementId, text: &str) -> ComprarResult<()>;

    /// Clear an input element
    async fn clear(&self, element: &ElementId) -> ComprarResult<()>;

    /// Select a dropdown option by its visible label
    async fn select_option(&self, element: &ElementId, label: &str) -> ComprarResult<()>;

    /// Scroll an element into the visible viewport
    async fn scroll_into_view(&self, element: &ElementId) -> ComprarResult<()>;

    /// Whether the element is rendered visible
    async fn is_visible(&self, element: &ElementId) -> ComprarResult<bool>;

    /// Whether the element is enabled (not disabled)
    async fn is_enabled(&self, element: &ElementId) -> ComprarResult<bool>;

    /// Rendered text content of the element
    async fn text(&self, element: &ElementId) -> ComprarResult<String>;

    /// Native constraint-validation message of the element.
    ///
    /// Empty string means the element currently satisfies its constraints.
    async fn validation_message(&self, element: &ElementId) -> ComprarResult<String>;

    /// Attach files to a file input
    async fn attach_files(
        &self,
        element: &ElementId,
        files: &[FilePayload],
    ) -> ComprarResult<()>;

    /// Names of the files currently attached to a file input
    async fn attached_file_names(&self, element: &ElementId) -> ComprarResult<Vec<String>>;

    /// Clear cookies and storage (fresh state between test cases)
    async fn clear_session_state(&self) -> ComprarResult<()>;

    /// Snapshot cookies and local storage
    async fn snapshot_session(&self) -> ComprarResult<SessionSnapshot>;

    /// Restore a previously captured session snapshot
    async fn restore_session(&self, snapshot: &SessionSnapshot) -> ComprarResult<()>;

    /// The dialog-capture hook for this driver
    fn dialogs(&self) -> DialogHandler;
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(
    clippy::wildcard_imports,
    clippy::significant_drop_tightening,
    clippy::missing_errors_doc,
    clippy::items_after_statements
)]
mod cdp {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::dialog::{Dialog, DialogAction, DialogType};
    use crate::result::ComprarError;
    use crate::session::Cookie;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
    use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
    use chromiumoxide::cdp::browser_protocol::network::CookieParam;
    use chromiumoxide::cdp::browser_protocol::page::{
        EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
    };
    use chromiumoxide::element::Element;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Driver over a real Chromium instance via the DevTools Protocol
    pub struct CdpDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: Arc<Mutex<CdpPage>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
        #[allow(dead_code)]
        dialog_task: tokio::task::JoinHandle<()>,
        elements: Arc<Mutex<HashMap<String, Element>>>,
        next_id: AtomicU64,
        dialogs: DialogHandler,
        dialog_open: Arc<AtomicBool>,
    }

    impl std::fmt::Debug for CdpDriver {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CdpDriver")
                .field("dialog_open", &self.dialog_open.load(Ordering::SeqCst))
                .finish_non_exhaustive()
        }
    }

    impl CdpDriver {
        /// Launch a browser per the suite config and open a blank page.
        ///
        /// # Errors
        ///
        /// Returns an error if the browser cannot be launched or the page
        /// cannot be created.
        pub async fn launch(config: &SuiteConfig) -> ComprarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .args(config.browser_args());

            if !config.headless {
                builder = builder.with_head();
            }
            if let Ok(path) = std::env::var("CHROMIUM_PATH") {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| ComprarError::BrowserLaunchError { message: e })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                ComprarError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ComprarError::PageError {
                    message: e.to_string(),
                })?;

            let dialogs = DialogHandler::new();
            let dialog_open = Arc::new(AtomicBool::new(false));
            let dialog_task = Self::spawn_dialog_router(
                page.clone(),
                dialogs.clone(),
                Arc::clone(&dialog_open),
            )
            .await?;

            Ok(Self {
                browser: Arc::new(Mutex::new(browser)),
                page: Arc::new(Mutex::new(page)),
                handle,
                dialog_task,
                elements: Arc::new(Mutex::new(HashMap::new())),
                next_id: AtomicU64::new(0),
                dialogs,
                dialog_open,
            })
        }

        /// Route native dialogs through the shared handler. Pending dialogs
        /// stay open: the page is blocked until something dismisses them,
        /// and subsequent commands fail with `DialogBlocked`.
        async fn spawn_dialog_router(
            page: CdpPage,
            dialogs: DialogHandler,
            dialog_open: Arc<AtomicBool>,
        ) -> ComprarResult<tokio::task::JoinHandle<()>> {
            let mut events = page
                .event_listener::<EventJavascriptDialogOpening>()
                .await
                .map_err(|e| ComprarError::ConnectionFailed {
                    message: e.to_string(),
                })?;

            Ok(tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    let dialog_type = if format!("{:?}", event.r#type).contains("Confirm") {
                        DialogType::Confirm
                    } else {
                        DialogType::Alert
                    };
                    let handled =
                        dialogs.handle(Dialog::new(dialog_type, event.message.clone()));
                    match handled.action() {
                        DialogAction::Accept => {
                            let _ = page
                                .execute(HandleJavaScriptDialogParams::new(true))
                                .await;
                        }
                        DialogAction::Dismiss => {
                            let _ = page
                                .execute(HandleJavaScriptDialogParams::new(false))
                                .await;
                        }
                        DialogAction::Pending => {
                            dialog_open.store(true, Ordering::SeqCst);
                        }
                    }
                }
            }))
        }

        fn guard_queue(&self) -> ComprarResult<()> {
            if self.dialog_open.load(Ordering::SeqCst) {
                return Err(ComprarError::DialogBlocked {
                    dialog_type: "alert".to_string(),
                    message: "a native dialog is open and unhandled".to_string(),
                });
            }
            Ok(())
        }

        async fn store_elements(&self, found: Vec<Element>) -> Vec<ElementId> {
            let mut elements = self.elements.lock().await;
            let mut ids = Vec::with_capacity(found.len());
            for element in found {
                let id = format!("el-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                ids.push(ElementId::new(id.clone()));
                let _ = elements.insert(id, element);
            }
            ids
        }

        async fn element(&self, id: &ElementId) -> ComprarResult<Element> {
            let elements = self.elements.lock().await;
            elements
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| ComprarError::PageError {
                    message: format!("stale element handle: {id}"),
                })
        }

        async fn matching(
            &self,
            candidates: Vec<Element>,
            selector: &Selector,
        ) -> ComprarResult<Vec<Element>> {
            match selector {
                Selector::Css(_) => Ok(candidates),
                Selector::CssWithText { text, .. } => {
                    let mut matched = Vec::new();
                    for element in candidates {
                        let content = element
                            .inner_text()
                            .await
                            .map_err(|e| ComprarError::PageError {
                                message: e.to_string(),
                            })?
                            .unwrap_or_default();
                        if content.contains(text.as_str()) {
                            matched.push(element);
                        }
                    }
                    Ok(matched)
                }
            }
        }

        async fn call_js_on(
            &self,
            id: &ElementId,
            function: &str,
        ) -> ComprarResult<serde_json::Value> {
            let element = self.element(id).await?;
            let returns = element.call_js_fn(function, false).await.map_err(|e| {
                ComprarError::PageError {
                    message: e.to_string(),
                }
            })?;
            Ok(returns
                .result
                .value
                .unwrap_or(serde_json::Value::Null))
        }
    }

    #[async_trait]
    impl Driver for CdpDriver {
        async fn visit(&self, url: &str) -> ComprarResult<()> {
            self.guard_queue()?;
            self.elements.lock().await.clear();
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| ComprarError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> ComprarResult<String> {
            let page = self.page.lock().await;
            let url = page.url().await.map_err(|e| ComprarError::PageError {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_default())
        }

        async fn reload(&self) -> ComprarResult<()> {
            self.guard_queue()?;
            self.elements.lock().await.clear();
            let page = self.page.lock().await;
            page.reload().await.map_err(|e| ComprarError::PageError {
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn find(&self, selector: &Selector) -> ComprarResult<Vec<ElementId>> {
            self.guard_queue()?;
            let css = match selector {
                Selector::Css(css) | Selector::CssWithText { css, .. } => css.clone(),
            };
            let found = {
                let page = self.page.lock().await;
                // cheap existence probe before materializing handles
                let count: u64 = page
                    .evaluate(selector.to_count_query())
                    .await
                    .ok()
                    .and_then(|result| result.into_value().ok())
                    .unwrap_or(0);
                if count == 0 {
                    // a miss is an empty result, not an error; the bounded
                    // wait at the call site decides when it becomes a timeout
                    return Ok(Vec::new());
                }
                page.find_elements(css).await.unwrap_or_default()
            };
            let matched = self.matching(found, selector).await?;
            Ok(self.store_elements(matched).await)
        }

        async fn find_within(
            &self,
            parent: &ElementId,
            selector: &Selector,
        ) -> ComprarResult<Vec<ElementId>> {
            self.guard_queue()?;
            let parent = self.element(parent).await?;
            let css = match selector {
                Selector::Css(css) | Selector::CssWithText { css, .. } => css.clone(),
            };
            let found = parent.find_elements(css).await.unwrap_or_default();
            let matched = self.matching(found, selector).await?;
            Ok(self.store_elements(matched).await)
        }

        async fn click(&self, element: &ElementId) -> ComprarResult<()> {
            self.guard_queue()?;
            let el = self.element(element).await?;
            el.click().await.map_err(|e| ComprarError::InputError {
                element: element.to_string(),
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn type_text(&self, element: &ElementId, text: &str) -> ComprarResult<()> {
            self.guard_queue()?;
            let el = self.element(element).await?;
            el.focus().await.map_err(|e| ComprarError::InputError {
                element: element.to_string(),
                message: e.to_string(),
            })?;
            el.type_str(text).await.map_err(|e| ComprarError::InputError {
                element: element.to_string(),
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn clear(&self, element: &ElementId) -> ComprarResult<()> {
            self.guard_queue()?;
            let _ = self
                .call_js_on(
                    element,
                    "function() { this.value = ''; \
                     this.dispatchEvent(new Event('input', { bubbles: true })); }",
                )
                .await?;
            Ok(())
        }

        async fn select_option(&self, element: &ElementId, label: &str) -> ComprarResult<()> {
            self.guard_queue()?;
            let function = format!(
                "function() {{ const label = {label:?}; \
                 for (const option of this.options) {{ \
                   if (option.textContent.trim() === label) {{ \
                     this.value = option.value; \
                     this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                     return true; }} }} \
                 return false; }}"
            );
            let selected = self.call_js_on(element, &function).await?;
            if selected.as_bool() == Some(true) {
                Ok(())
            } else {
                Err(ComprarError::InputError {
                    element: element.to_string(),
                    message: format!("no option labelled {label:?}"),
                })
            }
        }

        async fn scroll_into_view(&self, element: &ElementId) -> ComprarResult<()> {
            self.guard_queue()?;
            let el = self.element(element).await?;
            el.scroll_into_view()
                .await
                .map_err(|e| ComprarError::InputError {
                    element: element.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn is_visible(&self, element: &ElementId) -> ComprarResult<bool> {
            let visible = self
                .call_js_on(
                    element,
                    "function() { const rect = this.getBoundingClientRect(); \
                     const style = window.getComputedStyle(this); \
                     return rect.width > 0 && rect.height > 0 && \
                       style.visibility !== 'hidden' && style.display !== 'none'; }",
                )
                .await?;
            Ok(visible.as_bool().unwrap_or(false))
        }

        async fn is_enabled(&self, element: &ElementId) -> ComprarResult<bool> {
            let enabled = self
                .call_js_on(element, "function() { return !this.disabled; }")
                .await?;
            Ok(enabled.as_bool().unwrap_or(false))
        }

        async fn text(&self, element: &ElementId) -> ComprarResult<String> {
            let el = self.element(element).await?;
            let text = el.inner_text().await.map_err(|e| ComprarError::PageError {
                message: e.to_string(),
            })?;
            Ok(text.unwrap_or_default())
        }

        async fn validation_message(&self, element: &ElementId) -> ComprarResult<String> {
            let message = self
                .call_js_on(
                    element,
                    "function() { return this.validationMessage || ''; }",
                )
                .await?;
            Ok(message.as_str().unwrap_or_default().to_string())
        }

        async fn attach_files(
            &self,
            element: &ElementId,
            files: &[FilePayload],
        ) -> ComprarResult<()> {
            self.guard_queue()?;
            // CDP attaches files by path, so payloads are materialized in
            // the temp directory first.
            let mut paths = Vec::with_capacity(files.len());
            for file in files {
                let path = std::env::temp_dir().join(&file.name);
                std::fs::write(&path, &file.content)?;
                paths.push(path.to_string_lossy().into_owned());
            }

            let el = self.element(element).await?;
            let params = SetFileInputFilesParams::builder()
                .files(paths)
                .backend_node_id(el.backend_node_id)
                .build()
                .map_err(|e| ComprarError::InputError {
                    element: element.to_string(),
                    message: e,
                })?;
            let page = self.page.lock().await;
            page.execute(params)
                .await
                .map_err(|e| ComprarError::InputError {
                    element: element.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn attached_file_names(&self, element: &ElementId) -> ComprarResult<Vec<String>> {
            let names = self
                .call_js_on(
                    element,
                    "function() { return Array.from(this.files || []).map(f => f.name); }",
                )
                .await?;
            Ok(serde_json::from_value(names).unwrap_or_default())
        }

        async fn clear_session_state(&self) -> ComprarResult<()> {
            let page = self.page.lock().await;
            page.execute(ClearBrowserCookiesParams::default())
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?;
            page.evaluate("localStorage.clear(); sessionStorage.clear();")
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn snapshot_session(&self) -> ComprarResult<SessionSnapshot> {
            let page = self.page.lock().await;
            let cookies = page
                .get_cookies()
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?;

            let mut snapshot = SessionSnapshot::new();
            for cookie in cookies {
                snapshot.cookies.push(Cookie {
                    name: cookie.name,
                    value: cookie.value,
                    domain: cookie.domain,
                    path: cookie.path,
                    secure: cookie.secure,
                    http_only: cookie.http_only,
                });
            }

            let origin: String = page
                .evaluate("window.location.origin")
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?
                .into_value()
                .unwrap_or_default();
            let storage: std::collections::HashMap<String, String> = page
                .evaluate("Object.fromEntries(Object.entries(localStorage))")
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?
                .into_value()
                .unwrap_or_default();
            if !storage.is_empty() {
                let _ = snapshot.local_storage.insert(origin, storage);
            }

            Ok(snapshot)
        }

        async fn restore_session(&self, snapshot: &SessionSnapshot) -> ComprarResult<()> {
            let page = self.page.lock().await;
            let params: Vec<CookieParam> = snapshot
                .cookies
                .iter()
                .map(|cookie| {
                    CookieParam::builder()
                        .name(cookie.name.clone())
                        .value(cookie.value.clone())
                        .domain(cookie.domain.clone())
                        .path(cookie.path.clone())
                        .secure(cookie.secure)
                        .http_only(cookie.http_only)
                        .build()
                })
                .collect::<Result<_, _>>()
                .map_err(|e| ComprarError::SessionError { message: e })?;
            page.set_cookies(params)
                .await
                .map_err(|e| ComprarError::SessionError {
                    message: e.to_string(),
                })?;

            for entries in snapshot.local_storage.values() {
                for (key, value) in entries {
                    let script =
                        format!("localStorage.setItem({key:?}, {value:?});");
                    page.evaluate(script).await.map_err(|e| {
                        ComprarError::SessionError {
                            message: e.to_string(),
                        }
                    })?;
                }
            }
            Ok(())
        }

        fn dialogs(&self) -> DialogHandler {
            self.dialogs.clone()
        }
    }

    impl CdpDriver {
        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns an error if the browser refuses to close.
        pub async fn close(self) -> ComprarResult<()> {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| ComprarError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_display() {
        let id = ElementId::new("el-7");
        assert_eq!(id.as_str(), "el-7");
        assert_eq!(id.to_string(), "el-7");
    }

    #[test]
    fn test_text_payload() {
        let payload = FilePayload::text("notes.txt", "Test file content");
        assert_eq!(payload.mime, "text/plain");
        assert_eq!(payload.content, b"Test file content");
    }
}
