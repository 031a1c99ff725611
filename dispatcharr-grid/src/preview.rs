//! Live search/replace preview for M3U profile patterns.
//!
//! Edits to the sample text, the search pattern and the replacement share
//! one debounce window, the same way table filters do. Each committed
//! request is evaluated locally right away and published on an outgoing
//! channel; results pushed back by the server echo the request fields and
//! are accepted only if they answer the latest committed request.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use log::debug;
use log::warn;
use regex::Regex;
use tokio::sync::mpsc;

use crate::timer::Debouncer;

/// Apply `pattern` to `text`, substituting `replacement`.
///
/// `$1`-style group references are supported. A pattern that fails to
/// compile leaves `text` unchanged.
///
/// # Example
///
/// ```
/// use dispatcharr_grid::preview::apply_pattern;
///
/// let url = "http://host/live/user/pass/1234.ts";
/// assert_eq!(
///     apply_pattern(url, r"/live/(\w+)/(\w+)/", "/live/$2/$1/"),
///     "http://host/live/pass/user/1234.ts"
/// );
/// assert_eq!(apply_pattern(url, "(unclosed", "x"), url);
/// ```
pub fn apply_pattern(text: &str, pattern: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re
            .replace_all(text, expand_group_refs(replacement).as_str())
            .into_owned(),
        Err(e) => {
            debug!("Invalid pattern {:?}: {}", pattern, e);
            text.to_string()
        }
    }
}

/// Rewrite `$N` as `${N}` so a reference followed by text (`$1abc`) is not
/// read as a named group.
fn expand_group_refs(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'$') {
            chars.next();
            out.push_str("$$");
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        if digits.is_empty() {
            out.push('$');
        } else {
            out.push_str("${");
            out.push_str(&digits);
            out.push('}');
        }
    }
    out
}

/// The three preview inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewRequest {
    pub text: String,
    pub pattern: String,
    pub replacement: String,
}

impl PreviewRequest {
    /// Evaluate locally.
    pub fn evaluate(&self) -> String {
        apply_pattern(&self.text, &self.pattern, &self.replacement)
    }
}

/// A result pushed by the server, echoing the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResult {
    pub text: String,
    pub pattern: String,
    pub replacement: String,
    pub result: String,
}

impl PreviewResult {
    fn answers(&self, request: &PreviewRequest) -> bool {
        self.text == request.text
            && self.pattern == request.pattern
            && self.replacement == request.replacement
    }
}

#[derive(Debug, Default)]
struct PreviewInner {
    staged: PreviewRequest,
    committed: Option<PreviewRequest>,
    local: Option<String>,
    remote: Option<String>,
}

/// Debounced preview over the three inputs.
#[derive(Debug, Clone)]
pub struct PreviewController {
    inner: Arc<Mutex<PreviewInner>>,
    debouncer: Arc<Debouncer>,
    outbox: mpsc::UnboundedSender<PreviewRequest>,
}

impl PreviewController {
    /// Create a controller and the receiver of committed requests.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PreviewRequest>) {
        let (outbox, requests) = mpsc::unbounded_channel();
        let controller = Self {
            inner: Arc::new(Mutex::new(PreviewInner::default())),
            debouncer: Arc::new(Debouncer::default()),
            outbox,
        };
        (controller, requests)
    }

    fn lock(&self) -> MutexGuard<'_, PreviewInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().staged.text = text.into();
        self.schedule();
    }

    pub fn set_pattern(&self, pattern: impl Into<String>) {
        self.lock().staged.pattern = pattern.into();
        self.schedule();
    }

    pub fn set_replacement(&self, replacement: impl Into<String>) {
        self.lock().staged.replacement = replacement.into();
        self.schedule();
    }

    fn schedule(&self) {
        let this = self.clone();
        self.debouncer.call(async move {
            this.commit();
        });
    }

    /// Commit the staged inputs now, skipping the debounce window.
    pub fn commit(&self) {
        self.debouncer.cancel();
        let request = {
            let mut inner = self.lock();
            let request = inner.staged.clone();
            inner.local = Some(request.evaluate());
            inner.remote = None;
            inner.committed = Some(request.clone());
            request
        };
        if self.outbox.send(request).is_err() {
            debug!("Preview request dropped, nobody is listening");
        }
    }

    /// Accept a pushed result. Returns `false` if it answers an older request.
    pub fn on_result(&self, result: PreviewResult) -> bool {
        let mut inner = self.lock();
        let current = inner
            .committed
            .as_ref()
            .is_some_and(|request| result.answers(request));
        if !current {
            warn!("Discarding preview result for a superseded request");
            return false;
        }
        inner.remote = Some(result.result);
        true
    }

    /// The latest committed request.
    pub fn committed(&self) -> Option<PreviewRequest> {
        self.lock().committed.clone()
    }

    /// The server's answer if it arrived, else the local evaluation.
    pub fn result(&self) -> Option<String> {
        let inner = self.lock();
        inner.remote.clone().or_else(|| inner.local.clone())
    }
}
