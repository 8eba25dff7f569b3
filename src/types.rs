use std::fmt;
use std::time::SystemTime;

/// HTTP Methods supported by the client
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::Get => HttpMethod::Post,
            HttpMethod::Post => HttpMethod::Put,
            HttpMethod::Put => HttpMethod::Patch,
            HttpMethod::Patch => HttpMethod::Delete,
            HttpMethod::Delete => HttpMethod::Head,
            HttpMethod::Head => HttpMethod::Options,
            HttpMethod::Options => HttpMethod::Get,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// One outgoing request, built fresh from the form on every send.
///
/// Fields are private so a `Request` cannot change once it has been handed to
/// the dispatcher or stored in history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl Request {
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in the order they were entered. Duplicate names are kept.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// The outcome of one dispatched request.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Success {
        status_code: u16,
        reason: Option<String>,
        elapsed_ms: f64,
        headers: Vec<(String, String)>,
        body: String,
        is_json: bool,
        /// Pretty-printed body when `is_json`, otherwise the raw body.
        display_body: String,
    },
    Failure {
        message: String,
        elapsed_ms: f64,
    },
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Response::Success { status_code, .. } => Some(*status_code),
            Response::Failure { .. } => None,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        match self {
            Response::Success { elapsed_ms, .. } | Response::Failure { elapsed_ms, .. } => {
                *elapsed_ms
            }
        }
    }

    /// `200 OK` for responses, `Request failed` for transport failures.
    pub fn status_line(&self) -> String {
        match self {
            Response::Success {
                status_code,
                reason: Some(reason),
                ..
            } => format!("{} {}", status_code, reason),
            Response::Success { status_code, .. } => status_code.to_string(),
            Response::Failure { .. } => "Request failed".to_string(),
        }
    }

    pub fn elapsed_label(&self) -> String {
        format!("{:.2} ms", self.elapsed_ms())
    }

    /// Response headers, one `Name: Value` per line.
    pub fn headers_text(&self) -> String {
        match self {
            Response::Success { headers, .. } => crate::request::format_headers(headers),
            Response::Failure { .. } => String::new(),
        }
    }

    /// What the body pane shows: formatted JSON, raw text or the failure message.
    pub fn display_body(&self) -> &str {
        match self {
            Response::Success { display_body, .. } => display_body,
            Response::Failure { message, .. } => message,
        }
    }

    /// A single-line excerpt of the body, at most `max_chars` characters long.
    pub fn preview(&self, max_chars: usize) -> String {
        let source = match self {
            Response::Success { body, .. } => body.as_str(),
            Response::Failure { message, .. } => message.as_str(),
        };
        source
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }
}

/// Identity of a history entry, unique within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sent request paired with the response it produced.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    id: EntryId,
    request: Request,
    response: Response,
    created_at: SystemTime,
}

impl HistoryEntry {
    pub fn new(id: EntryId, request: Request, response: Response, created_at: SystemTime) -> Self {
        Self {
            id,
            request,
            response,
            created_at,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// `GET https://host/path (200, 123 ms)`
    pub fn display_label(&self) -> String {
        let status = self
            .response
            .status_code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "ERR".to_string());
        format!(
            "{} {} ({}, {:.0} ms)",
            self.request.method(),
            self.request.url(),
            status,
            self.response.elapsed_ms()
        )
    }
}

/// Label for the row shown while a request is still in flight.
pub fn pending_label(request: &Request) -> String {
    format!("{} {} (..., pending)", request.method(), request.url())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(body: &str) -> Response {
        Response::Success {
            status_code: 200,
            reason: Some("OK".to_string()),
            elapsed_ms: 123.456,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: body.to_string(),
            is_json: false,
            display_body: body.to_string(),
        }
    }

    #[test]
    fn test_method_cycle_visits_all_verbs() {
        let mut method = HttpMethod::Get;
        let mut seen = Vec::new();
        for _ in 0..HttpMethod::ALL.len() {
            seen.push(method);
            method = method.next();
        }
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(seen, HttpMethod::ALL.to_vec());
    }

    #[test]
    fn test_method_converts_to_reqwest() {
        for method in HttpMethod::ALL {
            let converted: reqwest::Method = method.into();
            assert_eq!(converted.as_str(), method.as_str());
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(success("").status_line(), "200 OK");
        let failure = Response::Failure {
            message: "boom".to_string(),
            elapsed_ms: 1.0,
        };
        assert_eq!(failure.status_line(), "Request failed");
        assert_eq!(failure.display_body(), "boom");
        assert_eq!(failure.status_code(), None);
    }

    #[test]
    fn test_elapsed_label_has_fixed_precision() {
        assert_eq!(success("").elapsed_label(), "123.46 ms");
    }

    #[test]
    fn test_preview_flattens_newlines_and_truncates() {
        let response = success("line one\nline two\r\nline three");
        assert_eq!(response.preview(17), "line one line two");
        assert_eq!(response.preview(1000).chars().count(), 29);
    }

    #[test]
    fn test_history_labels() {
        let request = Request::new(HttpMethod::Post, "https://a.test/x", Vec::new(), None);
        let entry = HistoryEntry::new(EntryId(1), request.clone(), success(""), SystemTime::now());
        assert_eq!(entry.display_label(), "POST https://a.test/x (200, 123 ms)");

        let failed = HistoryEntry::new(
            EntryId(2),
            request.clone(),
            Response::Failure {
                message: "nope".to_string(),
                elapsed_ms: 4.4,
            },
            SystemTime::now(),
        );
        assert_eq!(failed.display_label(), "POST https://a.test/x (ERR, 4 ms)");
        assert_eq!(pending_label(&request), "POST https://a.test/x (..., pending)");
    }
}
