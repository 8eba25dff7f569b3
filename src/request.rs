use crate::error::ValidationError;
use crate::types::{HttpMethod, Request};

/// Raw form contents as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub method: HttpMethod,
    pub url: String,
    pub headers: String,
    pub body: String,
}

impl RequestForm {
    /// Validates the form and builds a fresh `Request`.
    ///
    /// Only checks that the URL is non-empty and that every header line has a
    /// colon. Anything else is left for the transport to reject.
    pub fn build(&self) -> Result<Request, ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        let headers = parse_headers(&self.headers)?;
        let body = if self.body.trim().is_empty() {
            None
        } else {
            Some(self.body.clone())
        };
        Ok(Request::new(self.method, url, headers, body))
    }

    /// Form contents that rebuild exactly `request`.
    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.method(),
            url: request.url().to_string(),
            headers: format_headers(request.headers()),
            body: request.body().unwrap_or_default().to_string(),
        }
    }
}

/// Parses a `Name: Value` per line header block.
///
/// Blank lines are skipped. The first line without a colon stops parsing and
/// is reported with its 1-based line number.
pub fn parse_headers(raw: &str) -> Result<Vec<(String, String)>, ValidationError> {
    let mut headers = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(ValidationError::MalformedHeader {
                line: index + 1,
                text: line.trim().to_string(),
            });
        };
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }
    Ok(headers)
}

/// Renders headers one `Name: Value` per line.
pub fn format_headers(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_headers_preserves_order_and_trims() {
        let raw = "  Content-Type :  application/json \n\nAccept: */*\n   \nX-Trace:abc";
        let headers = parse_headers(raw).unwrap();
        assert_eq!(
            headers,
            pairs(&[
                ("Content-Type", "application/json"),
                ("Accept", "*/*"),
                ("X-Trace", "abc"),
            ])
        );
    }

    #[test]
    fn test_parse_headers_keeps_duplicates() {
        let headers = parse_headers("X-A: 1\nX-A: 2").unwrap();
        assert_eq!(headers, pairs(&[("X-A", "1"), ("X-A", "2")]));
    }

    #[test]
    fn test_parse_headers_splits_on_first_colon() {
        let headers = parse_headers("Referer: https://example.test:8080/a").unwrap();
        assert_eq!(headers, pairs(&[("Referer", "https://example.test:8080/a")]));
    }

    #[test]
    fn test_parse_headers_empty_block() {
        assert!(parse_headers("").unwrap().is_empty());
        assert!(parse_headers("\n \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_headers_reports_malformed_line() {
        let err = parse_headers("X-Foo: bar\nmalformed-line\nX-Baz: qux").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedHeader {
                line: 2,
                text: "malformed-line".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_headers_line_numbers_count_blank_lines() {
        let err = parse_headers("\nX-Foo: bar\n\nbroken").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedHeader { line: 4, .. }));
    }

    #[test]
    fn test_build_rejects_empty_url() {
        let form = RequestForm {
            url: "   ".to_string(),
            ..RequestForm::default()
        };
        assert_eq!(form.build(), Err(ValidationError::EmptyUrl));
    }

    #[test]
    fn test_build_accepts_unparseable_url() {
        let form = RequestForm {
            url: "not a url".to_string(),
            ..RequestForm::default()
        };
        assert_eq!(form.build().unwrap().url(), "not a url");
    }

    #[test]
    fn test_build_keeps_body_for_any_method() {
        let form = RequestForm {
            method: HttpMethod::Get,
            url: "https://example.test".to_string(),
            headers: String::new(),
            body: "{\"q\": 1}\n".to_string(),
        };
        let request = form.build().unwrap();
        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.body(), Some("{\"q\": 1}\n"));
    }

    #[test]
    fn test_build_blank_body_is_none() {
        let form = RequestForm {
            url: "https://example.test".to_string(),
            body: " \n".to_string(),
            ..RequestForm::default()
        };
        assert_eq!(form.build().unwrap().body(), None);
    }

    #[test]
    fn test_from_request_rebuilds_same_request() {
        let request = Request::new(
            HttpMethod::Patch,
            "https://example.test/items/1",
            pairs(&[("X-A", "1"), ("X-A", "2"), ("Accept", "application/json")]),
            Some("{\"done\": true}".to_string()),
        );
        let form = RequestForm::from_request(&request);
        assert_eq!(form.build().unwrap(), request);
    }
}
