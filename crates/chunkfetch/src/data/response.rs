/// Status line and headers of a response, without its body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHead {
    pub status:  u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let head = ResponseHead::new(200).with_header("Accept-Ranges", "bytes");
        assert_eq!(head.header("accept-ranges"), Some("bytes"));
        assert_eq!(head.header("ACCEPT-RANGES"), Some("bytes"));
        assert_eq!(head.header("content-length"), None);
    }

    #[test]
    fn test_is_success() {
        assert!(ResponseHead::new(200).is_success());
        assert!(ResponseHead::new(206).is_success());
        assert!(!ResponseHead::new(301).is_success());
        assert!(!ResponseHead::new(405).is_success());
    }
}
