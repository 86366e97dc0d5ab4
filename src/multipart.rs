//! `multipart/form-data` encoding for uploads.
//!
//! Parts are written in the order they were added, with this framing:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{name}"[; filename="{filename}"]\r\n
//! [Content-Type: {content_type}\r\n]
//! \r\n
//! {content}\r\n
//! ...
//! --{boundary}--\r\n
//! ```

use crate::models::Network;
use rand::distributions::Alphanumeric;
use rand::Rng;

const BOUNDARY_LEN: usize = 32;

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The form field name
    pub name: String,
    /// The file name, for file parts
    pub filename: Option<String>,
    /// The part's content type, if one is declared
    pub content_type: Option<String>,
    /// The raw content
    pub content: Vec<u8>,
}

impl Part {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            content: value.into().into_bytes(),
        }
    }

    /// A file field sent as `application/octet-stream`.
    pub fn file(name: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some("application/octet-stream".to_string()),
            content: data,
        }
    }
}

/// A multipart form with a randomly generated boundary.
#[derive(Debug, Clone)]
pub struct Multipart {
    boundary: String,
    parts: Vec<Part>,
}

impl Multipart {
    /// Creates an empty form with a fresh boundary.
    pub fn new() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOUNDARY_LEN)
            .map(char::from)
            .collect();
        Self::with_boundary(format!("pinata-{}", token))
    }

    /// Creates an empty form with the given boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Builds the upload form.
    ///
    /// Parts are always `file`, `name`, `group_id` (only when given) and
    /// `network`, in that order. The API requires `name` even though it
    /// repeats the file name.
    pub fn upload(data: Vec<u8>, name: &str, group_id: Option<&str>, network: Network) -> Self {
        let mut form = Self::new()
            .part(Part::file("file", name, data))
            .part(Part::text("name", name));
        if let Some(group_id) = group_id {
            form = form.part(Part::text("group_id", group_id));
        }
        form.part(Part::text("network", network.as_str()))
    }

    /// Appends a part.
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Returns the boundary token.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns the parts in encoding order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the `Content-Type` header value for this form.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encodes the form into a request body.
    pub fn encode(&self) -> Vec<u8> {
        let capacity = self
            .parts
            .iter()
            .map(|part| part.content.len() + 128)
            .sum::<usize>();
        let mut body = Vec::with_capacity(capacity);

        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());

            let mut disposition = format!(
                "Content-Disposition: form-data; name=\"{}\"",
                escape_quoted(&part.name)
            );
            if let Some(filename) = &part.filename {
                disposition.push_str(&format!("; filename=\"{}\"", escape_quoted(filename)));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(&part.content);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-escapes characters that would break a quoted header parameter.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_form_is_framed_byte_exact() {
        let mut form = Multipart::upload(b"hi".to_vec(), "a.txt", None, Network::Private);
        form.boundary = "XyZ".to_string();

        let expected = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            hi\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\
            \r\n\
            a.txt\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"network\"\r\n\
            \r\n\
            private\r\n\
            --XyZ--\r\n";

        assert_eq!(String::from_utf8(form.encode()).unwrap(), expected);
    }

    #[test]
    fn upload_parts_follow_fixed_order() {
        let form = Multipart::upload(b"hi".to_vec(), "a.txt", None, Network::Private);
        let names: Vec<&str> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["file", "name", "network"]);
        assert_eq!(form.parts()[0].filename.as_deref(), Some("a.txt"));
        assert_eq!(form.parts()[1].content, b"a.txt");
        assert_eq!(form.parts()[2].content, b"private");

        let form = Multipart::upload(Vec::new(), "b.bin", Some("group-1"), Network::Public);
        let names: Vec<&str> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["file", "name", "group_id", "network"]);
        assert_eq!(form.parts()[2].content, b"group-1");
        assert_eq!(form.parts()[3].content, b"public");
    }

    #[test]
    fn binary_content_is_preserved() {
        let data = vec![0u8, 159, 146, 150, 13, 10];
        let form = Multipart::with_boundary("b").part(Part::file("file", "x", data.clone()));
        let encoded = form.encode();
        assert!(encoded.windows(data.len()).any(|w| w == data.as_slice()));
        assert!(encoded.ends_with(b"--b--\r\n"));
    }

    #[test]
    fn boundaries_are_random() {
        let a = Multipart::new();
        let b = Multipart::new();
        assert_ne!(a.boundary(), b.boundary());
        assert!(a.content_type().starts_with("multipart/form-data; boundary=pinata-"));
    }

    #[test]
    fn quotes_in_file_names_are_escaped() {
        let form = Multipart::with_boundary("b").part(Part::file("file", "say \"hi\".txt", vec![]));
        let encoded = String::from_utf8(form.encode()).unwrap();
        assert!(encoded.contains("filename=\"say %22hi%22.txt\""));
    }
}
