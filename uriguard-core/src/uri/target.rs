use crate::uri::TargetError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The path component of a request-target exactly as it arrived on the wire.
///
/// Nothing is decoded or normalized here. The query (if any) is kept for
/// diagnostics only and never participates in classification or decoding.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawTarget {
    path: Arc<str>,
    query: Option<Arc<str>>,
}

impl RawTarget {
    /// Isolate the path of an origin-form (`/a/b?q`) or absolute-form
    /// (`http://host/a/b?q`) request-target.
    pub fn parse(target: &str) -> Result<Self, TargetError> {
        if target.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Some((position, byte)) = target
            .bytes()
            .enumerate()
            .find(|(_, b)| !is_request_line_byte(*b))
        {
            return Err(TargetError::InvalidCharacter { byte, position });
        }

        let path_and_query = if target.starts_with('/') {
            target
        } else {
            strip_scheme_and_authority(target)?
        };

        // Fragments are not sent by conforming clients; drop them if present.
        let path_and_query = path_and_query
            .split_once('#')
            .map_or(path_and_query, |(head, _)| head);

        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        let path = if path.is_empty() { "/" } else { path };

        Ok(Self {
            path: Arc::from(path),
            query: query.map(Arc::from),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Debug for RawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawTarget").field(&self.to_string()).finish()
    }
}

impl fmt::Display for RawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Visible ASCII only. Whitespace, controls and non-ASCII bytes cannot appear
/// in a request line.
fn is_request_line_byte(b: u8) -> bool {
    b.is_ascii_graphic()
}

fn strip_scheme_and_authority(target: &str) -> Result<&str, TargetError> {
    let Some((scheme, rest)) = target.split_once("://") else {
        return Err(TargetError::UnsupportedForm);
    };

    let valid_scheme = scheme
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic())
        && scheme
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    if !valid_scheme {
        return Err(TargetError::UnsupportedForm);
    }

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if authority_end == 0 {
        return Err(TargetError::UnsupportedForm);
    }

    Ok(&rest[authority_end..])
}
