//! Structural decomposition of ARK strings.
//!
//! Accepted grammar:
//!
//! ```text
//! [<scheme>://[<user>[:<pass>]@]<host>[:<port>]/]ark:[/]<naan>[/<baseName>[/<suffixes>]][?<inflection>]
//! ```

use std::fmt;

use url::Url;

use crate::{ncda, validator, ArkError};

/// The named parts of an ARK.
///
/// Either every part was extracted from a valid ARK or every part is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArkComponents {
    /// `scheme://[user[:pass]@]host[:port]` of the resolver, if the ARK was a URL.
    pub resolver_service: String,

    /// Name Assigning Authority Number.
    pub naan: String,

    /// Assigned name, including any shoulder.
    pub base_name: String,

    /// `ark:<naan>/<baseName>`.
    pub base_compact_name: String,

    /// `<naan>/<baseName>`, the string the check character covers.
    pub check_zone: String,

    /// Path segments after the base name followed by the raw inflection.
    pub suffixes: String,

    /// Inflection query pairs, e.g. `("info", "")` for `?info`.
    pub inflections: Vec<(String, String)>,
}

impl ArkComponents {
    /// Splits `ark` into components, returning the empty value if it is not a valid ARK.
    pub fn split(ark: &str) -> Self {
        match extract(ark) {
            Some(components)
                if validator::is_valid_base_compact_name(&components.base_compact_name) =>
            {
                components
            }
            _ => {
                tracing::debug!(ark, "rejected ark components");
                Self::default()
            }
        }
    }

    /// Splits `ark` into components.
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::NotParseable`] if `ark` is not a valid ARK.
    pub fn parse(ark: &str) -> Result<Self, ArkError> {
        let components = Self::split(ark);
        if components.is_empty() {
            return Err(ArkError::NotParseable(ark.to_string()));
        }
        Ok(components)
    }

    /// Returns true if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.base_compact_name.is_empty()
    }

    /// Verifies the trailing check character of the base name.
    ///
    /// # Errors
    ///
    /// Propagates NCDA errors, e.g. when the check zone uses characters
    /// outside `xdigits`.
    pub fn verify_checksum(&self, xdigits: &str) -> Result<bool, ArkError> {
        if self.is_empty() {
            return Ok(false);
        }
        ncda::verify(&self.check_zone, xdigits)
    }
}

impl fmt::Display for ArkComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_compact_name)?;
        if self.suffixes.is_empty() {
            return Ok(());
        }
        if self.suffixes.starts_with('?') {
            write!(f, "{}", self.suffixes)
        } else {
            write!(f, "/{}", self.suffixes)
        }
    }
}

impl std::str::FromStr for ArkComponents {
    type Err = ArkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Splits `ark` into components. Alias for [`ArkComponents::split`].
pub fn split_into_components(ark: &str) -> ArkComponents {
    ArkComponents::split(ark)
}

/// Removes the resolver part in front of the ARK label, once.
///
/// Everything up to and including the `/` before the first `/ark:` is removed.
/// Without such a slash, everything before the first `ark:` is removed.
/// Matching is ASCII case-insensitive.
pub(crate) fn strip_resolver_prefix(s: &str) -> &str {
    // ASCII lowercasing keeps byte offsets aligned with `s`.
    let lower = s.to_ascii_lowercase();
    if let Some(pos) = lower.find("/ark:") {
        return &s[pos + 1..];
    }
    match lower.find("ark:") {
        Some(pos) => &s[pos..],
        None => s,
    }
}

/// `scheme://[user[:pass]@]host[:port]` exactly as written in `ark`.
///
/// `ark` must be an absolute URL with a host. Host case and default ports
/// are kept, unlike in `url`.
fn resolver_service(ark: &str, url: &Url) -> Option<String> {
    let scheme_len = url.scheme().len();
    let authority = ark.get(scheme_len..)?.strip_prefix("://")?;
    let end = authority.find(['/', '?', '#']).unwrap_or(authority.len());
    Some(format!("{}://{}", &ark[..scheme_len], &authority[..end]))
}

fn extract(ark: &str) -> Option<ArkComponents> {
    let mut components = ArkComponents::default();
    let ark = ark.trim();

    // The parser accepts `scheme:/host` for special schemes; `resolver_service`
    // only answers for an explicit `://` authority.
    if let Some(service) = Url::parse(ark)
        .ok()
        .filter(Url::has_host)
        .and_then(|url| resolver_service(ark, &url))
    {
        components.resolver_service = service;
    }

    let ark = strip_resolver_prefix(ark);
    if !ark.get(..4)?.eq_ignore_ascii_case("ark:") {
        return None;
    }

    let (path, inflection) = match ark.find('?') {
        Some(pos) => ark.split_at(pos),
        None => (ark, ""),
    };
    if let Some(query) = inflection.strip_prefix('?') {
        components.inflections = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
    }

    let mut segments = path.split('/');
    let label = segments.next()?;
    components.naan = if label.eq_ignore_ascii_case("ark:") {
        segments.next()?.to_string()
    } else {
        label.split_once(':')?.1.to_string()
    };

    let base_name = segments.next()?;
    components.base_name = base_name.to_string();
    components.base_compact_name = format!("ark:{}/{}", components.naan, base_name);
    components.check_zone = format!("{}/{}", components.naan, base_name);

    let rest: Vec<&str> = segments.collect();
    if !rest.is_empty() || !inflection.is_empty() {
        components.suffixes = format!("{}{}", rest.join("/"), inflection);
    }

    Some(components)
}
