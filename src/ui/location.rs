// Query-string view selector.

use indexmap::IndexMap;

/// Name of the query parameter selecting the active list.
pub const LIST_PARAM: &str = "list";

/// Decoded query parameters of the page location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    params: IndexMap<String, String>,
}

impl Location {
    /// Parse a location.
    ///
    /// Accepts a full URL (`index.html?list=0#top`), a bare query
    /// (`?list=0`), or query pairs without the `?` (`list=0`). Repeated keys
    /// keep the last value.
    pub fn parse(location: &str) -> Self {
        let query = match location.split_once('?') {
            Some((_, query)) => query,
            None if location.contains('=') => location,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        let params = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Self { params }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The list index selected by `?list=N`, if any.
    ///
    /// Values that are not unsigned integers select the lists view.
    pub fn current_list(&self) -> Option<usize> {
        let raw = self.param(LIST_PARAM)?;
        match raw.trim().parse() {
            Ok(index) => Some(index),
            Err(_) => {
                tracing::warn!("Ignoring non-numeric list parameter {:?}", raw);
                None
            }
        }
    }
}
