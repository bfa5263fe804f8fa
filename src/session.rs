use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use url::Url;

/// In-memory cookie jar for one base URL.
///
/// An empty store means the client has not logged in yet. Any cookie at all is taken to mean a
/// live session; an expired or revoked session on the server side only shows up as a failed
/// vote, and is never cleared from here.
#[derive(Debug)]
pub struct SessionStore {
    url: Url,
    jar: Jar,
}

impl SessionStore {
    /// Creates an empty store keyed by `url`.
    #[must_use]
    pub fn new(url: Url) -> SessionStore {
        SessionStore {
            url,
            jar: Jar::default(),
        }
    }

    /// The URL cookies are stored and looked up for.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true if no cookie would be sent to the base URL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header().is_none()
    }

    /// The `Cookie` header value sent with requests, if any cookies are held.
    #[must_use]
    pub fn header(&self) -> Option<HeaderValue> {
        self.jar.cookies(&self.url)
    }

    /// Name and value of every cookie held for the base URL.
    ///
    /// Values are cut at the first `;` when a `Set-Cookie` header is parsed, so splitting the
    /// joined `Cookie` header on `;` gives back exactly the stored pairs.
    #[must_use]
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.header()
            .map(|header| {
                String::from_utf8_lossy(header.as_bytes())
                    .split(';')
                    .filter_map(|pair| {
                        let (name, value) = pair.trim().split_once('=')?;
                        Some((name.to_owned(), value.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adds a cookie in `Set-Cookie` syntax, e.g. `AURSID=abc; Path=/`.
    pub fn add_cookie_str(&self, cookie: &str) {
        self.jar.add_cookie_str(cookie, &self.url);
    }

    /// Merges every `Set-Cookie` header of a response into the store.
    pub(crate) fn store_response(&self, headers: &HeaderMap) {
        let mut set_cookies = headers.get_all(SET_COOKIE).iter();
        self.jar.set_cookies(&mut set_cookies, &self.url);
    }

    /// The held cookies formatted for diagnostics.
    pub(crate) fn describe(&self) -> String {
        self.header()
            .map(|header| String::from_utf8_lossy(header.as_bytes()).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
    use url::Url;

    fn store() -> SessionStore {
        SessionStore::new(Url::parse("https://aur.archlinux.org").unwrap())
    }

    #[test]
    fn starts_empty() {
        let store = store();
        assert!(store.is_empty());
        assert!(store.header().is_none());
        assert!(store.cookies().is_empty());
        assert_eq!(store.describe(), "");
    }

    #[test]
    fn stores_set_cookie_headers() {
        let store = store();
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static(
                "AURSID=sidexample; HttpOnly; Max-Age=2592000; Path=/; SameSite=strict; Secure",
            ),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("AURLANG=en; Path=/"));
        store.store_response(&headers);

        assert!(!store.is_empty());
        let mut cookies = store.cookies();
        cookies.sort();
        assert_eq!(
            cookies,
            vec![
                ("AURLANG".to_owned(), "en".to_owned()),
                ("AURSID".to_owned(), "sidexample".to_owned()),
            ]
        );
    }

    #[test]
    fn ignores_responses_without_cookies() {
        let store = store();
        store.store_response(&HeaderMap::new());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_cookie_is_not_held() {
        let store = store();
        store.add_cookie_str("AURSID=gone; Path=/; Max-Age=0");
        assert!(store.is_empty());
    }

    #[test]
    fn semicolon_ends_cookie_value() {
        let store = store();
        store.add_cookie_str("AURSID=a=b;c=d; Path=/");
        assert_eq!(
            store.cookies(),
            vec![("AURSID".to_owned(), "a=b".to_owned())]
        );
    }

    #[test]
    fn manual_cookie() {
        let store = store();
        store.add_cookie_str("AURSID=sidexample; Path=/");
        assert_eq!(store.header().unwrap(), "AURSID=sidexample");
        assert_eq!(store.describe(), "AURSID=sidexample");
    }
}
