use std::time::Duration;

use http::HeaderValue;
use log::warn;
use rust_decimal::Decimal;

pub fn get_useragent() -> &'static str {
    concat!("storefront_rs/", env!("CARGO_PKG_VERSION"))
}

/// Client builder shared by every service: keep-alive, our user agent and the
/// session cookie forwarded as-is.
pub fn default_client(cookie: &str) -> reqwest::ClientBuilder {
    let mut dh = reqwest::header::HeaderMap::new();
    dh.insert("user-agent", HeaderValue::from_static(get_useragent()));
    dh.insert("Connection", HeaderValue::from_static("keep-alive"));
    if !cookie.is_empty() {
        match HeaderValue::from_str(cookie) {
            Ok(v) => {
                dh.insert("cookie", v);
            }
            Err(e) => warn!("Ignore invalid cookie header: {}", e),
        }
    }
    reqwest::Client::builder()
        .cookie_store(true)
        .default_headers(dh)
        .connect_timeout(Duration::from_millis(12000))
        .tcp_keepalive(Duration::from_secs(30))
}

/// Joins the configured server address and an api path.
pub fn api_url(addr: &str, path: &str) -> String {
    format!("{}/{}", addr.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Prices are shown in roubles with two decimals.
pub fn format_price(price: Decimal) -> String {
    format!("{:.2} ₽", price)
}
