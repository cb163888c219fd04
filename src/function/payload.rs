//! JSON payloads returned by the function

use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

use super::client_ip::resolve_client_ip;
use super::request::HttpRequestMessage;
use super::user_agent::{Browser, OperatingSystem};

pub const UNKNOWN_USER_AGENT: &str = "Unknown";

/// ISO local date-time, date and time strings taken from one clock reading
#[derive(Debug, Clone, Serialize)]
pub struct Timestamps {
    pub timestamp: String,
    pub date: String,
    pub time: String,
}

impl From<DateTime<Local>> for Timestamps {
    fn from(now: DateTime<Local>) -> Self {
        let fraction = fraction_of_second(now.nanosecond());
        Self {
            timestamp: format!("{}{fraction}", now.format("%Y-%m-%dT%H:%M:%S")),
            date: now.format("%Y-%m-%d").to_string(),
            time: format!("{}{fraction}", now.format("%H:%M:%S")),
        }
    }
}

/// Fractional seconds with trailing zeros dropped; empty on a whole second
fn fraction_of_second(nanos: u32) -> String {
    // leap seconds are reported as nanos >= 1_000_000_000
    let digits = format!("{:09}", nanos % 1_000_000_000);
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        String::new()
    } else {
        format!(".{digits}")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub message: String,
    pub name: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
    pub client_ip: String,
    pub client_info: ClientInfo,
    pub headers: BTreeMap<String, String>,
    pub method: String,
    pub uri: String,
}

impl Greeting {
    pub fn new(request: &HttpRequestMessage, name: &str, timestamps: Timestamps) -> Self {
        Self {
            message: format!("Hello, {name}"),
            name: name.to_string(),
            timestamps,
            client_ip: resolve_client_ip(request.headers()),
            client_info: ClientInfo::from_request(request),
            headers: request.header_map(),
            method: request.method().to_string(),
            uri: request.uri().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub user_agent: String,
    pub browser: Browser,
    pub operating_system: OperatingSystem,
    pub accept_language: Option<String>,
    pub accept_encoding: Option<String>,
    pub accept: Option<String>,
}

impl ClientInfo {
    pub fn from_request(request: &HttpRequestMessage) -> Self {
        let header = |name: &str| request.header(name).map(|v| v.into_owned());
        let user_agent = header("user-agent");

        let (browser, operating_system) = user_agent.as_deref().map_or(
            (Browser::Unknown, OperatingSystem::Unknown),
            |ua| (Browser::from_user_agent(ua), OperatingSystem::from_user_agent(ua)),
        );

        Self {
            user_agent: user_agent.unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string()),
            browser,
            operating_system,
            accept_language: header("accept-language"),
            accept_encoding: header("accept-encoding"),
            accept: header("accept"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hyper::header::{HeaderMap, HeaderValue};
    use hyper::Method;

    #[test]
    fn test_timestamps_formatting() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let ts = Timestamps::from(now);
        assert_eq!(ts.timestamp, "2024-03-09T07:05:01");
        assert_eq!(ts.date, "2024-03-09");
        assert_eq!(ts.time, "07:05:01");

        let with_millis = now + chrono::Duration::milliseconds(120);
        let ts = Timestamps::from(with_millis);
        assert_eq!(ts.timestamp, "2024-03-09T07:05:01.12");
        assert_eq!(ts.time, "07:05:01.12");

        let with_micros = now + chrono::Duration::microseconds(4_500);
        let ts = Timestamps::from(with_micros);
        assert_eq!(ts.timestamp, "2024-03-09T07:05:01.0045");
    }

    #[test]
    fn test_fraction_of_second() {
        assert_eq!(fraction_of_second(0), "");
        assert_eq!(fraction_of_second(500_000_000), ".5");
        assert_eq!(fraction_of_second(123_456_789), ".123456789");
        assert_eq!(fraction_of_second(1_250_000_000), ".25");
    }

    #[test]
    fn test_client_info_without_headers() {
        let req = HttpRequestMessage::new(Method::GET, &"/".parse().unwrap(), HeaderMap::new(), None);
        let info = ClientInfo::from_request(&req);
        assert_eq!(info.user_agent, UNKNOWN_USER_AGENT);
        assert_eq!(info.browser, Browser::Unknown);
        assert_eq!(info.operating_system, OperatingSystem::Unknown);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["browser"], "Unknown Browser");
        assert_eq!(json["operatingSystem"], "Unknown OS");
        assert!(json["acceptLanguage"].is_null());
        assert!(json["acceptEncoding"].is_null());
        assert!(json["accept"].is_null());
    }

    #[test]
    fn test_client_info_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"));
        headers.insert("accept-language", HeaderValue::from_static("en-GB,en;q=0.9"));
        headers.insert("accept-encoding", HeaderValue::from_static("gzip, br"));
        headers.insert("accept", HeaderValue::from_static("*/*"));
        let req = HttpRequestMessage::new(Method::GET, &"/".parse().unwrap(), headers, None);

        let json = serde_json::to_value(ClientInfo::from_request(&req)).unwrap();
        assert_eq!(json["browser"], "Mozilla Firefox");
        assert_eq!(json["operatingSystem"], "Linux");
        assert_eq!(json["acceptLanguage"], "en-GB,en;q=0.9");
        assert_eq!(json["acceptEncoding"], "gzip, br");
        assert_eq!(json["accept"], "*/*");
    }

    #[test]
    fn test_greeting_key_order() {
        let req = HttpRequestMessage::new(Method::POST, &"/api/HttpExample".parse().unwrap(), HeaderMap::new(), None);
        let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_string(&Greeting::new(&req, "Ada", now.into())).unwrap();

        let keys = [
            "\"message\"", "\"name\"", "\"timestamp\"", "\"date\"", "\"time\"",
            "\"clientIp\"", "\"clientInfo\"", "\"headers\"", "\"method\"", "\"uri\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "unexpected order: {json}");
    }
}
