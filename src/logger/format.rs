//! Access log format module
//!
//! Supports multiple log formats:
//! - `common` (Common Log Format - CLF), the default
//! - `combined` (CLF plus referer and user agent)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};
use hyper::{HeaderMap, Method, Uri, Version};
use std::net::SocketAddr;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

// longer names first where one is a prefix of another
const PATTERN_VARIABLES: [&str; 11] = [
    "$remote_addr",
    "$time_local",
    "$time_iso8601",
    "$request_time",
    "$request_method",
    "$request_uri",
    "$request",
    "$status",
    "$body_bytes_sent",
    "$http_referer",
    "$http_user_agent",
];

/// Parsed `logging.access_log_format` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Common,
    Combined,
    Json,
    Pattern(String),
}

impl AccessLogFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "common" => Self::Common,
            "combined" => Self::Combined,
            "json" => Self::Json,
            pattern => Self::Pattern(pattern.to_string()),
        }
    }
}

/// One completed request/response exchange
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Capture request-side fields; status and size are filled in later
    pub fn from_request(
        peer_addr: SocketAddr,
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
    ) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            remote_addr: peer_addr.ip().to_string(),
            time: Local::now(),
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            http_version: version_label(version),
            status: 0,
            body_bytes: 0,
            referer: header("referer"),
            user_agent: header("user-agent"),
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Json => self.format_json(),
            AccessLogFormat::Pattern(pattern) => self.format_pattern(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`,
    /// `$status`, `$body_bytes_sent`, `$http_referer`, `$http_user_agent`
    ///
    /// Substituted values are never rescanned for variables.
    fn format_pattern(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match PATTERN_VARIABLES.iter().find(|var| rest.starts_with(**var)) {
                Some(var) => {
                    out.push_str(&self.variable(var));
                    rest = &rest[var.len()..];
                }
                None => {
                    out.push('$');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> String {
        match name {
            "$remote_addr" => self.remote_addr.clone(),
            "$time_local" => self.time.format(CLF_TIME).to_string(),
            "$time_iso8601" => self.time.to_rfc3339(),
            "$request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let secs = self.request_time_us as f64 / 1_000_000.0;
                format!("{secs:.3}")
            }
            "$request_method" => self.method.clone(),
            "$request_uri" => self.request_uri(),
            "$request" => self.request_line(),
            "$status" => self.status.to_string(),
            "$body_bytes_sent" => self.body_bytes.to_string(),
            "$http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "$http_user_agent" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            _ => name.to_string(),
        }
    }
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", "curl/8.5.0".parse().unwrap());
        headers.insert("referer", "https://example.com/".parse().unwrap());
        let uri: Uri = "/notes/todo.txt?rev=2".parse().unwrap();

        let mut entry = AccessLogEntry::from_request(
            "10.0.0.7:51234".parse().unwrap(),
            &Method::PUT,
            &uri,
            Version::HTTP_11,
            &headers,
        );
        entry.status = 200;
        entry.body_bytes = 0;
        entry.request_time_us = 250_000;
        entry
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(AccessLogFormat::parse("common"), AccessLogFormat::Common);
        assert_eq!(AccessLogFormat::parse("json"), AccessLogFormat::Json);
        assert_eq!(
            AccessLogFormat::parse("$status"),
            AccessLogFormat::Pattern("$status".to_string())
        );
    }

    #[test]
    fn test_format_common() {
        let log = sample_entry().format(&AccessLogFormat::Common);
        assert!(log.starts_with("10.0.0.7 - - ["));
        assert!(log.ends_with("\"PUT /notes/todo.txt?rev=2 HTTP/1.1\" 200 0"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_combined() {
        let log = sample_entry().format(&AccessLogFormat::Combined);
        assert!(log.contains("\"PUT /notes/todo.txt?rev=2 HTTP/1.1\" 200 0"));
        assert!(log.ends_with("\"https://example.com/\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_json() {
        let log = sample_entry().format(&AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "PUT");
        assert_eq!(value["path"], "/notes/todo.txt");
        assert_eq!(value["query"], "rev=2");
        assert_eq!(value["status"], 200);
        assert_eq!(value["user_agent"], "curl/8.5.0");
    }

    #[test]
    fn test_format_pattern() {
        let format =
            AccessLogFormat::Pattern("$request_method $request_uri $status $request_time".into());
        let log = sample_entry().format(&format);
        assert_eq!(log, "PUT /notes/todo.txt?rev=2 200 0.250");
    }

    #[test]
    fn test_pattern_values_not_rescanned() {
        let uri: Uri = "/$status/$remote_addr".parse().unwrap();
        let mut entry = AccessLogEntry::from_request(
            "10.0.0.7:51234".parse().unwrap(),
            &Method::PUT,
            &uri,
            Version::HTTP_11,
            &HeaderMap::new(),
        );
        entry.status = 200;

        let format = AccessLogFormat::Pattern("$request_uri $status $ $unknown".into());
        assert_eq!(
            entry.format(&format),
            "/$status/$remote_addr 200 $ $unknown"
        );
    }
}
