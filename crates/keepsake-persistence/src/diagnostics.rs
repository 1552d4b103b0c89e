//! Connection self-test.

use std::fmt;

use keepsake_store::{Notice, NoticeKind};

use crate::endpoint::RawResponse;
use crate::gateway::PersistenceGateway;
use crate::protocol::{Markup, detect_markup};

/// What a test request to the endpoint revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionReport {
    /// The endpoint answered with JSON.
    Ok { status: u16 },
    /// The script came back as source text.
    PhpNotExecuting { status: u16 },
    /// An HTML page came back: wrong path, server error page, or a script
    /// error rendered as HTML.
    HtmlPage { status: u16 },
    /// Something came back that is neither JSON nor a page.
    InvalidJson { status: u16, preview: String },
    /// No response at all.
    Unreachable { reason: String },
}

impl ConnectionReport {
    fn from_raw(raw: &RawResponse) -> Self {
        let status = raw.status;
        match detect_markup(&raw.body) {
            Some(Markup::PhpSource) => Self::PhpNotExecuting { status },
            Some(Markup::HtmlPage) => Self::HtmlPage { status },
            None if raw.body.contains("<html") => Self::HtmlPage { status },
            None => match serde_json::from_str::<serde_json::Value>(&raw.body) {
                Ok(_) => Self::Ok { status },
                Err(_) => Self::InvalidJson {
                    status,
                    preview: raw.preview(200).to_string(),
                },
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The notice shown to the user for this result.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Ok { .. } => Notice::new("Connection working!", NoticeKind::Success),
            Self::PhpNotExecuting { .. } => {
                Notice::new("PHP is not enabled on your server!", NoticeKind::Error)
            }
            Self::HtmlPage { .. } => {
                Notice::new("Cannot find the data file or server error!", NoticeKind::Error)
            }
            Self::InvalidJson { .. } => {
                Notice::new("The server is returning invalid data!", NoticeKind::Error)
            }
            Self::Unreachable { .. } => {
                Notice::new("Cannot connect to the server!", NoticeKind::Error)
            }
        }
    }
}

impl fmt::Display for ConnectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { status } => write!(f, "OK (HTTP {status}, valid JSON)"),
            Self::PhpNotExecuting { status } => {
                write!(f, "HTTP {status}: script returned as text, PHP is not executing")
            }
            Self::HtmlPage { status } => write!(
                f,
                "HTTP {status}: got an HTML page (wrong path, server error page or script error)"
            ),
            Self::InvalidJson { status, preview } => {
                write!(f, "HTTP {status}: invalid JSON: {preview}")
            }
            Self::Unreachable { reason } => write!(f, "unreachable: {reason}"),
        }
    }
}

impl PersistenceGateway {
    /// Fetch the endpoint once and classify the reply. The store is not
    /// touched; the result is also sent to the notifier.
    pub async fn test_connection(&self) -> ConnectionReport {
        let inner = &self.inner;
        tracing::info!(endpoint = %inner.endpoint.describe(), "testing connection");

        let fetched = {
            let _io = inner.io.lock().await;
            inner.endpoint.fetch().await
        };
        let report = match fetched {
            Ok(raw) => {
                tracing::debug!(
                    status = raw.status,
                    content_type = raw.content_type.as_deref().unwrap_or("-"),
                    body = raw.preview(500),
                    "test reply"
                );
                ConnectionReport::from_raw(&raw)
            }
            Err(err) => ConnectionReport::Unreachable {
                reason: err.to_string(),
            },
        };

        if report.is_ok() {
            tracing::info!(%report, "connection test passed");
        } else {
            tracing::error!(%report, "connection test failed");
        }
        inner.notifier.notify(report.notice());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_replies() {
        let php = RawResponse::ok_json("<?php echo json_encode([]); ?>");
        assert_eq!(
            ConnectionReport::from_raw(&php),
            ConnectionReport::PhpNotExecuting { status: 200 }
        );

        let html = RawResponse {
            status: 404,
            content_type: Some("text/html".into()),
            body: "<!DOCTYPE html><title>Not Found</title>".into(),
        };
        assert_eq!(
            ConnectionReport::from_raw(&html),
            ConnectionReport::HtmlPage { status: 404 }
        );

        let junk = RawResponse::ok_json("Fatal error on line 3");
        assert!(matches!(
            ConnectionReport::from_raw(&junk),
            ConnectionReport::InvalidJson { status: 200, .. }
        ));

        let ok = RawResponse::ok_json(r#"{"success":true,"data":{}}"#);
        assert!(ConnectionReport::from_raw(&ok).is_ok());
    }

    #[test]
    fn test_notice_kinds() {
        assert_eq!(
            ConnectionReport::Ok { status: 200 }.notice().kind,
            NoticeKind::Success
        );
        assert_eq!(
            ConnectionReport::Unreachable {
                reason: "refused".into()
            }
            .notice()
            .kind,
            NoticeKind::Error
        );
    }
}
