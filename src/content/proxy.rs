/**
 * Development Proxy Bridge
 *
 * Forwards every request the API routes did not claim to the frontend dev
 * server, so the whole application is reachable on the gateway port while
 * hot reload keeps working.
 *
 * # Forwarding Rules
 *
 * - Plain HTTP requests are re-issued against the dev origin with the
 *   method, path, query, headers and body intact. The `Host` header is
 *   rewritten to the target's own origin and connection-scoped headers
 *   are stripped in both directions. Bodies stream through without
 *   buffering.
 * - WebSocket upgrades are bridged: the gateway dials the dev server
 *   first, offering the client's subprotocols, and only then completes
 *   the client upgrade. Frames are pumped in both directions until
 *   either side closes.
 * - Redirects from the dev server pass through to the browser untouched.
 *
 * # Failure Degradation
 *
 * An unreachable dev origin produces a fixed 502 page naming the target
 * and how to start it. One log line per failed attempt, no retries.
 */

use std::time::Duration;

use axum::body::Body;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, Request};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::ClientRequestBuilder;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame as UpstreamCloseFrame;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Transparent bridge to the frontend dev server.
///
/// Cheap to clone; all clones share one HTTP client.
#[derive(Debug, Clone)]
pub struct DevProxy {
    origin: String,
    client: reqwest::Client,
}

impl DevProxy {
    /// Build a proxy for the given dev server origin.
    ///
    /// The client never follows redirects (they belong to the browser)
    /// and gives up on unreachable targets after a short connect timeout.
    pub fn new(origin: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The dev server origin this proxy forwards to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Install the proxy as the router's catch-all.
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let proxy = self.clone();
        router.fallback(move |req: Request| {
            let proxy = proxy.clone();
            async move { proxy.handle(req).await }
        })
    }

    /// Dispatch one unclaimed request: WebSocket upgrades are bridged,
    /// everything else is forwarded over HTTP.
    pub async fn handle(&self, req: Request) -> Response {
        if is_upgrade_request(req.headers()) {
            self.bridge_websocket(req).await
        } else {
            self.forward_http(req).await
        }
    }

    async fn forward_http(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();
        let target = self.target_url(&parts.uri);

        let outcome = self
            .client
            .request(parts.method.clone(), &target)
            .headers(forward_request_headers(&parts.headers))
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .send()
            .await;

        match outcome {
            Ok(upstream) => {
                let status = upstream.status();
                let headers = forward_response_headers(upstream.headers());
                let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
                *response.status_mut() = status;
                *response.headers_mut() = headers;
                response
            }
            Err(e) => {
                tracing::error!("Dev server proxy error for {}: {}", target, e);
                self.unavailable_response()
            }
        }
    }

    async fn bridge_websocket(&self, req: Request) -> Response {
        let (mut parts, _body) = req.into_parts();

        let offered = offered_protocols(&parts.headers);
        let target = self.ws_target_url(&parts.uri);

        let upgrade = match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
            Ok(upgrade) => upgrade,
            Err(rejection) => return rejection.into_response(),
        };

        let uri: Uri = match target.parse() {
            Ok(uri) => uri,
            Err(_) => {
                tracing::error!("Invalid dev server websocket target: {}", target);
                return self.unavailable_response();
            }
        };
        let mut request = ClientRequestBuilder::new(uri);
        for protocol in &offered {
            request = request.with_sub_protocol(protocol.clone());
        }

        // Dial the dev server before completing the client upgrade so an
        // unreachable target degrades to the diagnostic page instead of a
        // half-open socket.
        let (upstream, handshake) = match connect_async(request).await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!("Dev server websocket proxy error for {}: {}", target, e);
                return self.unavailable_response();
            }
        };

        let selected = handshake
            .headers()
            .get(header::SEC_WEBSOCKET_PROTOCOL)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let upgrade = match selected {
            Some(protocol) => upgrade.protocols([protocol]),
            None => upgrade,
        };

        upgrade.on_upgrade(move |client| pump(client, upstream))
    }

    fn target_url(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        format!("{}{}", self.origin, path_and_query)
    }

    fn ws_target_url(&self, uri: &Uri) -> String {
        let target = self.target_url(uri);
        if let Some(rest) = target.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = target.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            target
        }
    }

    fn unavailable_response(&self) -> Response {
        (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            self.unavailable_page(),
        )
            .into_response()
    }

    fn unavailable_page(&self) -> String {
        format!(
            "<html><body style=\"font-family:system-ui, Arial;\">\n\
             <h2>Frontend dev server not available</h2>\n\
             <p>The gateway tried to proxy to <code>{}</code> but couldn't reach it.</p>\n\
             <p>Start frontend: <code>cd frontend &amp;&amp; npm run dev</code></p>\n\
             </body></html>",
            self.origin
        )
    }
}

/// Pump frames between the browser and the dev server until either side
/// closes or errors.
async fn pump(client: WebSocket, upstream: WebSocketStream<MaybeTlsStream<TcpStream>>) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    loop {
        tokio::select! {
            from_client = client_rx.next() => match from_client {
                Some(Ok(msg)) => {
                    let closing = matches!(msg, Message::Close(_));
                    if upstream_tx.send(client_to_upstream(msg)).await.is_err() || closing {
                        break;
                    }
                }
                Some(Err(_)) | None => {
                    let _ = upstream_tx.send(UpstreamMessage::Close(None)).await;
                    break;
                }
            },
            from_upstream = upstream_rx.next() => match from_upstream {
                Some(Ok(msg)) => {
                    if let Some(msg) = upstream_to_client(msg) {
                        let closing = matches!(msg, Message::Close(_));
                        if client_tx.send(msg).await.is_err() || closing {
                            break;
                        }
                    }
                }
                Some(Err(_)) | None => {
                    let _ = client_tx.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }
}

fn client_to_upstream(msg: Message) -> UpstreamMessage {
    match msg {
        Message::Text(text) => UpstreamMessage::Text(text.as_str().into()),
        Message::Binary(data) => UpstreamMessage::Binary(data),
        Message::Ping(data) => UpstreamMessage::Ping(data),
        Message::Pong(data) => UpstreamMessage::Pong(data),
        Message::Close(frame) => UpstreamMessage::Close(frame.map(|f| UpstreamCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason.as_str().into(),
        })),
    }
}

fn upstream_to_client(msg: UpstreamMessage) -> Option<Message> {
    match msg {
        UpstreamMessage::Text(text) => Some(Message::Text(text.as_str().into())),
        UpstreamMessage::Binary(data) => Some(Message::Binary(data)),
        UpstreamMessage::Ping(data) => Some(Message::Ping(data)),
        UpstreamMessage::Pong(data) => Some(Message::Pong(data)),
        UpstreamMessage::Close(frame) => Some(Message::Close(frame.map(|f| CloseFrame {
            code: u16::from(f.code),
            reason: f.reason.as_str().into(),
        }))),
        // Raw frames are a write-side construct and never cross the bridge.
        UpstreamMessage::Frame(_) => None,
    }
}

fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

fn offered_protocols(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|protocol| protocol.trim().to_string())
        .filter(|protocol| !protocol.is_empty())
        .collect()
}

/// Hop-by-hop headers are connection-scoped and never forwarded.
fn is_hop_by_hop(name: &str) -> bool {
    matches!(
        name,
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Headers presented to the dev server. `Host` is dropped so the client
/// picks the target's own host, and `Content-Length` is dropped because
/// the body is re-streamed.
fn forward_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) || matches!(name.as_str(), "host" | "content-length") {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Headers returned to the browser. The body passes through unmodified,
/// so `Content-Length` stays valid and is kept.
fn forward_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
