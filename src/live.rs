//! Live Refresh
//!
//! Optional polling or WebSocket push that asks the controller to reload
//! chores when someone else ticks something off.

use gloo_timers::callback::Interval;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

use crate::config::LiveRefresh;

/// Keeps the timer or socket alive; dropping it (or `stop`) ends refresh
pub enum LiveHandle {
    Poll(Interval),
    Socket {
        socket: WebSocket,
        _on_message: Closure<dyn FnMut(MessageEvent)>,
    },
}

impl LiveHandle {
    pub fn start(mode: &LiveRefresh, on_refresh: impl Fn() + 'static) -> Option<Self> {
        match mode {
            LiveRefresh::Off => None,
            LiveRefresh::Poll { interval_ms } => {
                log::info!(target: "[LIVE]", "polling every {} ms", interval_ms);
                Some(LiveHandle::Poll(Interval::new((*interval_ms).max(1000), on_refresh)))
            }
            LiveRefresh::WebSocket { path } => {
                let url = socket_url(path)?;
                let socket = match WebSocket::new(&url) {
                    Ok(socket) => socket,
                    Err(err) => {
                        log::error!(target: "[LIVE]", "could not open {}: {:?}", url, err);
                        return None;
                    }
                };
                let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |_ev: MessageEvent| on_refresh());
                socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
                log::info!(target: "[LIVE]", "listening on {}", url);
                Some(LiveHandle::Socket {
                    socket,
                    _on_message: on_message,
                })
            }
        }
    }

    pub fn stop(self) {
        match self {
            LiveHandle::Poll(interval) => {
                interval.cancel();
            }
            LiveHandle::Socket { socket, _on_message } => {
                socket.set_onmessage(None);
                let _ = socket.close();
            }
        }
    }
}

/// Absolute ws:// or wss:// URL for a path on the current host
fn socket_url(path: &str) -> Option<String> {
    if path.starts_with("ws://") || path.starts_with("wss://") {
        return Some(path.to_string());
    }
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    Some(ws_url(&protocol, &host, path))
}

fn ws_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
    format!("{}://{}{}", scheme, host, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url() {
        assert_eq!(ws_url("https:", "pub.example", "/ws/chores"), "wss://pub.example/ws/chores");
        assert_eq!(ws_url("http:", "localhost:8000", "ws"), "ws://localhost:8000/ws");
    }
}
