use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use crate::geometry::PointerPosition;

const HYPR_LOOKUP_RETRY_COUNT: u8 = 40;
const HYPR_LOOKUP_RETRY_DELAY: Duration = Duration::from_millis(50);
const HYPR_PIN_EVENT_TIMEOUT: Duration = Duration::from_millis(350);
const HYPR_SOCKET_TIMEOUT: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HyprClientMatch {
    pub(super) address: String,
    pub(super) pinned: bool,
}

pub(super) fn hyprland_running() -> bool {
    std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some()
}

pub(super) fn hypr_client_match_from_json(
    stdout: &[u8],
    expected_title: &str,
) -> Option<HyprClientMatch> {
    let parsed: serde_json::Value = serde_json::from_slice(stdout).ok()?;
    let clients = parsed.as_array()?;
    for client in clients {
        let Some(title) = client.get("title").and_then(serde_json::Value::as_str) else {
            continue;
        };
        if title != expected_title {
            continue;
        }
        let Some(address) = client.get("address").and_then(serde_json::Value::as_str) else {
            continue;
        };
        let pinned = client
            .get("pinned")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        return Some(HyprClientMatch {
            address: address.to_string(),
            pinned,
        });
    }
    None
}

fn find_hypr_window_match(expected_title: &str) -> Option<HyprClientMatch> {
    let outcome = Command::new("hyprctl")
        .args(["-j", "clients"])
        .output()
        .ok()?;
    if !outcome.status.success() {
        return None;
    }
    hypr_client_match_from_json(&outcome.stdout, expected_title)
}

/// Looks up the compositor address of a freshly mapped window by title.
pub(super) fn lookup_window_address(expected_title: &str) -> Option<String> {
    retry_until_some(
        HYPR_LOOKUP_RETRY_COUNT,
        HYPR_LOOKUP_RETRY_DELAY,
        |_| find_hypr_window_match(expected_title),
        std::thread::sleep,
    )
    .map(|matched| matched.address)
}

fn retry_until_some<T, F, S>(
    retry_count: u8,
    retry_delay: Duration,
    mut action: F,
    mut sleep: S,
) -> Option<T>
where
    F: FnMut(u8) -> Option<T>,
    S: FnMut(Duration),
{
    if retry_count == 0 {
        return None;
    }

    for attempt in 1..=retry_count {
        if let Some(value) = action(attempt) {
            return Some(value);
        }

        if attempt < retry_count {
            sleep(retry_delay);
        }
    }

    None
}

fn hypr_socket_path(file_name: &str) -> Option<PathBuf> {
    let signature = std::env::var("HYPRLAND_INSTANCE_SIGNATURE").ok()?;
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").ok()?;
    Some(
        PathBuf::from(runtime_dir)
            .join("hypr")
            .join(signature)
            .join(file_name),
    )
}

/// One request on the command socket; Hyprland closes it after replying.
fn hypr_request(request: &str) -> Option<String> {
    let path = hypr_socket_path(".socket.sock")?;
    let mut stream = UnixStream::connect(path).ok()?;
    let _ = stream.set_read_timeout(Some(HYPR_SOCKET_TIMEOUT));
    stream.write_all(request.as_bytes()).ok()?;
    let mut reply = String::new();
    stream.read_to_string(&mut reply).ok()?;
    Some(reply)
}

pub(super) fn parse_cursor_position(reply: &str) -> Option<PointerPosition> {
    let parsed: serde_json::Value = serde_json::from_str(reply).ok()?;
    let x = parsed.get("x")?.as_f64()?;
    let y = parsed.get("y")?.as_f64()?;
    Some(PointerPosition::new(x, y))
}

/// Screen-space pointer position; Wayland never reports it to clients.
pub(super) fn cursor_position() -> Option<PointerPosition> {
    let reply = hypr_request("j/cursorpos")?;
    parse_cursor_position(&reply)
}

pub(super) fn move_window_pixel_request(address: &str, dx: i32, dy: i32) -> String {
    format!("dispatch movewindowpixel {dx} {dy},address:{address}")
}

pub(super) fn request_window_move(window_name: &str, address: &str, dx: i32, dy: i32) -> bool {
    let request = move_window_pixel_request(address, dx, dy);
    match hypr_request(&request) {
        Some(reply) if reply.trim() == "ok" => true,
        Some(reply) => {
            tracing::debug!(
                window = window_name,
                request = request,
                reply = reply.trim(),
                "movewindowpixel was rejected"
            );
            false
        }
        None => {
            tracing::debug!(
                window = window_name,
                request = request,
                "hyprland command socket unavailable"
            );
            false
        }
    }
}

fn open_socket2_reader() -> Option<BufReader<UnixStream>> {
    let path = hypr_socket_path(".socket2.sock")?;
    let stream = UnixStream::connect(path).ok()?;
    let _ = stream.set_read_timeout(Some(HYPR_SOCKET_TIMEOUT));
    Some(BufReader::new(stream))
}

/// `pin>>ADDRESS,STATE` line from the event socket.
#[derive(Debug, PartialEq, Eq)]
struct PinEvent<'a> {
    address: &'a str,
    pinned: bool,
}

fn pin_event_from_line(line: &str) -> Option<PinEvent<'_>> {
    let (address, state) = line.trim().strip_prefix("pin>>")?.split_once(',')?;
    let pinned = match state.trim() {
        "0" => false,
        "1" => true,
        _ => return None,
    };
    Some(PinEvent {
        address: address.trim(),
        pinned,
    })
}

/// Reads events until the window's pin state is reported, the stream closes
/// or the deadline passes. Returns whether the reported state matches.
fn await_pin_confirmation<R: BufRead>(
    events: &mut R,
    address: &str,
    pinned: bool,
    timeout: Duration,
) -> Option<bool> {
    let deadline = Instant::now() + timeout;
    let mut line = String::new();
    while Instant::now() < deadline {
        line.clear();
        match events.read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => match pin_event_from_line(&line) {
                Some(event) if event.address == address => return Some(event.pinned == pinned),
                _ => {}
            },
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) => {}
            Err(err) => {
                tracing::debug!(?err, "event socket read failed");
                return None;
            }
        }
    }
    None
}

fn run_dispatch(window_name: &str, dispatcher: &str, arg: &str) -> bool {
    let outcome = Command::new("hyprctl")
        .args(["dispatch", dispatcher, arg])
        .output();

    match outcome {
        Ok(result) if result.status.success() => {
            tracing::debug!(
                window = window_name,
                dispatcher = dispatcher,
                arg = arg,
                "hyprctl dispatch applied"
            );
            true
        }
        Ok(result) => {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::warn!(
                window = window_name,
                dispatcher = dispatcher,
                arg = arg,
                status = result.status.code(),
                stderr = stderr.trim(),
                "hyprctl dispatch returned non-zero status"
            );
            false
        }
        Err(err) => {
            tracing::debug!(
                window = window_name,
                dispatcher = dispatcher,
                arg = arg,
                ?err,
                "hyprctl dispatch failed"
            );
            false
        }
    }
}

/// Floats the note and strips compositor decorations so it stays frameless.
pub(super) fn request_window_floating(window_name: &str, expected_title: &str, size: (i32, i32)) {
    if !hyprland_running() {
        tracing::debug!(
            window = window_name,
            "skipping floating dispatch outside Hyprland"
        );
        return;
    }

    let window_name = window_name.to_string();
    let expected_title = expected_title.to_string();
    std::thread::spawn(move || {
        let Some(address) = lookup_window_address(&expected_title) else {
            tracing::debug!(
                window = window_name,
                title = expected_title,
                "hypr window address lookup failed for floating request"
            );
            return;
        };

        let selector = format!("address:{address}");
        if !run_dispatch(&window_name, "setfloating", &selector) {
            return;
        }
        for (property, value) in [
            ("decorate", "off"),
            ("border_size", "0"),
            ("rounding", "0"),
            ("no_shadow", "on"),
        ] {
            let arg = format!("{selector} {property} {value}");
            run_dispatch(&window_name, "setprop", &arg);
        }
        let (width, height) = size;
        let resize_arg = format!("exact {} {},{selector}", width.max(1), height.max(1));
        run_dispatch(&window_name, "resizewindowpixel", &resize_arg);
    });
}

pub(super) fn request_window_pin(window_name: &str, expected_title: &str, pinned: bool) -> bool {
    if !hyprland_running() {
        tracing::debug!(
            window = window_name,
            "skipping pin dispatch outside Hyprland"
        );
        return false;
    }

    let applied = retry_until_some(
        HYPR_LOOKUP_RETRY_COUNT,
        HYPR_LOOKUP_RETRY_DELAY,
        |_| {
            let matched = find_hypr_window_match(expected_title)?;
            if matched.pinned == pinned {
                tracing::debug!(
                    window = window_name,
                    title = expected_title,
                    pinned = pinned,
                    "pin request already satisfied"
                );
                return Some(true);
            }

            let selector = format!("address:{}", matched.address);
            let mut event_reader = open_socket2_reader();
            if run_dispatch(window_name, "pin", &selector) {
                if let Some(reader) = event_reader.as_mut() {
                    let confirmed = await_pin_confirmation(
                        reader,
                        &matched.address,
                        pinned,
                        HYPR_PIN_EVENT_TIMEOUT,
                    )
                    .unwrap_or(false);
                    if confirmed {
                        return Some(true);
                    }
                }
            }

            let verified = find_hypr_window_match(expected_title)?;
            (verified.pinned == pinned).then_some(true)
        },
        std::thread::sleep,
    )
    .unwrap_or(false);

    if !applied {
        tracing::warn!(
            window = window_name,
            title = expected_title,
            pinned = pinned,
            "failed to apply requested pin state after retries"
        );
    }
    applied
}
