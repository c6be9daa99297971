use std::path::{Path, PathBuf};

const PREFS_DIR: &str = "restrans";
const PREFS_FILE: &str = "session_prefs.v1";

/// Settings remembered across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionPrefs {
    pub source_path: String,
    pub destination_path: String,
    pub show_pending_only: bool,
}

pub fn session_prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PREFS_DIR).join(PREFS_FILE))
}

pub fn load_session_prefs(path: &Path) -> Result<SessionPrefs, String> {
    if !path.exists() {
        return Ok(SessionPrefs::default());
    }
    let content =
        std::fs::read_to_string(path).map_err(|err| format!("read {}: {err}", path.display()))?;
    parse_session_prefs(&content)
}

pub fn save_session_prefs(path: &Path, prefs: &SessionPrefs) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("create {}: {err}", parent.display()))?;
    }
    std::fs::write(path, serialize_session_prefs(prefs))
        .map_err(|err| format!("write {}: {err}", path.display()))
}

pub fn serialize_session_prefs(prefs: &SessionPrefs) -> String {
    let lines = [
        "version=1".to_string(),
        format!("source_path={}", escape_pref_value(&prefs.source_path)),
        format!("destination_path={}", escape_pref_value(&prefs.destination_path)),
        format!("show_pending_only={}", prefs.show_pending_only),
    ];
    lines.join("\n")
}

pub fn parse_session_prefs(content: &str) -> Result<SessionPrefs, String> {
    let mut out = SessionPrefs::default();
    let mut version = None::<u32>;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("invalid prefs line: {line}"));
        };
        match key {
            "version" => {
                let v = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid prefs version: {value}"))?;
                version = Some(v);
            }
            "source_path" => out.source_path = unescape_pref_value(value)?,
            "destination_path" => out.destination_path = unescape_pref_value(value)?,
            "show_pending_only" => {
                out.show_pending_only = value
                    .parse::<bool>()
                    .map_err(|_| format!("invalid show_pending_only: {value}"))?;
            }
            _ => {}
        }
    }
    match version {
        Some(1) => Ok(out),
        Some(v) => Err(format!("unsupported prefs version: {v}")),
        None => Err("prefs version missing".to_string()),
    }
}

fn escape_pref_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '=' => out.push_str("%3D"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_pref_value(input: &str) -> Result<String, String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .ok_or_else(|| "truncated escape in prefs".to_string())?;
            let hi = (hex[0] as char)
                .to_digit(16)
                .ok_or_else(|| "invalid escape in prefs".to_string())?;
            let lo = (hex[1] as char)
                .to_digit(16)
                .ok_or_else(|| "invalid escape in prefs".to_string())?;
            out.push((hi * 16 + lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| "prefs value is not UTF-8".to_string())
}
