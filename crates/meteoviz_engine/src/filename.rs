const FALLBACK_STEM: &str = "forecast_image";
const MAX_STEM_CHARS: usize = 120;

/// Make a requested export name safe on every desktop filesystem.
///
/// Forbidden characters become `_`, runs of `_` collapse, reserved Windows
/// device names get a trailing `_`, and the extension defaults to `.png`.
pub fn safe_filename(requested: &str) -> String {
    let trimmed = requested.trim();
    let (stem, ext) = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_simple_extension(ext) => (stem, ext),
        _ => (trimmed, "png"),
    };

    let mut cleaned = sanitize_stem(stem);
    if cleaned.is_empty() {
        cleaned = FALLBACK_STEM.to_string();
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    format!("{cleaned}.{}", ext.to_ascii_lowercase())
}

fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let trimmed = compacted.trim_matches(&['_', ' ', '.'][..]);
    trimmed.chars().take(MAX_STEM_CHARS).collect()
}

fn is_simple_extension(ext: &str) -> bool {
    (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
