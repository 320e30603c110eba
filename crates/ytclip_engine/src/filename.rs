use crate::sha256_hex;

const MAX_NAME_BYTES: usize = 120;
const MAX_EXTENSION_BYTES: usize = 10;

/// Local name for a file reported by the backend.
///
/// Only the last path component survives; characters Windows rejects become
/// `_`, reserved device names get a `_` suffix on the stem, and the length is
/// capped while keeping the extension. Names that clean up to nothing fall back
/// to `artifact--{short_hash}`.
pub fn safe_artifact_name(backend_name: &str) -> String {
    let last = backend_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(backend_name);

    let replaced: String = last
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = collapse_underscores(replaced.trim_matches(&['_', ' ', '.'][..]));
    if cleaned.is_empty() {
        return format!("artifact--{}", &sha256_hex(backend_name.as_bytes())[..8]);
    }

    patch_reserved_stem(cap_length(cleaned))
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn collapse_underscores(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES => {
            (&name[..dot], &name[dot..])
        }
        _ => (name, ""),
    }
}

fn cap_length(name: String) -> String {
    if name.len() <= MAX_NAME_BYTES {
        return name;
    }
    let (stem, ext) = split_extension(&name);
    let mut end = (MAX_NAME_BYTES - ext.len()).min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], ext)
}

fn patch_reserved_stem(name: String) -> String {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem_len = name.find('.').unwrap_or(name.len());
    let stem = &name[..stem_len];
    if RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        return format!("{}_{}", stem, &name[stem_len..]);
    }
    name
}
