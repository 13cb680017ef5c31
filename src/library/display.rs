use percent_encoding::percent_decode_str;

/// Build the display name for a song file listed in `info.json`.
///
/// Only the last path segment is used. It is percent-decoded, a trailing
/// audio extension from `extensions` is stripped (case-insensitive) and the
/// result is trimmed.
pub fn song_display_name(file: &str, extensions: &[String]) -> String {
    let last = file.rsplit('/').next().unwrap_or(file);
    let decoded = percent_decode_str(last).decode_utf8_lossy();

    let stem = match decoded.rsplit_once('.') {
        Some((stem, ext))
            if extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| e.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => decoded.as_ref(),
    };

    stem.trim().to_string()
}
