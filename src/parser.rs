use once_cell::sync::Lazy;
use regex::Regex;

// Tried in order; the first pattern that matches anywhere in the text wins.
static TRACK_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"https?://open\.spotify\.com/track/([a-zA-Z0-9]+)").unwrap(),
        Regex::new(r"spotify:track:([a-zA-Z0-9]+)").unwrap(),
        Regex::new(r"track/([a-zA-Z0-9]+)").unwrap(),
    ]
});

/// Extract a Spotify track id from free-form text.
///
/// Accepts `https://open.spotify.com/track/<id>`, `spotify:track:<id>` and any
/// bare `track/<id>` fragment. Returns `None` when no pattern applies.
pub fn parse_track_id(text: &str) -> Option<&str> {
    if text.is_empty() {
        return None;
    }
    TRACK_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_url() {
        assert_eq!(
            parse_track_id("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc"),
            Some("4uLU6hMCjMI75M1A2tKUQC")
        );
        assert_eq!(parse_track_id("http://open.spotify.com/track/abc123"), Some("abc123"));
    }

    #[test]
    fn uri_and_fragment() {
        assert_eq!(parse_track_id("play spotify:track:xyz789 pls"), Some("xyz789"));
        assert_eq!(
            parse_track_id("https://open.spotify.com/intl-de/track/Zz9"),
            Some("Zz9")
        );
        assert_eq!(parse_track_id("track/abc"), Some("abc"));
    }

    #[test]
    fn earlier_pattern_wins() {
        let text = "spotify:track:second https://open.spotify.com/track/first";
        assert_eq!(parse_track_id(text), Some("first"));
        let text = "track/third spotify:track:second";
        assert_eq!(parse_track_id(text), Some("second"));
    }

    #[test]
    fn no_match() {
        assert_eq!(parse_track_id(""), None);
        assert_eq!(parse_track_id("please play freebird"), None);
        assert_eq!(parse_track_id("https://open.spotify.com/album/abc"), None);
        assert_eq!(parse_track_id("spotify:track:"), None);
    }
}
