//! Social post normalisation
//!
//! Raw post → space-separated tokens ready for the TF-IDF vectorizer.
//! Deterministic, no I/O, and `clean(clean(x)) == clean(x)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::stopwords::is_stopword;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\.\S+").expect("valid url pattern"));

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\w+").expect("valid mention pattern"));

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid charset pattern"));

/// Clean a post.
///
/// lowercase → drop emoji → drop URLs → drop @mentions → drop `#` →
/// non-alphanumerics to spaces → collapse whitespace → drop stopwords and
/// one-character tokens.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_emoji: String = lowered.chars().filter(|c| !is_emoji(*c)).collect();
    let no_urls = URL_RE.replace_all(&no_emoji, "");
    let no_mentions = MENTION_RE.replace_all(&no_urls, "");
    let no_hash = no_mentions.replace('#', "");
    let alnum = NON_ALNUM_RE.replace_all(&no_hash, " ");

    alnum
        .split_whitespace()
        .map(strip_url_residue)
        .filter(|t| t.len() > 1 && !is_stopword(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean an arbitrary JSON value; anything but a string yields `""`
pub fn clean_value(value: &Value) -> String {
    match value {
        Value::String(s) => clean_text(s),
        _ => String::new(),
    }
}

/// Removing `#` and punctuation can assemble a URL anywhere in a token
/// (`ht#tps`, `xht#tpy`, `fire#http#s`). A second pass would cut it at the
/// first `http` with something after it, so cut it now.
///
/// The kept prefix holds no such `http`, so the cut is stable.
fn strip_url_residue(token: &str) -> &str {
    match URL_RE.find(token) {
        Some(m) => &token[..m.start()],
        None => token,
    }
}

/// Emoji and pictographic code points (plus joiners / variation selectors)
fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // pictographs, emoticons, transport, flags, symbols
            | 0x2600..=0x27BF   // misc symbols, dingbats
            | 0x2300..=0x23FF   // misc technical (⌚ ⏰ ...)
            | 0x2B00..=0x2BFF   // arrows, stars
            | 0x2190..=0x21FF   // arrows
            | 0x3030 | 0x303D | 0x3297 | 0x3299
            | 0x00A9 | 0x00AE | 0x2122 | 0x2139
            | 0x20E3            // keycap
            | 0x200D            // zero width joiner
            | 0xFE00..=0xFE0F   // variation selectors
            | 0xE0020..=0xE007F // tags
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_pipeline() {
        let cleaned = clean_text("Huge FLOOD in my area!!! Need help @RedCross #flood https://t.co/x1");
        assert_eq!(cleaned, "huge flood area need help flood");
    }

    #[test]
    fn test_emoji_and_www() {
        let cleaned = clean_text("Fire🔥fire 🚒 see www.news.example/fire now");
        assert_eq!(cleaned, "firefire see");
    }

    #[test]
    fn test_non_string_is_empty() {
        assert_eq!(clean_value(&json!(42)), "");
        assert_eq!(clean_value(&json!(null)), "");
        assert_eq!(clean_value(&json!(["flood"])), "");
        assert_eq!(clean_value(&json!("Flood warning")), "flood warning");
    }

    #[test]
    fn test_single_chars_and_stopwords_dropped() {
        assert_eq!(clean_text("I am a b c the x"), "");
        assert_eq!(clean_text("don't panic"), "panic");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "   ",
            "Beautiful day at the beach",
            "ht#tps is not a link, ht#tpx neither",
            "@user#tag and #hashtag and a#@b",
            "http alone, www alone, www#.x",
            "Çà et là: ÉVACUATION 🚨🚨 now!!",
            "1️⃣ keycap 2⃣ and tabs\tand\nnewlines",
            "numbers 42 and 3.14 and 1,000",
            "mixed_under_score token-with-dash",
            "xht#tpy",
            "fire#http#s now",
            "thehttp#s flood",
            "ahttp#bhttp#c",
            "flood#https#",
            "h#t#t#p#s#x storm",
            "w#ww.example.org and ww#w#.x and www#.#y",
            "http, https: and htt#p!",
            "see h.t.t.p.s//x.y",
        ];

        for input in inputs {
            let once = clean_text(input);
            let twice = clean_text(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_url_residue_cut_mid_token() {
        assert_eq!(clean_text("xht#tpy"), "");
        assert_eq!(clean_text("fire#http#s now"), "fire");
        assert_eq!(clean_text("ht#tps rescue"), "rescue");
        // Bare `http` is a word, not a URL
        assert_eq!(clean_text("http"), "http");
    }

    #[test]
    fn test_idempotent_over_demo_corpus() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join(crate::constants::DEMO_POSTS_CSV);
        let posts = crate::logic::ingest::csv_source::read_labelled_posts(&path).unwrap();
        assert!(!posts.is_empty());

        for post in &posts {
            let once = clean_text(&post.text);
            assert_eq!(clean_text(&once), once, "not idempotent for {:?}", post.text);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Earthquake felt downtown, buildings shaking #quake";
        assert_eq!(clean_text(text), clean_text(text));
    }
}
