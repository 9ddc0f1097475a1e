use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Normalizes raw text before it reaches the classifier.
pub trait Preprocessor: Send + Sync {
    /// Return the normalized form of `text`.
    fn preprocess(&self, text: &str) -> String;
}

/// Leaves the text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Preprocessor for Identity {
    fn preprocess(&self, text: &str) -> String {
        text.to_string()
    }
}

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("valid url regex"));
static USER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]{1,15}").expect("valid user regex"));
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));
static LAUGHTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:[ja]{4,}|[je]{4,})\b").expect("valid laughter regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Social-media text normalizer matching what tweet-trained Spanish classifiers expect.
///
/// URLs, user handles and hashtags are replaced by placeholder tokens. Emoji are spelled
/// out between `emoji` markers, character floods are shortened and laughter is collapsed
/// to a canonical form.
///
/// # Examples
///
/// ```rust
/// use sentimiento::sentiment::{Preprocessor, TweetPreprocessor};
///
/// let pre = TweetPreprocessor::default();
/// assert_eq!(
///     pre.preprocess("@cliente jajajaja me encantaaaaa #MejorCompra https://t.co/x"),
///     "@usuario jaja me encantaaa hashtag mejor compra url"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TweetPreprocessor {
    /// Replacement for `@handle`.
    pub user_token: String,
    /// Replacement for links.
    pub url_token: String,
    /// Prefix inserted before a split hashtag.
    pub hashtag_token: String,
    /// Longest run of one repeated character that survives.
    pub max_repeats: usize,
    /// Collapse `jajaja` style laughter.
    pub normalize_laughter: bool,
    /// Marker placed on both sides of a spelled-out emoji.
    pub emoji_token: String,
    /// Replace emoji with their names.
    pub demojize: bool,
}

impl Default for TweetPreprocessor {
    fn default() -> Self {
        Self {
            user_token: "@usuario".to_string(),
            url_token: "url".to_string(),
            hashtag_token: "hashtag".to_string(),
            max_repeats: 3,
            normalize_laughter: true,
            emoji_token: "emoji".to_string(),
            demojize: true,
        }
    }
}

impl Preprocessor for TweetPreprocessor {
    fn preprocess(&self, text: &str) -> String {
        let text = URL_RE.replace_all(text, self.url_token.as_str());
        let text = USER_RE.replace_all(&text, self.user_token.as_str());
        let text = HASHTAG_RE.replace_all(&text, |caps: &Captures<'_>| {
            format!("{} {}", self.hashtag_token, camel_to_human(&caps[1]))
        });
        let text = if self.demojize {
            demojize(&text, &self.emoji_token)
        } else {
            text.into_owned()
        };
        let mut text = shorten_repeats(&text, self.max_repeats);
        if self.normalize_laughter {
            text = LAUGHTER_RE
                .replace_all(&text, |caps: &Captures<'_>| normalize_laugh(&caps[0]))
                .into_owned();
        }
        let text = WHITESPACE_RE.replace_all(text.trim(), " ");
        collapse_repeated_token(&text, &self.user_token, self.max_repeats)
    }
}

/// Longest emoji sequence (ZWJ families, flags, skin tones) looked up in one go.
const MAX_EMOJI_CHARS: usize = 10;

/// `👍 genial` -> ` emoji thumbs up emoji  genial`. Whitespace is collapsed later.
fn demojize(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if !c.is_ascii() {
            if let Some((len, emoji)) = leading_emoji(rest) {
                let name = emoji.name().replace(':', "").to_lowercase();
                out.push_str(&format!(" {marker} {name} {marker} "));
                rest = &rest[len..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn leading_emoji(text: &str) -> Option<(usize, &'static emojis::Emoji)> {
    let ends: Vec<usize> = text
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .take(MAX_EMOJI_CHARS)
        .collect();
    ends.into_iter()
        .rev()
        .find_map(|end| emojis::get(&text[..end]).map(|emoji| (end, emoji)))
}

/// `MejorCompraDelAño` -> `mejor compra del año`, `hecho_en_casa` -> `hecho en casa`.
fn camel_to_human(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    let mut prev_lower = false;
    for c in word.chars() {
        if c == '_' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        out.extend(c.to_lowercase());
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn shorten_repeats(text: &str, max: usize) -> String {
    if max == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run <= max {
            out.push(c);
        }
    }
    out
}

fn normalize_laugh(token: &str) -> String {
    let lower = token.to_lowercase();
    let js = lower.chars().filter(|c| *c == 'j').count();
    let vowel = lower.chars().find(|c| *c != 'j');
    match vowel {
        Some('a') if js >= 2 => "jaja".to_string(),
        Some('e') if js >= 2 => "jeje".to_string(),
        _ => token.to_string(),
    }
}

/// Keep at most `max` consecutive occurrences of `token`.
fn collapse_repeated_token(text: &str, token: &str, max: usize) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut run = 0;
    for word in text.split(' ') {
        if word == token {
            run += 1;
            if run > max {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(word);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre(text: &str) -> String {
        TweetPreprocessor::default().preprocess(text)
    }

    #[test]
    fn replaces_users_and_urls() {
        assert_eq!(pre("@tienda_oficial mira http://x.co/a?b=1"), "@usuario mira url");
        assert_eq!(pre("ver www.ejemplo.com/promo ya"), "ver url ya");
    }

    #[test]
    fn url_with_handle_is_one_url() {
        assert_eq!(pre("perfil https://red.social/@alguien"), "perfil url");
    }

    #[test]
    fn splits_hashtags() {
        assert_eq!(pre("#MeEncanta"), "hashtag me encanta");
        assert_eq!(pre("#hecho_en_casa"), "hashtag hecho en casa");
        assert_eq!(pre("#mal"), "hashtag mal");
    }

    #[test]
    fn shortens_character_floods() {
        assert_eq!(pre("buenísimooooo!!!!!!"), "buenísimooo!!!");
        assert_eq!(pre("calle"), "calle");
    }

    #[test]
    fn normalizes_laughter() {
        assert_eq!(pre("jajajajaja"), "jaja");
        assert_eq!(pre("JAJAJ que risa"), "jaja que risa");
        assert_eq!(pre("jejeje"), "jeje");
        assert_eq!(pre("jajjajaja"), "jaja");
    }

    #[test]
    fn leaves_ordinary_words_alone() {
        assert_eq!(pre("jaula abeja"), "jaula abeja");
        assert_eq!(pre("el producto llegó bien"), "el producto llegó bien");
    }

    #[test]
    fn collapses_user_floods() {
        assert_eq!(
            pre("@a @b @c @d @e hola"),
            "@usuario @usuario @usuario hola"
        );
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(pre("  muy \n\t bueno  "), "muy bueno");
        assert_eq!(pre(""), "");
    }

    #[test]
    fn identity_is_untouched() {
        assert_eq!(Identity.preprocess("  @x  "), "  @x  ");
    }

    #[test]
    fn spells_out_emoji() {
        assert_eq!(pre("me gusta 👍"), "me gusta emoji thumbs up emoji");
        assert_eq!(pre("🍕🍕 rica"), "emoji pizza emoji emoji pizza emoji rica");
    }

    #[test]
    fn accented_text_is_not_emoji() {
        assert_eq!(pre("canción de Ñandú ¿sí?"), "canción de Ñandú ¿sí?");
    }

    #[test]
    fn emoji_can_be_kept() {
        let pre = TweetPreprocessor {
            demojize: false,
            ..TweetPreprocessor::default()
        };
        assert_eq!(pre.preprocess("genial 👍"), "genial 👍");
    }

    #[test]
    fn laughter_can_be_disabled() {
        let pre = TweetPreprocessor {
            normalize_laughter: false,
            ..TweetPreprocessor::default()
        };
        assert_eq!(pre.preprocess("jajaja"), "jajaja");
    }
}
