//! Lexical and metadata feature extraction for a single post.
//!
//! Text is normalized with a fixed sequence of rewrite rules before n-grams
//! are generated:
//!
//! 1. the text is lowercased, unless [`ExtractorConfig::lowercase`] is off
//! 2. URL-like substrings collapse to the token `URL`
//! 3. every digit becomes `0`
//! 4. the characters `. , ? ' : ; " # @` are removed
//! 5. the result is split on whitespace
//!
//! Unigrams and bigrams (joined with `_`) become feature names. Author
//! metadata is bucketed into categorical `<feature>=<bucket>` names.
use std::borrow::{Borrow, Cow};
use std::collections::HashSet;

use chrono::{Datelike, Utc};
use rayon::prelude::*;
use regex::Regex;

use crate::config::ExtractorConfig;
use crate::data_handling::Record;
use crate::error::Result;
use crate::features::FeatureSet;

const URL_PATTERN: &str = r"[^\s]+\.[^\s]+(/)+[^\s]+";
const STRIPPED_PUNCTUATION: &str = r##"[.,?':;"#@]"##;
const NGRAM_EDGE_PUNCTUATION: &[char] = &['.', ';', '\'', '"', '=', ','];

pub const HANDLE_FEATURE: &str = "handle";
pub const FOLLOWERS_FEATURE: &str = "followers";
pub const HASHTAGS_FEATURE: &str = "hashtags";
pub const ACCOUNT_AGE_FEATURE: &str = "account_age";
pub const BIO_LINK_FEATURE: &str = "bio_contains_link";
pub const BIO_PRONOUN_FEATURE: &str = "bio_first_pers_pron";
pub const BIO_COIN_FEATURE: &str = "bio_contains_coin_lex";
pub const HANDLE_VOWEL_FEATURE: &str = "handle_has_vowel";

/// Turns records into symbolic feature sets.
///
/// Construction compiles the normalization patterns once; extraction itself
/// only reads the extractor, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    url: Regex,
    digit: Regex,
    punctuation: Regex,
    hashtag: Regex,
    bio_link: Regex,
    first_person: Regex,
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(FeatureExtractor {
            url: Regex::new(URL_PATTERN)?,
            digit: Regex::new(r"\d")?,
            punctuation: Regex::new(STRIPPED_PUNCTUATION)?,
            hashtag: Regex::new(r"#\w+")?,
            bio_link: Regex::new(&format!(r"(?i)https?://|www\.|{}", URL_PATTERN))?,
            first_person: Regex::new(r"(?i)\b(?:i|me|my)\b")?,
            config: ExtractorConfig {
                coin_lexicon: config
                    .coin_lexicon
                    .iter()
                    .map(|kw| kw.trim().to_lowercase())
                    .filter(|kw| !kw.is_empty())
                    .collect(),
                ..config
            },
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The same extractor with account ages measured against a fixed year.
    ///
    /// A configured year is kept; otherwise the current calendar year is used.
    pub fn with_pinned_year(&self) -> Self {
        FeatureExtractor {
            config: ExtractorConfig {
                reference_year: Some(self.reference_year()),
                ..self.config.clone()
            },
            ..self.clone()
        }
    }

    /// Extract every feature family for one record.
    pub fn extract(&self, record: &Record) -> FeatureSet {
        let mut features = FeatureSet::new();

        let tokens = self.tokenize(&record.text);
        for n in 1..=2 {
            for ngram in ngrams(&tokens, n) {
                features.insert(ngram);
            }
        }

        features.insert(format!("{}={}", HANDLE_FEATURE, record.handle));

        if let Some(followers) = record.followers {
            features.insert(format!("{}={}", FOLLOWERS_FEATURE, follower_bucket(followers)));
        }

        let hashtags = self.hashtag.find_iter(&record.text).count();
        features.insert(format!("{}={}", HASHTAGS_FEATURE, hashtag_bucket(hashtags)));

        if let Some(created) = record.user_created {
            let age = self.reference_year() - created.year();
            features.insert(format!("{}={}", ACCOUNT_AGE_FEATURE, age));
        }

        let bio = record.description.as_deref().unwrap_or("");
        features.insert(flag(BIO_LINK_FEATURE, self.bio_link.is_match(bio)));
        features.insert(flag(BIO_PRONOUN_FEATURE, self.first_person.is_match(bio)));
        features.insert(flag(BIO_COIN_FEATURE, self.contains_coin_lexicon(bio)));
        features.insert(flag(HANDLE_VOWEL_FEATURE, has_vowel(&record.handle)));

        features
    }

    /// Extract a batch of records in parallel, preserving input order.
    pub fn extract_batch<R>(&self, records: &[R]) -> Vec<FeatureSet>
    where
        R: Borrow<Record> + Sync,
    {
        records.par_iter().map(|r| self.extract(r.borrow())).collect()
    }

    /// Apply the normalization rules and split into tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.config.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        let text = self.url.replace_all(&text, "URL");
        let text = self.digit.replace_all(&text, "0");
        let text = self.punctuation.replace_all(&text, "");
        text.split_whitespace().map(str::to_string).collect()
    }

    fn reference_year(&self) -> i32 {
        self.config
            .reference_year
            .unwrap_or_else(|| Utc::now().year())
    }

    fn contains_coin_lexicon(&self, bio: &str) -> bool {
        if bio.is_empty() {
            return false;
        }
        let lower = bio.to_lowercase();
        let words: HashSet<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.config.coin_lexicon.iter().any(|kw| {
            if kw.chars().all(char::is_alphanumeric) {
                words.contains(kw.as_str())
            } else {
                lower.contains(kw.as_str())
            }
        })
    }
}

/// Contiguous n-grams joined with `_`, edge punctuation stripped.
fn ngrams(tokens: &[String], n: usize) -> impl Iterator<Item = String> + '_ {
    tokens
        .windows(n)
        .map(|window| window.join("_").trim_matches(NGRAM_EDGE_PUNCTUATION).to_string())
        .filter(|ngram| !ngram.is_empty())
}

/// `>1000` above 1000, `100<x<1000` strictly between, `<100` otherwise
/// (so exactly 100 and exactly 1000 both land in `<100`).
pub fn follower_bucket(followers: u64) -> &'static str {
    if followers > 1000 {
        ">1000"
    } else if followers > 100 && followers < 1000 {
        "100<x<1000"
    } else {
        "<100"
    }
}

pub fn hashtag_bucket(count: usize) -> &'static str {
    match count {
        0 => "0",
        1 => "1",
        2 => "2",
        _ => ">2",
    }
}

fn has_vowel(handle: &str) -> bool {
    handle
        .chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

fn flag(feature: &str, value: bool) -> String {
    format!("{}={}", feature, if value { "True" } else { "False" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(ExtractorConfig {
            reference_year: Some(2018),
            ..ExtractorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_tokenize_applies_rules_in_order() {
        let ex = extractor();
        let tokens = ex.tokenize("Check coinbase.com/prices @bob: #BTC up 25%?");
        assert_eq!(tokens, vec!["check", "URL", "bob", "btc", "up", "00%"]);
    }

    #[test]
    fn test_tokenize_keeps_case_when_disabled() {
        let ex = FeatureExtractor::new(ExtractorConfig {
            lowercase: false,
            ..ExtractorConfig::default()
        })
        .unwrap();
        let tokens = ex.tokenize("To The MOON");
        assert_eq!(tokens, vec!["To", "The", "MOON"]);
    }

    #[test]
    fn test_tokenize_strips_quotes_and_markers() {
        let ex = extractor();
        let tokens = ex.tokenize(r#"he said "moon" isn't 'soon'; #hodl @ann"#);
        assert_eq!(tokens, vec!["he", "said", "moon", "isnt", "soon", "hodl", "ann"]);
    }

    #[test]
    fn test_mixed_case_text_shares_ngrams() {
        let ex = extractor();
        let shouted = ex.extract(&Record::new("a", "To The MOON"));
        let plain = ex.extract(&Record::new("a", "to the moon"));
        assert_eq!(shouted, plain);
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let ex = extractor();
        let features = ex.extract(&Record::new("alice", "to the moon #btc"));
        for name in ["to", "the", "moon", "btc", "to_the", "the_moon", "moon_btc"] {
            assert!(features.contains(name), "missing {}", name);
        }
        assert!(features.contains("hashtags=1"));
        assert!(features.contains("handle=alice"));
    }

    #[test]
    fn test_ngram_edge_punctuation_is_stripped() {
        let ex = extractor();
        let features = ex.extract(&Record::new("x", "=price= up"));
        assert!(features.contains("price"));
        assert!(features.contains("price=_up"));
        assert!(!features.contains("=price="));
    }

    #[test]
    fn test_empty_text_still_has_metadata_features() {
        let ex = extractor();
        let features = ex.extract(&Record::new("zzz", ""));
        assert!(!features.is_empty());
        assert!(features.contains("handle=zzz"));
        assert!(features.contains("hashtags=0"));
        assert!(features.contains("bio_contains_link=False"));
        assert!(features.contains("bio_first_pers_pron=False"));
        assert!(features.contains("bio_contains_coin_lex=False"));
        assert!(features.contains("handle_has_vowel=False"));
    }

    #[test]
    fn test_follower_bucket_boundaries() {
        assert_eq!(follower_bucket(0), "<100");
        assert_eq!(follower_bucket(100), "<100");
        assert_eq!(follower_bucket(101), "100<x<1000");
        assert_eq!(follower_bucket(999), "100<x<1000");
        assert_eq!(follower_bucket(1000), "<100");
        assert_eq!(follower_bucket(1001), ">1000");
    }

    #[test]
    fn test_hashtag_buckets() {
        let ex = extractor();
        let features = ex.extract(&Record::new("a", "#a #b #c #d"));
        assert!(features.contains("hashtags=>2"));
        let features = ex.extract(&Record::new("a", "#a and #b"));
        assert!(features.contains("hashtags=2"));
    }

    #[test]
    fn test_bio_flags() {
        let ex = extractor();
        let record = Record::new("alice", "").with_description("I love my coins, going to the moon");
        let features = ex.extract(&record);
        assert!(features.contains("bio_first_pers_pron=True"));
        assert!(features.contains("bio_contains_coin_lex=True"));
        assert!(features.contains("bio_contains_link=False"));

        let record = Record::new("alice", "").with_description("Mining news at https://example.org");
        let features = ex.extract(&record);
        assert!(features.contains("bio_contains_link=True"));
        assert!(features.contains("bio_first_pers_pron=False"));
        // "mining" is not a lexicon word, "coin" inside another word does not count
        let record = Record::new("alice", "").with_description("Bitcoiner and mime");
        let features = ex.extract(&record);
        assert!(features.contains("bio_contains_coin_lex=False"));
        assert!(features.contains("bio_first_pers_pron=False"));
    }

    #[test]
    fn test_account_age_uses_reference_year() {
        let ex = extractor();
        let created = Utc.with_ymd_and_hms(2012, 3, 1, 10, 0, 0).unwrap();
        let record = Record::new("alice", "gm").with_user_created(created).with_followers(150);
        let features = ex.extract(&record);
        assert!(features.contains("account_age=6"));
        assert!(features.contains("followers=100<x<1000"));
    }

    #[test]
    fn test_pinned_year_is_kept_or_taken_from_clock() {
        assert_eq!(extractor().with_pinned_year().config().reference_year, Some(2018));
        let unpinned = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
        assert_eq!(
            unpinned.with_pinned_year().config().reference_year,
            Some(Utc::now().year())
        );
    }

    #[test]
    fn test_extract_batch_preserves_order() {
        let ex = extractor();
        let records = vec![Record::new("a", "one"), Record::new("b", "two")];
        let sets = ex.extract_batch(&records);
        assert!(sets[0].contains("one"));
        assert!(sets[1].contains("two"));
    }
}
