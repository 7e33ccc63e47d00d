//! Free-text question classification.
//!
//! Classification is an explicit ordered list of rules, each a pure
//! function from the raw question text to an optional descriptor,
//! evaluated in priority order with the first match winning: diff
//! phrasing beats translation phrasing beats the generic
//! subject-plus-possessive split (sub-classified by remainder keywords),
//! followed by the two whole-text patterns for tool lookup and profile
//! requests. Unmatched text produces an `Unknown` descriptor carrying a
//! best-effort subject.
//!
//! Two rule lists exist, one per supported question language, selected
//! by the caller-provided language tag.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::anchor::{LOCAL_LANG, WESTERN_LANG};
use crate::profile::Slot;

/// Identifier of the pattern that classified a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternTag {
    /// Japanese meaning-diff phrasing.
    #[serde(rename = "DIFF_1")]
    Diff1,
    /// Japanese "in English" translation phrasing.
    #[serde(rename = "TRANS_EN_1")]
    TransEn1,
    /// Japanese purpose phrasing.
    #[serde(rename = "USE_1")]
    Use1,
    /// Japanese material phrasing.
    #[serde(rename = "MAT_1")]
    Mat1,
    /// Japanese category phrasing.
    #[serde(rename = "CAT_1")]
    Cat1,
    /// Japanese reverse tool-lookup phrasing.
    #[serde(rename = "TOOL_FOR_1")]
    ToolFor1,
    /// Japanese profile-request phrasing.
    #[serde(rename = "PROFILE_1")]
    Profile1,
    /// English purpose phrasing.
    #[serde(rename = "USE_EN_1")]
    UseEn1,
    /// English material phrasing.
    #[serde(rename = "MAT_EN_1")]
    MatEn1,
    /// English category phrasing.
    #[serde(rename = "CAT_EN_1")]
    CatEn1,
    /// English reverse tool-lookup phrasing.
    #[serde(rename = "TOOL_EN_1")]
    ToolEn1,
    /// English profile-request phrasing.
    #[serde(rename = "PROFILE_EN_1")]
    ProfileEn1,
    /// English "in Japanese" translation phrasing.
    #[serde(rename = "TRANS_JA_1")]
    TransJa1,
    /// No pattern matched.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Diff1 => "DIFF_1",
            Self::TransEn1 => "TRANS_EN_1",
            Self::Use1 => "USE_1",
            Self::Mat1 => "MAT_1",
            Self::Cat1 => "CAT_1",
            Self::ToolFor1 => "TOOL_FOR_1",
            Self::Profile1 => "PROFILE_1",
            Self::UseEn1 => "USE_EN_1",
            Self::MatEn1 => "MAT_EN_1",
            Self::CatEn1 => "CAT_EN_1",
            Self::ToolEn1 => "TOOL_EN_1",
            Self::ProfileEn1 => "PROFILE_EN_1",
            Self::TransJa1 => "TRANS_JA_1",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{tag}")
    }
}

/// The structured query a question was classified into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryRequest {
    /// Compare the meanings of two expressions.
    Diff {
        /// Left expression.
        left: String,
        /// Right expression.
        right: String,
    },
    /// List the subject's labels in another language.
    Translation {
        /// Subject expression.
        subject: String,
        /// Language to translate into.
        target_lang: String,
    },
    /// What the subject is used for.
    Purpose {
        /// Subject expression.
        subject: String,
    },
    /// What the subject is made of.
    Material {
        /// Subject expression.
        subject: String,
    },
    /// What the subject is classified as.
    Category {
        /// Subject expression.
        subject: String,
    },
    /// Which tools are used for the subject action.
    Tools {
        /// Subject expression.
        subject: String,
    },
    /// The subject's full 9-slot profile.
    Profile {
        /// Subject expression.
        subject: String,
    },
    /// No supported pattern matched.
    Unknown {
        /// Best-effort subject extraction.
        subject: String,
    },
}

impl QueryRequest {
    /// The extracted subject, when the request has a single one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Diff { .. } => None,
            Self::Translation { subject, .. }
            | Self::Purpose { subject }
            | Self::Material { subject }
            | Self::Category { subject }
            | Self::Tools { subject }
            | Self::Profile { subject }
            | Self::Unknown { subject } => Some(subject),
        }
    }

    /// The target slot of a slot-style request.
    #[must_use]
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Self::Purpose { .. } => Some(Slot::Outcome),
            Self::Material { .. } => Some(Slot::Method),
            Self::Category { .. } => Some(Slot::ObjectType),
            _ => None,
        }
    }
}

/// The result of classifying one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// The original question text.
    pub text: String,
    /// The language tag the question was parsed under.
    pub lang: String,
    /// Which pattern matched.
    pub tag: PatternTag,
    /// The structured request.
    pub request: QueryRequest,
}

/// One classification rule: text in, optional tagged request out.
type Rule = fn(&str) -> Option<(PatternTag, QueryRequest)>;

const JA_RULES: &[Rule] = &[
    ja_diff,
    ja_translation,
    ja_purpose,
    ja_material,
    ja_category,
    ja_tools,
    ja_profile,
];

const EN_RULES: &[Rule] = &[
    en_translation,
    en_purpose,
    en_material,
    en_category,
    en_tools,
    en_profile,
];

/// Classifies a question under the rule list for `lang`.
///
/// `lang` equal to the western language selects the English rules;
/// everything else selects the Japanese rules.
#[must_use]
pub fn parse_question(text: &str, lang: &str) -> QueryDescriptor {
    let trimmed = text.trim();
    let (rules, rule_lang) = if lang == WESTERN_LANG {
        (EN_RULES, WESTERN_LANG)
    } else {
        (JA_RULES, LOCAL_LANG)
    };

    for rule in rules {
        if let Some((tag, request)) = rule(trimmed) {
            return QueryDescriptor {
                text: text.to_string(),
                lang: rule_lang.to_string(),
                tag,
                request,
            };
        }
    }

    let subject = if rule_lang == WESTERN_LANG {
        trimmed.trim_end_matches(['?', '.']).trim().to_string()
    } else {
        ja_possessive_split(trimmed).0.to_string()
    };
    QueryDescriptor {
        text: text.to_string(),
        lang: rule_lang.to_string(),
        tag: PatternTag::Unknown,
        request: QueryRequest::Unknown { subject },
    }
}

fn static_re(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hardcoded question pattern"))
}

/// Splits "<subject>の<remainder>"; without the possessive the whole
/// text serves as both parts.
fn ja_possessive_split(text: &str) -> (&str, &str) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = static_re(&RE, r"^(.+?)の(.+)$");
    match re.captures(text) {
        Some(caps) => {
            let subject = caps.get(1).map_or("", |m| m.as_str()).trim();
            let rest = caps.get(2).map_or("", |m| m.as_str());
            (subject, rest)
        }
        None => (text, text),
    }
}

fn ja_diff(text: &str) -> Option<(PatternTag, QueryRequest)> {
    let has_cue = ["違い", "違う", "同じ", "一緒"]
        .iter()
        .any(|cue| text.contains(cue));
    if !text.contains('と') || !has_cue {
        return None;
    }

    let (left, right_part) = text.split_once('と')?;
    let right = right_part
        .split('は')
        .next()
        .unwrap_or(right_part)
        .replace("って", "");
    Some((
        PatternTag::Diff1,
        QueryRequest::Diff {
            left: left.trim().to_string(),
            right: right.trim().to_string(),
        },
    ))
}

fn ja_translation(text: &str) -> Option<(PatternTag, QueryRequest)> {
    if !text.contains("英語") {
        return None;
    }

    static POSSESSIVE: OnceLock<Regex> = OnceLock::new();
    static TOPIC: OnceLock<Regex> = OnceLock::new();
    let subject = static_re(&POSSESSIVE, r"(.+?)の英語")
        .captures(text)
        .or_else(|| static_re(&TOPIC, r"(.+?)は英語").captures(text))
        .and_then(|caps| caps.get(1))
        .map_or_else(
            || text.replace("の英語", "").replace("は英語で", ""),
            |m| m.as_str().to_string(),
        );
    let subject = subject
        .trim_matches(|c: char| "は？ 　".contains(c))
        .to_string();

    Some((
        PatternTag::TransEn1,
        QueryRequest::Translation {
            subject,
            target_lang: WESTERN_LANG.to_string(),
        },
    ))
}

fn ja_purpose(text: &str) -> Option<(PatternTag, QueryRequest)> {
    let (subject, rest) = ja_possessive_split(text);
    rest.contains("用途").then(|| {
        (
            PatternTag::Use1,
            QueryRequest::Purpose {
                subject: subject.to_string(),
            },
        )
    })
}

fn ja_material(text: &str) -> Option<(PatternTag, QueryRequest)> {
    let (subject, rest) = ja_possessive_split(text);
    (rest.contains("素材") || rest.contains("材質")).then(|| {
        (
            PatternTag::Mat1,
            QueryRequest::Material {
                subject: subject.to_string(),
            },
        )
    })
}

fn ja_category(text: &str) -> Option<(PatternTag, QueryRequest)> {
    let (subject, rest) = ja_possessive_split(text);
    (rest.contains("分類") || rest.contains("何の仲間") || rest.contains("どんな種類")).then(
        || {
            (
                PatternTag::Cat1,
                QueryRequest::Category {
                    subject: subject.to_string(),
                },
            )
        },
    )
}

fn ja_tools(text: &str) -> Option<(PatternTag, QueryRequest)> {
    if !text.contains("に使う道具") && !text.contains("ための道具") {
        return None;
    }

    static USE_TOOL: OnceLock<Regex> = OnceLock::new();
    static FOR_TOOL: OnceLock<Regex> = OnceLock::new();
    let subject = static_re(&USE_TOOL, r"^(.+?)の?に使う道具")
        .captures(text)
        .or_else(|| static_re(&FOR_TOOL, r"^(.+?)の?ための道具").captures(text))
        .and_then(|caps| caps.get(1))
        .map_or_else(|| ja_possessive_split(text).0, |m| m.as_str())
        .trim()
        .to_string();

    Some((PatternTag::ToolFor1, QueryRequest::Tools { subject }))
}

fn ja_profile(text: &str) -> Option<(PatternTag, QueryRequest)> {
    if !text.contains("プロフィール") && !text.contains("について教えて") {
        return None;
    }

    let subject = match text.split_once("について") {
        Some((before, _)) if !before.trim().is_empty() => before.trim(),
        _ => ja_possessive_split(text).0,
    };
    Some((
        PatternTag::Profile1,
        QueryRequest::Profile {
            subject: subject.to_string(),
        },
    ))
}

fn en_translation(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &RE,
        r"(?i)^(?:what\s+is|how\s+do\s+you\s+say)\s+(?:a\s+|an\s+|the\s+)?(.+?)\s+in\s+japanese\s*\??$",
    )
    .captures(text)?;
    Some((
        PatternTag::TransJa1,
        QueryRequest::Translation {
            subject: caps.get(1)?.as_str().trim().to_string(),
            target_lang: LOCAL_LANG.to_string(),
        },
    ))
}

fn en_purpose(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static USE_OF: OnceLock<Regex> = OnceLock::new();
    static USED_FOR: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &USE_OF,
        r"(?i)^what\s+(?:is|are)\s+the\s+uses?\s+of\s+(?:a\s+|an\s+|the\s+)?(.+?)\s*\??$",
    )
    .captures(text)
    .or_else(|| {
        static_re(
            &USED_FOR,
            r"(?i)^what\s+(?:is|are)\s+(?:a\s+|an\s+|the\s+)?(.+?)\s+used\s+for\s*\??$",
        )
        .captures(text)
    })?;
    Some((
        PatternTag::UseEn1,
        QueryRequest::Purpose {
            subject: caps.get(1)?.as_str().trim().to_string(),
        },
    ))
}

fn en_material(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &RE,
        r"(?i)^what\s+(?:is|are)\s+(?:a\s+|an\s+|the\s+)?(.+?)\s+made\s+(?:of|from)\s*\??$",
    )
    .captures(text)?;
    Some((
        PatternTag::MatEn1,
        QueryRequest::Material {
            subject: caps.get(1)?.as_str().trim().to_string(),
        },
    ))
}

fn en_category(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &RE,
        r"(?i)^what\s+(?:category|kind\s+of\s+thing)\s+is\s+(?:a\s+|an\s+|the\s+)?(.+?)\s*\??$",
    )
    .captures(text)?;
    Some((
        PatternTag::CatEn1,
        QueryRequest::Category {
            subject: caps.get(1)?.as_str().trim().to_string(),
        },
    ))
}

fn en_tools(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &RE,
        r"(?i)^what\s+tools?\s+(?:is|are)\s+used\s+(?:for|to)\s+(.+?)\s*\??$",
    )
    .captures(text)?;
    Some((
        PatternTag::ToolEn1,
        QueryRequest::Tools {
            subject: caps.get(1)?.as_str().trim().to_string(),
        },
    ))
}

fn en_profile(text: &str) -> Option<(PatternTag, QueryRequest)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = static_re(
        &RE,
        r"(?i)^tell\s+me\s+about\s+(?:a\s+|an\s+|the\s+)?(.+?)\s*[.?]?\s*$",
    )
    .captures(text)?;
    Some((
        PatternTag::ProfileEn1,
        QueryRequest::Profile {
            subject: caps.get(1)?.as_str().trim().to_string(),
        },
    ))
}
