//! Conversion of raw HTML fragments into literal LaTeX text.
//!
//! Sanitization is an ordered list of [`Stage`]s. The order is significant:
//! links must be rewritten before tags are stripped, otherwise the `<a>` tag
//! carrying the URL would be thrown away.
//!
//! [`Stage::Links`] splits the input into [`Fragment`]s: plain text and
//! recognised links. Every later stage rewrites text and link labels only,
//! so the `\underline{\href{..}{..}}` construct is assembled after the last
//! stage and is never seen by an escaping rule. URLs get the narrower
//! [`HREF_STAGES`] at assembly time.
//!
//! The escaping stages leave sequences that are already escaped untouched,
//! which makes every stage after [`Stage::Links`] idempotent.
//!
//! Whitespace collapsing is not a stage: it runs once over the complete
//! document (see [`collapse_whitespace`]).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b[^>]*?\shref="([^"]*)"[^>]*>(.+?)</a>"#).unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<[^>]+>|\r?\n|&nbsp;").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&(lt|gt|quot);").unwrap());
static AMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\\)?(&amp;|&)").unwrap());
static HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\\)?#").unwrap());
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\\)?%").unwrap());
// An existing escape is matched first, as a whole, so its braces and
// backslash are kept.
static SPECIALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?:[&#%_$\{\}]|text(?:backslash|less|greater|asciicircum|asciitilde)\{\})|[_$^~\{\}\\]",
    )
    .unwrap()
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").unwrap());

/// One rewrite rule of the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `<a ... href="U" ...>L</a>` → `\underline{\href{U}{L}}`
    Links,
    /// Remaining tags, newlines and `&nbsp;` → a single space; `&lt;`,
    /// `&gt;` and `&quot;` decoded
    StripTags,
    /// `<` / `>` → `\textless{}` / `\textgreater{}`
    AngleBrackets,
    /// `&amp;` and `&` → `\&`
    Ampersands,
    /// `#` → `\#`
    Hashes,
    /// `%` → `\%`
    Percents,
    /// `_ $ ^ ~ { } \` → their LaTeX text forms
    Specials,
}

/// Full pipeline for thesis entries.
pub const PIPELINE: [Stage; 7] = [
    Stage::Links,
    Stage::StripTags,
    Stage::AngleBrackets,
    Stage::Ampersands,
    Stage::Hashes,
    Stage::Percents,
    Stage::Specials,
];

/// Pipeline for short text leaves (names, roles, headings): no link rewriting.
pub const TEXT_STAGES: [Stage; 6] = [
    Stage::StripTags,
    Stage::AngleBrackets,
    Stage::Ampersands,
    Stage::Hashes,
    Stage::Percents,
    Stage::Specials,
];

/// Pipeline for URLs placed inside `\href{}`.
pub const HREF_STAGES: [Stage; 3] = [Stage::Ampersands, Stage::Hashes, Stage::Percents];

/// A piece of an entry between stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// A link found by [`Stage::Links`]. `url` is raw until assembly.
    Link { url: String, label: String },
}

impl Stage {
    /// Apply this stage to every fragment of an entry.
    ///
    /// # Arguments
    ///
    /// * `fragments` - The entry as produced by the previous stage
    ///
    /// # Returns
    ///
    /// The rewritten fragments. [`Stage::Links`] splits text fragments around
    /// the links it finds; every other stage rewrites text fragments and link
    /// labels in place and never touches a link's URL.
    pub fn apply(self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        match self {
            Stage::Links => fragments
                .into_iter()
                .flat_map(|fragment| match fragment {
                    Fragment::Text(text) => split_links(&text),
                    link => vec![link],
                })
                .collect(),
            _ => fragments
                .into_iter()
                .map(|fragment| match fragment {
                    Fragment::Text(text) => Fragment::Text(self.apply_text(&text)),
                    Fragment::Link { url, label } => Fragment::Link {
                        url,
                        label: self.apply_text(&label),
                    },
                })
                .collect(),
        }
    }

    /// Apply this stage to a plain string. [`Stage::Links`] is a no-op here.
    pub fn apply_text(self, input: &str) -> String {
        match self {
            Stage::Links => input.to_string(),
            Stage::StripTags => {
                let stripped = TAG_RE.replace_all(input, " ");
                ENTITY_RE
                    .replace_all(&stripped, |caps: &Captures| {
                        match caps[1].to_ascii_lowercase().as_str() {
                            "lt" => "<",
                            "gt" => ">",
                            _ => "\"",
                        }
                    })
                    .into_owned()
            }
            Stage::AngleBrackets => input
                .replace('<', r"\textless{}")
                .replace('>', r"\textgreater{}"),
            Stage::Ampersands => escape_unless_escaped(&AMP_RE, input, r"\&"),
            Stage::Hashes => escape_unless_escaped(&HASH_RE, input, r"\#"),
            Stage::Percents => escape_unless_escaped(&PERCENT_RE, input, r"\%"),
            Stage::Specials => SPECIALS_RE
                .replace_all(input, |caps: &Captures| {
                    let found = &caps[0];
                    match found {
                        "_" => r"\_".to_string(),
                        "$" => r"\$".to_string(),
                        "^" => r"\textasciicircum{}".to_string(),
                        "~" => r"\textasciitilde{}".to_string(),
                        "{" => r"\{".to_string(),
                        "}" => r"\}".to_string(),
                        "\\" => r"\textbackslash{}".to_string(),
                        escaped => escaped.to_string(),
                    }
                })
                .into_owned(),
        }
    }
}

fn split_links(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for caps in LINK_RE.captures_iter(text) {
        let (Some(whole), Some(url), Some(label)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            fragments.push(Fragment::Text(text[last..whole.start()].to_string()));
        }
        fragments.push(Fragment::Link {
            url: url.as_str().to_string(),
            label: label.as_str().to_string(),
        });
        last = whole.end();
    }
    if last < text.len() {
        fragments.push(Fragment::Text(text[last..].to_string()));
    }
    fragments
}

/// Replace every match of `re` with `escaped`, leaving matches whose first
/// capture group (a leading backslash) is present untouched.
fn escape_unless_escaped(re: &Regex, input: &str, escaped: &str) -> String {
    re.replace_all(input, |caps: &Captures| {
        if caps.get(1).is_some() {
            caps[0].to_string()
        } else {
            escaped.to_string()
        }
    })
    .into_owned()
}

fn assemble(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => text.clone(),
            Fragment::Link { url, label } => {
                format!(r"\underline{{\href{{{}}}{{{}}}}}", escape_href(url), label)
            }
        })
        .collect()
}

/// Run `stages` over `raw` in order and assemble the result.
///
/// # Arguments
///
/// * `stages` - The rules to apply, first to last
/// * `raw` - Input text or HTML fragment
///
/// # Returns
///
/// The LaTeX text. Links found by a [`Stage::Links`] in `stages` come out
/// as `\underline{\href{U}{L}}` with `U` passed through [`HREF_STAGES`].
pub fn run(stages: &[Stage], raw: &str) -> String {
    let fragments = stages
        .iter()
        .fold(vec![Fragment::Text(raw.to_string())], |fragments, stage| {
            stage.apply(fragments)
        });
    assemble(&fragments)
}

/// Sanitize a raw thesis entry into literal LaTeX text.
///
/// Call exactly once per entry: the output contains LaTeX commands, and a
/// second pass would escape their backslashes and braces.
///
/// # Arguments
///
/// * `raw` - An entry as extracted: inner HTML or element text
///
/// # Returns
///
/// Text with every link rewritten to `\underline{\href{U}{L}}`, tags
/// removed, and every LaTeX special character escaped.
pub fn sanitize(raw: &str) -> String {
    run(&PIPELINE, raw)
}

/// Escape a free-text leaf such as a name or heading.
pub fn escape_text(raw: &str) -> String {
    run(&TEXT_STAGES, raw).trim().to_string()
}

/// Escape a URL for use as the first argument of `\href`.
///
/// Only `&`, `#` and `%` are escaped; hyperref reads the rest verbatim.
pub fn escape_href(url: &str) -> String {
    HREF_STAGES
        .iter()
        .fold(url.to_string(), |text, stage| stage.apply_text(&text))
}

/// Collapse every run of two or more whitespace characters into one space.
///
/// Applied once to the assembled document, never per entry.
pub fn collapse_whitespace(document: &str) -> String {
    WHITESPACE_RE.replace_all(document, " ").into_owned()
}
