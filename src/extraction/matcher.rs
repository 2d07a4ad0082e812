/*!
 * Embed snippet matching inside one unit's content.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::EmbedResource;
use super::providers::{ProviderRule, ProviderTable, ResourceKind, UNKNOWN_ID};

/// Iframe embed; the body may span line breaks but not another tag
static IFRAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<iframe\b[^>]*>[^<]*?</iframe>").expect("Invalid iframe regex")
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Resources found in one unit, in document order per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedResources {
    pub videos: Vec<EmbedResource>,
    pub games: Vec<EmbedResource>,
}

impl MatchedResources {
    fn list_mut(&mut self, kind: ResourceKind) -> &mut Vec<EmbedResource> {
        match kind {
            ResourceKind::Video => &mut self.videos,
            ResourceKind::Game => &mut self.games,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.games.is_empty()
    }
}

/// Find every classified embed snippet in the content
pub fn match_resources(content: &str, providers: &ProviderTable) -> MatchedResources {
    let mut matched = MatchedResources::default();
    match_resources_into(content, providers, &mut matched);
    matched
}

/// Append the content's embeds to already matched resources
///
/// Placeholder titles continue numbering from the existing list lengths.
pub fn match_resources_into(content: &str, providers: &ProviderTable, matched: &mut MatchedResources) {
    for snippet in IFRAME_REGEX.find_iter(content) {
        let embed = snippet.as_str();
        let Some(rule) = providers.classify(embed) else {
            debug!("Ignoring embed from an unknown provider: {}", embed);
            continue;
        };

        let id = rule.extract_id(embed).unwrap_or_else(|| {
            warn!("No {} id found in embed, recording as '{}': {}", rule.spec.name, UNKNOWN_ID, embed);
            UNKNOWN_ID.to_string()
        });

        let list = matched.list_mut(rule.spec.kind);
        let position = list.len() + 1;
        let title = resource_title(content, snippet.start(), rule, position);

        list.push(EmbedResource {
            title,
            url: rule.canonical_url(&id),
            id,
            embed: embed.to_string(),
        });
    }
}

/// Title from the line before the snippet, or a numbered placeholder
fn resource_title(content: &str, start: usize, rule: &ProviderRule, position: usize) -> String {
    let candidate = preceding_line(content, start);
    if !candidate.is_empty() && rule.is_title_line(&candidate) {
        candidate
    } else {
        rule.placeholder_title(position)
    }
}

/// Text on the snippet's own line before it, else the previous line
fn preceding_line(content: &str, start: usize) -> String {
    let before = &content[..start];
    let (earlier, same_line) = match before.rfind('\n') {
        Some(i) => (&before[..i], &before[i + 1..]),
        None => ("", before),
    };

    let same_line = clean_line(same_line);
    if !same_line.is_empty() {
        return same_line;
    }

    let previous = earlier.rsplit('\n').next().unwrap_or("");
    clean_line(previous)
}

fn clean_line(line: &str) -> String {
    let without_embeds = IFRAME_REGEX.replace_all(line, "");
    WHITESPACE_REGEX.replace_all(&without_embeds, " ").trim().to_string()
}
