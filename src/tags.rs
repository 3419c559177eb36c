//! Control-tag scanning: `<bos>`-style markers are kept verbatim, the text
//! between them goes through SMILES pair encoding.

use std::sync::OnceLock;

use compact_str::CompactString;
use fancy_regex::Regex;
use rand::Rng;

use crate::bpe::SmilesBpe;
use crate::constants::CONTROL_TAG_PATTERN;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CONTROL_TAG_PATTERN).expect("Invalid control tag pattern"))
}

#[derive(Clone, Debug, Default)]
pub struct TagScanner {
    bpe: SmilesBpe,
}

impl TagScanner {
    pub fn new(bpe: SmilesBpe) -> Self {
        Self { bpe }
    }

    pub fn bpe(&self) -> &SmilesBpe {
        &self.bpe
    }

    /// Tokenize `text`, emitting each `<\w{3}>` match as one token and
    /// segmenting every non-empty gap between matches.
    pub fn tokenize<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Vec<CompactString> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        for m in tag_pattern().find_iter(text).flatten() {
            if m.start() > pos {
                tokens.extend(self.bpe.segment(&text[pos..m.start()], rng));
            }
            tokens.push(CompactString::from(m.as_str()));
            pos = m.end();
        }
        if text.len() > pos {
            tokens.extend(self.bpe.segment(&text[pos..], rng));
        }
        tokens
    }
}
