// ============================================================
// FeaturizeText - question text → numeric vector
// ============================================================
// Turns free text into a fixed-length bag-of-n-grams vector.
//
// Steps for one piece of text:
//   1. Preprocessor::clean  (control chars, odd spaces)
//   2. BERT normalizer      (lowercase, spaces around CJK chars)
//   3. BERT pre-tokenizer   (split on whitespace and punctuation)
//   4. Drop punctuation-only tokens
//   5. Emit n-grams:
//        w:<word>           word unigrams
//        b:<word> <word>    word bigrams
//        c:<chars>          character 1..=3-grams over the
//                           space-joined token string
//   6. Count each n-gram found in the dictionary, L2-normalize
//
// The dictionary is learned from the fit-time texts and frozen.
// It holds at most `max_ngrams` entries, the most frequent ones.
// The vector length is the dictionary size; n-grams outside the
// dictionary are ignored.
//
// Example: "What is your name?"
//   tokens → ["what", "is", "your", "name"]
//   w:what, w:is, ..., b:what is, b:is your, ..., c:w, c:wh, c:wha, ...
//
// Chinese text has no spaces, but the normalizer isolates every
// CJK character, so "你好吗" yields w:你, w:好, w:吗, b:你 好, ...
// and character n-grams such as c:你 好.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{
    NormalizedString, Normalizer, OffsetReferential, OffsetType, PreTokenizedString,
    PreTokenizer,
};

use crate::data::preprocessor::Preprocessor;
use crate::data::view::{Column, DataView};
use crate::domain::error::{QnaError, Result};
use crate::ml::transforms::Transformer;

const WORD_NGRAMS: usize = 2;
const CHAR_NGRAMS: usize = 3;

/// Upper bound on the dictionary size, and so on the vector width
pub const DEFAULT_MAX_NGRAMS: usize = 8192;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFeaturizer {
    input:      String,
    output:     String,
    dictionary: HashMap<String, u32>,
}

impl TextFeaturizer {
    /// Learn the n-gram dictionary from the `input` texts.
    ///
    /// When more than `max_ngrams` distinct n-grams occur, only the most
    /// frequent are kept (ties go to the one seen first).
    pub fn fit(view: &DataView, input: &str, output: &str, max_ngrams: usize) -> Result<Self> {
        // n-gram → (count, first seen)
        let mut counts: HashMap<String, (u32, usize)> = HashMap::new();
        for text in view.text(input)? {
            for gram in ngrams(&tokenize(text)?) {
                let next = counts.len();
                counts.entry(gram).or_insert((0, next)).0 += 1;
            }
        }
        let seen = counts.len();

        let mut ranked: Vec<(String, (u32, usize))> = counts.into_iter().collect();
        if ranked.len() > max_ngrams {
            ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
            ranked.truncate(max_ngrams);
        }
        ranked.sort_by_key(|(_, (_, first))| *first);

        let dictionary: HashMap<String, u32> = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, (gram, _))| (gram, idx as u32))
            .collect();

        if dictionary.len() < seen {
            tracing::info!(
                "'{}' → '{}': kept {} of {} n-grams",
                input,
                output,
                dictionary.len(),
                seen
            );
        } else {
            tracing::debug!("'{}' → '{}': {} n-grams", input, output, dictionary.len());
        }

        Ok(Self {
            input:  input.to_string(),
            output: output.to_string(),
            dictionary,
        })
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Length of every produced vector
    pub fn dim(&self) -> usize {
        self.dictionary.len()
    }

    /// Featurize a single text.
    pub fn featurize(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim()];
        for gram in ngrams(&tokenize(text)?) {
            if let Some(&idx) = self.dictionary.get(&gram) {
                vector[idx as usize] += 1.0;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }
}

impl Transformer for TextFeaturizer {
    fn transform(&self, view: DataView) -> Result<DataView> {
        let vectors = view
            .text(&self.input)?
            .iter()
            .map(|t| self.featurize(t))
            .collect::<Result<Vec<_>>>()?;
        view.with_column(self.output.clone(), Column::Vector(vectors))
    }
}

/// Clean, normalize and split text into word tokens.
pub fn tokenize(text: &str) -> Result<Vec<String>> {
    let cleaned = Preprocessor::new().clean(text);

    let mut normalized = NormalizedString::from(cleaned.as_str());
    BertNormalizer::new(true, true, Some(false), true)
        .normalize(&mut normalized)
        .map_err(|e| QnaError::Tokenize(e.to_string()))?;

    let mut pre = PreTokenizedString::from(normalized);
    BertPreTokenizer
        .pre_tokenize(&mut pre)
        .map_err(|e| QnaError::Tokenize(e.to_string()))?;

    Ok(pre
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(s, _, _)| s)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect())
}

fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut grams = Vec::new();

    for n in 1..=WORD_NGRAMS {
        let prefix = if n == 1 { "w:" } else { "b:" };
        for window in tokens.windows(n) {
            grams.push(format!("{prefix}{}", window.join(" ")));
        }
    }

    let chars: Vec<char> = tokens.join(" ").chars().collect();
    for n in 1..=CHAR_NGRAMS {
        for window in chars.windows(n) {
            if window.iter().all(|c| *c == ' ') {
                continue;
            }
            grams.push(format!("c:{}", window.iter().collect::<String>()));
        }
    }

    grams
}
