use crate::ocr::{OcrPage, OcrWord};
use crate::types::Token;

/// Flat, emission-ordered list of the usable words on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenIndex {
    pub tokens: Vec<Token>,
    /// Words discarded for blank text, low confidence or malformed geometry.
    pub dropped: usize,
}

impl TokenIndex {
    /// Flatten the block → line → word hierarchy of `page`.
    ///
    /// No geometric interpretation happens here beyond validating each word's box.
    pub fn from_page(page: &OcrPage, min_confidence: f64) -> Self {
        let mut index = TokenIndex::default();

        for word in page.blocks.iter().flat_map(|block| &block.lines).flat_map(|line| &line.words) {
            match token_from_word(word, min_confidence) {
                Some(token) => index.tokens.push(token),
                None => index.dropped += 1,
            }
        }

        if index.dropped > 0 {
            tracing::debug!(
                "Dropped {} of {} words on page {:?}",
                index.dropped,
                index.dropped + index.tokens.len(),
                page.page_idx
            );
        }

        index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Confidence and text filter shared by the word and block strategies.
pub(crate) fn word_is_usable(word: &OcrWord, min_confidence: f64) -> bool {
    if word.value.trim().is_empty() {
        return false;
    }
    match word.confidence {
        Some(confidence) => confidence >= min_confidence,
        None => true,
    }
}

fn token_from_word(word: &OcrWord, min_confidence: f64) -> Option<Token> {
    if !word_is_usable(word, min_confidence) {
        return None;
    }
    let Some(bbox) = word.geometry.bounding_box() else {
        tracing::debug!("Dropping word '{}' with malformed geometry {:?}", word.value, word.geometry.0);
        return None;
    };
    Token::new(&word.value, bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{Geometry, OcrBlock, OcrLine};

    fn word(value: &str, geometry: Geometry) -> OcrWord {
        OcrWord {
            value: value.to_string(),
            geometry,
            confidence: None,
        }
    }

    fn page(lines: Vec<Vec<OcrWord>>) -> OcrPage {
        OcrPage {
            blocks: vec![OcrBlock {
                geometry: Geometry::default(),
                lines: lines
                    .into_iter()
                    .map(|words| OcrLine {
                        geometry: Geometry::default(),
                        words,
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_flattens_hierarchy_in_emission_order() {
        let page = page(vec![
            vec![
                word("Jane", Geometry::from_corners(0.1, 0.1, 0.2, 0.12)),
                word("Doe", Geometry::from_corners(0.21, 0.1, 0.3, 0.12)),
            ],
            vec![word("Engineer", Geometry::from_corners(0.1, 0.14, 0.3, 0.16))],
        ]);

        let index = TokenIndex::from_page(&page, 0.0);
        let texts: Vec<&str> = index.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Jane", "Doe", "Engineer"]);
        assert_eq!(index.dropped, 0);
    }

    #[test]
    fn test_drops_blank_and_malformed_words() {
        let page = page(vec![vec![
            word("  ", Geometry::from_corners(0.1, 0.1, 0.2, 0.12)),
            word("Inverted", Geometry::from_corners(0.5, 0.1, 0.4, 0.12)),
            word("Outside", Geometry::from_corners(0.9, 0.1, 1.3, 0.12)),
            word("Corner", Geometry(vec![vec![0.1, 0.1]])),
            word("Kept", Geometry::from_corners(0.1, 0.2, 0.2, 0.22)),
        ]]);

        let index = TokenIndex::from_page(&page, 0.0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.tokens[0].text, "Kept");
        assert_eq!(index.dropped, 4);
    }

    #[test]
    fn test_confidence_filter() {
        let mut low = word("blurry", Geometry::from_corners(0.1, 0.1, 0.2, 0.12));
        low.confidence = Some(0.3);
        let mut high = word("sharp", Geometry::from_corners(0.3, 0.1, 0.4, 0.12));
        high.confidence = Some(0.9);
        let unknown = word("unscored", Geometry::from_corners(0.5, 0.1, 0.6, 0.12));

        let index = TokenIndex::from_page(&page(vec![vec![low, high, unknown]]), 0.5);
        let texts: Vec<&str> = index.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["sharp", "unscored"]);
    }

    #[test]
    fn test_empty_page() {
        let index = TokenIndex::from_page(&OcrPage::default(), 0.0);
        assert!(index.is_empty());
        assert_eq!(index.dropped, 0);
    }
}
