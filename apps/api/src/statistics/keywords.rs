use std::collections::HashMap;

use serde::Serialize;

const TOP_KEYWORDS: usize = 10;

const SEPARATORS: [char; 10] = [',', '，', '.', '。', ';', '；', '!', '！', '?', '？'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordStats {
    pub pros: Vec<KeywordCount>,
    pub cons: Vec<KeywordCount>,
}

impl KeywordStats {
    /// `(pros, cons)` pairs of the reviews being summarized.
    pub fn from_reviews(reviews: &[(Option<String>, Option<String>)]) -> Self {
        Self {
            pros: top_keywords(reviews.iter().filter_map(|(pros, _)| pros.as_deref())),
            cons: top_keywords(reviews.iter().filter_map(|(_, cons)| cons.as_deref())),
        }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|token| token.chars().count() > 1)
}

/// Counts tokens across `texts` and returns the ten most frequent.
/// Ties keep first-seen order.
pub fn top_keywords<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<KeywordCount> {
    let mut order: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for token in texts.into_iter().flat_map(tokens) {
        match index.get(token) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(token, order.len());
                order.push(KeywordCount {
                    keyword: token.to_string(),
                    count: 1,
                });
            }
        }
    }

    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(TOP_KEYWORDS);
    order
}
