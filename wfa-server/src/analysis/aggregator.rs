//! Frequency aggregation and ranking

use indexmap::IndexMap;
use std::cmp::Ordering;
use wfa_common::api::WordFrequency;

/// Count each distinct token and return the ranked list
///
/// One entry per distinct token (exact string equality). Ranking is by
/// frequency descending, ties broken by word ascending (byte-wise), so the
/// same tokens always produce the same sequence.
pub fn aggregate<T>(tokens: &[T]) -> Vec<WordFrequency>
where
    T: AsRef<str>,
{
    let mut counts: IndexMap<&str, u64> = IndexMap::with_capacity(tokens.len() / 2);
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }

    let mut frequencies: Vec<WordFrequency> = counts
        .into_iter()
        .map(|(word, frequency)| WordFrequency::new(word, frequency))
        .collect();
    rank(&mut frequencies);
    frequencies
}

/// Sort in place: frequency descending, then word ascending
pub fn rank(frequencies: &mut [WordFrequency]) {
    frequencies.sort_unstable_by(compare_ranked);
}

fn compare_ranked(a: &WordFrequency, b: &WordFrequency) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.word.cmp(&b.word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn words(frequencies: &[WordFrequency]) -> Vec<&str> {
        frequencies.iter().map(|f| f.word.as_str()).collect()
    }

    #[test]
    fn test_empty_tokens() {
        let tokens: Vec<String> = Vec::new();
        assert!(aggregate(&tokens).is_empty());
    }

    #[test]
    fn test_counts_and_ranking() {
        let tokens = ["the", "cat", "sat", "on", "the", "mat", "the", "cat", "ran"];
        let result = aggregate(&tokens);

        assert_eq!(result[0], WordFrequency::new("the", 3));
        assert_eq!(result[1], WordFrequency::new("cat", 2));
        assert_eq!(words(&result[2..]), vec!["mat", "on", "ran", "sat"]);
        assert!(result[2..].iter().all(|f| f.frequency == 1));
    }

    #[test]
    fn test_ties_are_lexicographic_regardless_of_input_order() {
        let forward = aggregate(&["b", "a", "c", "a", "b", "c"]);
        let backward = aggregate(&["c", "c", "b", "b", "a", "a"]);

        assert_eq!(words(&forward), vec!["a", "b", "c"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_sum_and_word_set_match_tokens() {
        let tokens: Vec<String> = "lorem ipsum dolor sit amet lorem ipsum lorem a a b"
            .split(' ')
            .map(String::from)
            .collect();
        let result = aggregate(&tokens);

        let total: u64 = result.iter().map(|f| f.frequency).sum();
        assert_eq!(total, tokens.len() as u64);

        let expected: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let actual: HashSet<&str> = result.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(actual, expected);
        assert_eq!(result.len(), expected.len());
    }

    #[test]
    fn test_sorted_non_increasing() {
        let tokens: Vec<String> = (0..200)
            .map(|i| format!("w{}", (i * 7919) % 23 % (i % 5 + 1)))
            .collect();
        let result = aggregate(&tokens);

        for pair in result.windows(2) {
            assert!(pair[0].frequency >= pair[1].frequency);
            if pair[0].frequency == pair[1].frequency {
                assert!(pair[0].word < pair[1].word);
            }
        }
    }

    #[test]
    fn test_case_sensitive_after_normalization() {
        // Aggregation compares exact strings; folding is the tokenizer's job
        let result = aggregate(&["Word", "word"]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_rank_reorders_existing_list() {
        let mut list = vec![
            WordFrequency::new("z", 1),
            WordFrequency::new("y", 5),
            WordFrequency::new("a", 1),
        ];
        rank(&mut list);
        assert_eq!(words(&list), vec!["y", "a", "z"]);
    }
}
