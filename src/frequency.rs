use ahash::{AHashMap, AHashSet};

/// Token -> number of distinct token strings containing it.
///
/// A token repeated inside one event counts once for that event: the table
/// measures event coverage, not raw occurrences.
pub fn vocabulary<'a, I>(token_strings: I) -> AHashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut vocab: AHashMap<&'a str, usize> = AHashMap::new();
    let mut seen: AHashSet<&'a str> = AHashSet::new();
    for tokens in token_strings {
        seen.clear();
        for tok in tokens.split_whitespace() {
            if seen.insert(tok) {
                *vocab.entry(tok).or_insert(0) += 1;
            }
        }
    }
    vocab
}

/// Tokens missing from at least one of the `group_size` events the
/// vocabulary was built from.
pub fn dynamic_tokens<'a>(vocab: &AHashMap<&'a str, usize>, group_size: usize) -> AHashSet<&'a str> {
    vocab
        .iter()
        .filter(|(_, &count)| count < group_size)
        .map(|(&tok, _)| tok)
        .collect()
}

/// Deterministic stride sample: `sample_size` items taken at
/// `floor(i * len / sample_size)`. A size of 0, or one not smaller than the
/// input, keeps everything.
pub fn sample<T>(items: &[T], sample_size: usize) -> Vec<&T> {
    let n = items.len();
    if sample_size == 0 || sample_size >= n {
        return items.iter().collect();
    }
    (0..sample_size).map(|i| &items[i * n / sample_size]).collect()
}
