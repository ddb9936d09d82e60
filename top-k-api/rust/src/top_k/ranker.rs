use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap},
    hash::Hash,
    num::NonZeroUsize,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RankError {
    #[error("nums must not be empty")]
    EmptyInput,
    #[error("k={k} is greater than the number of distinct elements={distinct}")]
    InvalidK { k: usize, distinct: usize },
}

/// Occurrence count of every distinct value, remembered in first-seen order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<T> {
    entries: Vec<(T, usize)>,
    index: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> FrequencyTable<T> {
    pub fn count(values: &[T]) -> Self {
        let mut entries: Vec<(T, usize)> = Vec::new();
        let mut index: HashMap<T, usize> = HashMap::new();

        for value in values {
            match index.get(value) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(value.clone(), entries.len());
                    entries.push((value.clone(), 1));
                }
            }
        }

        Self { entries, index }
    }

    pub fn get(&self, value: &T) -> Option<usize> {
        self.index.get(value).map(|&slot| self.entries[slot].1)
    }

    /// Picks the `k` most frequent values, best first. Equal counts keep
    /// the order in which the values were first seen.
    fn select(&self, k: usize) -> Vec<T> {
        let mut heap = BinaryHeap::with_capacity(k + 1);

        for (first_seen, &(_, count)) in self.entries.iter().enumerate() {
            heap.push(Reverse(Candidate { count, first_seen }));
            if heap.len() > k {
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse(c)| self.entries[c.first_seen].0.clone())
            .collect()
    }
}

impl<T> FrequencyTable<T> {
    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.entries.iter().map(|(value, count)| (value, *count))
    }
}

impl<T: PartialEq> PartialEq for FrequencyTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq> Eq for FrequencyTable<T> {}

#[derive(PartialEq, Eq)]
struct Candidate {
    count: usize,
    first_seen: usize,
}

// Greater means ranks higher: more occurrences, then seen earlier.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.first_seen.cmp(&self.first_seen))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking<T> {
    top_k: Vec<T>,
    frequencies: FrequencyTable<T>,
}

impl<T> Ranking<T> {
    pub fn top_k(&self) -> &[T] {
        &self.top_k
    }

    pub fn frequencies(&self) -> &FrequencyTable<T> {
        &self.frequencies
    }

    pub fn into_parts(self) -> (Vec<T>, FrequencyTable<T>) {
        (self.top_k, self.frequencies)
    }
}

pub fn rank<T: Eq + Hash + Clone>(values: &[T], k: NonZeroUsize) -> Result<Ranking<T>, RankError> {
    if values.is_empty() {
        return Err(RankError::EmptyInput);
    }

    let frequencies = FrequencyTable::count(values);

    let k = k.get();
    let distinct = frequencies.len();
    if k > distinct {
        return Err(RankError::InvalidK { k, distinct });
    }

    let top_k = frequencies.select(k);

    Ok(Ranking { top_k, frequencies })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn noisy_input() -> Vec<u32> {
        (0u32..2000).map(|i| (i * 7919 + i / 13) % 97 % (1 + i % 41)).collect()
    }

    #[test]
    fn test_case_1() {
        let input = vec![1, 1, 1, 2, 2, 3];

        let ranking = rank(&input, k(2)).unwrap();

        assert_eq!(ranking.top_k(), &[1, 2]);
        let frequencies = ranking.frequencies();
        assert_eq!(frequencies.len(), 3);
        assert_eq!(frequencies.get(&1), Some(3));
        assert_eq!(frequencies.get(&2), Some(2));
        assert_eq!(frequencies.get(&3), Some(1));
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let input = vec!["a", "b", "a", "b", "c"];

        let ranking = rank(&input, k(1)).unwrap();

        assert_eq!(ranking.top_k(), &["a"]);
        assert_eq!(ranking.frequencies().get(&"a"), Some(2));
        assert_eq!(ranking.frequencies().get(&"b"), Some(2));
        assert_eq!(ranking.frequencies().get(&"c"), Some(1));
    }

    #[test]
    fn tie_order_follows_first_occurrence_not_value() {
        let input = vec![9, 3, 7, 3, 7, 9];

        let ranking = rank(&input, k(3)).unwrap();

        assert_eq!(ranking.top_k(), &[9, 3, 7]);
    }

    #[test]
    fn single_value() {
        let ranking = rank(&[5], k(1)).unwrap();

        assert_eq!(ranking.top_k(), &[5]);
        assert_eq!(ranking.frequencies().iter().collect::<Vec<_>>(), vec![(&5, 1)]);
    }

    #[test]
    fn empty_input() {
        let input: Vec<i64> = vec![];

        let err = rank(&input, k(1)).unwrap_err();

        assert_eq!(err, RankError::EmptyInput);
        assert_eq!(err.to_string(), "nums must not be empty");
    }

    #[test]
    fn k_larger_than_distinct() {
        let err = rank(&[1, 2, 3], k(5)).unwrap_err();

        assert_eq!(err, RankError::InvalidK { k: 5, distinct: 3 });
        assert_eq!(
            err.to_string(),
            "k=5 is greater than the number of distinct elements=3"
        );
    }

    #[test]
    fn k_equal_to_distinct_returns_everything() {
        let input = vec![4, 1, 4, 2, 1, 4];

        let ranking = rank(&input, k(3)).unwrap();

        assert_eq!(ranking.top_k(), &[4, 1, 2]);
    }

    #[test]
    fn frequencies_iterate_in_first_seen_order() {
        let input = vec!["z", "y", "z", "x", "y", "z"];

        let table = FrequencyTable::count(&input);

        let entries = table.iter().collect::<Vec<_>>();
        assert_eq!(entries, vec![(&"z", 3), (&"y", 2), (&"x", 1)]);
        assert_eq!(table.get(&"w"), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn index_grows_with_distinct_values_not_input_length() {
        let input = vec![1u8; 100_000];

        let table = FrequencyTable::count(&input);

        assert_eq!(table.get(&1), Some(100_000));
        assert!(table.index.capacity() < 16, "{}", table.index.capacity());
    }

    #[test]
    fn counts_are_conserved_and_cover_the_input() {
        let input = noisy_input();

        let ranking = rank(&input, k(5)).unwrap();
        let frequencies = ranking.frequencies();

        assert_eq!(frequencies.total(), input.len());
        for n in &input {
            assert!(frequencies.get(n).is_some());
        }
        let mut distinct = input.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(frequencies.len(), distinct.len());
    }

    #[test]
    fn top_k_dominates_the_rest() {
        let input = noisy_input();
        let distinct = FrequencyTable::count(&input).len();

        for n in 1..=distinct {
            let ranking = rank(&input, k(n)).unwrap();
            let top_k = ranking.top_k();
            let frequencies = ranking.frequencies();

            assert_eq!(top_k.len(), n);
            let lowest_selected = top_k.iter().map(|v| frequencies.get(v).unwrap()).min().unwrap();
            let highest_skipped = frequencies
                .iter()
                .filter(|(v, _)| !top_k.contains(*v))
                .map(|(_, count)| count)
                .max()
                .unwrap_or(0);
            assert!(lowest_selected >= highest_skipped);

            let mut deduped = top_k.to_vec();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), n);
        }
    }

    #[test]
    fn smaller_k_is_a_prefix_of_larger_k() {
        let input = noisy_input();

        let full = rank(&input, k(20)).unwrap();
        let partial = rank(&input, k(7)).unwrap();

        assert_eq!(partial.top_k(), &full.top_k()[..7]);
    }

    #[test]
    fn deterministic() {
        let input = noisy_input();

        let first = rank(&input, k(10)).unwrap();
        let second = rank(&input, k(10)).unwrap();

        assert_eq!(first, second);
    }
}
