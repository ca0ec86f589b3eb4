//! Lazy enumeration of corner selections.
//!
//! Tuples are index vectors into a `GeneratorSet`, so two value-equal corners
//! at different positions are still distinct choices.

/// All `k`-subsets of `0..n` as strictly increasing index vectors, in
/// lexicographic order. Empty when `k == 0` or `k > n`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Combinations {
        Combinations {
            n,
            indices: (0..k).collect(),
            first: true,
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }
        let k = self.indices.len();
        // rightmost position that can still move right
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

pub fn select_tuples(set_len: usize, l: usize) -> Combinations {
    Combinations::new(set_len, l)
}

/// Odometer over one position per list, the first position turning fastest.
/// Empty if there are no lists or any list is empty.
#[derive(Debug, Clone)]
pub struct MultiTuples {
    sizes: Vec<usize>,
    counters: Vec<usize>,
    done: bool,
}

impl MultiTuples {
    pub fn new(sizes: Vec<usize>) -> MultiTuples {
        let done = sizes.is_empty() || sizes.iter().any(|s| *s == 0);
        MultiTuples {
            counters: vec![0; sizes.len()],
            sizes,
            done,
        }
    }
}

impl Iterator for MultiTuples {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.counters.clone();
        self.done = true;
        for i in 0..self.counters.len() {
            self.counters[i] += 1;
            if self.counters[i] < self.sizes[i] {
                self.done = false;
                break;
            }
            self.counters[i] = 0;
        }
        Some(current)
    }
}

/// Every combination picking one candidate tuple per successor.
pub fn select_multi_tuples<'a>(
    per_successor: &'a [Vec<Vec<usize>>],
) -> impl Iterator<Item = Vec<&'a [usize]>> + 'a {
    let sizes = per_successor.iter().map(|tuples| tuples.len()).collect();
    MultiTuples::new(sizes).map(move |choice| {
        choice
            .iter()
            .enumerate()
            .map(|(w, i)| &per_successor[w][*i][..])
            .collect()
    })
}

pub fn pad_tuple(mut tuple: Vec<usize>, size: usize) -> Vec<usize> {
    if let Some(first) = tuple.first().copied() {
        while tuple.len() < size {
            tuple.push(first);
        }
    }
    tuple
}
