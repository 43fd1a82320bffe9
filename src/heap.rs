//! Ranked candidates and the bounded min-heap that keeps the best `k`.

/// A word together with its importance, as returned by top-k queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordFrequency {
    pub word: String,
    pub importance: u64,
}

impl WordFrequency {
    pub fn new(word: impl Into<String>, importance: u64) -> Self {
        Self {
            word: word.into(),
            importance,
        }
    }
}

impl From<(String, u64)> for WordFrequency {
    fn from((word, importance): (String, u64)) -> Self {
        Self { word, importance }
    }
}

/// Array min-heap ordered by importance alone, intended to hold at most
/// `limit` candidates.
///
/// [`offer`](Self::offer) enforces the limit; [`push`](Self::push) does not,
/// and the backing array simply grows.
#[derive(Clone, Debug)]
pub struct BoundedMinHeap {
    items: Vec<WordFrequency>,
    limit: usize,
}

impl BoundedMinHeap {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::with_capacity(limit),
            limit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn peek_min(&self) -> Option<&WordFrequency> {
        self.items.first()
    }

    pub fn push(&mut self, item: WordFrequency) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub fn pop_min(&mut self) -> Option<WordFrequency> {
        if self.items.is_empty() {
            return None;
        }
        let min = self.items.swap_remove(0);
        self.sift_down(0);
        Some(min)
    }

    /// Whether a candidate of this importance would be kept by `offer`.
    pub fn admits(&self, importance: u64) -> bool {
        if self.items.len() < self.limit {
            return true;
        }
        match self.peek_min() {
            Some(min) => importance > min.importance,
            None => false,
        }
    }

    /// Keep `item` if the heap is below its limit or `item` beats the
    /// current minimum, which is then evicted. Ties with the minimum lose.
    pub fn offer(&mut self, item: WordFrequency) -> bool {
        if !self.admits(item.importance) {
            return false;
        }
        if self.items.len() >= self.limit {
            self.pop_min();
        }
        self.push(item);
        true
    }

    /// Heap contents in array order (not sorted).
    pub fn into_vec(self) -> Vec<WordFrequency> {
        self.items
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.items[parent].importance <= self.items[idx].importance {
                break;
            }
            self.items.swap(parent, idx);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * idx + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let smaller = if right < n && self.items[right].importance < self.items[left].importance {
                right
            } else {
                left
            };
            if self.items[idx].importance <= self.items[smaller].importance {
                break;
            }
            self.items.swap(idx, smaller);
            idx = smaller;
        }
    }
}
