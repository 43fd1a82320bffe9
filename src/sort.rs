//! In-place heap sort producing the final ranking of top-k candidates.

use crate::heap::WordFrequency;

/// `true` if `a` ranks strictly before `b`: higher importance first,
/// then lexicographically smaller word.
#[inline]
fn ranks_before(a: &WordFrequency, b: &WordFrequency) -> bool {
    a.importance > b.importance || (a.importance == b.importance && a.word < b.word)
}

/// Sort by descending importance, ties by ascending word.
pub fn sort_descending(items: &mut [WordFrequency]) {
    heap_sort_by(items, |a, b| ranks_before(a, b));
}

/// Heap sort putting `items` in `before` order.
///
/// The heap keeps the element that ranks *last* at the root, so each
/// extraction fills the array from the back.
pub fn heap_sort_by<T, F>(items: &mut [T], mut before: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let n = items.len();
    for root in (0..n / 2).rev() {
        sift_down(items, root, n, &mut before);
    }
    for end in (1..n).rev() {
        items.swap(0, end);
        sift_down(items, 0, end, &mut before);
    }
}

fn sift_down<T, F>(items: &mut [T], mut root: usize, len: usize, before: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return;
        }
        let right = left + 1;
        let mut last = root;
        if before(&items[last], &items[left]) {
            last = left;
        }
        if right < len && before(&items[last], &items[right]) {
            last = right;
        }
        if last == root {
            return;
        }
        items.swap(root, last);
        root = last;
    }
}
