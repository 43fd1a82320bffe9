//! Explicit traversal stack built from linked fixed-size chunks.
//!
//! Subtree scans push one frame per child; a single growing array would
//! reallocate and copy on every doubling, so frames live in chunks of
//! `chunk_size` slots linked head-first. Only the head chunk is ever touched.

struct Chunk<T> {
    items: Vec<T>,
    next: Option<Box<Chunk<T>>>,
}

impl<T> Chunk<T> {
    fn new(capacity: usize) -> Box<Self> {
        Box::new(Self {
            items: Vec::with_capacity(capacity),
            next: None,
        })
    }
}

/// LIFO stack of frames stored in linked chunks.
pub struct ChunkedStack<T> {
    head: Box<Chunk<T>>,
    chunk_size: usize,
    len: usize,
    chunks: usize,
}

impl<T> ChunkedStack<T> {
    /// `chunk_size` of zero is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            head: Chunk::new(chunk_size),
            chunk_size,
            len: 0,
            chunks: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunks currently linked, including an empty head.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn push(&mut self, item: T) {
        if self.head.items.len() == self.chunk_size {
            let full = std::mem::replace(&mut self.head, Chunk::new(self.chunk_size));
            self.head.next = Some(full);
            self.chunks += 1;
        }
        self.head.items.push(item);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.head.items.pop()?;
        // The last chunk is kept for reuse.
        if self.head.items.is_empty() {
            if let Some(next) = self.head.next.take() {
                self.head = next;
                self.chunks -= 1;
            }
        }
        self.len -= 1;
        Some(item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.head.items.last()
    }
}

impl<T> Drop for ChunkedStack<T> {
    fn drop(&mut self) {
        // Unlink iteratively; the default drop would recurse once per chunk.
        let mut next = self.head.next.take();
        while let Some(mut chunk) = next {
            next = chunk.next.take();
        }
    }
}
