//! Reusable working buffers for the recursive parsers.
//!
//! Every recursion frame that renders child content borrows a scratch
//! buffer whose lifetime is exactly that frame. Keeping the backing stores
//! on a stack amortizes allocation across the whole document, and the live
//! count doubles as the recursion depth that `max_nesting` bounds.

/// Size class of a working buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BufferClass {
    /// Block-level scratch space, 256 bytes initial.
    Block,
    /// Span-level scratch space, 64 bytes initial.
    Span,
}

struct Pool {
    spare: Vec<Vec<u8>>,
    live: usize,
    initial: usize,
}

impl Pool {
    fn new(initial: usize) -> Self {
        Self {
            spare: Vec::new(),
            live: 0,
            initial,
        }
    }

    fn acquire(&mut self) -> Vec<u8> {
        self.live += 1;
        match self.spare.pop() {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => Vec::with_capacity(self.initial),
        }
    }

    fn release(&mut self, buf: Vec<u8>) {
        debug_assert!(self.live > 0);
        self.live -= 1;
        self.spare.push(buf);
    }
}

/// The per-parser pair of buffer pools. Single-owner, LIFO discipline:
/// every `acquire` must be matched by a `release` of the same class before
/// the enclosing frame returns.
pub(crate) struct WorkPool {
    block: Pool,
    span: Pool,
}

impl WorkPool {
    pub(crate) fn new() -> Self {
        Self {
            block: Pool::new(256),
            span: Pool::new(64),
        }
    }

    /// Hand out an empty buffer of the given class. The backing store is
    /// retained from earlier uses when one is available.
    pub(crate) fn acquire(&mut self, class: BufferClass) -> Vec<u8> {
        match class {
            BufferClass::Block => self.block.acquire(),
            BufferClass::Span => self.span.acquire(),
        }
    }

    pub(crate) fn release(&mut self, class: BufferClass, buf: Vec<u8>) {
        match class {
            BufferClass::Block => self.block.release(buf),
            BufferClass::Span => self.span.release(buf),
        }
    }

    /// Combined count of buffers currently handed out; the recursion depth
    /// the nesting limit is checked against.
    pub(crate) fn depth(&self) -> usize {
        self.block.live + self.span.live
    }
}
