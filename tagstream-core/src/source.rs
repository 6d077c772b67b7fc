//! Random-access input for the tokenizer.
//!
//! The tokenizer never sees bytes or strings directly. It asks a [`Source`]
//! for its length and for single code points by index, which lets callers
//! feed pre-decoded buffers of any shape without copying them.

/// A finite sequence of code points with random access.
///
/// `code_point` must return `Some` for every index below `len()`. A source
/// that breaks this is reported as [`Error::InvalidInput`](crate::Error::InvalidInput)
/// before the offending position is scanned.
///
/// The accessor is not called `get` so that importing this trait leaves
/// `Vec::get` and slice `get` resolving to the element methods.
pub trait Source {
    /// Number of code points in the input.
    fn len(&self) -> usize;

    /// The raw code point at `index`, or `None` past the end.
    fn code_point(&self, index: usize) -> Option<u32>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first position at or after `from` that may hold `<`, `&`
    /// or NUL. Everything between `from` and the returned index is known to be
    /// plain text.
    ///
    /// The default answers `from`, meaning "no fast path, look at each code
    /// point". Implementations may return any index up to the real one.
    fn find_markup(&self, from: usize) -> usize {
        from
    }
}

/// Bytes are taken as single code points (ASCII or Latin-1 input).
impl Source for [u8] {
    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn code_point(&self, index: usize) -> Option<u32> {
        <[u8]>::get(self, index).map(|&b| b as u32)
    }

    fn find_markup(&self, from: usize) -> usize {
        match self.get(from..) {
            Some(rest) => memchr::memchr3(b'<', b'&', 0, rest).map_or(self.len(), |i| from + i),
            None => self.len(),
        }
    }
}

impl Source for [u32] {
    #[inline]
    fn len(&self) -> usize {
        <[u32]>::len(self)
    }

    #[inline]
    fn code_point(&self, index: usize) -> Option<u32> {
        <[u32]>::get(self, index).copied()
    }
}

impl Source for [char] {
    #[inline]
    fn len(&self) -> usize {
        <[char]>::len(self)
    }

    #[inline]
    fn code_point(&self, index: usize) -> Option<u32> {
        <[char]>::get(self, index).map(|&c| c as u32)
    }
}

impl<T> Source for Vec<T>
where
    [T]: Source,
{
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn code_point(&self, index: usize) -> Option<u32> {
        self.as_slice().code_point(index)
    }

    fn find_markup(&self, from: usize) -> usize {
        self.as_slice().find_markup(from)
    }
}

impl<S: Source + ?Sized> Source for &S {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn code_point(&self, index: usize) -> Option<u32> {
        (**self).code_point(index)
    }

    fn find_markup(&self, from: usize) -> usize {
        (**self).find_markup(from)
    }
}
