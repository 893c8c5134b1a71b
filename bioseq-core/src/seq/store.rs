use crate::error::{BioError, BioResult};

use std::ops::{Deref, DerefMut, Range};
use std::sync::Arc;

/// Reference-counted symbol buffer that can back several sequences at once.
pub type SharedBytes = Arc<Vec<u8>>;

/// Read-only symbol storage.
///
/// A store either owns a buffer it allocated itself, or is a view into a
/// buffer owned elsewhere (another sequence, or a caller-provided
/// [`SharedBytes`]). The buffer only becomes writable through
/// [`ByteStore::acquire`], which copies a shared buffer before handing out
/// the write guard.
#[derive(Debug)]
pub struct ByteStore {
    buf: SharedBytes,
    start: usize,
    end: usize,
    owns: bool,
    writable: bool,
}

impl ByteStore {
    pub fn owned(bytes: Vec<u8>) -> Self {
        let end = bytes.len();
        Self {
            buf: Arc::new(bytes),
            start: 0,
            end,
            owns: true,
            writable: false,
        }
    }

    pub fn shared(buf: SharedBytes) -> Self {
        let end = buf.len();
        Self {
            buf,
            start: 0,
            end,
            owns: false,
            writable: false,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn owns_bytes(&self) -> bool {
        self.owns
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Non-owning view of `range` (relative to this store).
    pub(crate) fn view(&self, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end && range.end <= self.len());
        Self {
            buf: Arc::clone(&self.buf),
            start: self.start + range.start,
            end: self.start + range.end,
            owns: false,
            writable: false,
        }
    }

    pub(crate) fn gather(&self, positions: &[usize]) -> Self {
        let src = self.as_slice();
        Self::owned(positions.iter().map(|&i| src[i]).collect())
    }

    /// Make the buffer writable for the lifetime of the returned guard.
    ///
    /// A view (or an owned buffer currently shared with views) is copied
    /// into a private buffer first, so no other store observes the writes.
    pub(crate) fn acquire(&mut self) -> BytesMut<'_> {
        if !self.owns || self.start != 0 || self.end != self.buf.len() {
            seq_debug!("copy-on-write: materialising {} shared bytes", self.len());
            let private = self.as_slice().to_vec();
            *self = Self::owned(private);
        } else if Arc::strong_count(&self.buf) > 1 {
            seq_debug!("copy-on-write: detaching {} bytes from views", self.len());
        }

        let Self { buf, writable, .. } = self;
        *writable = true;
        BytesMut {
            bytes: Arc::make_mut(buf),
            writable,
        }
    }
}

impl Clone for ByteStore {
    /// Clones share the buffer; the clone never owns it.
    fn clone(&self) -> Self {
        self.view(0..self.len())
    }
}

/// Write access to a [`ByteStore`]; dropping it freezes the buffer again.
pub struct BytesMut<'a> {
    bytes: &'a mut Vec<u8>,
    writable: &'a mut bool,
}

impl Deref for BytesMut<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

impl DerefMut for BytesMut<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut_slice()
    }
}

impl Drop for BytesMut<'_> {
    fn drop(&mut self) {
        *self.writable = false;
    }
}

/// A strided (non-contiguous) window over a shared buffer.
///
/// Sequences require contiguous storage, so a strided window is gathered
/// into a fresh owned buffer on construction unless its stride is 1.
#[derive(Clone, Debug)]
pub struct StridedBytes {
    buf: SharedBytes,
    offset: usize,
    stride: usize,
    len: usize,
}

impl StridedBytes {
    pub fn new(buf: SharedBytes, offset: usize, stride: usize, len: usize) -> BioResult<Self> {
        if stride == 0 {
            return Err(BioError::InvalidArgument {
                msg: "stride must be greater than 0".to_string(),
            });
        }
        if len > 0 {
            let last = stride
                .checked_mul(len - 1)
                .and_then(|span| span.checked_add(offset));
            match last {
                Some(last) if last < buf.len() => {}
                _ => {
                    return Err(BioError::IndexOutOfRange {
                        index: last.map_or(isize::MAX, |l| l as isize),
                        len: buf.len(),
                    })
                }
            }
        }
        Ok(Self {
            buf,
            offset,
            stride,
            len,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == 1
    }

    pub(crate) fn into_store(self) -> ByteStore {
        if self.is_contiguous() {
            let mut store = ByteStore::shared(self.buf);
            store.start = self.offset;
            store.end = self.offset + self.len;
            return store;
        }
        let gathered = (0..self.len)
            .map(|i| self.buf[self.offset + i * self.stride])
            .collect();
        ByteStore::owned(gathered)
    }
}
