use crate::error::{BioError, BioResult};
use crate::seq::index::{Selection, SeqIndex};
use crate::seq::kind::{Generic, SeqKind, SeqParts};
use crate::seq::quality::{Quality, QualityInput};
use crate::seq::store::{ByteStore, SharedBytes, StridedBytes};

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// An immutable biological sequence of kind `K`.
///
/// Symbols are single bytes. Quality scores, when present, have exactly one
/// entry per symbol. Every transformation returns a new instance; the
/// underlying symbol buffer is shared between instances where possible.
pub struct Seq<K: SeqKind = Generic> {
    bytes: ByteStore,
    quality: Option<Quality>,
    id: String,
    description: String,
    kind: PhantomData<fn() -> K>,
}

pub type Sequence = Seq<Generic>;

#[derive(Clone, Debug)]
pub enum SeqSource {
    /// ASCII text; other characters fail to encode.
    Text(String),
    /// A fresh buffer, adopted as owned.
    Bytes(Vec<u8>),
    /// Storage owned elsewhere, adopted as a view.
    Shared(SharedBytes),
    Strided(StridedBytes),
    Symbol(u8),
    /// Another sequence: its view plus metadata that may be inherited.
    Sequence(Inherited),
}

#[derive(Clone, Debug)]
pub struct Inherited {
    bytes: ByteStore,
    id: String,
    description: String,
    quality: Option<Quality>,
}

impl SeqSource {
    fn into_store(self) -> BioResult<(ByteStore, Option<Inherited>)> {
        let store = match self {
            SeqSource::Text(text) => ByteStore::owned(encode_ascii(text)?),
            SeqSource::Bytes(bytes) => ByteStore::owned(bytes),
            SeqSource::Shared(buf) => ByteStore::shared(buf),
            SeqSource::Strided(strided) => strided.into_store(),
            SeqSource::Symbol(b) => ByteStore::owned(vec![b]),
            SeqSource::Sequence(inherited) => {
                return Ok((inherited.bytes.clone(), Some(inherited)));
            }
        };
        Ok((store, None))
    }
}

fn encode_ascii(text: String) -> BioResult<Vec<u8>> {
    if let Some((pos, ch)) = text.chars().enumerate().find(|(_, ch)| !ch.is_ascii()) {
        return Err(BioError::Encoding { ch, pos });
    }
    Ok(text.into_bytes())
}

impl From<&str> for SeqSource {
    fn from(text: &str) -> Self {
        SeqSource::Text(text.to_string())
    }
}

impl From<String> for SeqSource {
    fn from(text: String) -> Self {
        SeqSource::Text(text)
    }
}

impl From<&String> for SeqSource {
    fn from(text: &String) -> Self {
        SeqSource::Text(text.clone())
    }
}

impl From<char> for SeqSource {
    fn from(ch: char) -> Self {
        SeqSource::Text(ch.to_string())
    }
}

impl From<u8> for SeqSource {
    fn from(b: u8) -> Self {
        SeqSource::Symbol(b)
    }
}

impl From<Vec<u8>> for SeqSource {
    fn from(bytes: Vec<u8>) -> Self {
        SeqSource::Bytes(bytes)
    }
}

impl From<&[u8]> for SeqSource {
    fn from(bytes: &[u8]) -> Self {
        SeqSource::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for SeqSource {
    fn from(bytes: &[u8; N]) -> Self {
        SeqSource::Bytes(bytes.to_vec())
    }
}

impl From<SharedBytes> for SeqSource {
    fn from(buf: SharedBytes) -> Self {
        SeqSource::Shared(buf)
    }
}

impl From<StridedBytes> for SeqSource {
    fn from(strided: StridedBytes) -> Self {
        SeqSource::Strided(strided)
    }
}

impl<K: SeqKind> From<&Seq<K>> for SeqSource {
    fn from(seq: &Seq<K>) -> Self {
        SeqSource::Sequence(Inherited {
            bytes: seq.bytes.clone(),
            id: seq.id.clone(),
            description: seq.description.clone(),
            quality: seq.quality.clone(),
        })
    }
}

impl<K: SeqKind> From<Seq<K>> for SeqSource {
    fn from(seq: Seq<K>) -> Self {
        SeqSource::Sequence(Inherited {
            bytes: seq.bytes,
            id: seq.id,
            description: seq.description,
            quality: seq.quality,
        })
    }
}

/// Builder for a [`Seq`] with optional metadata.
///
/// When the source is another sequence, metadata left unset (or set to the
/// empty string) is inherited from it.
#[must_use]
pub struct SequenceBuilder<K: SeqKind = Generic> {
    source: SeqSource,
    id: Option<String>,
    description: Option<String>,
    quality: Option<QualityInput>,
    kind: PhantomData<fn() -> K>,
}

impl<K: SeqKind> SequenceBuilder<K> {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn quality(mut self, quality: impl Into<QualityInput>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn build(self) -> BioResult<Seq<K>> {
        let (bytes, inherited) = self.source.into_store()?;
        let mut id = self.id.unwrap_or_default();
        let mut description = self.description.unwrap_or_default();
        let mut quality = self.quality;

        if let Some(parent) = inherited {
            if id.is_empty() {
                id = parent.id;
            }
            if description.is_empty() {
                description = parent.description;
            }
            if quality.is_none() {
                quality = parent.quality.map(QualityInput::Frozen);
            }
        }

        let quality = quality.map(|q| q.normalize(bytes.len())).transpose()?;
        K::validate(bytes.as_slice())?;

        Ok(K::construct(SeqParts {
            bytes,
            id,
            description,
            quality,
        }))
    }
}

/// Field overrides for [`Seq::to`]; unset fields are copied from the
/// receiver.
#[derive(Clone, Debug, Default)]
pub struct SeqOverrides {
    pub source: Option<SeqSource>,
    pub id: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` drops the quality scores.
    pub quality: Option<Option<QualityInput>>,
}

impl SeqOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Into<SeqSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn quality(mut self, quality: Option<QualityInput>) -> Self {
        self.quality = Some(quality);
        self
    }
}

impl<K: SeqKind> Seq<K> {
    pub fn new(source: impl Into<SeqSource>) -> BioResult<Self> {
        Self::builder(source).build()
    }

    pub fn builder(source: impl Into<SeqSource>) -> SequenceBuilder<K> {
        SequenceBuilder {
            source: source.into(),
            id: None,
            description: None,
            quality: None,
            kind: PhantomData,
        }
    }

    pub fn from_parts(parts: SeqParts) -> Self {
        Self {
            bytes: parts.bytes,
            quality: parts.quality,
            id: parts.id,
            description: parts.description,
            kind: PhantomData,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quality(&self) -> Option<&[u32]> {
        self.quality.as_ref().map(Quality::as_slice)
    }

    pub fn has_quality(&self) -> bool {
        self.quality.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn owns_bytes(&self) -> bool {
        self.bytes.owns_bytes()
    }

    pub fn to_text(&self) -> String {
        self.as_bytes().iter().map(|&b| b as char).collect()
    }

    pub fn to(&self, overrides: SeqOverrides) -> BioResult<Self> {
        let source = overrides.source.unwrap_or_else(|| {
            SeqSource::Sequence(Inherited {
                bytes: self.bytes.clone(),
                id: String::new(),
                description: String::new(),
                quality: None,
            })
        });
        let quality = match overrides.quality {
            Some(quality) => quality,
            None => self.quality.clone().map(QualityInput::Frozen),
        };

        SequenceBuilder::<K> {
            source,
            id: Some(overrides.id.unwrap_or_else(|| self.id.clone())),
            description: Some(
                overrides
                    .description
                    .unwrap_or_else(|| self.description.clone()),
            ),
            quality,
            kind: PhantomData,
        }
        .build()
    }

    pub fn get(&self, index: impl Into<SeqIndex>) -> BioResult<Self> {
        let selection = index.into().resolve(self.len())?;
        Ok(self.select(selection))
    }

    #[inline]
    pub(crate) fn store(&self) -> &ByteStore {
        &self.bytes
    }

    pub(crate) fn select(&self, selection: Selection) -> Self {
        let (bytes, quality) = match selection {
            Selection::Contiguous(range) => (
                self.bytes.view(range.clone()),
                self.quality.as_ref().map(|q| q.slice(range)),
            ),
            Selection::Gather(positions) => (
                self.bytes.gather(&positions),
                self.quality.as_ref().map(|q| q.gather(&positions)),
            ),
        };
        K::construct(SeqParts {
            bytes,
            id: self.id.clone(),
            description: self.description.clone(),
            quality,
        })
    }

    pub fn iter(&self) -> Positions<K> {
        Positions {
            seq: self.clone(),
            front: 0,
            back: self.len(),
        }
    }

    pub fn reversed(&self) -> Positions<K> {
        let positions = (0..self.len()).rev().collect();
        self.select(Selection::Gather(positions)).into_iter()
    }

    /// Run `f` on a private writable copy of the symbols and return the
    /// resulting sequence; `K::validate` checks the result.
    pub fn with_byte_ownership<F>(mut self, f: F) -> BioResult<Self>
    where
        F: FnOnce(&mut [u8]) -> BioResult<()>,
    {
        {
            let mut bytes = self.bytes.acquire();
            f(&mut *bytes)?;
        }
        K::validate(self.as_bytes())?;
        Ok(self)
    }
}

impl<K: SeqKind> Clone for Seq<K> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            quality: self.quality.clone(),
            id: self.id.clone(),
            description: self.description.clone(),
            kind: PhantomData,
        }
    }
}

pub struct Positions<K: SeqKind = Generic> {
    seq: Seq<K>,
    front: usize,
    back: usize,
}

impl<K: SeqKind> Iterator for Positions<K> {
    type Item = Seq<K>;

    fn next(&mut self) -> Option<Seq<K>> {
        if self.front >= self.back {
            return None;
        }
        let i = self.front;
        self.front += 1;
        Some(self.seq.select(Selection::Contiguous(i..i + 1)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<K: SeqKind> DoubleEndedIterator for Positions<K> {
    fn next_back(&mut self) -> Option<Seq<K>> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        let i = self.back;
        Some(self.seq.select(Selection::Contiguous(i..i + 1)))
    }
}

impl<K: SeqKind> ExactSizeIterator for Positions<K> {}

impl<K: SeqKind> FusedIterator for Positions<K> {}

impl<K: SeqKind> IntoIterator for Seq<K> {
    type Item = Seq<K>;
    type IntoIter = Positions<K>;

    fn into_iter(self) -> Positions<K> {
        let back = self.len();
        Positions {
            seq: self,
            front: 0,
            back,
        }
    }
}

impl<K: SeqKind> IntoIterator for &Seq<K> {
    type Item = Seq<K>;
    type IntoIter = Positions<K>;

    fn into_iter(self) -> Positions<K> {
        self.iter()
    }
}

impl<K: SeqKind> fmt::Display for Seq<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.as_bytes() {
            fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}

impl<K: SeqKind> fmt::Debug for Seq<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", K::NAME, abbreviate(&self.to_text()))?;
        write!(f, ", length={}", self.len())?;
        if !self.id.is_empty() {
            write!(f, ", id={}", abbreviate(&self.id))?;
        }
        if !self.description.is_empty() {
            write!(f, ", description={}", abbreviate(&self.description))?;
        }
        if let Some(quality) = self.quality() {
            write!(f, ", quality={}", abbreviate_scores(quality))?;
        }
        f.write_str(")")
    }
}

fn abbreviate(s: &str) -> String {
    let quoted: Vec<char> = format!("'{s}'").chars().collect();
    if quoted.len() <= 20 {
        return quoted.into_iter().collect();
    }
    let head: String = quoted[..7].iter().collect();
    let tail: String = quoted[quoted.len() - 7..].iter().collect();
    format!("{head} ... {tail}")
}

fn abbreviate_scores(scores: &[u32]) -> String {
    let join = |xs: &[u32]| {
        xs.iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    if scores.len() > 13 {
        format!(
            "[{}, ..., {}]",
            join(&scores[..6]),
            join(&scores[scores.len() - 6..])
        )
    } else {
        format!("[{}]", join(scores))
    }
}
