use crate::error::BioResult;
use crate::seq::quality::Quality;
use crate::seq::sequence::Seq;
use crate::seq::store::ByteStore;

/// Concrete sequence type of a [`Seq`].
///
/// Two sequences of different kinds never compare equal and cannot be
/// combined in searches or distance computations. Alphabet-enforcing
/// collaborators implement `validate`; it runs at every construction entry
/// point (builder, `to` with new symbols, `with_byte_ownership`). Instances
/// derived by indexing only ever select existing symbols and go through
/// `construct` without re-validation.
pub trait SeqKind: Sized + 'static {
    const NAME: &'static str;

    fn validate(_bytes: &[u8]) -> BioResult<()> {
        Ok(())
    }

    /// Build the concrete instance; every derived instance is routed here.
    fn construct(parts: SeqParts) -> Seq<Self> {
        Seq::from_parts(parts)
    }
}

/// The untyped sequence kind; accepts any byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Generic;

impl SeqKind for Generic {
    const NAME: &'static str = "Sequence";
}

/// Validated components of a sequence, handed to [`SeqKind::construct`].
#[derive(Clone, Debug)]
pub struct SeqParts {
    pub(crate) bytes: ByteStore,
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) quality: Option<Quality>,
}

impl SeqParts {
    pub fn bytes(&self) -> &[u8] {
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
}
