pub mod bytes;
pub mod compare;
pub mod index;
pub mod kind;
pub mod kmer;
pub mod pattern;
pub mod quality;
pub mod sequence;
pub mod store;


pub use compare::{hamming, Feature};
pub use index::{MixedItem, ResolvedSlice, SeqIndex, SliceSpec};
pub use kind::{Generic, SeqKind, SeqParts};
pub use kmer::{KmerFrequencies, Kmers, RelativeFrequencies};
pub use pattern::{IntoRegex, RegexSlices};
pub use quality::{Quality, QualityInput};
pub use sequence::{Inherited, Positions, Seq, SeqOverrides, SeqSource, Sequence, SequenceBuilder};
pub use store::{SharedBytes, StridedBytes};
