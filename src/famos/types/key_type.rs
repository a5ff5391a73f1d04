//! Key type tags.
//!
//! Every key in a FAMOS stream starts with a two character tag naming its
//! type. The set of tags this crate understands is closed; everything else
//! is carried as [`KeyType::Unknown`] so the dispatcher can skip it.

use std::fmt;

/// The type tag of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// File format marker.
    CF,
    /// Key group sentinel.
    CK,
    /// Origin of the data.
    NO,
    /// Language and code page information.
    NL,
    /// Group definition.
    CB,
    /// Text definition.
    CT,
    /// Single value definition.
    CI,
    /// Channel information.
    CN,
    /// Data field definition.
    CG,
    /// X-axis scaling.
    CD,
    /// Z-axis scaling.
    CZ,
    /// Trigger time.
    NT,
    /// Component definition.
    CC,
    /// Pack information.
    CP,
    /// Buffer description.
    Cb,
    /// Calibration.
    CR,
    /// Display information.
    ND,
    /// Raw data.
    CS,
    /// Property information.
    Np,
    /// A tag this crate does not know.
    Unknown([u8; 2]),
}

impl KeyType {
    /// Classifies a raw two byte tag.
    pub fn from_tag(tag: [u8; 2]) -> Self {
        match &tag {
            b"CF" => Self::CF,
            b"CK" => Self::CK,
            b"NO" => Self::NO,
            b"NL" => Self::NL,
            b"CB" => Self::CB,
            b"CT" => Self::CT,
            b"CI" => Self::CI,
            b"CN" => Self::CN,
            b"CG" => Self::CG,
            b"CD" => Self::CD,
            b"CZ" => Self::CZ,
            b"NT" => Self::NT,
            b"CC" => Self::CC,
            b"CP" => Self::CP,
            b"Cb" => Self::Cb,
            b"CR" => Self::CR,
            b"ND" => Self::ND,
            b"CS" => Self::CS,
            b"Np" => Self::Np,
            _ => Self::Unknown(tag),
        }
    }

    /// The two bytes written to disk for this tag.
    pub fn tag(&self) -> [u8; 2] {
        match self {
            Self::CF => *b"CF",
            Self::CK => *b"CK",
            Self::NO => *b"NO",
            Self::NL => *b"NL",
            Self::CB => *b"CB",
            Self::CT => *b"CT",
            Self::CI => *b"CI",
            Self::CN => *b"CN",
            Self::CG => *b"CG",
            Self::CD => *b"CD",
            Self::CZ => *b"CZ",
            Self::NT => *b"NT",
            Self::CC => *b"CC",
            Self::CP => *b"CP",
            Self::Cb => *b"Cb",
            Self::CR => *b"CR",
            Self::ND => *b"ND",
            Self::CS => *b"CS",
            Self::Np => *b"Np",
            Self::Unknown(tag) => *tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        write!(f, "{}", String::from_utf8_lossy(&tag))
    }
}
